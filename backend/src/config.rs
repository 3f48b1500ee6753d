//! Runtime configuration, read from environment variables with defaults.

use anyhow::{Context, Result};
use log::info;
use std::env;
use std::fmt::Display;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::str::FromStr;

pub const BIND_ADDR_VAR: &str = "SUBMINDER_BIND_ADDR";
pub const DATA_DIR_VAR: &str = "SUBMINDER_DATA_DIR";
pub const ALLOWED_ORIGIN_VAR: &str = "SUBMINDER_ALLOWED_ORIGIN";

const DEFAULT_BIND_ADDR: &str = "127.0.0.1:3000";
const DEFAULT_DATA_DIR: &str = "./data";
const DEFAULT_ALLOWED_ORIGIN: &str = "http://localhost:8080";

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub bind_addr: SocketAddr,
    pub data_dir: PathBuf,
    /// Origin allowed by CORS, e.g. the dev server serving the web client
    pub allowed_origin: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build a config from any key lookup; missing keys fall back to defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        Ok(Self {
            bind_addr: try_load(&lookup, BIND_ADDR_VAR, DEFAULT_BIND_ADDR)?,
            data_dir: try_load(&lookup, DATA_DIR_VAR, DEFAULT_DATA_DIR)?,
            allowed_origin: try_load(&lookup, ALLOWED_ORIGIN_VAR, DEFAULT_ALLOWED_ORIGIN)?,
        })
    }
}

fn try_load<T, F>(lookup: &F, key: &str, default: &str) -> Result<T>
where
    T: FromStr,
    T::Err: Display,
    F: Fn(&str) -> Option<String>,
{
    let value = lookup(key).unwrap_or_else(|| {
        info!("{} not set, using default: {}", key, default);
        default.to_string()
    });

    value
        .parse::<T>()
        .map_err(|e| anyhow::anyhow!("{}", e))
        .with_context(|| format!("Invalid {} value: {}", key, value))
}

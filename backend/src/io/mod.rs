//! # IO Module
//!
//! The interface layer between clients and the domain logic. It exposes the
//! REST API, converts JSON into domain commands and turns domain errors into
//! HTTP status codes. No business rules live here.

pub mod rest;

pub use rest::*;

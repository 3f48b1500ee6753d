//! # Storage Module
//!
//! Handles all data persistence for Sub-Minder.
//!
//! The domain layer only sees the traits in [`traits`]; the file-backed
//! implementation in [`csv`] keeps one directory per user:
//!
//! ```text
//! data/
//! └── user_1718000000000/
//!     ├── user.yaml
//!     └── subscriptions.csv
//! ```
//!
//! Writes go to a temp file that is then renamed over the original, so a
//! crash mid-write leaves the previous file intact.

pub mod csv;
pub mod traits;

pub use csv::{CsvConnection, SubscriptionRepository, UserRepository};
pub use traits::{SubscriptionStorage, UserStorage};

//! # userbatch Common Library
//!
//! Shared code for the userbatch server and command-line client:
//! - User record models
//! - API request/response types
//! - The `UserStore` storage seam
//! - Configuration loading and root folder resolution
//! - SQLite initialization and user queries (feature `sqlx`)

pub mod api;
pub mod config;
#[cfg(feature = "sqlx")]
pub mod db;
pub mod error;
pub mod models;
pub mod store;

pub use error::{Error, Result};
pub use models::{NewUser, UserRecord};
pub use store::UserStore;

//! HTTP API handlers for userbatch-server

pub mod health;
pub mod users;

pub use health::health_routes;
pub use users::{create_users, delete_users, list_users, user_routes};

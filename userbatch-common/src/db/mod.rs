//! Database initialization and user queries

pub mod init;
pub mod users;

pub use init::*;
pub use users::*;

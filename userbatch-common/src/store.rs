//! Storage seam for user records
//!
//! The batch pipeline only ever talks to storage through this trait. The
//! SQLite implementation lives in [`crate::db::users`]; the command-line
//! client also ships an HTTP implementation.

use async_trait::async_trait;

use crate::models::{NewUser, UserRecord};
use crate::Result;

/// Insert/delete/select primitives over the persisted user collection
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Return every stored record, ordered by id
    async fn select(&self) -> Result<Vec<UserRecord>>;

    /// Insert all `users` as one batch, returning the number inserted
    ///
    /// Storage assigns identifiers. Either the whole batch is stored or an
    /// error is returned.
    async fn insert(&self, users: &[NewUser]) -> Result<u64>;

    /// Remove every record whose id is in `ids`, returning the count reported
    /// by storage
    ///
    /// Ids with no matching record are ignored.
    async fn delete(&self, ids: &[i64]) -> Result<u64>;
}

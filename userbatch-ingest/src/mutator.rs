//! Batch mutator: one storage call per batch
//!
//! Empty batches short-circuit without touching the store. Any store error
//! fails the whole batch; there is no partial-success outcome and nothing is
//! retried.

use std::sync::Arc;

use tracing::{error, info};
use userbatch_common::{NewUser, UserRecord, UserStore};

use crate::error::IngestResult;

/// Applies validated batches to a [`UserStore`]
#[derive(Clone)]
pub struct BatchMutator {
    store: Arc<dyn UserStore>,
}

impl BatchMutator {
    pub fn new(store: Arc<dyn UserStore>) -> Self {
        Self { store }
    }

    /// Insert `users` in one call, returning the count stored
    pub async fn bulk_insert(&self, users: &[NewUser]) -> IngestResult<u64> {
        if users.is_empty() {
            return Ok(0);
        }

        match self.store.insert(users).await {
            Ok(count) => {
                info!("Bulk insert stored {} users", count);
                Ok(count)
            }
            Err(e) => {
                error!("Bulk insert of {} users failed: {}", users.len(), e);
                Err(e.into())
            }
        }
    }

    /// Delete `ids` in one call, returning the count reported by the store
    ///
    /// Unknown ids are not an error.
    pub async fn bulk_delete(&self, ids: &[i64]) -> IngestResult<u64> {
        if ids.is_empty() {
            return Ok(0);
        }

        match self.store.delete(ids).await {
            Ok(count) => {
                info!("Bulk delete of {} ids reported {}", ids.len(), count);
                Ok(count)
            }
            Err(e) => {
                error!("Bulk delete of {} ids failed: {}", ids.len(), e);
                Err(e.into())
            }
        }
    }

    /// Current storage contents
    pub async fn fetch_all(&self) -> IngestResult<Vec<UserRecord>> {
        Ok(self.store.select().await?)
    }
}

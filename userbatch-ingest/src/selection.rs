//! Row selection and the bulk-delete confirmation flow
//!
//! Selection is tracked by display position. Positions are resolved against
//! the currently loaded list only when a delete is requested; positions that
//! no longer exist are dropped.
//!
//! Delete state progression:
//! `Idle → PendingConfirmation(ids) → Idle` (cancel) or
//! `PendingConfirmation(ids) → Mutating(ids) → Idle` (confirm, then settle).

use std::collections::BTreeSet;

use userbatch_common::UserRecord;

use crate::error::{IngestError, IngestResult};

/// Selected display positions
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SelectionTracker {
    selected: BTreeSet<usize>,
}

impl SelectionTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, position: usize, selected: bool) {
        if selected {
            self.selected.insert(position);
        } else {
            self.selected.remove(&position);
        }
    }

    pub fn toggle(&mut self, position: usize) {
        let selected = !self.is_selected(position);
        self.set(position, selected);
    }

    /// Select or deselect every position of a list of `len` rows
    pub fn set_all(&mut self, len: usize, selected: bool) {
        if selected {
            self.selected = (0..len).collect();
        } else {
            self.selected.clear();
        }
    }

    pub fn is_selected(&self, position: usize) -> bool {
        self.selected.contains(&position)
    }

    pub fn count(&self) -> usize {
        self.selected.len()
    }

    pub fn is_empty(&self) -> bool {
        self.selected.is_empty()
    }

    pub fn positions(&self) -> impl Iterator<Item = usize> + '_ {
        self.selected.iter().copied()
    }

    pub fn clear(&mut self) {
        self.selected.clear();
    }

    /// Forget positions at or past `len` after the displayed list changed
    pub fn prune(&mut self, len: usize) {
        self.selected.retain(|position| *position < len);
    }

    /// Ids of the selected rows in `users`, in position order
    pub fn resolve_ids(&self, users: &[UserRecord]) -> Vec<i64> {
        self.selected
            .iter()
            .filter_map(|position| users.get(*position))
            .map(|user| user.id)
            .collect()
    }
}

/// Where the delete flow currently stands
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum DeleteState {
    #[default]
    Idle,
    PendingConfirmation(Vec<i64>),
    Mutating(Vec<i64>),
}

/// Serializes bulk deletes behind a confirmation step
#[derive(Debug, Clone, Default)]
pub struct DeleteFlow {
    state: DeleteState,
}

impl DeleteFlow {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &DeleteState {
        &self.state
    }

    pub fn is_idle(&self) -> bool {
        self.state == DeleteState::Idle
    }

    /// Ids awaiting confirmation, if any
    pub fn pending(&self) -> Option<&[i64]> {
        match &self.state {
            DeleteState::PendingConfirmation(ids) => Some(ids.as_slice()),
            _ => None,
        }
    }

    /// Move `Idle → PendingConfirmation(ids)`
    pub fn request(&mut self, ids: Vec<i64>) -> IngestResult<usize> {
        match self.state {
            DeleteState::Idle => {}
            DeleteState::PendingConfirmation(_) => {
                return Err(IngestError::DeleteInProgress("awaiting confirmation"))
            }
            DeleteState::Mutating(_) => return Err(IngestError::DeleteInProgress("in flight")),
        }
        if ids.is_empty() {
            return Err(IngestError::EmptyBatch("No users selected".to_string()));
        }

        let count = ids.len();
        self.state = DeleteState::PendingConfirmation(ids);
        Ok(count)
    }

    /// Confirmation prompt naming the pending count
    pub fn prompt(&self) -> Option<String> {
        self.pending().map(|ids| {
            format!(
                "Are you sure you want to delete {} users? This action cannot be undone.",
                ids.len()
            )
        })
    }

    /// Drop the pending request; returns the discarded ids
    pub fn cancel(&mut self) -> Option<Vec<i64>> {
        match std::mem::take(&mut self.state) {
            DeleteState::PendingConfirmation(ids) => Some(ids),
            other => {
                self.state = other;
                None
            }
        }
    }

    /// Move `PendingConfirmation(ids) → Mutating(ids)`, returning the ids
    ///
    /// Returns `None` when nothing is pending.
    pub fn begin(&mut self) -> Option<Vec<i64>> {
        let ids = self.pending()?.to_vec();
        self.state = DeleteState::Mutating(ids.clone());
        Some(ids)
    }

    /// Return to `Idle` once the delete call has resolved
    pub fn settle(&mut self) {
        self.state = DeleteState::Idle;
    }
}

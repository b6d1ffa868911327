//! Ingestion orchestrator
//!
//! Owns the displayed user list, the row selection, the delete flow and the
//! notice board, and sequences normalizer → validator → mutator for each
//! input path:
//!
//! - **Form**: one row; any missing or invalid field aborts with
//!   "All fields are required" before storage is contacted.
//! - **Spreadsheet**: many rows; unmappable and invalid rows are filtered out
//!   silently and only an empty result aborts.
//!
//! Every successful mutation is followed by a full re-fetch from storage.
//! Errors are turned into notices here and also returned to the caller.

use std::path::Path;
use std::sync::Arc;
use std::time::Instant;

use tracing::{info, warn};
use userbatch_common::{NewUser, UserRecord, UserStore};

use crate::error::{IngestError, IngestResult};
use crate::mutator::BatchMutator;
use crate::normalizer::{normalize_row, normalize_rows};
use crate::notice::NoticeBoard;
use crate::row::RawInputRow;
use crate::selection::{DeleteFlow, DeleteState, SelectionTracker};
use crate::spreadsheet;
use crate::validator::{filter_valid, validate};

pub const FORM_INCOMPLETE: &str = "All fields are required";
pub const NO_VALID_USERS: &str =
    "No valid users found in file. Ensure columns are: name, age, birth";
pub const CREATE_FAILED: &str = "Failed to create user";
pub const IMPORT_FAILED: &str = "Failed to import users";
pub const PARSE_FAILED: &str = "Failed to parse spreadsheet file";
pub const DELETE_FAILED: &str = "Failed to delete users";
pub const LOAD_FAILED: &str = "Failed to load users";

/// Values typed into the entry form
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormInput {
    pub name: Option<String>,
    pub age: Option<String>,
    pub birth: Option<String>,
}

impl FormInput {
    pub fn new(
        name: impl Into<String>,
        age: impl Into<String>,
        birth: impl Into<String>,
    ) -> Self {
        Self {
            name: Some(name.into()),
            age: Some(age.into()),
            birth: Some(birth.into()),
        }
    }

    /// The form as a raw row under the canonical lowercase keys
    pub fn to_row(&self) -> RawInputRow {
        let mut row = RawInputRow::new();
        for (key, value) in [("name", &self.name), ("age", &self.age), ("birth", &self.birth)] {
            if let Some(value) = value {
                row.insert(key, value.as_str());
            }
        }
        row
    }
}

/// Row accounting for one spreadsheet import
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ImportReport {
    /// Data rows read from the sheet
    pub rows_read: usize,
    /// Rows dropped by the normalizer (missing name, age or birth)
    pub unmappable: usize,
    /// Rows rejected by the validator
    pub rejected: usize,
    /// Users stored
    pub inserted: u64,
}

/// Single mutator of the displayed user list
pub struct IngestOrchestrator {
    mutator: BatchMutator,
    users: Vec<UserRecord>,
    selection: SelectionTracker,
    delete_flow: DeleteFlow,
    notices: NoticeBoard,
}

impl IngestOrchestrator {
    pub fn new(store: Arc<dyn UserStore>) -> Self {
        Self {
            mutator: BatchMutator::new(store),
            users: Vec::new(),
            selection: SelectionTracker::new(),
            delete_flow: DeleteFlow::new(),
            notices: NoticeBoard::new(),
        }
    }

    /// Users as last fetched from storage
    pub fn users(&self) -> &[UserRecord] {
        &self.users
    }

    pub fn selection(&self) -> &SelectionTracker {
        &self.selection
    }

    pub fn notices(&self) -> &NoticeBoard {
        &self.notices
    }

    pub fn delete_state(&self) -> &DeleteState {
        self.delete_flow.state()
    }

    /// Replace the displayed list with storage contents
    ///
    /// Failure sets the page-level error; the previous list stays displayed.
    pub async fn refresh(&mut self) -> IngestResult<()> {
        match self.mutator.fetch_all().await {
            Ok(users) => {
                self.users = users;
                self.selection.prune(self.users.len());
                self.notices.page_error = None;
                Ok(())
            }
            Err(e) => {
                warn!("Refresh failed: {}", e);
                self.notices.set_page_error(LOAD_FAILED);
                Err(e)
            }
        }
    }

    // ------------------------------------------------------------------
    // Ingestion
    // ------------------------------------------------------------------

    /// Create one user from the entry form
    pub async fn submit_form(&mut self, form: &FormInput) -> IngestResult<u64> {
        self.notices.clear_for_submit();

        let user = match normalize_row(&form.to_row())
            .ok()
            .and_then(|draft| validate(&draft).ok())
        {
            Some(user) => user,
            None => {
                self.notices.set_form_error(FORM_INCOMPLETE);
                return Err(IngestError::Validation(FORM_INCOMPLETE.to_string()));
            }
        };

        let count = match self.mutator.bulk_insert(std::slice::from_ref(&user)).await {
            Ok(count) => count,
            Err(e) => {
                self.notices.set_form_error(CREATE_FAILED);
                return Err(e);
            }
        };

        info!("Created user {:?}", user.name);
        self.notices.post_success("User created successfully", Instant::now());
        self.refresh_after_mutation().await;

        Ok(count)
    }

    /// Import every valid row of the first worksheet in `path`
    pub async fn import_file(&mut self, path: &Path) -> IngestResult<ImportReport> {
        self.notices.clear_for_submit();

        let rows = match spreadsheet::read_workbook(path) {
            Ok(rows) => rows,
            Err(e) => {
                warn!("Could not read {}: {}", path.display(), e);
                self.notices.set_form_error(PARSE_FAILED);
                return Err(e);
            }
        };

        self.import_rows(&rows).await
    }

    /// Import already-parsed spreadsheet rows
    pub async fn import_rows(&mut self, rows: &[RawInputRow]) -> IngestResult<ImportReport> {
        self.notices.clear_for_submit();

        let (users, mut report) = prepare_batch(rows);
        if users.is_empty() {
            self.notices.set_form_error(NO_VALID_USERS);
            return Err(IngestError::EmptyBatch(NO_VALID_USERS.to_string()));
        }

        report.inserted = match self.mutator.bulk_insert(&users).await {
            Ok(count) => count,
            Err(e) => {
                self.notices.set_form_error(IMPORT_FAILED);
                return Err(e);
            }
        };

        info!(
            "Imported {} users ({} rows read, {} unmappable, {} rejected)",
            report.inserted, report.rows_read, report.unmappable, report.rejected
        );
        self.notices.post_success(
            format!("Successfully imported {} users", users.len()),
            Instant::now(),
        );
        self.refresh_after_mutation().await;

        Ok(report)
    }

    // ------------------------------------------------------------------
    // Selection and deletion
    // ------------------------------------------------------------------

    pub fn select_row(&mut self, position: usize, selected: bool) {
        self.selection.set(position, selected);
    }

    pub fn select_all(&mut self, selected: bool) {
        self.selection.set_all(self.users.len(), selected);
    }

    /// Ask to delete every selected row; returns the count awaiting
    /// confirmation
    pub fn request_delete_selected(&mut self) -> IngestResult<usize> {
        let ids = self.selection.resolve_ids(&self.users);
        self.open_delete(ids)
    }

    /// Ask to delete the row at `position`, ignoring the selection
    pub fn request_delete_row(&mut self, position: usize) -> IngestResult<usize> {
        let ids = self
            .users
            .get(position)
            .map(|user| vec![user.id])
            .unwrap_or_default();
        self.open_delete(ids)
    }

    /// Ask to delete specific ids
    pub fn request_delete_ids(&mut self, ids: Vec<i64>) -> IngestResult<usize> {
        self.open_delete(ids)
    }

    /// Enter confirmation; a refused request is posted as a delete error
    fn open_delete(&mut self, ids: Vec<i64>) -> IngestResult<usize> {
        let result = self.delete_flow.request(ids);
        if let Err(e) = &result {
            self.notices.post_delete_error(e.to_string(), Instant::now());
        }
        result
    }

    /// Prompt to show while a delete awaits confirmation
    pub fn confirmation_prompt(&self) -> Option<String> {
        self.delete_flow.prompt()
    }

    /// Discard the pending delete and clear the selection
    pub fn cancel_delete(&mut self) {
        if let Some(ids) = self.delete_flow.cancel() {
            info!("Delete of {} users cancelled", ids.len());
        }
        self.selection.clear();
    }

    /// Run the pending delete
    ///
    /// Returns `Ok(0)` when nothing is pending. On success the selection is
    /// cleared and the list re-fetched; on failure the selection is kept.
    pub async fn confirm_delete(&mut self) -> IngestResult<u64> {
        let Some(ids) = self.delete_flow.begin() else {
            return Ok(0);
        };

        let result = self.mutator.bulk_delete(&ids).await;
        self.delete_flow.settle();

        match result {
            Ok(count) => {
                self.selection.clear();
                self.notices.post_success(
                    format!("Successfully deleted {} users", ids.len()),
                    Instant::now(),
                );
                self.refresh_after_mutation().await;
                Ok(count)
            }
            Err(e) => {
                self.notices.post_delete_error(DELETE_FAILED, Instant::now());
                Err(e)
            }
        }
    }

    /// Re-fetch after a successful mutation
    ///
    /// The mutation already succeeded, so a failed fetch only raises the
    /// page error.
    async fn refresh_after_mutation(&mut self) {
        if self.refresh().await.is_err() {
            warn!("List is stale after a successful mutation");
        }
    }
}

/// Normalize and validate spreadsheet rows into an insertable batch
fn prepare_batch(rows: &[RawInputRow]) -> (Vec<NewUser>, ImportReport) {
    let (drafts, unmappable) = normalize_rows(rows);
    let validated = filter_valid(drafts);

    let report = ImportReport {
        rows_read: rows.len(),
        unmappable,
        rejected: validated.rejected,
        inserted: 0,
    };

    (validated.accepted, report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::row::CellValue;

    #[test]
    fn test_form_to_row_skips_missing_fields() {
        let form = FormInput {
            name: Some("Alice".to_string()),
            age: None,
            birth: Some("2022-01-01".to_string()),
        };
        let row = form.to_row();
        assert_eq!(row.len(), 2);
        assert_eq!(row.get("name"), Some(&CellValue::from("Alice")));
        assert!(row.get("age").is_none());
    }

    #[test]
    fn test_prepare_batch_report() {
        let rows = vec![
            RawInputRow::new()
                .with("name", "Alice")
                .with("Age", "30")
                .with("Birth Date", CellValue::Date(44562.0)),
            RawInputRow::new()
                .with("name", "")
                .with("age", 5_i64)
                .with("birth", "2020-01-01"),
            RawInputRow::new()
                .with("Name", "Bob")
                .with("Age", 41.5)
                .with("Birth", "1983-04-02"),
        ];

        let (users, report) = prepare_batch(&rows);
        assert_eq!(users, vec![NewUser::new("Alice", 30, "2022-01-01")]);
        assert_eq!(
            report,
            ImportReport {
                rows_read: 3,
                unmappable: 1,
                rejected: 1,
                inserted: 0,
            }
        );
    }
}

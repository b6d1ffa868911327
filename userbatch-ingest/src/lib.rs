//! userbatch-ingest library - bulk ingestion and batch mutation pipeline
//!
//! Raw input (a form submission or spreadsheet rows) flows through:
//!
//! 1. [`normalizer`]: alias lookup, numeric coercion, date-serial conversion
//! 2. [`validator`]: required fields and value ranges
//! 3. [`mutator`]: one storage call per batch
//!
//! [`orchestrator`] sequences the three per input path and owns the
//! displayed list, the [`selection`] state for bulk delete and the
//! user-facing [`notice`]s.

pub mod client;
pub mod error;
pub mod mutator;
pub mod normalizer;
pub mod notice;
pub mod orchestrator;
pub mod row;
pub mod selection;
pub mod spreadsheet;
pub mod validator;

pub use client::HttpUserStore;
pub use error::{IngestError, IngestResult};
pub use mutator::BatchMutator;
pub use orchestrator::{FormInput, ImportReport, IngestOrchestrator};
pub use row::{CellValue, RawInputRow};

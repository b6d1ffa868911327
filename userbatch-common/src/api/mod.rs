//! Shared API request/response types

pub mod coerce;
pub mod types;

pub use types::{BulkCreateRequest, BulkDeleteRequest, ErrorBody, MutationResponse, UserPayload};

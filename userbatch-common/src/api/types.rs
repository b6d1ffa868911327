//! Request/response bodies for the `/api/users` endpoints

use serde::{Deserialize, Serialize};

use super::coerce;
use crate::models::{NewUser, UserRecord};

/// One user in a bulk create request
///
/// `id` is ignored on create; clients send `0`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct UserPayload {
    #[serde(default)]
    pub id: i64,
    pub name: String,
    #[serde(deserialize_with = "coerce::integer")]
    pub age: i64,
    pub birth: String,
}

impl From<&NewUser> for UserPayload {
    fn from(user: &NewUser) -> Self {
        Self {
            id: 0,
            name: user.name.clone(),
            age: user.age,
            birth: user.birth.clone(),
        }
    }
}

impl From<UserPayload> for NewUser {
    fn from(payload: UserPayload) -> Self {
        NewUser::new(payload.name, payload.age, payload.birth)
    }
}

impl From<UserRecord> for UserPayload {
    fn from(record: UserRecord) -> Self {
        Self {
            id: record.id,
            name: record.name,
            age: record.age,
            birth: record.birth,
        }
    }
}

/// POST /api/users body
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct BulkCreateRequest {
    pub users: Vec<UserPayload>,
}

/// DELETE /api/users body
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct BulkDeleteRequest {
    #[serde(deserialize_with = "coerce::integer_vec")]
    pub ids: Vec<i64>,
}

/// Outcome of a bulk create or bulk delete
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct MutationResponse {
    pub message: String,
    pub count: u64,
}

/// Error body returned with every non-2xx status
///
/// ```json
/// {"error": {"code": "BAD_REQUEST", "message": "Invalid request: name must not be empty"}}
/// ```
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ErrorBody {
    pub error: ErrorDetail,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ErrorDetail {
    pub code: String,
    pub message: String,
}

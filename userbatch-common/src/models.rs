//! User record models

use serde::{Deserialize, Serialize};

/// Persisted user record
///
/// `id` is assigned by storage; `0` means "not yet assigned".
/// `birth` is an ISO-8601 calendar date (`YYYY-MM-DD`) stored as text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct UserRecord {
    pub id: i64,
    pub name: String,
    pub age: i64,
    pub birth: String,
}

/// Validated user awaiting insertion (no identity yet)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewUser {
    pub name: String,
    pub age: i64,
    pub birth: String,
}

impl NewUser {
    pub fn new(name: impl Into<String>, age: i64, birth: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            age,
            birth: birth.into(),
        }
    }
}

impl From<UserRecord> for NewUser {
    fn from(record: UserRecord) -> Self {
        Self {
            name: record.name,
            age: record.age,
            birth: record.birth,
        }
    }
}

//! Record validator
//!
//! Same rules for every input source: non-empty name, positive integer age,
//! non-empty birth. No cross-field checks.

use thiserror::Error;
use tracing::warn;
use userbatch_common::NewUser;

use crate::normalizer::UserDraft;

/// Reason a draft was rejected
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Rejection {
    #[error("name is empty")]
    EmptyName,
    #[error("age must be a positive integer, got {0}")]
    InvalidAge(f64),
    #[error("birth date is empty")]
    EmptyBirth,
}

/// Check a draft, yielding the canonical user on success
pub fn validate(draft: &UserDraft) -> Result<NewUser, Rejection> {
    let name = draft.name.trim();
    if name.is_empty() {
        return Err(Rejection::EmptyName);
    }

    let age = draft.age;
    if !age.is_finite() || age.fract() != 0.0 || age < 1.0 || age >= i64::MAX as f64 {
        return Err(Rejection::InvalidAge(age));
    }

    let birth = draft.birth.trim();
    if birth.is_empty() {
        return Err(Rejection::EmptyBirth);
    }

    Ok(NewUser::new(name, age as i64, birth))
}

/// Validated users plus the count of silently filtered drafts
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ValidatedBatch {
    pub accepted: Vec<NewUser>,
    pub rejected: usize,
}

/// Validate every draft, keeping only the accepted ones
pub fn filter_valid<I>(drafts: I) -> ValidatedBatch
where
    I: IntoIterator<Item = UserDraft>,
{
    let mut batch = ValidatedBatch::default();

    for draft in drafts {
        match validate(&draft) {
            Ok(user) => batch.accepted.push(user),
            Err(reason) => {
                warn!("Rejected user {:?}: {}", draft.name, reason);
                batch.rejected += 1;
            }
        }
    }

    batch
}

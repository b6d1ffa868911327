//! Field normalizer: raw rows to user drafts
//!
//! Each canonical field has an ordered alias list; the first alias holding a
//! non-blank cell wins. Rows missing any field are unmappable and are dropped
//! before validation.
//!
//! Birth dates given as numbers are spreadsheet serials (days since
//! 1899-12-30) and are converted to `YYYY-MM-DD`; text dates pass through
//! verbatim.

use chrono::{Days, NaiveDate};
use thiserror::Error;
use tracing::debug;

use crate::row::{CellValue, RawInputRow};

pub const NAME_ALIASES: &[&str] = &["name", "Name"];
pub const AGE_ALIASES: &[&str] = &["age", "Age"];
pub const BIRTH_ALIASES: &[&str] = &["birth", "Birth", "Birth Date"];

/// Serial of 9999-12-31, the last date spreadsheets can represent
const MAX_DATE_SERIAL: f64 = 2_958_465.0;

/// Normalized row, not yet validated
#[derive(Debug, Clone, PartialEq)]
pub struct UserDraft {
    pub name: String,
    /// Coerced age; may still be fractional or negative
    pub age: f64,
    pub birth: String,
}

/// Why a row could not be mapped to a draft
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum Unmappable {
    #[error("no name")]
    MissingName,
    #[error("no numeric age")]
    MissingAge,
    #[error("no resolvable birth date")]
    MissingBirth,
}

/// Map one raw row to a draft
pub fn normalize_row(row: &RawInputRow) -> Result<UserDraft, Unmappable> {
    let name = first_present(row, NAME_ALIASES)
        .map(CellValue::to_text)
        .ok_or(Unmappable::MissingName)?;

    let age = first_present(row, AGE_ALIASES)
        .and_then(CellValue::to_number)
        .filter(|n| *n != 0.0)
        .ok_or(Unmappable::MissingAge)?;

    let birth = first_present(row, BIRTH_ALIASES)
        .and_then(resolve_birth)
        .ok_or(Unmappable::MissingBirth)?;

    Ok(UserDraft { name, age, birth })
}

/// Normalize every row, dropping the unmappable ones
///
/// Returns the drafts and the number of dropped rows.
pub fn normalize_rows<'a, I>(rows: I) -> (Vec<UserDraft>, usize)
where
    I: IntoIterator<Item = &'a RawInputRow>,
{
    let mut drafts = Vec::new();
    let mut dropped = 0;

    for (index, row) in rows.into_iter().enumerate() {
        match normalize_row(row) {
            Ok(draft) => drafts.push(draft),
            Err(reason) => {
                debug!("Dropping input row {}: {}", index + 1, reason);
                dropped += 1;
            }
        }
    }

    (drafts, dropped)
}

fn first_present<'a>(row: &'a RawInputRow, aliases: &[&str]) -> Option<&'a CellValue> {
    aliases
        .iter()
        .filter_map(|alias| row.get(alias))
        .find(|cell| !cell.is_blank())
}

fn resolve_birth(cell: &CellValue) -> Option<String> {
    match cell {
        CellValue::Text(s) => Some(s.clone()),
        CellValue::Number(serial) | CellValue::Date(serial) => serial_to_iso_date(*serial),
    }
}

/// Convert a spreadsheet date serial to `YYYY-MM-DD`
///
/// The time-of-day fraction is discarded. Serials outside
/// `0..=2958465` yield `None`.
pub fn serial_to_iso_date(serial: f64) -> Option<String> {
    if !serial.is_finite() {
        return None;
    }
    let days = serial.floor();
    if !(0.0..=MAX_DATE_SERIAL).contains(&days) {
        return None;
    }

    let epoch = NaiveDate::from_ymd_opt(1899, 12, 30)?;
    let date = epoch.checked_add_days(Days::new(days as u64))?;
    Some(date.format("%Y-%m-%d").to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_serial_known_dates() {
        assert_eq!(serial_to_iso_date(44562.0).as_deref(), Some("2022-01-01"));
        assert_eq!(serial_to_iso_date(25569.0).as_deref(), Some("1970-01-01"));
        assert_eq!(serial_to_iso_date(1.0).as_deref(), Some("1899-12-31"));
        assert_eq!(serial_to_iso_date(36526.0).as_deref(), Some("2000-01-01"));
    }

    #[test]
    fn test_serial_drops_time_of_day() {
        assert_eq!(serial_to_iso_date(44562.99).as_deref(), Some("2022-01-01"));
    }

    #[test]
    fn test_serial_out_of_range() {
        assert_eq!(serial_to_iso_date(-1.0), None);
        assert_eq!(serial_to_iso_date(f64::INFINITY), None);
        assert_eq!(serial_to_iso_date(3_000_000.0), None);
        assert_eq!(serial_to_iso_date(MAX_DATE_SERIAL).as_deref(), Some("9999-12-31"));
    }

    #[test]
    fn test_normalize_lowercase_keys() {
        let row = RawInputRow::new()
            .with("name", "Alice")
            .with("age", 30_i64)
            .with("birth", "2022-01-01");

        let draft = normalize_row(&row).unwrap();
        assert_eq!(draft.name, "Alice");
        assert_eq!(draft.age, 30.0);
        assert_eq!(draft.birth, "2022-01-01");
    }

    #[test]
    fn test_normalize_mixed_aliases_and_serial() {
        let row = RawInputRow::new()
            .with("name", "Alice")
            .with("Age", "30")
            .with("Birth Date", CellValue::Date(44562.0));

        let draft = normalize_row(&row).unwrap();
        assert_eq!(draft.age, 30.0);
        assert_eq!(draft.birth, "2022-01-01");
    }

    #[test]
    fn test_numeric_birth_is_a_serial() {
        let row = RawInputRow::new()
            .with("Name", "Bob")
            .with("Age", 41_i64)
            .with("Birth", 44562_i64);

        assert_eq!(normalize_row(&row).unwrap().birth, "2022-01-01");
    }

    #[test]
    fn test_birth_alias_priority() {
        let row = RawInputRow::new()
            .with("name", "Alice")
            .with("age", 30_i64)
            .with("birth", "2001-01-01")
            .with("Birth", "2002-02-02")
            .with("Birth Date", "2003-03-03");
        assert_eq!(normalize_row(&row).unwrap().birth, "2001-01-01");

        let row = RawInputRow::new()
            .with("name", "Alice")
            .with("age", 30_i64)
            .with("birth", "")
            .with("Birth", "2002-02-02");
        assert_eq!(normalize_row(&row).unwrap().birth, "2002-02-02");
    }

    #[test]
    fn test_text_birth_is_verbatim() {
        let row = RawInputRow::new()
            .with("name", "Alice")
            .with("age", 30_i64)
            .with("birth", "01/02/2003");
        assert_eq!(normalize_row(&row).unwrap().birth, "01/02/2003");
    }

    #[test]
    fn test_blank_name_falls_through_to_next_alias() {
        let row = RawInputRow::new()
            .with("name", "")
            .with("Name", "Carol")
            .with("age", 25_i64)
            .with("birth", "1999-09-09");
        assert_eq!(normalize_row(&row).unwrap().name, "Carol");
    }

    #[test]
    fn test_missing_fields_are_unmappable() {
        let full = RawInputRow::new()
            .with("name", "Alice")
            .with("age", 30_i64)
            .with("birth", "2022-01-01");
        assert!(normalize_row(&full).is_ok());

        let no_name = RawInputRow::new().with("age", 30_i64).with("birth", "2022-01-01");
        assert_eq!(normalize_row(&no_name), Err(Unmappable::MissingName));

        let empty_name = no_name.clone().with("name", "");
        assert_eq!(normalize_row(&empty_name), Err(Unmappable::MissingName));

        let no_age = RawInputRow::new().with("name", "Alice").with("birth", "2022-01-01");
        assert_eq!(normalize_row(&no_age), Err(Unmappable::MissingAge));

        let text_age = no_age.clone().with("age", "thirty");
        assert_eq!(normalize_row(&text_age), Err(Unmappable::MissingAge));

        let zero_age = no_age.clone().with("age", "0");
        assert_eq!(normalize_row(&zero_age), Err(Unmappable::MissingAge));

        let no_birth = RawInputRow::new().with("name", "Alice").with("age", 30_i64);
        assert_eq!(normalize_row(&no_birth), Err(Unmappable::MissingBirth));

        let bad_serial = no_birth.clone().with("birth", -5_i64);
        assert_eq!(normalize_row(&bad_serial), Err(Unmappable::MissingBirth));
    }

    #[test]
    fn test_unknown_keys_are_ignored() {
        let row = RawInputRow::new()
            .with("NAME", "Alice")
            .with("AGE", 30_i64)
            .with("BIRTH", "2022-01-01");
        assert_eq!(normalize_row(&row), Err(Unmappable::MissingName));
    }

    #[test]
    fn test_normalize_rows_counts_drops() {
        let rows = vec![
            RawInputRow::new()
                .with("name", "Alice")
                .with("Age", "30")
                .with("Birth Date", CellValue::Date(44562.0)),
            RawInputRow::new()
                .with("name", "")
                .with("age", 5_i64)
                .with("birth", "2020-01-01"),
        ];

        let (drafts, dropped) = normalize_rows(&rows);
        assert_eq!(drafts.len(), 1);
        assert_eq!(dropped, 1);
        assert_eq!(drafts[0].name, "Alice");
    }
}

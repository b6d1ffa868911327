//! Raw input rows and their cell values
//!
//! A [`RawInputRow`] is what a form submission or one spreadsheet line looks
//! like before normalization: header text mapped to a [`CellValue`].

use std::collections::HashMap;
use std::fmt;

/// One input cell
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    Text(String),
    Number(f64),
    /// Spreadsheet date serial (days since 1899-12-30, fraction = time of day)
    Date(f64),
}

impl CellValue {
    /// Empty text, or a number that is zero or NaN
    ///
    /// Blank cells never satisfy an alias lookup; the next alias is tried.
    pub fn is_blank(&self) -> bool {
        match self {
            CellValue::Text(s) => s.is_empty(),
            CellValue::Number(n) | CellValue::Date(n) => *n == 0.0 || n.is_nan(),
        }
    }

    /// Text rendering; integral numbers print without a fraction
    pub fn to_text(&self) -> String {
        match self {
            CellValue::Text(s) => s.clone(),
            CellValue::Number(n) | CellValue::Date(n) => format_number(*n),
        }
    }

    /// Numeric coercion: numbers as-is, text parsed after trimming
    ///
    /// Dates do not coerce to numbers. Non-finite results are `None`.
    pub fn to_number(&self) -> Option<f64> {
        let n = match self {
            CellValue::Number(n) => *n,
            CellValue::Text(s) => s.trim().parse::<f64>().ok()?,
            CellValue::Date(_) => return None,
        };
        n.is_finite().then_some(n)
    }
}

fn format_number(n: f64) -> String {
    if n.is_finite() && n.fract() == 0.0 && n.abs() < 1e15 {
        format!("{}", n as i64)
    } else {
        format!("{}", n)
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_text())
    }
}

impl From<&str> for CellValue {
    fn from(s: &str) -> Self {
        CellValue::Text(s.to_string())
    }
}

impl From<String> for CellValue {
    fn from(s: String) -> Self {
        CellValue::Text(s)
    }
}

impl From<f64> for CellValue {
    fn from(n: f64) -> Self {
        CellValue::Number(n)
    }
}

impl From<i64> for CellValue {
    fn from(n: i64) -> Self {
        CellValue::Number(n as f64)
    }
}

/// Header-keyed cells of one input row
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawInputRow {
    cells: HashMap<String, CellValue>,
}

impl RawInputRow {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert
    pub fn with(mut self, key: impl Into<String>, value: impl Into<CellValue>) -> Self {
        self.insert(key, value);
        self
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<CellValue>) {
        self.cells.insert(key.into(), value.into());
    }

    pub fn get(&self, key: &str) -> Option<&CellValue> {
        self.cells.get(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.cells.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_cells() {
        assert!(CellValue::from("").is_blank());
        assert!(CellValue::Number(0.0).is_blank());
        assert!(CellValue::Number(f64::NAN).is_blank());
        assert!(!CellValue::from(" ").is_blank());
        assert!(!CellValue::Number(3.0).is_blank());
        assert!(!CellValue::Date(44562.0).is_blank());
    }

    #[test]
    fn test_to_number() {
        assert_eq!(CellValue::from(" 30 ").to_number(), Some(30.0));
        assert_eq!(CellValue::from("30.5").to_number(), Some(30.5));
        assert_eq!(CellValue::Number(7.0).to_number(), Some(7.0));
        assert_eq!(CellValue::from("thirty").to_number(), None);
        assert_eq!(CellValue::from("inf").to_number(), None);
        assert_eq!(CellValue::Date(44562.0).to_number(), None);
    }

    #[test]
    fn test_to_text() {
        assert_eq!(CellValue::Number(42.0).to_text(), "42");
        assert_eq!(CellValue::Number(2.5).to_text(), "2.5");
        assert_eq!(CellValue::from("Alice").to_text(), "Alice");
    }

    #[test]
    fn test_row_builder() {
        let row = RawInputRow::new().with("name", "Alice").with("Age", 30_i64);
        assert_eq!(row.len(), 2);
        assert_eq!(row.get("name"), Some(&CellValue::from("Alice")));
        assert_eq!(row.get("Age"), Some(&CellValue::Number(30.0)));
        assert!(row.get("age").is_none());
    }
}

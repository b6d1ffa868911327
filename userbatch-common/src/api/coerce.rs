//! Lenient numeric deserializers for request bodies
//!
//! Form and spreadsheet clients send numbers either as JSON numbers or as
//! numeric strings. Both are accepted as long as the value is integral.

use serde::de::{Deserializer, Error as _};
use serde::Deserialize;

#[derive(Deserialize)]
#[serde(untagged)]
enum NumberOrText {
    Int(i64),
    Float(f64),
    Text(String),
}

impl NumberOrText {
    fn into_integer(self) -> Result<i64, String> {
        match self {
            NumberOrText::Int(v) => Ok(v),
            NumberOrText::Float(v) => float_to_integer(v),
            NumberOrText::Text(s) => {
                let trimmed = s.trim();
                if let Ok(v) = trimmed.parse::<i64>() {
                    return Ok(v);
                }
                match trimmed.parse::<f64>() {
                    Ok(v) => float_to_integer(v),
                    Err(_) => Err(format!("expected a number, got {:?}", s)),
                }
            }
        }
    }
}

fn float_to_integer(v: f64) -> Result<i64, String> {
    if v.is_finite() && v.fract() == 0.0 && v.abs() < i64::MAX as f64 {
        Ok(v as i64)
    } else {
        Err(format!("expected an integer, got {}", v))
    }
}

/// Deserialize an integer from a JSON number or numeric string
pub fn integer<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    NumberOrText::deserialize(deserializer)?
        .into_integer()
        .map_err(D::Error::custom)
}

/// Deserialize a list of integers, each from a JSON number or numeric string
pub fn integer_vec<'de, D>(deserializer: D) -> Result<Vec<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    Vec::<NumberOrText>::deserialize(deserializer)?
        .into_iter()
        .map(|v| v.into_integer().map_err(D::Error::custom))
        .collect()
}

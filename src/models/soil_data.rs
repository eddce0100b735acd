use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Flat measurement map as supplied by callers, e.g. `ph -> 6.2`, `texture -> "L"`.
pub type SoilData = BTreeMap<String, MeasuredValue>;

/// A single measured soil or climate value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MeasuredValue {
    Number(f64),
    Text(String),
}

impl MeasuredValue {
    /// Numeric form of the value. Text is parsed so that values read from
    /// CSV-like sources ("6.2") still compare against ranges.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            MeasuredValue::Number(n) => Some(*n),
            MeasuredValue::Text(s) => s.trim().parse::<f64>().ok(),
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            MeasuredValue::Number(_) => None,
            MeasuredValue::Text(s) => Some(s.as_str()),
        }
    }
}

impl std::fmt::Display for MeasuredValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MeasuredValue::Number(n) => write!(f, "{}", n),
            MeasuredValue::Text(s) => write!(f, "{}", s),
        }
    }
}

impl From<f64> for MeasuredValue {
    fn from(value: f64) -> Self {
        MeasuredValue::Number(value)
    }
}

impl From<i32> for MeasuredValue {
    fn from(value: i32) -> Self {
        MeasuredValue::Number(f64::from(value))
    }
}

impl From<&str> for MeasuredValue {
    fn from(value: &str) -> Self {
        MeasuredValue::Text(value.to_string())
    }
}

impl From<String> for MeasuredValue {
    fn from(value: String) -> Self {
        MeasuredValue::Text(value)
    }
}

/// Numeric reading for `key`, if present and numeric.
pub fn numeric(data: &SoilData, key: &str) -> Option<f64> {
    data.get(key).and_then(MeasuredValue::as_f64)
}

/// Text reading for `key`, if present as text.
pub fn text<'a>(data: &'a SoilData, key: &str) -> Option<&'a str> {
    data.get(key).and_then(MeasuredValue::as_text)
}

//! Cell Value Module
//! Per-cell type sniffing: number, boolean, timestamp, or string.

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::Serialize;

/// A single typed CSV cell.
///
/// Serializes untagged, so a record renders as the plain JSON object
/// (`{"a": 1, "b": true}`) that chart layers consume.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Value {
    Null,
    Bool(bool),
    Number(f64),
    Timestamp(NaiveDateTime),
    Text(String),
}

impl Value {
    /// Infer a typed value from a raw CSV cell.
    ///
    /// Precedence: empty → `Null`, boolean literal, `NaN`, finite numeric
    /// literal, ISO-8601-shaped date/datetime, else `Text`. Numeric parse
    /// wins over dates, so `2020` is a number, not a year.
    pub fn infer(raw: &str) -> Value {
        let token = raw.trim();
        if token.is_empty() {
            return Value::Null;
        }
        match token {
            "true" => return Value::Bool(true),
            "false" => return Value::Bool(false),
            "NaN" => return Value::Number(f64::NAN),
            _ => {}
        }
        if let Ok(n) = token.parse::<f64>() {
            // f64::from_str also accepts "inf"/"nan" spellings; only a
            // finite literal counts as numeric here.
            if n.is_finite() {
                return Value::Number(n);
            }
        }
        if let Some(ts) = parse_timestamp(token) {
            return Value::Timestamp(ts);
        }
        Value::Text(token.to_string())
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_timestamp(&self) -> Option<NaiveDateTime> {
        match self {
            Value::Timestamp(ts) => Some(*ts),
            _ => None,
        }
    }
}

/// Parse an ISO-8601-shaped literal into a naive timestamp.
///
/// Accepts RFC 3339 (offset normalized to UTC), `YYYY-MM-DDTHH:MM[:SS]`,
/// and bare `YYYY-MM-DD` (midnight).
fn parse_timestamp(token: &str) -> Option<NaiveDateTime> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(token) {
        return Some(dt.naive_utc());
    }
    if let Ok(dt) = NaiveDateTime::parse_from_str(token, "%Y-%m-%dT%H:%M:%S") {
        return Some(dt);
    }
    if let Ok(dt) = NaiveDateTime::parse_from_str(token, "%Y-%m-%dT%H:%M") {
        return Some(dt);
    }
    if let Ok(d) = NaiveDate::parse_from_str(token, "%Y-%m-%d") {
        return d.and_hms_opt(0, 0, 0);
    }
    None
}

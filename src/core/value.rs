// Copyright 2025 Rowmap Contributors
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Runtime cell values and scalar coercion
//!
//! [`Value`] is the normalized form of one result-set cell or one bound
//! parameter: the database's NULL marker becomes [`Value::Null`] before any
//! coercion happens. [`FromValue`] converts a cell into a requested Rust
//! type, with `Option<T>` producing `None` for NULL instead of failing.

use std::fmt;
use std::sync::Arc;

use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeZone, Utc};

use super::error::{Error, Result};

/// Timestamp formats accepted when coercing text to a timestamp
/// Order matters - more specific formats first
const TIMESTAMP_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f%:z", // RFC3339 with fractional seconds
    "%Y-%m-%dT%H:%M:%S%:z",    // RFC3339
    "%Y-%m-%dT%H:%M:%SZ",      // RFC3339 UTC
    "%Y-%m-%dT%H:%M:%S",       // ISO without timezone
    "%Y-%m-%d %H:%M:%S%.f",    // SQL-style with fractional seconds
    "%Y-%m-%d %H:%M:%S",       // SQL-style
    "%Y-%m-%d",                // Date only
];

/// A runtime cell value
///
/// Each variant carries its data directly. Text and Blob use `Arc` so rows
/// can be cloned cheaply during materialization.
#[derive(Debug, Clone)]
pub enum Value {
    /// The database NULL marker, normalized to "no value"
    Null,

    /// 64-bit signed integer
    Integer(i64),

    /// 64-bit floating point
    Float(f64),

    /// UTF-8 text string (Arc for cheap cloning)
    Text(Arc<str>),

    /// Boolean value
    Boolean(bool),

    /// Raw bytes (Arc for cheap cloning)
    Blob(Arc<[u8]>),

    /// Timestamp (UTC)
    Timestamp(DateTime<Utc>),
}

impl Value {
    /// Create a text value
    pub fn text(value: impl Into<String>) -> Self {
        Value::Text(Arc::from(value.into().as_str()))
    }

    /// Create a blob value
    pub fn blob(value: impl AsRef<[u8]>) -> Self {
        Value::Blob(Arc::from(value.as_ref()))
    }

    /// Whether this value is the NULL marker
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Name of the variant, used in conversion errors
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Null => "NULL",
            Value::Integer(_) => "Integer",
            Value::Float(_) => "Float",
            Value::Text(_) => "Text",
            Value::Boolean(_) => "Boolean",
            Value::Blob(_) => "Blob",
            Value::Timestamp(_) => "Timestamp",
        }
    }

    fn conversion_error(&self, to: &'static str) -> Error {
        Error::TypeConversion {
            from: self.type_name().to_string(),
            to,
        }
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Null, Value::Null) => true,
            (Value::Integer(a), Value::Integer(b)) => a == b,
            (Value::Float(a), Value::Float(b)) => a == b,
            (Value::Text(a), Value::Text(b)) => a == b,
            (Value::Boolean(a), Value::Boolean(b)) => a == b,
            (Value::Blob(a), Value::Blob(b)) => a == b,
            (Value::Timestamp(a), Value::Timestamp(b)) => a == b,
            _ => false,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => write!(f, "NULL"),
            Value::Integer(i) => write!(f, "{i}"),
            Value::Float(v) => write!(f, "{v}"),
            Value::Text(s) => write!(f, "{s}"),
            Value::Boolean(b) => write!(f, "{b}"),
            Value::Blob(b) => write!(f, "<blob {} bytes>", b.len()),
            Value::Timestamp(ts) => write!(f, "{}", ts.to_rfc3339()),
        }
    }
}

/// Parse a timestamp out of a text cell
fn parse_timestamp(s: &str) -> Result<DateTime<Utc>> {
    let trimmed = s.trim();
    for format in TIMESTAMP_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(trimmed, format) {
            return Ok(Utc.from_utc_datetime(&dt));
        }
        if let Ok(date) = NaiveDate::parse_from_str(trimmed, format) {
            return Ok(Utc.from_utc_datetime(&date.and_hms_opt(0, 0, 0).unwrap_or_default()));
        }
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(trimmed) {
        return Ok(dt.with_timezone(&Utc));
    }
    Err(Error::Format {
        value: s.to_string(),
        to: "Timestamp",
    })
}

/// Trait for coercing a cell value into a Rust type
///
/// Conversions follow generic value-conversion rules: numeric widening and
/// narrowing, plus text parsing where the target supports it. NULL is never
/// converted to a type-specific zero value; only `Option<T>` accepts it.
pub trait FromValue: Sized {
    /// Convert a value to Self
    fn from_value(value: &Value) -> Result<Self>;
}

impl FromValue for i64 {
    fn from_value(value: &Value) -> Result<Self> {
        match value {
            Value::Integer(i) => Ok(*i),
            Value::Float(f) => Ok(*f as i64),
            Value::Boolean(b) => Ok(*b as i64),
            Value::Text(s) => s.trim().parse().map_err(|_| Error::Format {
                value: s.to_string(),
                to: "Integer",
            }),
            _ => Err(value.conversion_error("Integer")),
        }
    }
}

impl FromValue for i32 {
    fn from_value(value: &Value) -> Result<Self> {
        i64::from_value(value).map(|i| i as i32)
    }
}

impl FromValue for i16 {
    fn from_value(value: &Value) -> Result<Self> {
        i64::from_value(value).map(|i| i as i16)
    }
}

impl FromValue for u32 {
    fn from_value(value: &Value) -> Result<Self> {
        i64::from_value(value).map(|i| i as u32)
    }
}

impl FromValue for usize {
    fn from_value(value: &Value) -> Result<Self> {
        i64::from_value(value).map(|i| i as usize)
    }
}

impl FromValue for f64 {
    fn from_value(value: &Value) -> Result<Self> {
        match value {
            Value::Float(f) => Ok(*f),
            Value::Integer(i) => Ok(*i as f64),
            Value::Text(s) => s.trim().parse().map_err(|_| Error::Format {
                value: s.to_string(),
                to: "Float",
            }),
            _ => Err(value.conversion_error("Float")),
        }
    }
}

impl FromValue for f32 {
    fn from_value(value: &Value) -> Result<Self> {
        f64::from_value(value).map(|f| f as f32)
    }
}

impl FromValue for bool {
    fn from_value(value: &Value) -> Result<Self> {
        match value {
            Value::Boolean(b) => Ok(*b),
            Value::Integer(i) => Ok(*i != 0),
            Value::Text(s) => match s.trim() {
                "0" => Ok(false),
                "1" => Ok(true),
                other if other.eq_ignore_ascii_case("true") => Ok(true),
                other if other.eq_ignore_ascii_case("false") => Ok(false),
                _ => Err(Error::Format {
                    value: s.to_string(),
                    to: "Boolean",
                }),
            },
            _ => Err(value.conversion_error("Boolean")),
        }
    }
}

impl FromValue for String {
    fn from_value(value: &Value) -> Result<Self> {
        match value {
            Value::Text(s) => Ok(s.to_string()),
            Value::Integer(i) => Ok(i.to_string()),
            Value::Float(f) => Ok(f.to_string()),
            Value::Boolean(b) => Ok(b.to_string()),
            Value::Timestamp(ts) => Ok(ts.to_rfc3339()),
            _ => Err(value.conversion_error("Text")),
        }
    }
}

impl FromValue for Vec<u8> {
    fn from_value(value: &Value) -> Result<Self> {
        match value {
            Value::Blob(b) => Ok(b.to_vec()),
            Value::Text(s) => Ok(s.as_bytes().to_vec()),
            _ => Err(value.conversion_error("Blob")),
        }
    }
}

impl FromValue for DateTime<Utc> {
    fn from_value(value: &Value) -> Result<Self> {
        match value {
            Value::Timestamp(ts) => Ok(*ts),
            Value::Text(s) => parse_timestamp(s),
            _ => Err(value.conversion_error("Timestamp")),
        }
    }
}

impl FromValue for Value {
    fn from_value(value: &Value) -> Result<Self> {
        Ok(value.clone())
    }
}

impl<T: FromValue> FromValue for Option<T> {
    fn from_value(value: &Value) -> Result<Self> {
        if value.is_null() {
            Ok(None)
        } else {
            Ok(Some(T::from_value(value)?))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_integer_coercion() {
        assert_eq!(i64::from_value(&Value::Integer(42)).unwrap(), 42);
        assert_eq!(i64::from_value(&Value::Float(41.7)).unwrap(), 41);
        assert_eq!(i64::from_value(&Value::text(" 42 ")).unwrap(), 42);
        assert_eq!(i32::from_value(&Value::Integer(42)).unwrap(), 42);
    }

    #[test]
    fn test_integer_from_bad_text_is_format_error() {
        let err = i64::from_value(&Value::text("forty-two")).unwrap_err();
        assert_eq!(
            err,
            Error::Format {
                value: "forty-two".to_string(),
                to: "Integer",
            }
        );
    }

    #[test]
    fn test_float_coercion() {
        assert_eq!(f64::from_value(&Value::Float(3.5)).unwrap(), 3.5);
        assert_eq!(f64::from_value(&Value::Integer(3)).unwrap(), 3.0);
        assert_eq!(f64::from_value(&Value::text("3.5")).unwrap(), 3.5);
    }

    #[test]
    fn test_string_coercion() {
        assert_eq!(String::from_value(&Value::text("hi")).unwrap(), "hi");
        assert_eq!(String::from_value(&Value::Integer(7)).unwrap(), "7");
        assert_eq!(String::from_value(&Value::Boolean(true)).unwrap(), "true");
    }

    #[test]
    fn test_bool_coercion() {
        assert!(bool::from_value(&Value::Boolean(true)).unwrap());
        assert!(bool::from_value(&Value::Integer(1)).unwrap());
        assert!(!bool::from_value(&Value::Integer(0)).unwrap());
        assert!(bool::from_value(&Value::text("TRUE")).unwrap());
        assert!(bool::from_value(&Value::text("maybe")).is_err());
    }

    #[test]
    fn test_timestamp_coercion() {
        let ts = DateTime::<Utc>::from_value(&Value::text("2025-06-01 12:30:00")).unwrap();
        assert_eq!(ts.to_rfc3339(), "2025-06-01T12:30:00+00:00");

        let date_only = DateTime::<Utc>::from_value(&Value::text("2025-06-01")).unwrap();
        assert_eq!(date_only.to_rfc3339(), "2025-06-01T00:00:00+00:00");
    }

    #[test]
    fn test_null_never_becomes_zero() {
        assert!(i64::from_value(&Value::Null).is_err());
        assert!(f64::from_value(&Value::Null).is_err());
        assert!(String::from_value(&Value::Null).is_err());
        assert!(bool::from_value(&Value::Null).is_err());
    }

    #[test]
    fn test_null_into_option_is_none() {
        assert_eq!(Option::<i64>::from_value(&Value::Null).unwrap(), None);
        assert_eq!(Option::<String>::from_value(&Value::Null).unwrap(), None);
        assert_eq!(
            Option::<i64>::from_value(&Value::Integer(5)).unwrap(),
            Some(5)
        );
    }

    #[test]
    fn test_blob_coercion() {
        let bytes = Vec::<u8>::from_value(&Value::blob([1u8, 2, 3])).unwrap();
        assert_eq!(bytes, vec![1, 2, 3]);
    }

    #[test]
    fn test_value_equality() {
        assert_eq!(Value::Null, Value::Null);
        assert_eq!(Value::text("a"), Value::text("a"));
        assert_ne!(Value::Integer(1), Value::Float(1.0));
    }
}

//! Scalar column values and their Rust-type conversions.
//!
//! `Value` is the tagged union every record field maps onto. Timestamps are
//! native `chrono` values in memory; they become ISO-8601 text only at the
//! storage boundary, through [`Value::bindable`] (statement parameters) and
//! [`parse_timestamp`] (reification). Nothing else in the crate serializes a
//! timestamp.

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

/// UTC timestamp type used for record fields and `createdAt`/`updatedAt`.
pub type Timestamp = DateTime<Utc>;

/// A scalar column value.
///
/// NULL is not a `Value` variant: row cells and statement parameters carry
/// `Option<Value>` instead, so every `Value` is a concrete scalar.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Value {
    Text(String),
    Integer(i32),
    BigInt(i64),
    Double(f64),
    Boolean(bool),
    Timestamp(Timestamp),
}

impl Value {
    /// Project this value into its bindable form.
    ///
    /// Timestamps render to their canonical ISO-8601 text; every other
    /// variant passes through unchanged. This is the single place a value is
    /// serialized before crossing into statement parameters.
    pub fn bindable(&self) -> Value {
        match self {
            Value::Timestamp(ts) => Value::Text(format_timestamp(*ts)),
            other => other.clone(),
        }
    }

    /// The kind tag this value carries.
    pub fn kind(&self) -> FieldKind {
        match self {
            Value::Text(_) => FieldKind::Text,
            Value::Integer(_) => FieldKind::Integer,
            Value::BigInt(_) => FieldKind::BigInt,
            Value::Double(_) => FieldKind::Double,
            Value::Boolean(_) => FieldKind::Boolean,
            Value::Timestamp(_) => FieldKind::Timestamp,
        }
    }
}

/// Render a timestamp in the canonical storage format: ISO-8601 with whole
/// seconds and a `Z` suffix, e.g. `2024-01-02T03:04:05Z`.
pub fn format_timestamp(ts: Timestamp) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Secs, true)
}

/// Parse a timestamp from its canonical storage text. Returns `None` if the
/// text is not valid ISO-8601.
pub fn parse_timestamp(text: &str) -> Option<Timestamp> {
    DateTime::parse_from_rfc3339(text)
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}

/// Semantic type tag for a record field or schema column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FieldKind {
    Text,
    Integer,
    BigInt,
    Double,
    Boolean,
    Timestamp,
}

impl FieldKind {
    /// The SQLite type name used in generated DDL.
    ///
    /// Booleans are stored as 0/1, timestamps as ISO-8601 text; both integer
    /// kinds share the engine's 64-bit INTEGER storage class.
    pub fn sql_type_name(self) -> &'static str {
        match self {
            FieldKind::Text => "TEXT",
            FieldKind::Integer | FieldKind::BigInt => "INTEGER",
            FieldKind::Double => "DOUBLE",
            FieldKind::Boolean => "BOOLEAN",
            FieldKind::Timestamp => "TEXT",
        }
    }
}

/// Maps a Rust field type to its [`FieldKind`] and converts it to and from
/// [`Value`].
///
/// Implemented for `String`, `i32`, `i64`, `f64`, `bool`, [`Timestamp`], and
/// `Option<T>` of each. `Option` fields read as `None` when unset and absorb
/// the inner conversion otherwise; their kind is the inner type's kind.
pub trait FieldValue: Sized {
    /// The kind tag recorded in the field descriptor table.
    const KIND: FieldKind;

    /// Read this field as a value; `None` means NULL.
    fn to_value(&self) -> Option<Value>;

    /// Build this field from a non-null value, or `None` if the variant does
    /// not match.
    fn from_value(value: Value) -> Option<Self>;
}

impl FieldValue for String {
    const KIND: FieldKind = FieldKind::Text;

    fn to_value(&self) -> Option<Value> {
        Some(Value::Text(self.clone()))
    }

    fn from_value(value: Value) -> Option<Self> {
        match value {
            Value::Text(s) => Some(s),
            _ => None,
        }
    }
}

impl FieldValue for i32 {
    const KIND: FieldKind = FieldKind::Integer;

    fn to_value(&self) -> Option<Value> {
        Some(Value::Integer(*self))
    }

    fn from_value(value: Value) -> Option<Self> {
        match value {
            Value::Integer(i) => Some(i),
            _ => None,
        }
    }
}

impl FieldValue for i64 {
    const KIND: FieldKind = FieldKind::BigInt;

    fn to_value(&self) -> Option<Value> {
        Some(Value::BigInt(*self))
    }

    fn from_value(value: Value) -> Option<Self> {
        match value {
            Value::BigInt(i) => Some(i),
            _ => None,
        }
    }
}

impl FieldValue for f64 {
    const KIND: FieldKind = FieldKind::Double;

    fn to_value(&self) -> Option<Value> {
        Some(Value::Double(*self))
    }

    fn from_value(value: Value) -> Option<Self> {
        match value {
            Value::Double(v) => Some(v),
            _ => None,
        }
    }
}

impl FieldValue for bool {
    const KIND: FieldKind = FieldKind::Boolean;

    fn to_value(&self) -> Option<Value> {
        Some(Value::Boolean(*self))
    }

    fn from_value(value: Value) -> Option<Self> {
        match value {
            Value::Boolean(b) => Some(b),
            _ => None,
        }
    }
}

impl FieldValue for Timestamp {
    const KIND: FieldKind = FieldKind::Timestamp;

    fn to_value(&self) -> Option<Value> {
        Some(Value::Timestamp(*self))
    }

    fn from_value(value: Value) -> Option<Self> {
        match value {
            Value::Timestamp(ts) => Some(ts),
            _ => None,
        }
    }
}

impl<T: FieldValue> FieldValue for Option<T> {
    const KIND: FieldKind = T::KIND;

    fn to_value(&self) -> Option<Value> {
        self.as_ref().and_then(FieldValue::to_value)
    }

    fn from_value(value: Value) -> Option<Self> {
        T::from_value(value).map(Some)
    }
}

// Conversions used by the filter builder (`col("age").gt(24)`).

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Text(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Text(s)
    }
}

impl From<i32> for Value {
    fn from(i: i32) -> Self {
        Value::Integer(i)
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::BigInt(i)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Double(v)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Boolean(b)
    }
}

impl From<Timestamp> for Value {
    fn from(ts: Timestamp) -> Self {
        Value::Timestamp(ts)
    }
}

//! Turning raw result rows back into typed records.
//!
//! SQLite reports integers as 64-bit and stores timestamps as text, so the
//! cell a row carries rarely matches the declared field kind exactly. The
//! coercions here close that gap; anything else is a `Parse` error rather
//! than a silent zero.

use crate::error::TideError;
use crate::executor::Rows;
use crate::record::TideRecord;
use crate::value::{parse_timestamp, FieldKind, Value};

/// Coerce a raw cell toward a field's declared kind.
fn coerce(kind: FieldKind, cell: Value, column: &str) -> Result<Value, TideError> {
    match (kind, cell) {
        (FieldKind::Boolean, Value::BigInt(i)) => Ok(Value::Boolean(i == 1)),
        (FieldKind::Boolean, Value::Boolean(b)) => Ok(Value::Boolean(b)),
        (FieldKind::Timestamp, Value::Text(text)) => parse_timestamp(&text)
            .map(Value::Timestamp)
            .ok_or_else(|| {
                TideError::Parse(format!("column {column:?} is not a timestamp: {text:?}"))
            }),
        (FieldKind::Timestamp, Value::Timestamp(ts)) => Ok(Value::Timestamp(ts)),
        (FieldKind::Integer, Value::BigInt(i)) => i32::try_from(i)
            .map(Value::Integer)
            .map_err(|_| TideError::Parse(format!("column {column:?} overflows i32: {i}"))),
        (FieldKind::Integer, Value::Integer(i)) => Ok(Value::Integer(i)),
        (FieldKind::BigInt, Value::BigInt(i)) => Ok(Value::BigInt(i)),
        (FieldKind::Double, Value::Double(f)) => Ok(Value::Double(f)),
        (FieldKind::Double, Value::BigInt(i)) => Ok(Value::Double(i as f64)),
        (FieldKind::Text, Value::Text(text)) => Ok(Value::Text(text)),
        (kind, cell) => Err(TideError::Parse(format!(
            "column {column:?} expected {kind:?} but row holds {cell:?}"
        ))),
    }
}

/// Build one record per row. NULL cells leave the corresponding field at
/// its default; a column the record does not declare is an `UnknownField`.
///
/// # Errors
///
/// `UnknownField` for undeclared columns, `Parse` for cells that cannot be
/// coerced to the declared kind.
pub fn reify<M: TideRecord>(rows: &Rows) -> Result<Vec<M>, TideError> {
    let mut records = Vec::with_capacity(rows.rows.len());
    for row in &rows.rows {
        let mut record = M::default();
        for (column, cell) in rows.columns.iter().zip(row.iter()) {
            let Some(cell) = cell else { continue };
            let kind = M::field_kind(column).ok_or_else(|| TideError::UnknownField {
                table: M::TABLE,
                field: column.clone(),
            })?;
            record.set(column, coerce(kind, cell.clone(), column)?)?;
        }
        records.push(record);
    }
    Ok(records)
}

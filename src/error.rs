//! Core error type for the record-mapping layer.
//!
//! Two families of failure share the enum, told apart by their variants:
//! configuration/programmer errors (unknown or duplicate schema entities,
//! saving an update without an id) which a caller should treat as bugs in its
//! own migrations or record types, and runtime failures (engine errors, row
//! cells that do not parse) which are ordinary recoverable conditions.

use std::fmt;

use crate::value::FieldKind;

/// Error type shared by the query, schema, statement, and reification layers.
#[derive(Debug)]
pub enum TideError {
    /// SQLite error from `rusqlite`
    Sqlite(rusqlite::Error),
    /// Execution failure from a non-SQLite executor, or an unexpected result shape
    Execution(String),
    /// A table name that does not exist in the folded schema
    UnknownTable(String),
    /// A relationship name not declared on the named table
    UnknownRelationship { table: String, relationship: String },
    /// A column with no matching field on the record type
    UnknownField { table: &'static str, field: String },
    /// Two migrations created the same table
    DuplicateTable(String),
    /// An `AddColumn` operation duplicated an existing column name
    DuplicateColumn { table: String, column: String },
    /// An `AddRelationship` operation duplicated an existing relationship name
    DuplicateRelationship { table: String, relationship: String },
    /// An update or destroy was attempted on a record that has never been saved
    MissingId(&'static str),
    /// A value did not match the field's declared kind
    TypeMismatch { field: String, expected: FieldKind },
    /// A row cell failed to parse as its declared type
    Parse(String),
}

impl fmt::Display for TideError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TideError::Sqlite(e) => {
                write!(f, "SQLite error: {e}")
            }
            TideError::Execution(s) => {
                write!(f, "Execution error: {s}")
            }
            TideError::UnknownTable(name) => {
                write!(f, "Unknown table: {name}")
            }
            TideError::UnknownRelationship { table, relationship } => {
                write!(f, "Unknown relationship '{relationship}' on table '{table}'")
            }
            TideError::UnknownField { table, field } => {
                write!(f, "Record for table '{table}' has no field '{field}'")
            }
            TideError::DuplicateTable(name) => {
                write!(f, "Table '{name}' is created by more than one migration")
            }
            TideError::DuplicateColumn { table, column } => {
                write!(f, "Table '{table}' already has a column named '{column}'")
            }
            TideError::DuplicateRelationship { table, relationship } => {
                write!(
                    f,
                    "Table '{table}' already has a relationship named '{relationship}'"
                )
            }
            TideError::MissingId(table) => {
                write!(f, "Record for table '{table}' has no id; save it first")
            }
            TideError::TypeMismatch { field, expected } => {
                write!(f, "Value for field '{field}' does not match declared kind {expected:?}")
            }
            TideError::Parse(s) => {
                write!(f, "Parse error: {s}")
            }
        }
    }
}

impl std::error::Error for TideError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            TideError::Sqlite(e) => Some(e),
            _ => None,
        }
    }
}

impl From<rusqlite::Error> for TideError {
    fn from(err: rusqlite::Error) -> Self {
        TideError::Sqlite(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_names_the_offending_entity() {
        let err = TideError::UnknownTable("ghosts".to_string());
        assert!(err.to_string().contains("ghosts"));

        let err = TideError::UnknownRelationship {
            table: "users".to_string(),
            relationship: "macros".to_string(),
        };
        let display = err.to_string();
        assert!(display.contains("users"));
        assert!(display.contains("macros"));
    }

    #[test]
    fn test_missing_id_display() {
        let err = TideError::MissingId("users");
        assert!(err.to_string().contains("no id"));
    }

    #[test]
    fn test_sqlite_error_is_source() {
        use std::error::Error;

        let err = TideError::Sqlite(rusqlite::Error::InvalidQuery);
        assert!(err.source().is_some());
        assert!(TideError::Parse("x".to_string()).source().is_none());
    }
}

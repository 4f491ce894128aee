//! Migration-specific error type.

use std::fmt;

use crate::error::TideError;

/// Errors raised while preparing a database from a migration list.
#[derive(Debug)]
pub enum MigrationError {
    /// Ledger access or other database failure outside a specific migration
    Database(TideError),
    /// The migration list does not fold into a valid schema
    Schema(TideError),
    /// Two migrations share a name; names key the ledger and must be unique
    DuplicateName(String),
    /// A migration's DDL or ledger insert failed partway. The migration is
    /// not recorded as applied and no rollback of earlier operations is
    /// attempted; treat this as a fatal startup failure.
    Failed { name: String, error: TideError },
}

impl fmt::Display for MigrationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MigrationError::Database(e) => {
                write!(f, "Database error: {e}")
            }
            MigrationError::Schema(e) => {
                write!(f, "Invalid migration list: {e}")
            }
            MigrationError::DuplicateName(name) => {
                write!(f, "Duplicate migration name: {name:?}")
            }
            MigrationError::Failed { name, error } => {
                write!(
                    f,
                    "Migration {name:?} failed and was not recorded as applied: {error}"
                )
            }
        }
    }
}

impl std::error::Error for MigrationError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            MigrationError::Database(e) | MigrationError::Schema(e) => Some(e),
            MigrationError::Failed { error, .. } => Some(error),
            MigrationError::DuplicateName(_) => None,
        }
    }
}

impl From<TideError> for MigrationError {
    fn from(error: TideError) -> Self {
        MigrationError::Database(error)
    }
}

//! Idempotent migration runner backed by a persisted ledger.
//!
//! The ledger is a single-column table of already-applied migration names.
//! On startup the runner reads the applied set and executes, in list order,
//! only the migrations whose name is absent, appending each name right after
//! its operations succeed. There is no rollback: a failure mid-migration
//! leaves earlier DDL in place and the name out of the ledger.

use std::collections::HashSet;

use log::info;

use crate::error::TideError;
use crate::executor::TideExecutor;
use crate::migration::{Migration, MigrationError};
use crate::value::Value;

/// Name of the ledger table.
pub const LEDGER_TABLE: &str = "schema_migrations";

/// Create the ledger table if it does not exist yet.
fn ensure_ledger(executor: &dyn TideExecutor) -> Result<(), TideError> {
    executor.execute("CREATE TABLE IF NOT EXISTS schema_migrations (version TEXT PRIMARY KEY)")
}

/// Read the set of already-applied migration names from the ledger.
///
/// # Errors
///
/// Fails if the ledger cannot be read, or holds non-text versions (which
/// would mean the table was created by something other than this runner).
pub fn applied_versions(executor: &dyn TideExecutor) -> Result<HashSet<String>, TideError> {
    let rows = executor.query("SELECT version FROM schema_migrations", &[])?;
    rows.rows
        .into_iter()
        .filter_map(|cells| cells.into_iter().next().flatten())
        .map(|cell| match cell {
            Value::Text(version) => Ok(version),
            other => Err(TideError::Execution(format!(
                "ledger version cell is not text: {other:?}"
            ))),
        })
        .collect()
}

/// Apply every not-yet-applied migration, in list order.
///
/// Re-running against an already-migrated ledger performs zero DDL
/// operations.
///
/// # Errors
///
/// `DuplicateName` if two migrations share a name (checked before anything
/// executes), `Failed` if a migration's DDL or ledger insert fails, and
/// `Database` for ledger access failures.
pub fn prepare_database(
    executor: &dyn TideExecutor,
    migrations: &[Migration],
) -> Result<(), MigrationError> {
    ensure_ledger(executor)?;

    let mut seen = HashSet::new();
    for migration in migrations {
        if !seen.insert(migration.name.as_str()) {
            return Err(MigrationError::DuplicateName(migration.name.clone()));
        }
    }

    let applied = applied_versions(executor)?;
    for migration in migrations {
        if applied.contains(&migration.name) {
            continue;
        }

        for operation in &migration.operations {
            if let Some(ddl) = operation.ddl() {
                executor.execute(&ddl).map_err(|error| MigrationError::Failed {
                    name: migration.name.clone(),
                    error,
                })?;
            }
        }

        executor
            .run(
                "INSERT INTO schema_migrations (version) VALUES (?)",
                &[Some(Value::Text(migration.name.clone()))],
            )
            .map_err(|error| MigrationError::Failed {
                name: migration.name.clone(),
                error,
            })?;
        info!("applied migration {:?}", migration.name);
    }

    Ok(())
}

//! The connection value: an executor paired with the schema folded from
//! its migration list. Everything that touches the database takes a
//! `&Connection` explicitly; there is no ambient global.

use std::path::Path;

use log::info;

use crate::executor::{SqliteExecutor, TideExecutor};
use crate::migration::{runner, Migration, MigrationError};
use crate::schema::Schema;

pub struct Connection {
    executor: Box<dyn TideExecutor>,
    schema: Schema,
}

impl Connection {
    /// Wrap an executor, folding the schema and applying any pending
    /// migrations.
    ///
    /// The schema is folded before anything executes, so a malformed
    /// migration list is rejected without touching the database.
    ///
    /// # Errors
    ///
    /// `MigrationError::Schema` if the migration list does not fold into a
    /// schema, otherwise whatever the runner reports.
    pub fn initialize<E>(executor: E, migrations: &[Migration]) -> Result<Self, MigrationError>
    where
        E: TideExecutor + 'static,
    {
        let schema = Schema::from_migrations(migrations).map_err(MigrationError::Schema)?;
        runner::prepare_database(&executor, migrations)?;
        info!("connection ready: {schema}");
        Ok(Connection {
            executor: Box::new(executor),
            schema,
        })
    }

    /// Open a SQLite database file and bring it up to date.
    ///
    /// # Errors
    ///
    /// `MigrationError::Database` if the file cannot be opened, otherwise
    /// as [`Connection::initialize`].
    pub fn open(path: impl AsRef<Path>, migrations: &[Migration]) -> Result<Self, MigrationError> {
        let executor = SqliteExecutor::open(path).map_err(MigrationError::Database)?;
        Connection::initialize(executor, migrations)
    }

    /// Open a fresh in-memory SQLite database and bring it up to date.
    ///
    /// # Errors
    ///
    /// As [`Connection::open`].
    pub fn open_in_memory(migrations: &[Migration]) -> Result<Self, MigrationError> {
        let executor = SqliteExecutor::open_in_memory().map_err(MigrationError::Database)?;
        Connection::initialize(executor, migrations)
    }

    /// The schema folded from this connection's migrations.
    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    /// The executor statements run against.
    pub fn executor(&self) -> &dyn TideExecutor {
        self.executor.as_ref()
    }
}

//! Migration system: schema operations, DDL rendering, and the idempotent
//! runner backed by the `schema_migrations` ledger table.
//!
//! A migration is a named, ordered list of operations. The same list feeds
//! two consumers: [`crate::schema::Schema::from_migrations`] folds it into
//! the in-memory schema (a pure function), and [`runner::prepare_database`]
//! executes the DDL side exactly once per migration name, recording applied
//! names in the ledger.

pub mod error;
pub mod migration;
pub mod runner;

pub use error::MigrationError;
pub use migration::{Migration, Operation};

//! tidepool is a small typed mapping layer over SQLite.
//!
//! Records are plain structs declared with [`tide_record!`]; the schema is
//! folded from an ordered list of [`Migration`]s, applied idempotently
//! through a persisted ledger. Queries are immutable values built from
//! typed filters and compiled to SQL text plus positional parameters; rows
//! come back as typed records.
//!
//! # Example
//!
//! ```
//! use tidepool::{
//!     col, tide_record, Column, Connection, Direction, FieldKind, Migration,
//!     Operation, Relationship, TideRecord,
//! };
//!
//! tide_record! {
//!     pub struct User("users") {
//!         name: String => "name",
//!         age: i64 => "age",
//!     }
//! }
//!
//! let migrations = vec![Migration::new(
//!     "create users",
//!     vec![Operation::create_table(
//!         "users",
//!         vec![
//!             Column::new("name", FieldKind::Text),
//!             Column::new("age", FieldKind::BigInt),
//!         ],
//!         Vec::<Relationship>::new(),
//!     )],
//! )];
//!
//! let conn = Connection::open_in_memory(&migrations).unwrap();
//! User { name: "Ellie Harvey".to_string(), age: 24, ..User::default() }
//!     .save(&conn)
//!     .unwrap();
//!
//! let adults = User::find()
//!     .filter(col("age").ge(18))
//!     .order_by("name", Direction::Ascending)
//!     .all(&conn)
//!     .unwrap();
//! assert_eq!(adults.len(), 1);
//! ```

pub mod connection;
pub mod error;
pub mod executor;
pub mod filter;
mod macros;
pub mod migration;
pub mod query;
pub mod record;
pub mod reify;
pub mod relation;
pub mod schema;
pub mod statement;
pub mod value;

#[cfg(test)]
pub mod tests_cfg;

pub use connection::Connection;
pub use error::TideError;
pub use executor::{Rows, SqliteExecutor, TideExecutor};
pub use filter::{col, Comparator, Direction, Filter, Ordering};
pub use migration::{Migration, MigrationError, Operation};
pub use query::Query;
pub use record::{FieldDef, TideRecord};
pub use relation::{belongs_to, has_many, RelationKind, Relationship};
pub use schema::{Column, Schema, Table};
pub use statement::Statement;
pub use value::{FieldKind, FieldValue, Timestamp, Value};

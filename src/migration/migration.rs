//! Migration and operation definitions plus their DDL rendering.

use serde::{Deserialize, Serialize};

use crate::relation::Relationship;
use crate::schema::Column;

/// A named, ordered list of schema operations.
///
/// Names identify migrations in the ledger and must be unique across the
/// list handed to the runner.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Migration {
    pub name: String,
    pub operations: Vec<Operation>,
}

impl Migration {
    pub fn new(name: impl Into<String>, operations: Vec<Operation>) -> Self {
        Self {
            name: name.into(),
            operations,
        }
    }
}

/// A single schema-changing operation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Operation {
    /// Create a table with its initial columns and relationships. Must be
    /// the first operation to mention the table.
    CreateTable {
        table: String,
        columns: Vec<Column>,
        relationships: Vec<Relationship>,
    },
    /// Add a column to an existing table.
    AddColumn { table: String, column: Column },
    /// Declare a relationship on an existing table. Schema-only: renders no
    /// DDL, since relationships resolve through ordinary foreign-key columns.
    AddRelationship {
        table: String,
        relationship: Relationship,
    },
}

impl Operation {
    pub fn create_table(
        table: impl Into<String>,
        columns: Vec<Column>,
        relationships: Vec<Relationship>,
    ) -> Self {
        Operation::CreateTable {
            table: table.into(),
            columns,
            relationships,
        }
    }

    pub fn add_column(table: impl Into<String>, column: Column) -> Self {
        Operation::AddColumn {
            table: table.into(),
            column,
        }
    }

    pub fn add_relationship(table: impl Into<String>, relationship: Relationship) -> Self {
        Operation::AddRelationship {
            table: table.into(),
            relationship,
        }
    }

    /// The DDL statement this operation executes, or `None` for schema-only
    /// operations.
    ///
    /// Every created table carries the implicit `id INTEGER PRIMARY KEY`,
    /// `createdAt TEXT`, and `updatedAt TEXT` columns ahead of its declared
    /// ones.
    pub fn ddl(&self) -> Option<String> {
        match self {
            Operation::CreateTable { table, columns, .. } => {
                let mut defs = vec![
                    "id INTEGER PRIMARY KEY".to_string(),
                    "createdAt TEXT".to_string(),
                    "updatedAt TEXT".to_string(),
                ];
                defs.extend(
                    columns
                        .iter()
                        .map(|col| format!("{} {}", col.name, col.kind.sql_type_name())),
                );
                Some(format!("CREATE TABLE {} ({})", table, defs.join(", ")))
            }
            Operation::AddColumn { table, column } => Some(format!(
                "ALTER TABLE {} ADD COLUMN {} {}",
                table,
                column.name,
                column.kind.sql_type_name()
            )),
            Operation::AddRelationship { .. } => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::FieldKind;

    #[test]
    fn test_create_table_ddl() {
        let op = Operation::create_table(
            "users",
            vec![
                Column::new("name", FieldKind::Text),
                Column::new("age", FieldKind::BigInt),
            ],
            vec![Relationship::has_many("macros", "userId")],
        );
        assert_eq!(
            op.ddl().unwrap(),
            "CREATE TABLE users (id INTEGER PRIMARY KEY, createdAt TEXT, updatedAt TEXT, \
             name TEXT, age INTEGER)"
        );
    }

    #[test]
    fn test_create_table_ddl_without_declared_columns() {
        let op = Operation::create_table("markers", vec![], vec![]);
        assert_eq!(
            op.ddl().unwrap(),
            "CREATE TABLE markers (id INTEGER PRIMARY KEY, createdAt TEXT, updatedAt TEXT)"
        );
    }

    #[test]
    fn test_add_column_ddl() {
        let op = Operation::add_column("users", Column::new("isAdmin", FieldKind::Boolean));
        assert_eq!(
            op.ddl().unwrap(),
            "ALTER TABLE users ADD COLUMN isAdmin BOOLEAN"
        );
    }

    #[test]
    fn test_add_relationship_renders_no_ddl() {
        let op = Operation::add_relationship("macros", Relationship::has_many("actions", "macroId"));
        assert_eq!(op.ddl(), None);
    }

    #[test]
    fn test_migrations_round_trip_through_json() {
        let migration = Migration::new(
            "create users",
            vec![
                Operation::create_table(
                    "users",
                    vec![Column::new("name", FieldKind::Text)],
                    vec![Relationship::has_many("macros", "userId")],
                ),
                Operation::add_column("users", Column::new("age", FieldKind::BigInt)),
            ],
        );
        let json = serde_json::to_string(&migration).unwrap();
        let back: Migration = serde_json::from_str(&json).unwrap();
        assert_eq!(back, migration);
    }

    #[test]
    fn test_timestamp_columns_render_as_text() {
        let op = Operation::add_column("users", Column::new("lastSeenAt", FieldKind::Timestamp));
        assert_eq!(
            op.ddl().unwrap(),
            "ALTER TABLE users ADD COLUMN lastSeenAt TEXT"
        );
    }
}

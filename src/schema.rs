//! Schema model: tables, columns, and the migration fold.
//!
//! A [`Schema`] is built exactly once per connection by replaying the ordered
//! migration list, and is read-only afterwards. Folding is a pure function of
//! the migration list, so replaying it any number of times yields the same
//! schema; the ledger in [`crate::migration::runner`] separately guards the
//! DDL side of the same list.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::TideError;
use crate::migration::{Migration, Operation};
use crate::relation::Relationship;
use crate::value::FieldKind;

/// A declared column: name plus semantic scalar type.
///
/// The implicit `id`, `createdAt`, and `updatedAt` columns are not part of a
/// table's declared column set; DDL generation and the statement compiler add
/// them explicitly.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Column {
    pub name: String,
    pub kind: FieldKind,
}

impl Column {
    pub fn new(name: impl Into<String>, kind: FieldKind) -> Self {
        Self {
            name: name.into(),
            kind,
        }
    }
}

/// A table in the folded schema.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Table {
    pub name: String,
    pub columns: Vec<Column>,
    pub relationships: Vec<Relationship>,
}

impl Table {
    /// Look up a relationship by name.
    pub fn relationship(&self, name: &str) -> Option<&Relationship> {
        self.relationships.iter().find(|rel| rel.name == name)
    }

    /// Declared column names in lexicographic order.
    ///
    /// This is the canonical column order: INSERT/UPDATE statement text and
    /// the order a record's fields are read into parameters both use it, so
    /// the two sides of the positional-parameter contract never exchange
    /// names again after compilation.
    pub fn sorted_column_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.columns.iter().map(|col| col.name.clone()).collect();
        names.sort();
        names
    }
}

/// The full schema: one [`Table`] per table name, derived by folding
/// migrations.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Schema {
    tables: BTreeMap<String, Table>,
}

impl Schema {
    /// Fold an ordered migration list into a schema.
    ///
    /// Operations apply in migration-list order, then operation order within
    /// each migration. Creating a table twice, adding a column or
    /// relationship that already exists, or touching an unknown table are
    /// configuration errors, not silent overwrites.
    ///
    /// # Errors
    ///
    /// `DuplicateTable`, `DuplicateColumn`, `DuplicateRelationship`, or
    /// `UnknownTable` per the rules above.
    pub fn from_migrations(migrations: &[Migration]) -> Result<Schema, TideError> {
        let mut tables: BTreeMap<String, Table> = BTreeMap::new();

        for migration in migrations {
            for operation in &migration.operations {
                match operation {
                    Operation::CreateTable {
                        table,
                        columns,
                        relationships,
                    } => {
                        if tables.contains_key(table) {
                            return Err(TideError::DuplicateTable(table.clone()));
                        }
                        tables.insert(
                            table.clone(),
                            Table {
                                name: table.clone(),
                                columns: columns.clone(),
                                relationships: relationships.clone(),
                            },
                        );
                    }
                    Operation::AddColumn { table, column } => {
                        let entry = tables
                            .get_mut(table)
                            .ok_or_else(|| TideError::UnknownTable(table.clone()))?;
                        if entry.columns.iter().any(|existing| existing.name == column.name) {
                            return Err(TideError::DuplicateColumn {
                                table: table.clone(),
                                column: column.name.clone(),
                            });
                        }
                        entry.columns.push(column.clone());
                    }
                    Operation::AddRelationship { table, relationship } => {
                        let entry = tables
                            .get_mut(table)
                            .ok_or_else(|| TideError::UnknownTable(table.clone()))?;
                        if entry.relationship(&relationship.name).is_some() {
                            return Err(TideError::DuplicateRelationship {
                                table: table.clone(),
                                relationship: relationship.name.clone(),
                            });
                        }
                        entry.relationships.push(relationship.clone());
                    }
                }
            }
        }

        Ok(Schema { tables })
    }

    /// Look up a table by name.
    ///
    /// # Errors
    ///
    /// `UnknownTable` if no migration created it.
    pub fn table(&self, name: &str) -> Result<&Table, TideError> {
        self.tables
            .get(name)
            .ok_or_else(|| TideError::UnknownTable(name.to_string()))
    }

    /// Look up a relationship declared on the named table.
    ///
    /// # Errors
    ///
    /// `UnknownTable` or `UnknownRelationship`.
    pub fn relationship(&self, table: &str, name: &str) -> Result<&Relationship, TideError> {
        self.table(table)?
            .relationship(name)
            .ok_or_else(|| TideError::UnknownRelationship {
                table: table.to_string(),
                relationship: name.to_string(),
            })
    }

    /// Canonical (lexicographic) column names for the named table.
    ///
    /// # Errors
    ///
    /// `UnknownTable`.
    pub fn sorted_column_names(&self, table: &str) -> Result<Vec<String>, TideError> {
        Ok(self.table(table)?.sorted_column_names())
    }

    /// Iterate tables in name order.
    pub fn tables(&self) -> impl Iterator<Item = &Table> {
        self.tables.values()
    }
}

impl fmt::Display for Schema {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "<Schema num-tables={}", self.tables.len())?;
        for table in self.tables.values() {
            writeln!(f, "  {}", table.name)?;
            for column in &table.columns {
                writeln!(f, "    | {} {:?}", column.name, column.kind)?;
            }
            for rel in &table.relationships {
                writeln!(f, "    > {:?} {} via {}", rel.kind, rel.name, rel.foreign_key)?;
            }
        }
        write!(f, ">")
    }
}

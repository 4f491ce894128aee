//! Relationship definitions and their stateless resolvers.
//!
//! Relationships are declared in migrations and live in the folded
//! [`Schema`](crate::schema::Schema), not on record instances. Instead of
//! wiring accessor state into every reified record, the two resolver
//! functions here take the owning record, the relationship name, and the
//! connection, and look everything up on demand. Because no accessor field
//! exists, assigning a relationship is unrepresentable rather than a runtime
//! error.

use serde::{Deserialize, Serialize};

use crate::connection::Connection;
use crate::error::TideError;
use crate::filter::{col, Filter};
use crate::query::Query;
use crate::record::TideRecord;

/// Kind of relationship between two tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RelationKind {
    /// One-to-many: the related table's foreign key points back at this one.
    HasMany,
    /// Many-to-one: this table's foreign key points at the related one.
    BelongsTo,
}

/// A named relationship declared on a table, resolved through a foreign-key
/// column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Relationship {
    pub kind: RelationKind,
    pub name: String,
    pub foreign_key: String,
}

impl Relationship {
    /// Declare a has-many relationship reached via the named foreign key on
    /// the related table.
    pub fn has_many(name: impl Into<String>, via: impl Into<String>) -> Self {
        Self {
            kind: RelationKind::HasMany,
            name: name.into(),
            foreign_key: via.into(),
        }
    }

    /// Declare a belongs-to relationship reached via the named foreign key on
    /// this table.
    pub fn belongs_to(name: impl Into<String>, via: impl Into<String>) -> Self {
        Self {
            kind: RelationKind::BelongsTo,
            name: name.into(),
            foreign_key: via.into(),
        }
    }
}

/// Resolve a belongs-to relationship: read the owner's foreign-key field (as
/// named by the schema) and fetch the row it points at.
///
/// Returns `Ok(None)` when the foreign key is null or no matching row exists;
/// a dangling foreign key is not an error.
///
/// # Errors
///
/// Fails if the relationship is not declared on the owner's table, if the
/// owner record has no field for the foreign-key column, or if the lookup
/// query fails.
pub fn belongs_to<O, R>(owner: &O, relationship: &str, conn: &Connection) -> Result<Option<R>, TideError>
where
    O: TideRecord,
    R: TideRecord,
{
    let rel = conn.schema().relationship(O::TABLE, relationship)?;
    match owner.get(&rel.foreign_key)? {
        Some(foreign_key) => R::find().filter(col("id").eq(foreign_key)).first(conn),
        None => Ok(None),
    }
}

/// Resolve a has-many relationship: a reusable query over the related table,
/// scoped to rows whose foreign key equals the owner's id.
///
/// If the owner has no id yet (an unsaved record), the returned query is
/// seeded with a never-match filter and yields zero rows instead of failing.
/// The foreign-key column itself is resolved from the schema when the query
/// is compiled, so an unknown relationship name surfaces there.
pub fn has_many<O, R>(owner: &O, relationship: &str) -> Query<R>
where
    O: TideRecord,
    R: TideRecord,
{
    match owner.id() {
        Some(id) => R::find().filter(Filter::Relationship {
            id,
            table: O::TABLE.to_string(),
            relationship: relationship.to_string(),
        }),
        None => R::find().filter(Filter::NeverMatch),
    }
}

//! The record trait: the bridge between a plain struct and its table.
//!
//! A record describes itself through a static field table and name-keyed
//! `get`/`set` accessors; query building, saving and destroying are all
//! provided here in terms of those three capabilities.
//! `tide_record!` generates the per-struct parts.

use chrono::Utc;
use log::debug;

use crate::connection::Connection;
use crate::error::TideError;
use crate::filter::{col, Direction, Filter};
use crate::query::Query;
use crate::statement;
use crate::value::{FieldKind, Value};

/// Static descriptor for one field of a record: its column name and kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldDef {
    pub name: &'static str,
    pub kind: FieldKind,
}

/// A struct mapped to a table.
///
/// Implementations come from `tide_record!`; the provided methods are the
/// record-facing API.
///
/// # Example
///
/// ```
/// use tidepool::{col, tide_record, Connection, Migration, Operation, Column, FieldKind, Relationship, TideRecord};
///
/// tide_record! {
///     pub struct Pet("pets") {
///         name: String => "name",
///         age: i64 => "age",
///     }
/// }
///
/// let migrations = vec![Migration::new(
///     "create pets",
///     vec![Operation::create_table(
///         "pets",
///         vec![
///             Column::new("name", FieldKind::Text),
///             Column::new("age", FieldKind::BigInt),
///         ],
///         Vec::<Relationship>::new(),
///     )],
/// )];
/// let conn = Connection::open_in_memory(&migrations).unwrap();
///
/// let pet = Pet { name: "Maru".to_string(), age: 3, ..Pet::default() };
/// let saved = pet.save(&conn).unwrap();
/// assert!(saved.id.is_some());
/// assert_eq!(Pet::find().filter(col("age").gt(1)).count(&conn).unwrap(), 1);
/// ```
pub trait TideRecord: Clone + Default {
    /// Table this record maps to.
    const TABLE: &'static str;

    /// Every field the record carries, including `id`, `createdAt` and
    /// `updatedAt`.
    fn fields() -> &'static [FieldDef];

    /// Read a field by column name. `None` means the field is unset.
    ///
    /// # Errors
    ///
    /// `UnknownField` if the record does not declare the column.
    fn get(&self, field: &str) -> Result<Option<Value>, TideError>;

    /// Write a field by column name.
    ///
    /// # Errors
    ///
    /// `UnknownField` for undeclared columns, `TypeMismatch` if the value's
    /// kind does not fit the field.
    fn set(&mut self, field: &str, value: Value) -> Result<(), TideError>;

    /// Kind of the named field, if declared.
    fn field_kind(field: &str) -> Option<FieldKind> {
        Self::fields()
            .iter()
            .find(|def| def.name == field)
            .map(|def| def.kind)
    }

    /// The primary key, if the record has been saved.
    fn id(&self) -> Option<i64> {
        match self.get("id") {
            Ok(Some(Value::BigInt(id))) => Some(id),
            _ => None,
        }
    }

    /// Start an unfiltered query over the record's table.
    fn find() -> Query<Self> {
        Query::new()
    }

    /// Start a query with an initial filter list.
    fn find_where(filters: Vec<Filter>) -> Query<Self> {
        Query::new().filters(filters)
    }

    /// Start a query ordered by the given column.
    fn order_by(column: &str, direction: Direction) -> Query<Self> {
        Query::new().order_by(column, direction)
    }

    /// Count every row of the table.
    ///
    /// # Errors
    ///
    /// Fails if the count statement cannot be compiled or executed.
    fn count(conn: &Connection) -> Result<u64, TideError> {
        Self::find().count(conn)
    }

    /// The row with the smallest id, if any.
    fn first(conn: &Connection) -> Result<Option<Self>, TideError> {
        Self::find().first(conn)
    }

    /// The row with the largest id, if any.
    fn last(conn: &Connection) -> Result<Option<Self>, TideError> {
        Self::find().last(conn)
    }

    /// Delete every row of the table.
    ///
    /// # Errors
    ///
    /// Fails if the delete statement cannot be executed.
    fn destroy_all(conn: &Connection) -> Result<(), TideError> {
        Self::find().delete_all(conn)
    }

    /// Insert or update this record and return the stored copy.
    ///
    /// A record without an id is inserted and re-read, so the returned copy
    /// carries the assigned id and both timestamps. A record with an id is
    /// written in place and the returned copy carries the fresh `updatedAt`.
    ///
    /// # Errors
    ///
    /// Fails if compilation or execution fails, or if the inserted row
    /// cannot be read back.
    fn save(&self, conn: &Connection) -> Result<Self, TideError> {
        let now = Utc::now();
        if self.id().is_some() {
            let stmt = statement::update_record(self, now, conn.schema())?;
            debug!("{} {:?}", stmt.sql, stmt.params);
            conn.executor().run(&stmt.sql, &stmt.params)?;
            let mut saved = self.clone();
            saved.set("updatedAt", Value::Timestamp(now))?;
            Ok(saved)
        } else {
            let stmt = statement::insert(self, now, conn.schema())?;
            debug!("{} {:?}", stmt.sql, stmt.params);
            conn.executor().run(&stmt.sql, &stmt.params)?;
            let id = conn.executor().last_insert_id();
            Self::find()
                .filter(col("id").eq(Value::BigInt(id)))
                .first(conn)?
                .ok_or_else(|| {
                    TideError::Execution(format!(
                        "inserted row {id} missing from {}",
                        Self::TABLE
                    ))
                })
        }
    }

    /// Delete this record's row.
    ///
    /// # Errors
    ///
    /// `MissingId` if the record was never saved.
    fn destroy(&self, conn: &Connection) -> Result<(), TideError> {
        let id = self.id().ok_or(TideError::MissingId(Self::TABLE))?;
        Self::find()
            .filter(col("id").eq(Value::BigInt(id)))
            .delete_all(conn)
    }
}

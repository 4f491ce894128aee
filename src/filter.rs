//! Predicate and ordering algebra.
//!
//! Filters are plain values; a query carries a list of them and the compiler
//! ANDs them together. The [`col`] builder is the usual entry point:
//!
//! ```
//! use tidepool::{col, Filter, Comparator, Value};
//!
//! let filter = col("age").gt(24);
//! assert_eq!(
//!     filter,
//!     Filter::Property {
//!         column: "age".to_string(),
//!         comparator: Comparator::Gt,
//!         value: Value::Integer(24),
//!     }
//! );
//! ```
//!
//! No schema validation happens at this layer; an unknown column name
//! surfaces from the engine when the statement runs.

use serde::{Deserialize, Serialize};

use crate::value::Value;

/// Comparison operator for a property filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Comparator {
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
}

impl Comparator {
    /// SQL spelling of the operator.
    pub fn sql(self) -> &'static str {
        match self {
            Comparator::Eq => "=",
            Comparator::Ne => "<>",
            Comparator::Lt => "<",
            Comparator::Le => "<=",
            Comparator::Gt => ">",
            Comparator::Ge => ">=",
        }
    }
}

/// A condition a row must satisfy to be included in a query's result set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Filter {
    /// `column <op> value`
    Property {
        column: String,
        comparator: Comparator,
        value: Value,
    },
    /// Rows whose foreign key equals `id`, where the foreign key column is
    /// found by looking up `relationship` on `table` in the schema.
    Relationship {
        id: i64,
        table: String,
        relationship: String,
    },
    /// Matches nothing. Used when a relationship's owner has no id yet, so
    /// the scoped query deterministically yields zero rows.
    NeverMatch,
}

/// Start building a property filter for the named column.
pub fn col(name: impl Into<String>) -> Col {
    Col(name.into())
}

/// A column name waiting for a comparator; see [`col`].
#[derive(Debug, Clone)]
pub struct Col(String);

impl Col {
    pub fn eq(self, value: impl Into<Value>) -> Filter {
        self.cmp(Comparator::Eq, value)
    }

    pub fn ne(self, value: impl Into<Value>) -> Filter {
        self.cmp(Comparator::Ne, value)
    }

    pub fn lt(self, value: impl Into<Value>) -> Filter {
        self.cmp(Comparator::Lt, value)
    }

    pub fn le(self, value: impl Into<Value>) -> Filter {
        self.cmp(Comparator::Le, value)
    }

    pub fn gt(self, value: impl Into<Value>) -> Filter {
        self.cmp(Comparator::Gt, value)
    }

    pub fn ge(self, value: impl Into<Value>) -> Filter {
        self.cmp(Comparator::Ge, value)
    }

    fn cmp(self, comparator: Comparator, value: impl Into<Value>) -> Filter {
        Filter::Property {
            column: self.0,
            comparator,
            value: value.into(),
        }
    }
}

/// Sort direction for an ordering, and the query-level default.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    Ascending,
    Descending,
}

impl Direction {
    /// SQL spelling of the direction.
    pub fn sql(self) -> &'static str {
        match self {
            Direction::Ascending => "ASC",
            Direction::Descending => "DESC",
        }
    }

    pub fn opposite(self) -> Direction {
        match self {
            Direction::Ascending => Direction::Descending,
            Direction::Descending => Direction::Ascending,
        }
    }
}

/// One element of a query's ordering sequence; earlier elements win ties.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ordering {
    pub column: String,
    pub direction: Direction,
}

impl Ordering {
    pub fn new(column: impl Into<String>, direction: Direction) -> Self {
        Self {
            column: column.into(),
            direction,
        }
    }

    /// The same ordering with its direction flipped.
    pub fn reversed(&self) -> Ordering {
        Ordering {
            column: self.column.clone(),
            direction: self.direction.opposite(),
        }
    }
}

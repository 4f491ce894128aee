//! The immutable query value.
//!
//! A `Query<M>` is a description of a result set: filters, orderings and an
//! optional row limit. Builder methods return a new query and leave the
//! receiver untouched, so partially-built queries can be shared and layered
//! freely. Nothing touches the database until an execution method runs.

use std::fmt;
use std::marker::PhantomData;

use log::debug;

use crate::connection::Connection;
use crate::error::TideError;
use crate::filter::{Direction, Filter, Ordering};
use crate::record::TideRecord;
use crate::reify::reify;
use crate::statement;
use crate::value::Value;

pub struct Query<M: TideRecord> {
    filters: Vec<Filter>,
    orderings: Vec<Ordering>,
    limit: Option<u64>,
    default_direction: Direction,
    _marker: PhantomData<M>,
}

impl<M: TideRecord> Clone for Query<M> {
    fn clone(&self) -> Self {
        Query {
            filters: self.filters.clone(),
            orderings: self.orderings.clone(),
            limit: self.limit,
            default_direction: self.default_direction,
            _marker: PhantomData,
        }
    }
}

impl<M: TideRecord> fmt::Debug for Query<M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Query")
            .field("table", &M::TABLE)
            .field("filters", &self.filters)
            .field("orderings", &self.orderings)
            .field("limit", &self.limit)
            .field("default_direction", &self.default_direction)
            .finish()
    }
}

impl<M: TideRecord> PartialEq for Query<M> {
    fn eq(&self, other: &Self) -> bool {
        self.filters == other.filters
            && self.orderings == other.orderings
            && self.limit == other.limit
            && self.default_direction == other.default_direction
    }
}

impl<M: TideRecord> Default for Query<M> {
    fn default() -> Self {
        Query::new()
    }
}

impl<M: TideRecord> Query<M> {
    pub fn new() -> Self {
        Query {
            filters: Vec::new(),
            orderings: Vec::new(),
            limit: None,
            default_direction: Direction::Ascending,
            _marker: PhantomData,
        }
    }

    /// Add one filter; filters conjoin with `AND`.
    #[must_use]
    pub fn filter(&self, filter: Filter) -> Self {
        let mut next = self.clone();
        next.filters.push(filter);
        next
    }

    /// Add several filters at once.
    #[must_use]
    pub fn filters(&self, filters: Vec<Filter>) -> Self {
        let mut next = self.clone();
        next.filters.extend(filters);
        next
    }

    /// Append an ordering term. Earlier terms take precedence.
    #[must_use]
    pub fn order_by(&self, column: &str, direction: Direction) -> Self {
        let mut next = self.clone();
        next.orderings.push(Ordering::new(column, direction));
        next
    }

    /// Cap the number of rows returned.
    #[must_use]
    pub fn limit(&self, limit: u64) -> Self {
        let mut next = self.clone();
        next.limit = Some(limit);
        next
    }

    /// Flip every ordering term, and the default id order for queries with
    /// no explicit ordering. Reversing twice restores the original query.
    #[must_use]
    pub fn reverse(&self) -> Self {
        let mut next = self.clone();
        next.orderings = self.orderings.iter().map(Ordering::reversed).collect();
        next.default_direction = self.default_direction.opposite();
        next
    }

    pub fn filters_list(&self) -> &[Filter] {
        &self.filters
    }

    pub(crate) fn orderings(&self) -> &[Ordering] {
        &self.orderings
    }

    pub(crate) fn row_limit(&self) -> Option<u64> {
        self.limit
    }

    pub(crate) fn default_direction(&self) -> Direction {
        self.default_direction
    }

    /// Execute and reify every matching row.
    ///
    /// # Errors
    ///
    /// Fails if compilation, execution or reification fails.
    pub fn all(&self, conn: &Connection) -> Result<Vec<M>, TideError> {
        let stmt = statement::select(self, conn.schema())?;
        debug!("{} {:?}", stmt.sql, stmt.params);
        let rows = conn.executor().query(&stmt.sql, &stmt.params)?;
        reify(&rows)
    }

    /// The first matching row, if any.
    pub fn first(&self, conn: &Connection) -> Result<Option<M>, TideError> {
        Ok(self.limit(1).all(conn)?.into_iter().next())
    }

    /// The first `n` matching rows.
    pub fn first_n(&self, n: u64, conn: &Connection) -> Result<Vec<M>, TideError> {
        self.limit(n).all(conn)
    }

    /// The last matching row, if any.
    pub fn last(&self, conn: &Connection) -> Result<Option<M>, TideError> {
        self.reverse().first(conn)
    }

    /// The last `n` matching rows, in reversed order.
    pub fn last_n(&self, n: u64, conn: &Connection) -> Result<Vec<M>, TideError> {
        self.reverse().first_n(n, conn)
    }

    /// Count matching rows without reifying them.
    ///
    /// # Errors
    ///
    /// Fails if execution fails or the count comes back non-integral.
    pub fn count(&self, conn: &Connection) -> Result<u64, TideError> {
        let stmt = statement::count(self, conn.schema())?;
        debug!("{} {:?}", stmt.sql, stmt.params);
        match conn.executor().scalar(&stmt.sql, &stmt.params)? {
            Some(Value::BigInt(n)) if n >= 0 => Ok(n as u64),
            other => Err(TideError::Execution(format!(
                "COUNT(*) returned {other:?}"
            ))),
        }
    }

    /// Assign the given column/value pairs on every matching row, stamping
    /// `updatedAt`.
    ///
    /// # Errors
    ///
    /// Fails if compilation or execution fails.
    pub fn update_all(
        &self,
        values: &[(&str, Value)],
        conn: &Connection,
    ) -> Result<(), TideError> {
        let stmt = statement::update_by_query(self, values, chrono::Utc::now(), conn.schema())?;
        debug!("{} {:?}", stmt.sql, stmt.params);
        conn.executor().run(&stmt.sql, &stmt.params)
    }

    /// Delete every matching row.
    ///
    /// # Errors
    ///
    /// Fails if compilation or execution fails.
    pub fn delete_all(&self, conn: &Connection) -> Result<(), TideError> {
        let stmt = statement::delete(self, conn.schema())?;
        debug!("{} {:?}", stmt.sql, stmt.params);
        conn.executor().run(&stmt.sql, &stmt.params)
    }
}

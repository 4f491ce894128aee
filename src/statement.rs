//! Compilation of queries and record writes into SQL text plus positional
//! parameters.
//!
//! Every value travels as a `?` placeholder; the only strings interpolated
//! into SQL text are identifiers taken from the folded schema or from record
//! field tables. Column order for writes is the schema's canonical
//! (lexicographic) order, so the same record always produces the same
//! statement shape.

use chrono::{DateTime, Utc};

use crate::error::TideError;
use crate::filter::{Direction, Filter, Ordering};
use crate::query::Query;
use crate::record::TideRecord;
use crate::schema::Schema;
use crate::value::{format_timestamp, Value};

/// A compiled statement: SQL text and its positional parameters, in
/// placeholder order.
#[derive(Debug, Clone, PartialEq)]
pub struct Statement {
    pub sql: String,
    pub params: Vec<Option<Value>>,
}

/// Render a filter list as a `WHERE` clause, conjoining with `AND`.
///
/// Returns an empty clause for an empty list. Relationship filters resolve
/// the foreign key column through the schema.
fn where_parts(
    filters: &[Filter],
    schema: &Schema,
) -> Result<(String, Vec<Option<Value>>), TideError> {
    if filters.is_empty() {
        return Ok((String::new(), Vec::new()));
    }

    let mut fragments = Vec::with_capacity(filters.len());
    let mut params = Vec::new();
    for filter in filters {
        match filter {
            Filter::Property {
                column,
                comparator,
                value,
            } => {
                fragments.push(format!("{} {} ?", column, comparator.sql()));
                params.push(Some(value.clone()));
            }
            Filter::Relationship {
                id,
                table: owner_table,
                relationship,
            } => {
                let rel = schema.relationship(owner_table, relationship)?;
                fragments.push(format!("{} = ?", rel.foreign_key));
                params.push(Some(Value::BigInt(*id)));
            }
            Filter::NeverMatch => fragments.push("1 = 0".to_string()),
        }
    }

    Ok((format!("WHERE {}", fragments.join(" AND ")), params))
}

/// Render the `ORDER BY` clause. With no explicit orderings the rows come
/// back in id order following the query's default direction.
fn order_parts(orderings: &[Ordering], default_direction: Direction) -> String {
    if orderings.is_empty() {
        return format!("ORDER BY id {}", default_direction.sql());
    }
    let terms: Vec<String> = orderings
        .iter()
        .map(|ordering| format!("{} {}", ordering.column, ordering.direction.sql()))
        .collect();
    format!("ORDER BY {}", terms.join(", "))
}

fn compile(head: String, clauses: Vec<String>, params: Vec<Option<Value>>) -> Statement {
    let mut pieces = vec![head];
    pieces.extend(clauses.into_iter().filter(|clause| !clause.is_empty()));
    Statement {
        sql: pieces.join(" "),
        params,
    }
}

/// Compile a query into a `SELECT *` statement.
///
/// # Errors
///
/// `UnknownRelationship` if a relationship filter names a relationship the
/// schema does not carry.
pub fn select<M: TideRecord>(query: &Query<M>, schema: &Schema) -> Result<Statement, TideError> {
    let (where_clause, params) = where_parts(query.filters_list(), schema)?;
    let mut clauses = vec![
        where_clause,
        order_parts(query.orderings(), query.default_direction()),
    ];
    if let Some(limit) = query.row_limit() {
        clauses.push(format!("LIMIT {limit}"));
    }
    Ok(compile(
        format!("SELECT * FROM {}", M::TABLE),
        clauses,
        params,
    ))
}

/// Compile a query into a `SELECT COUNT(*)` statement. Ordering and limit
/// are irrelevant to a count and are not emitted.
pub fn count<M: TideRecord>(query: &Query<M>, schema: &Schema) -> Result<Statement, TideError> {
    let (where_clause, params) = where_parts(query.filters_list(), schema)?;
    Ok(compile(
        format!("SELECT COUNT(*) FROM {}", M::TABLE),
        vec![where_clause],
        params,
    ))
}

/// Compile an `INSERT` for a new record. Both `createdAt` and `updatedAt`
/// are stamped with `now`; the data columns follow canonical order.
pub fn insert<M: TideRecord>(
    record: &M,
    now: DateTime<Utc>,
    schema: &Schema,
) -> Result<Statement, TideError> {
    let columns = schema.sorted_column_names(M::TABLE)?;

    let mut names: Vec<&str> = columns.iter().map(String::as_str).collect();
    names.push("createdAt");
    names.push("updatedAt");

    let mut params = Vec::with_capacity(names.len());
    for column in &columns {
        params.push(record.get(column)?.map(|value| value.bindable()));
    }
    let stamp = Some(Value::Text(format_timestamp(now)));
    params.push(stamp.clone());
    params.push(stamp);

    let placeholders = vec!["?"; names.len()].join(", ");
    Ok(Statement {
        sql: format!(
            "INSERT INTO {} ({}) VALUES ({})",
            M::TABLE,
            names.join(", "),
            placeholders
        ),
        params,
    })
}

/// Compile an `UPDATE` writing every data column of a saved record, keyed
/// by id. `updatedAt` is restamped; `createdAt` is left untouched.
///
/// # Errors
///
/// `MissingId` if the record was never saved.
pub fn update_record<M: TideRecord>(
    record: &M,
    now: DateTime<Utc>,
    schema: &Schema,
) -> Result<Statement, TideError> {
    let id = record.id().ok_or(TideError::MissingId(M::TABLE))?;
    let columns = schema.sorted_column_names(M::TABLE)?;

    let mut sets = Vec::with_capacity(columns.len() + 1);
    let mut params = Vec::with_capacity(columns.len() + 2);
    for column in &columns {
        sets.push(format!("{column} = ?"));
        params.push(record.get(column)?.map(|value| value.bindable()));
    }
    sets.push("updatedAt = ?".to_string());
    params.push(Some(Value::Text(format_timestamp(now))));
    params.push(Some(Value::BigInt(id)));

    Ok(Statement {
        sql: format!("UPDATE {} SET {} WHERE id = ?", M::TABLE, sets.join(", ")),
        params,
    })
}

/// Compile a filtered bulk `UPDATE` assigning the given column/value pairs.
/// Assignments are sorted by column name so equivalent updates compile to
/// identical statements; set parameters precede where parameters.
pub fn update_by_query<M: TideRecord>(
    query: &Query<M>,
    values: &[(&str, Value)],
    now: DateTime<Utc>,
    schema: &Schema,
) -> Result<Statement, TideError> {
    let mut pairs: Vec<&(&str, Value)> = values.iter().collect();
    pairs.sort_by_key(|(name, _)| *name);

    let mut sets = Vec::with_capacity(pairs.len() + 1);
    let mut params = Vec::with_capacity(pairs.len() + 1);
    for (name, value) in pairs {
        sets.push(format!("{name} = ?"));
        params.push(Some(value.clone().bindable()));
    }
    sets.push("updatedAt = ?".to_string());
    params.push(Some(Value::Text(format_timestamp(now))));

    let (where_clause, where_params) = where_parts(query.filters_list(), schema)?;
    params.extend(where_params);

    Ok(compile(
        format!("UPDATE {} SET {}", M::TABLE, sets.join(", ")),
        vec![where_clause],
        params,
    ))
}

/// Compile a filtered `DELETE`.
pub fn delete<M: TideRecord>(query: &Query<M>, schema: &Schema) -> Result<Statement, TideError> {
    let (where_clause, params) = where_parts(query.filters_list(), schema)?;
    Ok(compile(
        format!("DELETE FROM {}", M::TABLE),
        vec![where_clause],
        params,
    ))
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;
    use crate::filter::{col, Direction};
    use crate::record::TideRecord;
    use crate::tests_cfg::{self, Macro, User};

    fn schema() -> Schema {
        Schema::from_migrations(&tests_cfg::base_migrations()).unwrap()
    }

    fn stamp() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2021, 3, 14, 9, 26, 53).unwrap()
    }

    #[test]
    fn test_select_without_filters() {
        let statement = select(&User::find(), &schema()).unwrap();
        assert_eq!(statement.sql, "SELECT * FROM users ORDER BY id ASC");
        assert!(statement.params.is_empty());
    }

    #[test]
    fn test_select_with_filters_orderings_and_limit() {
        let query = User::find()
            .filter(col("age").gt(10))
            .filter(col("isAdmin").eq(true))
            .order_by("name", Direction::Descending)
            .limit(3);
        let statement = select(&query, &schema()).unwrap();
        assert_eq!(
            statement.sql,
            "SELECT * FROM users WHERE age > ? AND isAdmin = ? ORDER BY name DESC LIMIT 3"
        );
        assert_eq!(
            statement.params,
            vec![Some(Value::Integer(10)), Some(Value::Boolean(true))]
        );
    }

    #[test]
    fn test_select_with_relationship_filter() {
        let query = Macro::find().filter(Filter::Relationship {
            id: 4,
            table: "users".to_string(),
            relationship: "macros".to_string(),
        });
        let statement = select(&query, &schema()).unwrap();
        assert_eq!(
            statement.sql,
            "SELECT * FROM macros WHERE userId = ? ORDER BY id ASC"
        );
        assert_eq!(statement.params, vec![Some(Value::BigInt(4))]);
    }

    #[test]
    fn test_never_match_filter_compiles_to_contradiction() {
        let query = Macro::find().filter(Filter::NeverMatch);
        let statement = select(&query, &schema()).unwrap();
        assert_eq!(
            statement.sql,
            "SELECT * FROM macros WHERE 1 = 0 ORDER BY id ASC"
        );
        assert!(statement.params.is_empty());
    }

    #[test]
    fn test_unknown_relationship_is_an_error() {
        let query = Macro::find().filter(Filter::Relationship {
            id: 4,
            table: "users".to_string(),
            relationship: "gadgets".to_string(),
        });
        assert!(matches!(
            select(&query, &schema()),
            Err(TideError::UnknownRelationship { .. })
        ));
    }

    #[test]
    fn test_count_ignores_ordering_and_limit() {
        let query = User::find()
            .filter(col("age").le(25))
            .order_by("name", Direction::Ascending)
            .limit(2);
        let statement = count(&query, &schema()).unwrap();
        assert_eq!(statement.sql, "SELECT COUNT(*) FROM users WHERE age <= ?");
        assert_eq!(statement.params, vec![Some(Value::Integer(25))]);
    }

    #[test]
    fn test_insert_uses_canonical_column_order() {
        let user = User {
            name: "Ellie Harvey".to_string(),
            age: 24,
            is_admin: true,
            ..User::default()
        };
        let statement = insert(&user, stamp(), &schema()).unwrap();
        assert_eq!(
            statement.sql,
            "INSERT INTO users (age, isAdmin, name, createdAt, updatedAt) VALUES (?, ?, ?, ?, ?)"
        );
        assert_eq!(
            statement.params,
            vec![
                Some(Value::BigInt(24)),
                Some(Value::Boolean(true)),
                Some(Value::Text("Ellie Harvey".to_string())),
                Some(Value::Text("2021-03-14T09:26:53Z".to_string())),
                Some(Value::Text("2021-03-14T09:26:53Z".to_string())),
            ]
        );
    }

    #[test]
    fn test_update_record_restamps_updated_at_only() {
        let mut user = User {
            name: "Daniel Moreh".to_string(),
            age: 27,
            is_admin: true,
            ..User::default()
        };
        user.id = Some(3);
        let statement = update_record(&user, stamp(), &schema()).unwrap();
        assert_eq!(
            statement.sql,
            "UPDATE users SET age = ?, isAdmin = ?, name = ?, updatedAt = ? WHERE id = ?"
        );
        assert_eq!(
            statement.params,
            vec![
                Some(Value::BigInt(27)),
                Some(Value::Boolean(true)),
                Some(Value::Text("Daniel Moreh".to_string())),
                Some(Value::Text("2021-03-14T09:26:53Z".to_string())),
                Some(Value::BigInt(3)),
            ]
        );
    }

    #[test]
    fn test_update_record_without_id_fails() {
        let user = User::default();
        assert!(matches!(
            update_record(&user, stamp(), &schema()),
            Err(TideError::MissingId("users"))
        ));
    }

    #[test]
    fn test_update_by_query_sorts_assignments_and_orders_params() {
        let query = User::find().filter(col("age").gt(30));
        let statement = update_by_query(
            &query,
            &[
                ("name", Value::Text("Anonymous".to_string())),
                ("isAdmin", Value::Boolean(false)),
            ],
            stamp(),
            &schema(),
        )
        .unwrap();
        assert_eq!(
            statement.sql,
            "UPDATE users SET isAdmin = ?, name = ?, updatedAt = ? WHERE age > ?"
        );
        assert_eq!(
            statement.params,
            vec![
                Some(Value::Boolean(false)),
                Some(Value::Text("Anonymous".to_string())),
                Some(Value::Text("2021-03-14T09:26:53Z".to_string())),
                Some(Value::Integer(30)),
            ]
        );
    }

    #[test]
    fn test_delete_with_and_without_filters() {
        let all = delete(&User::find(), &schema()).unwrap();
        assert_eq!(all.sql, "DELETE FROM users");
        assert!(all.params.is_empty());

        let some = delete(&User::find().filter(col("age").lt(18)), &schema()).unwrap();
        assert_eq!(some.sql, "DELETE FROM users WHERE age < ?");
        assert_eq!(some.params, vec![Some(Value::Integer(18))]);
    }
}

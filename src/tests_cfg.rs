//! Shared fixtures for unit tests: a small users/macros/actions domain plus
//! the migrations that build it.

use crate::connection::Connection;
use crate::migration::{Migration, Operation};
use crate::record::TideRecord;
use crate::relation::Relationship;
use crate::schema::Column;
use crate::tide_record;
use crate::value::FieldKind;

tide_record! {
    pub struct User("users") {
        name: String => "name",
        age: i64 => "age",
        is_admin: bool => "isAdmin",
    }
}

tide_record! {
    pub struct Macro("macros") {
        name: String => "name",
        is_enabled: bool => "isEnabled",
        user_id: Option<i64> => "userId",
    }
}

tide_record! {
    pub struct Action("actions") {
        action_type: String => "actionType",
        position: i64 => "position",
        macro_id: Option<i64> => "macroId",
    }
}

pub fn users_and_macros_migration() -> Migration {
    users_and_macros_migration_renamed("create users and macros tables")
}

pub fn users_and_macros_migration_renamed(name: &str) -> Migration {
    Migration::new(
        name,
        vec![
            Operation::create_table(
                "users",
                vec![
                    Column::new("name", FieldKind::Text),
                    Column::new("age", FieldKind::BigInt),
                ],
                vec![Relationship::has_many("macros", "userId")],
            ),
            Operation::create_table(
                "macros",
                vec![
                    Column::new("name", FieldKind::Text),
                    Column::new("isEnabled", FieldKind::Boolean),
                ],
                vec![Relationship::belongs_to("user", "userId")],
            ),
        ],
    )
}

pub fn add_columns_migration() -> Migration {
    Migration::new(
        "add isAdmin column to users and userId to macros",
        vec![
            Operation::add_column("users", Column::new("isAdmin", FieldKind::Boolean)),
            Operation::add_column("macros", Column::new("userId", FieldKind::BigInt)),
        ],
    )
}

pub fn add_actions_migration() -> Migration {
    Migration::new(
        "add actions table",
        vec![
            Operation::create_table(
                "actions",
                vec![
                    Column::new("actionType", FieldKind::Text),
                    Column::new("position", FieldKind::BigInt),
                    Column::new("macroId", FieldKind::BigInt),
                ],
                vec![Relationship::belongs_to("macro", "macroId")],
            ),
            Operation::add_relationship("macros", Relationship::has_many("actions", "macroId")),
        ],
    )
}

pub fn base_migrations() -> Vec<Migration> {
    vec![users_and_macros_migration(), add_columns_migration()]
}

pub fn all_migrations() -> Vec<Migration> {
    vec![
        users_and_macros_migration(),
        add_columns_migration(),
        add_actions_migration(),
    ]
}

pub fn connection() -> Connection {
    Connection::open_in_memory(&base_migrations()).unwrap()
}

/// Insert the five standard users and return them in insertion order.
pub fn seed_users(conn: &Connection) -> Vec<User> {
    [
        ("Winnie Harvey", 5, false),
        ("Ellie Harvey", 24, true),
        ("Daniel Moreh", 27, true),
        ("Mike Robbins", 35, false),
        ("Eric Bakan", 25, false),
    ]
    .iter()
    .map(|&(name, age, is_admin)| {
        User {
            name: name.to_string(),
            age,
            is_admin,
            ..User::default()
        }
        .save(conn)
        .unwrap()
    })
    .collect()
}

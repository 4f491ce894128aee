//! Fixtures shared by the integration tests: a users/macros/actions domain,
//! the migrations that build it, and seed data.

#![allow(dead_code)]

use tidepool::{
    tide_record, Column, Connection, FieldKind, Migration, Operation, Relationship, TideRecord,
};

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

pub fn migrations() -> Vec<Migration> {
    vec![
        Migration::new(
            "create users and macros tables",
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
        ),
        Migration::new(
            "add isAdmin column to users and userId to macros",
            vec![
                Operation::add_column("users", Column::new("isAdmin", FieldKind::Boolean)),
                Operation::add_column("macros", Column::new("userId", FieldKind::BigInt)),
            ],
        ),
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
                Operation::add_relationship(
                    "macros",
                    Relationship::has_many("actions", "macroId"),
                ),
            ],
        ),
    ]
}

pub fn connection() -> Connection {
    Connection::open_in_memory(&migrations()).unwrap()
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

/// Seed users plus three macros: two owned by the first user, one with a
/// dangling owner id.
pub fn seed_users_and_macros(conn: &Connection) -> (Vec<User>, Vec<Macro>) {
    let users = seed_users(conn);
    let owner = users[0].id.unwrap();
    let macros = vec![
        Macro {
            name: "morning report".to_string(),
            is_enabled: true,
            user_id: Some(owner),
            ..Macro::default()
        }
        .save(conn)
        .unwrap(),
        Macro {
            name: "weekly digest".to_string(),
            is_enabled: false,
            user_id: Some(owner),
            ..Macro::default()
        }
        .save(conn)
        .unwrap(),
        Macro {
            name: "orphaned cleanup".to_string(),
            is_enabled: true,
            user_id: Some(10),
            ..Macro::default()
        }
        .save(conn)
        .unwrap(),
    ];
    (users, macros)
}

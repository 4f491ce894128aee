//! The `tide_record!` macro.
//!
//! Expands a struct-like declaration into the struct itself plus its
//! `TideRecord` implementation: the static field table and the name-keyed
//! `get`/`set` accessors. `id`, `created_at` and `updated_at` fields are
//! added automatically and map to the `id`, `createdAt` and `updatedAt`
//! columns every table carries.

/// Declare a record struct mapped to a table.
///
/// Each line maps a Rust field to its column: `field: Type => "column"`.
/// The type must implement [`FieldValue`](crate::FieldValue); wrap it in
/// `Option` for nullable columns.
///
/// # Example
///
/// ```
/// use tidepool::tide_record;
///
/// tide_record! {
///     /// A registered user.
///     pub struct User("users") {
///         name: String => "name",
///         age: i64 => "age",
///         is_admin: bool => "isAdmin",
///     }
/// }
///
/// use tidepool::TideRecord;
/// assert_eq!(User::TABLE, "users");
/// let user = User { name: "Ellie Harvey".to_string(), ..User::default() };
/// assert_eq!(user.id, None);
/// ```
#[macro_export]
macro_rules! tide_record {
    (
        $(#[$meta:meta])*
        $vis:vis struct $name:ident($table:literal) {
            $($field:ident : $ty:ty => $col:literal),* $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Default)]
        $vis struct $name {
            pub id: Option<i64>,
            pub created_at: Option<$crate::Timestamp>,
            pub updated_at: Option<$crate::Timestamp>,
            $(pub $field: $ty,)*
        }

        impl $crate::TideRecord for $name {
            const TABLE: &'static str = $table;

            fn fields() -> &'static [$crate::FieldDef] {
                const FIELDS: &[$crate::FieldDef] = &[
                    $crate::FieldDef {
                        name: "id",
                        kind: $crate::FieldKind::BigInt,
                    },
                    $crate::FieldDef {
                        name: "createdAt",
                        kind: $crate::FieldKind::Timestamp,
                    },
                    $crate::FieldDef {
                        name: "updatedAt",
                        kind: $crate::FieldKind::Timestamp,
                    },
                    $($crate::FieldDef {
                        name: $col,
                        kind: <$ty as $crate::FieldValue>::KIND,
                    },)*
                ];
                FIELDS
            }

            fn get(&self, field: &str) -> Result<Option<$crate::Value>, $crate::TideError> {
                match field {
                    "id" => Ok($crate::FieldValue::to_value(&self.id)),
                    "createdAt" => Ok($crate::FieldValue::to_value(&self.created_at)),
                    "updatedAt" => Ok($crate::FieldValue::to_value(&self.updated_at)),
                    $($col => Ok($crate::FieldValue::to_value(&self.$field)),)*
                    _ => Err($crate::TideError::UnknownField {
                        table: Self::TABLE,
                        field: field.to_string(),
                    }),
                }
            }

            fn set(&mut self, field: &str, value: $crate::Value) -> Result<(), $crate::TideError> {
                match field {
                    "id" => {
                        self.id = $crate::FieldValue::from_value(value).ok_or_else(|| {
                            $crate::TideError::TypeMismatch {
                                field: field.to_string(),
                                expected: $crate::FieldKind::BigInt,
                            }
                        })?;
                    }
                    "createdAt" => {
                        self.created_at =
                            $crate::FieldValue::from_value(value).ok_or_else(|| {
                                $crate::TideError::TypeMismatch {
                                    field: field.to_string(),
                                    expected: $crate::FieldKind::Timestamp,
                                }
                            })?;
                    }
                    "updatedAt" => {
                        self.updated_at =
                            $crate::FieldValue::from_value(value).ok_or_else(|| {
                                $crate::TideError::TypeMismatch {
                                    field: field.to_string(),
                                    expected: $crate::FieldKind::Timestamp,
                                }
                            })?;
                    }
                    $($col => {
                        self.$field =
                            <$ty as $crate::FieldValue>::from_value(value).ok_or_else(|| {
                                $crate::TideError::TypeMismatch {
                                    field: field.to_string(),
                                    expected: <$ty as $crate::FieldValue>::KIND,
                                }
                            })?;
                    })*
                    _ => {
                        return Err($crate::TideError::UnknownField {
                            table: Self::TABLE,
                            field: field.to_string(),
                        })
                    }
                }
                Ok(())
            }
        }
    };
}

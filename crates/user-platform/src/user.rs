//! The `User` record and its table.

use crate::Record;
use serde::Serialize;
use std::fmt;

/// DDL for the `users` table. Column labels match the record's column names.
pub const USERS_TABLE_DDL: &str = r#"CREATE TABLE IF NOT EXISTS users (
    id BIGSERIAL PRIMARY KEY,
    name VARCHAR(16) NOT NULL,
    password VARCHAR(64) NOT NULL,
    email VARCHAR(64) NOT NULL,
    "phoneNumber" VARCHAR(64) NOT NULL
)"#;

/// A registered user. `id` is assigned by the database on insert.
#[derive(Clone, Default, PartialEq, Eq, Record, Serialize)]
#[record(rename_all = "camelCase")]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: Option<i64>,
    pub name: String,
    #[serde(skip_serializing)]
    pub password: String,
    pub email: String,
    pub phone_number: String,
}

impl User {
    pub fn new(
        name: impl Into<String>,
        password: impl Into<String>,
        email: impl Into<String>,
        phone_number: impl Into<String>,
    ) -> Self {
        Self {
            id: None,
            name: name.into(),
            password: password.into(),
            email: email.into(),
            phone_number: phone_number.into(),
        }
    }
}

impl fmt::Debug for User {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("User")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("password", &"***")
            .field("email", &self.email)
            .field("phone_number", &self.phone_number)
            .finish()
    }
}

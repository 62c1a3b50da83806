//! `User` persistence over a [`GenericClient`].

use crate::accessor::TypeAccessors;
use crate::client::GenericClient;
use crate::error::OrmResult;
use crate::mapper::RowMapper;
use crate::record::Record;
use crate::statement::StatementBuilder;
use crate::user::User;
use crate::value::{ScalarType, Value};
use serde::Deserialize;
use std::future::Future;

pub const INSERT_USER_DML_SQL: &str =
    r#"INSERT INTO users(name, password, email, "phoneNumber") VALUES ($1, $2, $3, $4)"#;

pub const QUERY_ALL_USERS_DML_SQL: &str =
    r#"SELECT id, name, password, email, "phoneNumber" FROM users"#;

pub const QUERY_USER_BY_NAME_AND_PASSWORD_DML_SQL: &str = r#"SELECT id, name, password, email, "phoneNumber" FROM users WHERE name = $1 AND password = $2"#;

/// Parameter types bound by [`INSERT_USER_DML_SQL`].
const INSERT_USER_PARAM_TYPES: [ScalarType; 4] = [ScalarType::Text; 4];

/// What a write does with a failed statement.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WriteErrorPolicy {
    /// Log the error and return it to the caller.
    #[default]
    Propagate,
    /// Log an execution error and report the write as successful. Errors
    /// raised while binding the statement are still returned.
    ///
    /// Callers cannot tell a lost write from a stored one under this policy.
    LogAndIgnore,
}

/// Storage operations for [`User`] records.
pub trait UserRepository: Send + Sync {
    /// Insert a user. `None` is rejected with `Ok(false)` without touching the database.
    fn save(&self, user: Option<&User>) -> impl Future<Output = OrmResult<bool>> + Send;

    /// Not supported; always `Ok(false)`.
    fn delete_by_id(&self, user_id: i64) -> impl Future<Output = OrmResult<bool>> + Send;

    /// Not supported; always `Ok(false)`.
    fn update(&self, user: &User) -> impl Future<Output = OrmResult<bool>> + Send;

    /// Not supported; always `Ok(None)`.
    fn get_by_id(&self, user_id: i64) -> impl Future<Output = OrmResult<Option<User>>> + Send;

    /// The user with these credentials.
    ///
    /// Semantics:
    /// - no match: `Ok(None)`
    /// - one match: `Ok(Some(user))`
    /// - several matches: [`OrmError::IntegrityViolation`](crate::OrmError::IntegrityViolation)
    fn get_by_name_and_password(
        &self,
        name: &str,
        password: &str,
    ) -> impl Future<Output = OrmResult<Option<User>>> + Send;

    /// Every stored user, in the order the database returns them.
    fn get_all(&self) -> impl Future<Output = OrmResult<Vec<User>>> + Send;
}

/// [`UserRepository`] backed by the `users` table.
#[derive(Debug)]
pub struct DatabaseUserRepository<C> {
    client: C,
    accessors: TypeAccessors,
    write_policy: WriteErrorPolicy,
}

impl<C: GenericClient> DatabaseUserRepository<C> {
    /// Create a repository with the standard accessor registry.
    pub fn new(client: C) -> OrmResult<Self> {
        Self::with_accessors(client, TypeAccessors::standard())
    }

    /// Create a repository with a custom accessor registry.
    ///
    /// Returns [`OrmError::Configuration`](crate::OrmError::Configuration) if the
    /// registry cannot map `User` or bind the insert parameters.
    pub fn with_accessors(client: C, accessors: TypeAccessors) -> OrmResult<Self> {
        accessors.validate_record::<User>()?;
        accessors.validate_types(INSERT_USER_PARAM_TYPES)?;
        Ok(Self {
            client,
            accessors,
            write_policy: WriteErrorPolicy::default(),
        })
    }

    /// Set how write failures are reported.
    pub fn write_policy(mut self, policy: WriteErrorPolicy) -> Self {
        self.write_policy = policy;
        self
    }

    pub fn client(&self) -> &C {
        &self.client
    }

    pub fn accessors(&self) -> &TypeAccessors {
        &self.accessors
    }

    async fn execute_query<T: Record>(&self, sql: &str, args: Vec<Value>) -> OrmResult<Vec<T>> {
        let stmt = StatementBuilder::new(&self.accessors).build(sql, args)?;
        let rows = self.client.query(&stmt).await?;
        RowMapper::new(&self.accessors).map_all(rows)
    }
}

impl<C: GenericClient> UserRepository for DatabaseUserRepository<C> {
    async fn save(&self, user: Option<&User>) -> OrmResult<bool> {
        let Some(user) = user else {
            return Ok(false);
        };

        let args = vec![
            Value::from(&user.name),
            Value::from(&user.password),
            Value::from(&user.email),
            Value::from(&user.phone_number),
        ];

        let stmt = StatementBuilder::new(&self.accessors).build(INSERT_USER_DML_SQL, args)?;
        match self.client.execute(&stmt).await {
            Ok(_) => Ok(true),
            Err(e) => {
                tracing::error!(error = %e, user = %user.name, "failed to save user");
                match self.write_policy {
                    WriteErrorPolicy::Propagate => Err(e),
                    WriteErrorPolicy::LogAndIgnore => Ok(true),
                }
            }
        }
    }

    async fn delete_by_id(&self, _user_id: i64) -> OrmResult<bool> {
        Ok(false)
    }

    async fn update(&self, _user: &User) -> OrmResult<bool> {
        Ok(false)
    }

    async fn get_by_id(&self, _user_id: i64) -> OrmResult<Option<User>> {
        Ok(None)
    }

    async fn get_by_name_and_password(&self, name: &str, password: &str) -> OrmResult<Option<User>> {
        let stmt = StatementBuilder::new(&self.accessors).build(
            QUERY_USER_BY_NAME_AND_PASSWORD_DML_SQL,
            vec![Value::from(name), Value::from(password)],
        )?;
        let rows = self.client.query(&stmt).await?;
        RowMapper::new(&self.accessors).map_unique(rows)
    }

    async fn get_all(&self) -> OrmResult<Vec<User>> {
        self.execute_query(QUERY_ALL_USERS_DML_SQL, Vec::new()).await
    }
}

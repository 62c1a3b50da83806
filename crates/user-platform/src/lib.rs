//! # user-platform
//!
//! User registration and sign-in persistence over PostgreSQL.
//!
//! The crate is a thin controller → service → repository pipeline over one
//! `users` table. The reusable part is the mapping layer underneath the
//! repository:
//!
//! - **Type accessors**: [`TypeAccessors`] links each [`ScalarType`] to the
//!   operation that reads it from a column and the one that binds it into a
//!   statement parameter
//! - **Statement builder**: [`StatementBuilder`] binds a list of [`Value`]s to
//!   the `$1, $2, ...` placeholders of a SQL template
//! - **Row mapper**: [`RowMapper`] turns result rows into [`Record`]s using the
//!   shape generated by `#[derive(Record)]`
//!
//! ```ignore
//! use user_platform::{DatabaseUserRepository, LazyClient, User, UserRepository};
//!
//! let repo = DatabaseUserRepository::new(LazyClient::postgres(database_url))?;
//! repo.save(Some(&User::new("alice", "p1", "a@x.com", "555"))).await?;
//! let alice = repo.get_by_name_and_password("alice", "p1").await?;
//! ```

// Lets `#[derive(Record)]` resolve `::user_platform` inside this crate.
extern crate self as user_platform;

pub mod accessor;
pub mod client;
pub mod connect;
pub mod controller;
pub mod error;
pub mod mapper;
pub mod record;
pub mod repository;
pub mod row;
pub mod service;
pub mod statement;
pub mod user;
pub mod value;

pub use accessor::{Accessor, BindAccessor, BoxedParam, ReadAccessor, TypeAccessors};
pub use client::GenericClient;
pub use connect::{Connector, LazyClient, PgConnector, connect};
pub use controller::{
    FormParams, PageController, RegisterActionController, SignInActionController, views,
};
pub use error::{OrmError, OrmResult};
pub use mapper::RowMapper;
pub use record::{FieldDescriptor, Record, RecordShape};
pub use repository::{DatabaseUserRepository, UserRepository, WriteErrorPolicy};
pub use row::{ColumnSource, RowExt, ValueRow};
pub use service::{UserService, UserServiceImpl};
pub use statement::{BoundParam, BoundStatement, StatementBuilder, StatementKind};
pub use user::{USERS_TABLE_DDL, User};
pub use value::{Scalar, ScalarType, Value};

pub use user_platform_derive::Record;

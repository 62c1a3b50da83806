//! User service: the operations the controllers call.

use crate::error::OrmResult;
use crate::repository::UserRepository;
use crate::user::User;
use std::future::Future;

pub trait UserService: Send + Sync {
    /// Register a new user.
    fn register(&self, user: &User) -> impl Future<Output = OrmResult<bool>> + Send;

    /// Not supported; always `Ok(false)`.
    fn deregister(&self, user: &User) -> impl Future<Output = OrmResult<bool>> + Send;

    /// Not supported; always `Ok(false)`.
    fn update(&self, user: &User) -> impl Future<Output = OrmResult<bool>> + Send;

    /// Not supported; always `Ok(None)`.
    fn query_user_by_id(&self, id: i64) -> impl Future<Output = OrmResult<Option<User>>> + Send;

    fn query_user_by_name_and_password(
        &self,
        name: &str,
        password: &str,
    ) -> impl Future<Output = OrmResult<Option<User>>> + Send;

    fn list_users(&self) -> impl Future<Output = OrmResult<Vec<User>>> + Send;
}

/// [`UserService`] that forwards to a [`UserRepository`].
#[derive(Debug)]
pub struct UserServiceImpl<R> {
    repository: R,
}

impl<R: UserRepository> UserServiceImpl<R> {
    pub fn new(repository: R) -> Self {
        Self { repository }
    }

    pub fn repository(&self) -> &R {
        &self.repository
    }
}

impl<R: UserRepository> UserService for UserServiceImpl<R> {
    async fn register(&self, user: &User) -> OrmResult<bool> {
        self.repository.save(Some(user)).await
    }

    async fn deregister(&self, _user: &User) -> OrmResult<bool> {
        Ok(false)
    }

    async fn update(&self, _user: &User) -> OrmResult<bool> {
        Ok(false)
    }

    async fn query_user_by_id(&self, _id: i64) -> OrmResult<Option<User>> {
        Ok(None)
    }

    async fn query_user_by_name_and_password(
        &self,
        name: &str,
        password: &str,
    ) -> OrmResult<Option<User>> {
        self.repository.get_by_name_and_password(name, password).await
    }

    async fn list_users(&self) -> OrmResult<Vec<User>> {
        self.repository.get_all().await
    }
}

//! Form-driven controllers for registration and sign-in.
//!
//! A controller takes the submitted form fields and answers with the id of
//! the next view. Errors never cross this boundary: they are logged and
//! turned into the failure view.

use crate::service::UserService;
use crate::user::User;
use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;

/// Next-view identifiers returned by the controllers.
pub mod views {
    pub const REGISTER_SUCCESS: &str = "register-success";
    pub const REGISTER_FAIL: &str = "fail";
    pub const LOGIN_SUCCESS: &str = "login-success";
    pub const LOGIN_FAIL: &str = "login-fail";
}

/// Submitted form fields.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormParams {
    fields: HashMap<String, String>,
}

impl FormParams {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.fields.insert(key.into(), value.into());
        self
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.fields.get(key).map(String::as_str)
    }

    /// The field value, unless it is missing or only whitespace.
    pub fn non_blank(&self, key: &str) -> Option<&str> {
        self.get(key).filter(|v| !v.trim().is_empty())
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for FormParams {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            fields: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

/// A controller bound to one request path.
pub trait PageController: Send + Sync {
    fn path(&self) -> &'static str;

    /// Handle a form submission and return the next view id.
    fn execute(&self, params: &FormParams) -> impl Future<Output = &'static str> + Send;
}

/// `POST /register`
#[derive(Debug)]
pub struct RegisterActionController<S> {
    service: Arc<S>,
}

impl<S: UserService> RegisterActionController<S> {
    pub fn new(service: Arc<S>) -> Self {
        Self { service }
    }
}

impl<S: UserService> PageController for RegisterActionController<S> {
    fn path(&self) -> &'static str {
        "/register"
    }

    async fn execute(&self, params: &FormParams) -> &'static str {
        let (Some(name), Some(password), Some(email), Some(phone_number)) = (
            params.non_blank("name"),
            params.non_blank("password"),
            params.non_blank("email"),
            params.non_blank("phoneNumber"),
        ) else {
            return views::REGISTER_FAIL;
        };

        let user = User::new(name, password, email, phone_number);
        match self.service.register(&user).await {
            Ok(true) => views::REGISTER_SUCCESS,
            Ok(false) => views::REGISTER_FAIL,
            Err(e) => {
                tracing::error!(error = %e, user = %user.name, "registration failed");
                views::REGISTER_FAIL
            }
        }
    }
}

/// `POST /sign-in`
#[derive(Debug)]
pub struct SignInActionController<S> {
    service: Arc<S>,
}

impl<S: UserService> SignInActionController<S> {
    pub fn new(service: Arc<S>) -> Self {
        Self { service }
    }
}

impl<S: UserService> PageController for SignInActionController<S> {
    fn path(&self) -> &'static str {
        "/sign-in"
    }

    async fn execute(&self, params: &FormParams) -> &'static str {
        let (Some(name), Some(password)) = (params.non_blank("name"), params.non_blank("password"))
        else {
            return views::LOGIN_FAIL;
        };

        match self
            .service
            .query_user_by_name_and_password(name, password)
            .await
        {
            Ok(Some(user)) => {
                tracing::info!(user_id = ?user.id, user = %user.name, "login user");
                views::LOGIN_SUCCESS
            }
            Ok(None) => views::LOGIN_FAIL,
            Err(e) => {
                tracing::error!(error = %e, user = %name, "sign-in lookup failed");
                views::LOGIN_FAIL
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn non_blank_filters_whitespace() {
        let params = FormParams::new().with("name", "  ").with("email", "a@x.com");
        assert_eq!(params.non_blank("name"), None);
        assert_eq!(params.non_blank("email"), Some("a@x.com"));
        assert_eq!(params.non_blank("missing"), None);
        assert_eq!(params.get("name"), Some("  "));
    }

    #[test]
    fn collects_from_pairs() {
        let params: FormParams = [("name", "alice"), ("password", "p1")].into_iter().collect();
        assert_eq!(params.get("password"), Some("p1"));
    }
}

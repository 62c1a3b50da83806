//! Controllers and service wired over a scripted client.

mod common;

use common::{ScriptedClient, user_row};
use std::sync::Arc;
use user_platform::{
    DatabaseUserRepository, FormParams, OrmError, PageController, RegisterActionController,
    SignInActionController, User, UserService, UserServiceImpl, views,
};

type Service = UserServiceImpl<DatabaseUserRepository<Arc<ScriptedClient>>>;

fn service() -> (Arc<ScriptedClient>, Arc<Service>) {
    let client = Arc::new(ScriptedClient::new());
    let repo = DatabaseUserRepository::new(client.clone()).unwrap();
    (client, Arc::new(UserServiceImpl::new(repo)))
}

fn registration_form() -> FormParams {
    FormParams::new()
        .with("name", "alice")
        .with("password", "p1")
        .with("email", "a@x.com")
        .with("phoneNumber", "555")
}

#[tokio::test]
async fn register_success() {
    let (client, service) = service();
    let controller = RegisterActionController::new(service);

    assert_eq!(controller.path(), "/register");
    assert_eq!(controller.execute(&registration_form()).await, views::REGISTER_SUCCESS);
    assert_eq!(client.call_count(), 1);
}

#[tokio::test]
async fn register_with_blank_field_fails_without_database_call() {
    let (client, service) = service();
    let controller = RegisterActionController::new(service);

    let form = registration_form().with("email", "   ");
    assert_eq!(controller.execute(&form).await, views::REGISTER_FAIL);

    let form = FormParams::new().with("name", "alice");
    assert_eq!(controller.execute(&form).await, views::REGISTER_FAIL);

    assert_eq!(client.call_count(), 0);
}

#[tokio::test]
async fn register_storage_error_maps_to_fail_view() {
    let (client, service) = service();
    client.push_execute_error(OrmError::Connection("down".into()));
    let controller = RegisterActionController::new(service);

    assert_eq!(controller.execute(&registration_form()).await, views::REGISTER_FAIL);
}

#[tokio::test]
async fn sign_in_success_and_failure() {
    let (client, service) = service();
    let controller = SignInActionController::new(service);
    let form = FormParams::new().with("name", "alice").with("password", "p1");

    client.push_rows(vec![user_row(1, "alice", "p1")]);
    assert_eq!(controller.execute(&form).await, views::LOGIN_SUCCESS);

    client.push_rows(Vec::new());
    assert_eq!(controller.execute(&form).await, views::LOGIN_FAIL);

    client.push_rows(vec![user_row(1, "alice", "p1"), user_row(2, "alice", "p1")]);
    assert_eq!(controller.execute(&form).await, views::LOGIN_FAIL);

    assert_eq!(controller.path(), "/sign-in");
    assert_eq!(client.call_count(), 3);
}

#[tokio::test]
async fn sign_in_without_password_skips_lookup() {
    let (client, service) = service();
    let controller = SignInActionController::new(service);

    let form = FormParams::new().with("name", "alice");
    assert_eq!(controller.execute(&form).await, views::LOGIN_FAIL);
    assert_eq!(client.call_count(), 0);
}

#[tokio::test]
async fn service_stubs_do_not_reach_storage() {
    let (client, service) = service();
    let user = User::new("alice", "p1", "a@x.com", "555");

    assert!(!service.deregister(&user).await.unwrap());
    assert!(!service.update(&user).await.unwrap());
    assert!(service.query_user_by_id(1).await.unwrap().is_none());
    assert_eq!(client.call_count(), 0);
}

#[tokio::test]
async fn service_lists_users() {
    let (client, service) = service();
    client.push_rows(vec![user_row(1, "alice", "p1")]);

    let users = service.list_users().await.unwrap();
    assert_eq!(users.len(), 1);
    assert_eq!(users[0].name, "alice");
}

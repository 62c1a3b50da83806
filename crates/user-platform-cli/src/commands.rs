use crate::cli::{ListArgs, RegisterArgs, SignInArgs};
use crate::config::Settings;
use std::sync::Arc;
use user_platform::{
    DatabaseUserRepository, FormParams, GenericClient, LazyClient, PageController, PgConnector,
    RegisterActionController, SignInActionController, StatementBuilder, TypeAccessors,
    USERS_TABLE_DDL, User, UserService, UserServiceImpl,
};

type Service = UserServiceImpl<DatabaseUserRepository<LazyClient<PgConnector>>>;

fn service(settings: &Settings) -> anyhow::Result<Arc<Service>> {
    let repository = DatabaseUserRepository::new(LazyClient::postgres(&settings.database_url))?
        .write_policy(settings.write_policy);
    Ok(Arc::new(UserServiceImpl::new(repository)))
}

/// Form fields for the flags that were given; absent flags stay absent.
fn form(fields: &[(&str, &Option<String>)]) -> FormParams {
    fields
        .iter()
        .filter_map(|(key, value)| value.as_deref().map(|v| (*key, v)))
        .collect()
}

pub async fn register(settings: &Settings, args: RegisterArgs) -> anyhow::Result<()> {
    let params = form(&[
        ("name", &args.name),
        ("password", &args.password),
        ("email", &args.email),
        ("phoneNumber", &args.phone_number),
    ]);
    let controller = RegisterActionController::new(service(settings)?);
    println!("{}", controller.execute(&params).await);
    Ok(())
}

pub async fn sign_in(settings: &Settings, args: SignInArgs) -> anyhow::Result<()> {
    let params = form(&[("name", &args.name), ("password", &args.password)]);
    let controller = SignInActionController::new(service(settings)?);
    println!("{}", controller.execute(&params).await);
    Ok(())
}

pub async fn list(settings: &Settings, args: ListArgs) -> anyhow::Result<()> {
    let users = service(settings)?.list_users().await?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&users)?);
        return Ok(());
    }

    for user in &users {
        println!("{}", format_user(user));
    }
    tracing::debug!(count = users.len(), "listed users");
    Ok(())
}

fn format_user(user: &User) -> String {
    let id = user.id.map_or_else(|| "-".to_string(), |id| id.to_string());
    format!(
        "{id}\t{}\t{}\t{}",
        user.name, user.email, user.phone_number
    )
}

pub async fn init_schema(settings: &Settings) -> anyhow::Result<()> {
    let client = user_platform::connect(&settings.database_url).await?;
    let stmt = StatementBuilder::new(&TypeAccessors::standard()).build(USERS_TABLE_DDL, Vec::new())?;
    GenericClient::execute(&client, &stmt).await?;
    println!("users table ready");
    Ok(())
}

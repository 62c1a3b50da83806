mod cli;
mod commands;
mod config;
mod logging;

pub async fn run(args: Vec<String>) -> anyhow::Result<()> {
    let cmd = cli::parse_args(&args)?;
    if let cli::Command::Help(topic) = cmd {
        cli::print_help(topic);
        return Ok(());
    }

    dotenvy::dotenv().ok();
    let settings = config::Settings::load(cmd.global())?;
    logging::init(settings.log_filter.as_deref())?;
    if let Some(path) = &settings.config_path {
        tracing::debug!(config = %path.display(), "loaded config file");
    }
    tracing::debug!(write_policy = ?settings.write_policy, "settings resolved");

    match cmd {
        cli::Command::Help(_) => Ok(()),
        cli::Command::Register(args) => commands::register(&settings, args).await,
        cli::Command::SignIn(args) => commands::sign_in(&settings, args).await,
        cli::Command::List(args) => commands::list(&settings, args).await,
        cli::Command::InitSchema(_) => commands::init_schema(&settings).await,
    }
}

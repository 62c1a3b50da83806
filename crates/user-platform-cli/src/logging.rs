use tracing_subscriber::EnvFilter;

const DEFAULT_FILTER: &str = "info";

/// Install the global `tracing` subscriber.
///
/// `RUST_LOG` wins over `config_filter`; without either, `info` is used.
/// Logs go to stderr so command output on stdout stays machine-readable.
pub fn init(config_filter: Option<&str>) -> anyhow::Result<()> {
    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::try_new(config_filter.unwrap_or(DEFAULT_FILTER))
            .map_err(|e| anyhow::anyhow!("invalid logging.filter: {e}"))?,
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(true)
        .try_init()
        .map_err(|e| anyhow::anyhow!("failed to install tracing subscriber: {e}"))
}

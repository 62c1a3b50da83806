use crate::cli::GlobalArgs;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use user_platform::WriteErrorPolicy;

pub const DEFAULT_CONFIG_FILE: &str = "user-platform.toml";

#[derive(Debug, Clone)]
pub struct ProjectConfig {
    pub config_path: PathBuf,
    pub file: ConfigFile,
}

impl ProjectConfig {
    pub fn load(config_path: PathBuf) -> anyhow::Result<Self> {
        let raw = std::fs::read_to_string(&config_path).map_err(|e| {
            anyhow::anyhow!(
                "failed to read config file {}: {e}",
                config_path.display()
            )
        })?;

        let file = ConfigFile::parse(&raw, |key| std::env::var(key).ok()).map_err(|e| {
            anyhow::anyhow!(
                "invalid config file {}: {e:#}",
                config_path.display()
            )
        })?;

        Ok(Self { config_path, file })
    }

    /// Load `explicit` if given, otherwise the default file when it exists.
    pub fn discover(explicit: Option<&Path>) -> anyhow::Result<Option<Self>> {
        match explicit {
            Some(path) => Self::load(path.to_path_buf()).map(Some),
            None => {
                let path = PathBuf::from(DEFAULT_CONFIG_FILE);
                if path.is_file() {
                    Self::load(path).map(Some)
                } else {
                    Ok(None)
                }
            }
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ConfigFile {
    pub version: String,

    pub database: DatabaseConfig,

    #[serde(default)]
    pub repository: RepositoryConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    pub url: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RepositoryConfig {
    #[serde(default)]
    pub write_error_policy: WriteErrorPolicy,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct LoggingConfig {
    pub filter: Option<String>,
}

impl ConfigFile {
    /// Parse, expand `${VAR}` references through `lookup`, and validate.
    pub fn parse(
        raw: &str,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> anyhow::Result<Self> {
        let mut file: ConfigFile =
            toml::from_str(raw).map_err(|e| anyhow::anyhow!("failed to parse TOML: {e}"))?;
        file.expand_env(&lookup)?;
        file.validate()?;
        Ok(file)
    }

    fn expand_env(&mut self, lookup: &impl Fn(&str) -> Option<String>) -> anyhow::Result<()> {
        self.database.url = expand_env_vars(&self.database.url, lookup)?;
        if let Some(filter) = self.logging.filter.as_mut() {
            *filter = expand_env_vars(filter, lookup)?;
        }
        Ok(())
    }

    fn validate(&self) -> anyhow::Result<()> {
        if self.version.trim() != "1" {
            anyhow::bail!("unsupported config version: {}", self.version);
        }
        if self.database.url.trim().is_empty() {
            anyhow::bail!("database.url must not be empty");
        }
        if let Some(filter) = &self.logging.filter {
            if filter.trim().is_empty() {
                anyhow::bail!("logging.filter must not be empty when set");
            }
        }
        Ok(())
    }
}

fn expand_env_vars(
    input: &str,
    lookup: &impl Fn(&str) -> Option<String>,
) -> anyhow::Result<String> {
    let mut out = String::with_capacity(input.len());
    let mut chars = input.chars().peekable();

    while let Some(c) = chars.next() {
        if c == '$' && chars.peek() == Some(&'{') {
            chars.next(); // consume '{'

            let mut key = String::new();
            let mut closed = false;
            for ch in chars.by_ref() {
                if ch == '}' {
                    closed = true;
                    break;
                }
                key.push(ch);
            }

            if !closed {
                anyhow::bail!("unterminated env var reference: ${{{key}");
            }
            if key.is_empty() {
                anyhow::bail!("invalid env var reference: ${{}}");
            }

            let v = lookup(&key)
                .ok_or_else(|| anyhow::anyhow!("missing env var for config expansion: {key}"))?;
            out.push_str(&v);
            continue;
        }

        out.push(c);
    }

    Ok(out)
}

/// Everything a command needs, after config, flags and environment are merged.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub database_url: String,
    pub write_policy: WriteErrorPolicy,
    pub log_filter: Option<String>,
    /// The config file the settings came from, if any.
    pub config_path: Option<PathBuf>,
}

impl Settings {
    pub fn load(global: &GlobalArgs) -> anyhow::Result<Self> {
        let project = ProjectConfig::discover(global.config.as_deref())?;
        let config_path = project.as_ref().map(|p| p.config_path.clone());
        let mut settings = Self::resolve(
            project.map(|p| p.file),
            global.database.clone(),
            std::env::var("DATABASE_URL").ok(),
        )?;
        settings.config_path = config_path;
        Ok(settings)
    }

    /// Precedence for the database URL: `--database`, then `database.url`,
    /// then `DATABASE_URL`.
    pub fn resolve(
        file: Option<ConfigFile>,
        database_override: Option<String>,
        env_database_url: Option<String>,
    ) -> anyhow::Result<Self> {
        let (file_url, write_policy, log_filter) = match file {
            Some(f) => (
                Some(f.database.url),
                f.repository.write_error_policy,
                f.logging.filter,
            ),
            None => (None, WriteErrorPolicy::default(), None),
        };

        let Some(database_url) = database_override
            .or(file_url)
            .or(env_database_url)
            .filter(|u| !u.trim().is_empty())
        else {
            anyhow::bail!(
                "no database configured: pass --database, set DATABASE_URL, or create {DEFAULT_CONFIG_FILE}"
            );
        };

        Ok(Self {
            database_url,
            write_policy,
            log_filter,
            config_path: None,
        })
    }
}

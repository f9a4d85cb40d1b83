use std::{path::PathBuf, time::Duration};

use clap::{Args, Parser};
use roster_db::object_id::UserId;
use roster_store::{Backend, ProviderConfig, RestConfig};

use crate::{cmd::Command, tracing_config::LogFormat, Error, Result};

fn parse_backend(s: &str) -> Result<Backend, String> {
    s.parse::<Backend>().map_err(|e| e.to_string())
}

#[derive(Debug, Parser)]
#[clap(name = "roster", version, about = "Manage team rosters")]
pub struct Cli {
    #[clap(flatten)]
    pub config: Config,

    #[clap(subcommand)]
    pub command: Command,
}

#[derive(Debug, Args)]
pub struct Config {
    /// Base URL of the hosted database and auth service
    #[clap(long, env = "ROSTER_URL", global = true)]
    pub url: Option<String>,

    /// The project's public API key
    #[clap(long, env = "ROSTER_ANON_KEY", hide_env_values = true, global = true)]
    pub anon_key: Option<String>,

    /// Connect to the database directly instead of through the REST API
    #[clap(long = "db", env = "DATABASE_URL", hide_env_values = true, global = true)]
    pub database_url: Option<String>,

    /// rest, postgres, or memory. Defaults to postgres when a database URL is set.
    #[clap(long, env = "ROSTER_BACKEND", value_parser = parse_backend, global = true)]
    pub backend: Option<Backend>,

    /// The user that owns the teams when connecting to the database directly
    #[clap(long, env = "ROSTER_USER_ID", global = true)]
    pub user_id: Option<UserId>,

    /// Where to keep the session between runs
    #[clap(long, env = "ROSTER_SESSION_FILE", global = true)]
    pub session_file: Option<PathBuf>,

    #[clap(long, env = "ROSTER_LOG_FORMAT", value_enum, default_value_t = LogFormat::Tree, global = true)]
    pub log_format: LogFormat,

    /// Request timeout in seconds
    #[clap(long, env = "ROSTER_TIMEOUT", default_value_t = 30, global = true)]
    pub timeout: u64,

    #[clap(long, env = "ROSTER_MAX_CONNECTIONS", default_value_t = 4, global = true)]
    pub max_connections: usize,
}

impl Config {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout)
    }

    pub fn backend(&self) -> Backend {
        match (self.backend, &self.database_url) {
            (Some(backend), _) => backend,
            (None, Some(_)) => Backend::Postgres,
            (None, None) => Backend::Rest,
        }
    }

    pub fn session_file(&self) -> PathBuf {
        self.session_file.clone().unwrap_or_else(|| {
            std::env::var_os("HOME")
                .map(PathBuf::from)
                .unwrap_or_default()
                .join(".roster")
                .join("session.json")
        })
    }

    pub fn rest_config(&self) -> Result<RestConfig> {
        let url = self
            .url
            .clone()
            .ok_or_else(|| Error::Config("ROSTER_URL is not set".to_string()))?;
        let anon_key = self
            .anon_key
            .clone()
            .ok_or_else(|| Error::Config("ROSTER_ANON_KEY is not set".to_string()))?;

        Ok(RestConfig {
            url,
            anon_key,
            timeout: self.timeout(),
        })
    }

    pub fn provider_config(&self) -> Result<ProviderConfig> {
        match self.backend() {
            Backend::Rest => Ok(ProviderConfig::Rest(self.rest_config()?)),
            Backend::Postgres => {
                let database_url = self
                    .database_url
                    .clone()
                    .ok_or_else(|| Error::Config("DATABASE_URL is not set".to_string()))?;
                Ok(ProviderConfig::Postgres {
                    database_url,
                    max_connections: self.max_connections,
                })
            }
            Backend::Memory => Ok(ProviderConfig::Memory),
        }
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    #[test]
    fn backend_selection() {
        let mut config = Cli::try_parse_from(["roster", "--backend", "rest", "whoami"])
            .unwrap()
            .config;
        config.url = None;
        assert_eq!(config.backend(), Backend::Rest);
        assert_matches!(config.provider_config(), Err(Error::Config(_)));

        let mut config =
            Cli::try_parse_from(["roster", "--db", "postgres://localhost/roster", "whoami"])
                .unwrap()
                .config;
        config.backend = None;
        assert_eq!(config.backend(), Backend::Postgres);

        let cli = Cli::try_parse_from(["roster", "teams", "list", "--backend", "memory"]).unwrap();
        assert_matches!(cli.command, Command::Teams(_));
        assert_matches!(cli.config.provider_config(), Ok(ProviderConfig::Memory));
    }

    #[test]
    fn rejects_unknown_backend() {
        assert!(Cli::try_parse_from(["roster", "--backend", "s3", "whoami"]).is_err());
    }

    #[test]
    fn rejects_unknown_flags() {
        assert!(Cli::try_parse_from(["roster", "--env", "development", "whoami"]).is_err());
    }

    #[test]
    fn rest_config() {
        let config = Cli::try_parse_from([
            "roster",
            "--url",
            "https://example.test",
            "--anon-key",
            "anon",
            "--timeout",
            "5",
            "whoami",
        ])
        .unwrap()
        .config;
        let rest = config.rest_config().unwrap();
        assert_eq!(rest.url, "https://example.test");
        assert_eq!(rest.timeout, Duration::from_secs(5));
    }
}

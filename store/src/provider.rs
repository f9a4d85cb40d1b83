use std::{str::FromStr, sync::Arc, time::Duration};

use roster_auth::SessionContext;

use crate::{Error, MemoryStore, PostgresStore, PostgrestStore, RosterStore};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Backend {
    Rest,
    Postgres,
    Memory,
}

impl FromStr for Backend {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "rest" => Ok(Backend::Rest),
            "postgres" => Ok(Backend::Postgres),
            "memory" => Ok(Backend::Memory),
            _ => Err(Error::UnsupportedBackend(s.to_string())),
        }
    }
}

#[derive(Debug, Clone)]
pub struct RestConfig {
    /// Base URL of the hosted project, without the `/rest/v1` suffix.
    pub url: String,
    pub anon_key: String,
    pub timeout: Duration,
}

#[derive(Debug, Clone)]
pub enum ProviderConfig {
    Rest(RestConfig),
    Postgres {
        database_url: String,
        max_connections: usize,
    },
    Memory,
}

impl ProviderConfig {
    pub fn backend(&self) -> Backend {
        match self {
            ProviderConfig::Rest(_) => Backend::Rest,
            ProviderConfig::Postgres { .. } => Backend::Postgres,
            ProviderConfig::Memory => Backend::Memory,
        }
    }
}

/// Create the store for a configuration. Every backend reads the signed-in user from
/// `session`.
pub fn create_store(
    config: ProviderConfig,
    session: SessionContext,
) -> Result<Arc<dyn RosterStore>, Error> {
    let store: Arc<dyn RosterStore> = match config {
        ProviderConfig::Rest(config) => Arc::new(PostgrestStore::new(&config, session)?),
        ProviderConfig::Postgres {
            database_url,
            max_connections,
        } => {
            let pool = roster_db::connect(&database_url, max_connections)
                .map_err(|e| Error::Failure {
                    code: None,
                    message: e.to_string(),
                })?;
            Arc::new(PostgresStore::new(pool, session))
        }
        ProviderConfig::Memory => Arc::new(MemoryStore::new(session)),
    };

    Ok(store)
}

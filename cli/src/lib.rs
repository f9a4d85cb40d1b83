pub mod cmd;
pub mod config;
pub mod confirm;
pub mod error;
pub mod ops;
pub mod session;
pub mod shared_state;
pub mod tracing_config;

use std::io::{BufRead, Write};

pub use error::{Error, Result};

use roster_auth::{Session, SessionContext, SessionFile};
use roster_store::{create_store, Backend};
use tracing::{event, Level};

use crate::{
    cmd::Command,
    config::Config,
    session::{restore_session, SessionPersistence},
    shared_state::{InnerState, State},
};

/// Set up the store and session for the configured backend. The REST backend uses the
/// session saved by `roster login`; the others act as the configured user.
pub async fn create_state(config: &Config) -> Result<(State, Option<SessionPersistence>)> {
    let (session, persistence) = match config.backend() {
        Backend::Rest => {
            let auth = cmd::auth::auth_client(config)?;
            let (session, persistence) =
                restore_session(&auth, SessionFile::new(config.session_file())).await?;
            (session, Some(persistence))
        }
        Backend::Postgres => (
            SessionContext::new(config.user_id.map(Session::local)),
            None,
        ),
        Backend::Memory => (
            SessionContext::new(Some(Session::local(config.user_id.unwrap_or_default()))),
            None,
        ),
    };

    let store = create_store(config.provider_config()?, session.clone())?;
    event!(Level::DEBUG, backend = ?config.backend(), signed_in = session.is_signed_in(), "Created store");
    Ok((InnerState::new(store, session), persistence))
}

/// Run a command against an existing state.
pub async fn run_with_state(
    state: &State,
    command: Command,
    out: &mut dyn Write,
    input: &mut dyn BufRead,
) -> Result<()> {
    match command {
        Command::Teams(args) => cmd::teams::teams_command(state, args, out, input).await,
        Command::Players(args) => cmd::players::players_command(state, args, out, input).await,
        Command::Import(args) => cmd::transfer::import(state, args, out).await,
        Command::Export(args) => cmd::transfer::export(state, args, out).await,
        Command::Login(_) | Command::Logout | Command::Whoami | Command::Migrate => Err(
            Error::Config("this command does not work with teams or players".to_string()),
        ),
    }
}

pub async fn run(
    config: Config,
    command: Command,
    out: &mut dyn Write,
    input: &mut dyn BufRead,
) -> Result<()> {
    match command {
        Command::Login(args) => cmd::auth::login(&config, args, out, input).await,
        Command::Logout => cmd::auth::logout(&config, out).await,
        Command::Whoami => cmd::auth::whoami(&config, out).await,
        Command::Migrate => cmd::migrate::migrate(&config, out).await,
        command => {
            let (state, persistence) = create_state(&config).await?;
            let result = run_with_state(&state, command, out, input).await;

            // Save a refreshed token even when the command failed.
            if let Some(persistence) = persistence {
                persistence.flush().await?;
            }
            result
        }
    }
}

use std::io::{BufRead, Write};

use clap::Args;
use roster_auth::{AuthClient, AuthEvent, SessionContext, SessionFile};
use roster_store::Backend;
use tracing::{event, Level};

use crate::{
    config::Config,
    session::{restore_session, SessionPersistence},
    Result,
};

#[derive(Debug, Args)]
pub struct LoginArgs {
    #[clap(long, env = "ROSTER_EMAIL")]
    pub email: String,
    /// Read from standard input when not given
    #[clap(long, env = "ROSTER_PASSWORD", hide_env_values = true)]
    pub password: Option<String>,
}

pub fn auth_client(config: &Config) -> Result<AuthClient> {
    let rest = config.rest_config()?;
    Ok(AuthClient::new(&rest.url, rest.anon_key, rest.timeout)?)
}

pub async fn login(
    config: &Config,
    args: LoginArgs,
    out: &mut dyn Write,
    input: &mut dyn BufRead,
) -> Result<()> {
    let auth = auth_client(config)?;
    let password = match args.password {
        Some(password) => password,
        None => {
            write!(out, "Passwort: ")?;
            out.flush()?;
            super::read_line(input)?
        }
    };

    let context = SessionContext::new(None);
    let persistence =
        SessionPersistence::attach(&context, SessionFile::new(config.session_file()));

    let session = auth.sign_in_with_password(&args.email, &password).await?;
    let email = session
        .user
        .email
        .clone()
        .unwrap_or_else(|| args.email.clone());
    context.set(AuthEvent::SignedIn, session);
    persistence.flush().await?;

    writeln!(out, "Angemeldet als {email}")?;
    Ok(())
}

pub async fn logout(config: &Config, out: &mut dyn Write) -> Result<()> {
    let auth = auth_client(config)?;
    let (context, persistence) =
        restore_session(&auth, SessionFile::new(config.session_file())).await?;

    if let Some(session) = context.current() {
        // The local session is dropped even if the provider can't be reached.
        if let Err(e) = auth.sign_out(&session).await {
            event!(Level::WARN, error = %e, "Error signing out at the provider");
        }
        context.clear();
    }
    persistence.flush().await?;

    writeln!(out, "Abgemeldet")?;
    Ok(())
}

pub async fn whoami(config: &Config, out: &mut dyn Write) -> Result<()> {
    if config.backend() != Backend::Rest {
        match config.user_id {
            Some(user_id) => writeln!(out, "{user_id}")?,
            None => writeln!(out, "Nicht angemeldet")?,
        }
        return Ok(());
    }

    let auth = auth_client(config)?;
    let (context, persistence) =
        restore_session(&auth, SessionFile::new(config.session_file())).await?;
    persistence.flush().await?;

    match context.current() {
        Some(session) => writeln!(
            out,
            "{} ({})",
            session.user.email.as_deref().unwrap_or("-"),
            session.user.id
        )?,
        None => writeln!(out, "Nicht angemeldet")?,
    }
    Ok(())
}

use std::sync::{Arc, Mutex, PoisonError};

use chrono::{Duration, Utc};
use roster_auth::{AuthClient, AuthEvent, ListenerGuard, Session, SessionContext, SessionFile};
use tracing::{event, instrument, Level};

use crate::Result;

/// Refresh the access token when it expires within this margin.
const REFRESH_MARGIN_SECS: i64 = 60;

/// Records auth state changes so that they can be written to the session file once the
/// command is done.
pub struct SessionPersistence {
    file: SessionFile,
    changed: Arc<Mutex<Option<Option<Session>>>>,
    _guard: ListenerGuard,
}

impl std::fmt::Debug for SessionPersistence {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionPersistence")
            .field("file", &self.file)
            .finish_non_exhaustive()
    }
}

impl SessionPersistence {
    pub fn attach(session: &SessionContext, file: SessionFile) -> Self {
        let changed = Arc::new(Mutex::new(None));
        let guard = {
            let changed = changed.clone();
            session.on_change(move |event, session| {
                event!(Level::DEBUG, ?event, "Session changed");
                *changed.lock().unwrap_or_else(PoisonError::into_inner) = Some(session.cloned());
            })
        };

        SessionPersistence {
            file,
            changed,
            _guard: guard,
        }
    }

    /// Write the latest session, or remove the file after signing out.
    pub async fn flush(&self) -> Result<()> {
        let change = self
            .changed
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();

        match change {
            Some(Some(session)) => self.file.save(&session).await?,
            Some(None) => self.file.remove().await?,
            None => {}
        }

        Ok(())
    }
}

/// Load the saved session into a new context, refreshing the token if it is about to expire.
/// A session that can no longer be refreshed is discarded.
#[instrument(skip_all, fields(path = %file.path().display()))]
pub async fn restore_session(
    auth: &AuthClient,
    file: SessionFile,
) -> Result<(SessionContext, SessionPersistence)> {
    let saved = file.load().await?;
    let context = SessionContext::new(saved.clone());
    let persistence = SessionPersistence::attach(&context, file);

    if let Some(session) = saved {
        if session.expires_within(Utc::now(), Duration::seconds(REFRESH_MARGIN_SECS)) {
            match auth.refresh(&session).await {
                Ok(refreshed) => context.set(AuthEvent::TokenRefreshed, refreshed),
                Err(e) => {
                    event!(Level::WARN, error = %e, "Could not refresh session");
                    context.clear();
                }
            }
        }
    }

    Ok((context, persistence))
}

#[cfg(test)]
mod tests {
    use roster_db::object_id::UserId;

    use super::*;

    #[tokio::test]
    async fn flush_writes_latest_change() {
        let dir = temp_dir::TempDir::new().unwrap();
        let file = SessionFile::new(dir.child("session.json"));
        let context = SessionContext::new(None);
        let persistence = SessionPersistence::attach(&context, file.clone());

        // Nothing changed yet.
        persistence.flush().await.unwrap();
        assert_eq!(file.load().await.unwrap(), None);

        let session = Session::local(UserId::new());
        context.set(AuthEvent::SignedIn, session.clone());
        persistence.flush().await.unwrap();
        assert_eq!(file.load().await.unwrap(), Some(session));

        context.clear();
        persistence.flush().await.unwrap();
        assert_eq!(file.load().await.unwrap(), None);
    }

    #[test]
    fn dropping_persistence_unsubscribes() {
        let context = SessionContext::new(None);
        let persistence = SessionPersistence::attach(&context, SessionFile::new("unused.json"));
        assert_eq!(context.listener_count(), 1);
        drop(persistence);
        assert_eq!(context.listener_count(), 0);
    }
}

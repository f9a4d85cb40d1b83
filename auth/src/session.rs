use std::sync::{
    atomic::{AtomicU64, Ordering},
    Arc, Mutex, MutexGuard, PoisonError, RwLock,
};

use chrono::{DateTime, Duration, Utc};
use roster_db::object_id::UserId;
use serde::{Deserialize, Serialize};
use tracing::{event, Level};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionUser {
    pub id: UserId,
    pub email: Option<String>,
}

/// A signed-in user and the tokens that authenticate requests on their behalf.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub user: SessionUser,
    pub access_token: Option<String>,
    pub refresh_token: Option<String>,
    pub expires_at: Option<DateTime<Utc>>,
}

impl Session {
    /// A session for a user that is already known, such as when talking to the database
    /// directly. It carries no tokens.
    pub fn local(user_id: UserId) -> Self {
        Session {
            user: SessionUser {
                id: user_id,
                email: None,
            },
            access_token: None,
            refresh_token: None,
            expires_at: None,
        }
    }

    pub fn user_id(&self) -> UserId {
        self.user.id
    }

    /// True if the access token expires within `margin` of `now`.
    pub fn expires_within(&self, now: DateTime<Utc>, margin: Duration) -> bool {
        self.expires_at
            .map(|expires| expires <= now + margin)
            .unwrap_or(false)
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum AuthEvent {
    SignedIn,
    TokenRefreshed,
    SignedOut,
}

type Listener = Arc<dyn Fn(AuthEvent, Option<&Session>) + Send + Sync>;

#[derive(Default)]
struct Inner {
    session: RwLock<Option<Session>>,
    listeners: Mutex<Vec<(u64, Listener)>>,
    next_listener_id: AtomicU64,
}

/// Holds the current session for everything that needs to make authenticated requests.
///
/// Clones share the same state. Components that react to sign-in and sign-out register a
/// listener with [SessionContext::on_change] and keep the returned guard for as long as they
/// are interested; dropping the guard removes the listener.
#[derive(Clone, Default)]
pub struct SessionContext {
    inner: Arc<Inner>,
}

impl std::fmt::Debug for SessionContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionContext")
            .field("user", &self.current().map(|s| s.user))
            .field("listeners", &self.listener_count())
            .finish()
    }
}

fn lock<T>(m: &Mutex<T>) -> MutexGuard<'_, T> {
    m.lock().unwrap_or_else(PoisonError::into_inner)
}

impl SessionContext {
    pub fn new(session: Option<Session>) -> Self {
        let ctx = SessionContext::default();
        *ctx.inner.session.write().unwrap_or_else(PoisonError::into_inner) = session;
        ctx
    }

    pub fn current(&self) -> Option<Session> {
        self.inner
            .session
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn user_id(&self) -> Option<UserId> {
        self.inner
            .session
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .as_ref()
            .map(|s| s.user.id)
    }

    pub fn access_token(&self) -> Option<String> {
        self.inner
            .session
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .as_ref()
            .and_then(|s| s.access_token.clone())
    }

    pub fn is_signed_in(&self) -> bool {
        self.user_id().is_some()
    }

    /// Replace the current session and notify listeners.
    pub fn set(&self, event: AuthEvent, session: Session) {
        *self
            .inner
            .session
            .write()
            .unwrap_or_else(PoisonError::into_inner) = Some(session.clone());
        event!(Level::DEBUG, ?event, user = %session.user.id, "Auth state changed");
        self.notify(event, Some(&session));
    }

    /// Forget the current session and notify listeners.
    pub fn clear(&self) {
        let previous = self
            .inner
            .session
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
        if previous.is_some() {
            event!(Level::DEBUG, "Signed out");
            self.notify(AuthEvent::SignedOut, None);
        }
    }

    /// Register a listener for auth state changes. The listener stays registered until the
    /// returned guard is dropped.
    #[must_use = "the listener is removed when the guard is dropped"]
    pub fn on_change<F>(&self, listener: F) -> ListenerGuard
    where
        F: Fn(AuthEvent, Option<&Session>) + Send + Sync + 'static,
    {
        let id = self.inner.next_listener_id.fetch_add(1, Ordering::Relaxed);
        lock(&self.inner.listeners).push((id, Arc::new(listener)));
        ListenerGuard {
            id,
            inner: Arc::downgrade(&self.inner),
        }
    }

    pub fn listener_count(&self) -> usize {
        lock(&self.inner.listeners).len()
    }

    fn notify(&self, event: AuthEvent, session: Option<&Session>) {
        // Call listeners outside the lock so that a listener can drop its own guard.
        let listeners = lock(&self.inner.listeners)
            .iter()
            .map(|(_, l)| l.clone())
            .collect::<Vec<_>>();
        for listener in listeners {
            listener(event, session);
        }
    }
}

/// Unregisters its listener when dropped.
#[derive(Debug)]
pub struct ListenerGuard {
    id: u64,
    inner: std::sync::Weak<Inner>,
}

impl Drop for ListenerGuard {
    fn drop(&mut self) {
        if let Some(inner) = self.inner.upgrade() {
            lock(&inner.listeners).retain(|(id, _)| *id != self.id);
        }
    }
}

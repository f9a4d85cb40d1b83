use std::sync::Arc;

use roster_auth::SessionContext;
use roster_db::object_id::UserId;
use roster_store::RosterStore;

use crate::{Error, Result};

#[derive(Debug)]
pub struct InnerState {
    pub store: Arc<dyn RosterStore>,
    pub session: SessionContext,
}

pub type State = Arc<InnerState>;

impl InnerState {
    pub fn new(store: Arc<dyn RosterStore>, session: SessionContext) -> State {
        Arc::new(InnerState {
            store,
            session,
        })
    }

    /// The signed-in user. Every roster operation needs one.
    pub fn require_user(&self) -> Result<UserId> {
        self.session.user_id().ok_or(Error::Unauthenticated)
    }
}

pub mod players;
pub mod teams;
pub mod transfer;

use tracing::{event, instrument, Level};

use crate::{
    confirm::{DeleteFlow, DeleteTarget},
    shared_state::State,
    Error, Result,
};

/// Carry out the pending delete, if there is one, and return what was deleted.
#[instrument(skip(state))]
pub async fn confirm_delete(state: &State, flow: &mut DeleteFlow) -> Result<Option<DeleteTarget>> {
    let Some(target) = flow.confirm() else {
        return Ok(None);
    };

    state.require_user()?;
    let result = match &target {
        DeleteTarget::Team { id, .. } => state.store.delete_team(id).await,
        DeleteTarget::Player { id, .. } => state.store.delete_player(*id).await,
    };

    if let Err(e) = result {
        event!(Level::ERROR, error = %e, ?target, "Error deleting");
        return Err(Error::from(e));
    }

    Ok(Some(target))
}

use roster_db::{
    object_id::TeamId,
    teams::{find_by_name, NewTeam, Team},
};
use tracing::{event, instrument, Level};

use crate::{
    confirm::{DeleteFlow, DeleteTarget},
    error::TEAM_NAME_REQUIRED,
    shared_state::State,
    Error, Result,
};

fn log_store_error(action: &str, e: &roster_store::Error) {
    if !e.is_conflict() {
        event!(Level::ERROR, error = %e, "Error {action}");
    }
}

#[instrument(skip(state))]
pub async fn list_teams(state: &State) -> Result<Vec<Team>> {
    state.require_user()?;
    state.store.list_teams().await.map_err(|e| {
        log_store_error("fetching teams", &e);
        Error::from(e)
    })
}

#[instrument(skip(state))]
pub async fn create_team(state: &State, name: &str) -> Result<Team> {
    let user_id = state.require_user()?;
    let name = name.trim();
    if name.is_empty() {
        return Err(Error::Validation(TEAM_NAME_REQUIRED));
    }

    let team = state
        .store
        .create_team(NewTeam::from_name(name, user_id))
        .await
        .map_err(|e| {
            log_store_error("creating team", &e);
            Error::from(e)
        })?;

    event!(Level::INFO, team = %team.id, "Created team");
    Ok(team)
}

#[instrument(skip(state))]
pub async fn rename_team(state: &State, team_id: &TeamId, name: &str) -> Result<Team> {
    state.require_user()?;
    let name = name.trim();
    if name.is_empty() {
        return Err(Error::Validation(TEAM_NAME_REQUIRED));
    }

    state.store.rename_team(team_id, name).await.map_err(|e| {
        log_store_error("updating team", &e);
        Error::from(e)
    })
}

/// Look up a team by its ID or, failing that, by its name.
#[instrument(skip(state))]
pub async fn find_team(state: &State, id_or_name: &str) -> Result<Team> {
    let teams = list_teams(state).await?;
    let wanted = id_or_name.trim();
    teams
        .iter()
        .find(|t| t.id.as_str() == wanted)
        .or_else(|| find_by_name(&teams, wanted))
        .cloned()
        .ok_or_else(|| Error::UnknownTeam(wanted.to_string()))
}

/// Start deleting a team. The prompt warns when the team still has players.
#[instrument(skip(state, flow))]
pub async fn request_team_delete(state: &State, flow: &mut DeleteFlow, team: &Team) -> Result<()> {
    state.require_user()?;
    let has_players = state
        .store
        .team_has_players(&team.id)
        .await
        .map_err(|e| {
            log_store_error("checking team players", &e);
            Error::from(e)
        })?;

    flow.request(DeleteTarget::Team {
        id: team.id.clone(),
        name: team.name.clone(),
        has_players,
    });
    Ok(())
}

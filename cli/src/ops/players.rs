use roster_convert::parse_jersey_number;
use roster_db::{
    object_id::{PlayerId, TeamId},
    players::{NewPlayer, Player, PlayerUpdate},
    Position,
};
use tracing::{event, instrument, Level};

use crate::{
    confirm::{DeleteFlow, DeleteTarget},
    error::NAMES_REQUIRED,
    shared_state::State,
    Error, Result,
};

/// The fields of the player form. The jersey number is the raw text the user entered.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PlayerInput {
    pub first_name: String,
    pub last_name: String,
    pub position: Position,
    pub jersey_number: Option<String>,
}

impl PlayerInput {
    pub fn from_player(player: &Player) -> Self {
        PlayerInput {
            first_name: player.first_name.clone(),
            last_name: player.last_name.clone(),
            position: player.position,
            jersey_number: player.jersey_number.map(|n| n.to_string()),
        }
    }

    /// Check the required fields and clean up the values for storage.
    pub fn validate(&self) -> Result<PlayerUpdate> {
        let first_name = self.first_name.trim();
        let last_name = self.last_name.trim();
        if first_name.is_empty() || last_name.is_empty() {
            return Err(Error::Validation(NAMES_REQUIRED));
        }

        Ok(PlayerUpdate {
            first_name: first_name.to_string(),
            last_name: last_name.to_string(),
            position: self.position,
            jersey_number: self.jersey_number.as_deref().and_then(parse_jersey_number),
        })
    }
}

#[instrument(skip(state))]
pub async fn list_players(state: &State, team_id: &TeamId) -> Result<Vec<Player>> {
    state.require_user()?;
    state.store.list_players(team_id).await.map_err(|e| {
        event!(Level::ERROR, error = %e, "Error fetching players");
        Error::from(e)
    })
}

#[instrument(skip(state))]
pub async fn get_player(state: &State, player_id: PlayerId) -> Result<Player> {
    state.require_user()?;
    Ok(state.store.get_player(player_id).await?)
}

#[instrument(skip(state))]
pub async fn create_player(state: &State, team_id: &TeamId, input: &PlayerInput) -> Result<Player> {
    state.require_user()?;
    let fields = input.validate()?;
    let player = NewPlayer {
        team_id: team_id.clone(),
        first_name: fields.first_name,
        last_name: fields.last_name,
        position: fields.position,
        jersey_number: fields.jersey_number,
        birth_date: None,
    };

    let inserted = state.store.insert_players(vec![player]).await.map_err(|e| {
        event!(Level::ERROR, error = %e, "Error creating player");
        Error::from(e)
    })?;

    inserted
        .into_iter()
        .next()
        .ok_or(Error::Store(roster_store::Error::NotFound))
}

#[instrument(skip(state))]
pub async fn update_player(
    state: &State,
    player_id: PlayerId,
    input: &PlayerInput,
) -> Result<Player> {
    state.require_user()?;
    let update = input.validate()?;
    state
        .store
        .update_player(player_id, update)
        .await
        .map_err(|e| {
            event!(Level::ERROR, error = %e, "Error updating player");
            Error::from(e)
        })
}

#[instrument(skip(state, flow))]
pub async fn request_player_delete(
    state: &State,
    flow: &mut DeleteFlow,
    player_id: PlayerId,
) -> Result<()> {
    let player = get_player(state, player_id).await?;
    flow.request(DeleteTarget::Player {
        id: player.id,
        name: player.display_name(),
    });
    Ok(())
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    fn input(first_name: &str, last_name: &str, jersey_number: Option<&str>) -> PlayerInput {
        PlayerInput {
            first_name: first_name.to_string(),
            last_name: last_name.to_string(),
            position: Position::Defense,
            jersey_number: jersey_number.map(String::from),
        }
    }

    #[test]
    fn validate_trims_names() {
        let update = input("  Jane ", " Doe", Some(" 12 ")).validate().unwrap();
        assert_eq!(update.first_name, "Jane");
        assert_eq!(update.last_name, "Doe");
        assert_eq!(update.jersey_number, Some(12));
    }

    #[test]
    fn validate_requires_names() {
        assert_matches!(
            input("Jane", "   ", None).validate(),
            Err(Error::Validation(NAMES_REQUIRED))
        );
        assert_matches!(
            input("", "Doe", None).validate(),
            Err(Error::Validation(NAMES_REQUIRED))
        );
    }

    #[test]
    fn invalid_jersey_is_none() {
        let update = input("Jane", "Doe", Some("zwölf")).validate().unwrap();
        assert_eq!(update.jersey_number, None);
    }
}

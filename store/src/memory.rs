use async_trait::async_trait;
use chrono::Utc;
use roster_auth::SessionContext;
use roster_db::{
    object_id::{PlayerId, TeamId, UserId},
    players::{sort_by_jersey, NewPlayer, Player, PlayerUpdate, PlayerWithTeam},
    teams::{NewTeam, Team},
};
use tokio::sync::Mutex;
use tracing::instrument;

use crate::{Error, Result, RosterStore, UNIQUE_VIOLATION};

const CHECK_VIOLATION: &str = "23514";

#[derive(Debug, Default)]
struct State {
    teams: Vec<Team>,
    players: Vec<Player>,
}

impl State {
    fn owns_team(&self, user_id: UserId, team_id: &TeamId) -> bool {
        self.teams
            .iter()
            .any(|t| &t.id == team_id && t.user_id == user_id)
    }

    fn owned_player_mut(&mut self, user_id: UserId, player_id: PlayerId) -> Option<&mut Player> {
        let teams = &self.teams;
        self.players.iter_mut().find(|p| {
            p.id == player_id
                && teams
                    .iter()
                    .any(|t| t.id == p.team_id && t.user_id == user_id)
        })
    }
}

/// Keeps everything in memory with the same constraints as the database tables. Used for
/// tests and for trying out the tool without a server.
#[derive(Debug, Default)]
pub struct MemoryStore {
    state: Mutex<State>,
    session: SessionContext,
}

fn conflict(message: &str) -> Error {
    Error::Conflict {
        code: UNIQUE_VIOLATION.to_string(),
        message: message.to_string(),
    }
}

fn check_names(first_name: &str, last_name: &str) -> Result<()> {
    if first_name.trim().is_empty() || last_name.trim().is_empty() {
        return Err(Error::Failure {
            code: Some(CHECK_VIOLATION.to_string()),
            message: "player names must not be empty".to_string(),
        });
    }
    Ok(())
}

impl MemoryStore {
    pub fn new(session: SessionContext) -> Self {
        MemoryStore {
            state: Mutex::new(State::default()),
            session,
        }
    }

    fn user_id(&self) -> Result<UserId> {
        self.session
            .user_id()
            .ok_or_else(|| Error::Unauthenticated("no active session".to_string()))
    }
}

#[async_trait]
impl RosterStore for MemoryStore {
    #[instrument(skip(self))]
    async fn list_teams(&self) -> Result<Vec<Team>> {
        let user_id = self.user_id()?;
        let state = self.state.lock().await;
        let mut teams = state
            .teams
            .iter()
            .filter(|t| t.user_id == user_id)
            .cloned()
            .collect::<Vec<_>>();
        teams.sort_by_key(|t| t.created_at);
        Ok(teams)
    }

    #[instrument(skip(self))]
    async fn create_team(&self, team: NewTeam) -> Result<Team> {
        let user_id = self.user_id()?;
        let mut state = self.state.lock().await;

        if state.teams.iter().any(|t| t.id == team.id) {
            return Err(conflict("duplicate key value violates unique constraint \"teams_pkey\""));
        }
        if state
            .teams
            .iter()
            .any(|t| t.user_id == user_id && t.name == team.name)
        {
            return Err(conflict(
                "duplicate key value violates unique constraint \"teams_user_id_name_idx\"",
            ));
        }

        let team = Team {
            id: team.id,
            name: team.name,
            user_id,
            created_at: Utc::now(),
        };
        state.teams.push(team.clone());
        Ok(team)
    }

    #[instrument(skip(self))]
    async fn rename_team(&self, team_id: &TeamId, name: &str) -> Result<Team> {
        let user_id = self.user_id()?;
        let mut state = self.state.lock().await;

        if state
            .teams
            .iter()
            .any(|t| t.user_id == user_id && &t.id != team_id && t.name == name)
        {
            return Err(conflict(
                "duplicate key value violates unique constraint \"teams_user_id_name_idx\"",
            ));
        }

        let team = state
            .teams
            .iter_mut()
            .find(|t| &t.id == team_id && t.user_id == user_id)
            .ok_or(Error::NotFound)?;
        team.name = name.to_string();
        Ok(team.clone())
    }

    #[instrument(skip(self))]
    async fn delete_team(&self, team_id: &TeamId) -> Result<()> {
        let user_id = self.user_id()?;
        let mut state = self.state.lock().await;
        if !state.owns_team(user_id, team_id) {
            return Err(Error::NotFound);
        }

        state.teams.retain(|t| &t.id != team_id);
        state.players.retain(|p| &p.team_id != team_id);
        Ok(())
    }

    #[instrument(skip(self))]
    async fn list_players(&self, team_id: &TeamId) -> Result<Vec<Player>> {
        let user_id = self.user_id()?;
        let state = self.state.lock().await;
        if !state.owns_team(user_id, team_id) {
            return Ok(Vec::new());
        }

        let mut players = state
            .players
            .iter()
            .filter(|p| &p.team_id == team_id)
            .cloned()
            .collect::<Vec<_>>();
        sort_by_jersey(&mut players);
        Ok(players)
    }

    #[instrument(skip(self))]
    async fn team_has_players(&self, team_id: &TeamId) -> Result<bool> {
        let user_id = self.user_id()?;
        let state = self.state.lock().await;
        Ok(state.owns_team(user_id, team_id) && state.players.iter().any(|p| &p.team_id == team_id))
    }

    #[instrument(skip(self))]
    async fn get_player(&self, player_id: PlayerId) -> Result<Player> {
        let user_id = self.user_id()?;
        let mut state = self.state.lock().await;
        state
            .owned_player_mut(user_id, player_id)
            .map(|p| p.clone())
            .ok_or(Error::NotFound)
    }

    #[instrument(skip(self, players), fields(count = players.len()))]
    async fn insert_players(&self, players: Vec<NewPlayer>) -> Result<Vec<Player>> {
        let user_id = self.user_id()?;
        let mut state = self.state.lock().await;

        // All or nothing, like a single insert statement.
        for player in &players {
            if !state.owns_team(user_id, &player.team_id) {
                return Err(Error::NotFound);
            }
            check_names(&player.first_name, &player.last_name)?;
        }

        let now = Utc::now();
        let inserted = players
            .into_iter()
            .map(|p| Player {
                id: PlayerId::new(),
                team_id: p.team_id,
                first_name: p.first_name,
                last_name: p.last_name,
                position: p.position,
                jersey_number: p.jersey_number,
                birth_date: p.birth_date,
                created_at: now,
            })
            .collect::<Vec<_>>();
        state.players.extend(inserted.iter().cloned());
        Ok(inserted)
    }

    #[instrument(skip(self))]
    async fn update_player(&self, player_id: PlayerId, update: PlayerUpdate) -> Result<Player> {
        let user_id = self.user_id()?;
        check_names(&update.first_name, &update.last_name)?;

        let mut state = self.state.lock().await;
        let player = state
            .owned_player_mut(user_id, player_id)
            .ok_or(Error::NotFound)?;
        player.first_name = update.first_name;
        player.last_name = update.last_name;
        player.position = update.position;
        player.jersey_number = update.jersey_number;
        Ok(player.clone())
    }

    #[instrument(skip(self))]
    async fn delete_player(&self, player_id: PlayerId) -> Result<()> {
        let user_id = self.user_id()?;
        let mut state = self.state.lock().await;
        if state.owned_player_mut(user_id, player_id).is_none() {
            return Err(Error::NotFound);
        }

        state.players.retain(|p| p.id != player_id);
        Ok(())
    }

    #[instrument(skip(self))]
    async fn list_all_players(&self) -> Result<Vec<PlayerWithTeam>> {
        let user_id = self.user_id()?;
        let state = self.state.lock().await;
        let mut players = state
            .players
            .iter()
            .filter_map(|p| {
                let team = state
                    .teams
                    .iter()
                    .find(|t| t.id == p.team_id && t.user_id == user_id)?;
                Some(PlayerWithTeam {
                    player: p.clone(),
                    team_name: Some(team.name.clone()),
                })
            })
            .collect::<Vec<_>>();
        players.sort_by(|a, b| a.player.team_id.cmp(&b.player.team_id));
        Ok(players)
    }
}

mod error;
mod memory;
mod postgres;
mod postgrest;
mod provider;

pub use error::*;
pub use memory::*;
pub use postgres::*;
pub use postgrest::*;
pub use provider::*;

use async_trait::async_trait;
use roster_db::{
    object_id::{PlayerId, TeamId},
    players::{NewPlayer, Player, PlayerUpdate, PlayerWithTeam},
    teams::{NewTeam, Team},
};

pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Persistence for teams and players. Implementations pass each call straight through to
/// the backing store, which is responsible for uniqueness and for deleting a team's players
/// along with the team.
#[async_trait]
pub trait RosterStore: std::fmt::Debug + Send + Sync {
    /// All teams owned by the signed-in user, oldest first.
    async fn list_teams(&self) -> Result<Vec<Team>>;

    /// Fails with [Error::Conflict] if the user already has a team with this name.
    async fn create_team(&self, team: NewTeam) -> Result<Team>;

    /// Change the display name. The team keeps its ID.
    async fn rename_team(&self, team_id: &TeamId, name: &str) -> Result<Team>;

    async fn delete_team(&self, team_id: &TeamId) -> Result<()>;

    /// The team's players ordered by jersey number, unnumbered players last.
    async fn list_players(&self, team_id: &TeamId) -> Result<Vec<Player>>;

    async fn team_has_players(&self, team_id: &TeamId) -> Result<bool>;

    async fn get_player(&self, player_id: PlayerId) -> Result<Player>;

    /// Insert all the players in a single request.
    async fn insert_players(&self, players: Vec<NewPlayer>) -> Result<Vec<Player>>;

    async fn update_player(&self, player_id: PlayerId, update: PlayerUpdate) -> Result<Player>;

    async fn delete_player(&self, player_id: PlayerId) -> Result<()>;

    /// Every player on every team, with the team's name, ordered by team ID.
    async fn list_all_players(&self) -> Result<Vec<PlayerWithTeam>>;
}

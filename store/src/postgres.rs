use async_trait::async_trait;
use diesel::prelude::*;
use roster_auth::SessionContext;
use roster_db::{
    object_id::{PlayerId, TeamId, UserId},
    players::{self, sort_by_jersey, NewPlayer, Player, PlayerUpdate, PlayerWithTeam},
    teams::{self, NewTeam, Team},
    Pool, PoolExt,
};
use tracing::instrument;

use crate::{Error, Result, RosterStore};

/// Reads and writes the tables directly. There is no row level security on this path, so
/// every query is limited to the teams owned by the session's user.
#[derive(Clone)]
pub struct PostgresStore {
    pool: Pool,
    session: SessionContext,
}

impl std::fmt::Debug for PostgresStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PostgresStore")
            .field("pool", &self.pool.status())
            .field("session", &self.session)
            .finish()
    }
}

impl PostgresStore {
    pub fn new(pool: Pool, session: SessionContext) -> Self {
        PostgresStore { pool, session }
    }

    fn user_id(&self) -> Result<UserId> {
        self.session
            .user_id()
            .ok_or_else(|| Error::Unauthenticated("no active session".to_string()))
    }
}

#[async_trait]
impl RosterStore for PostgresStore {
    #[instrument(skip(self))]
    async fn list_teams(&self) -> Result<Vec<Team>> {
        let user_id = self.user_id()?;
        self.pool
            .interact(move |conn| {
                teams::table
                    .filter(teams::dsl::user_id.eq(user_id))
                    .order(teams::dsl::created_at.asc())
                    .load::<Team>(conn)
                    .map_err(Error::from)
            })
            .await
    }

    #[instrument(skip(self))]
    async fn create_team(&self, team: NewTeam) -> Result<Team> {
        let user_id = self.user_id()?;
        let team = NewTeam { user_id, ..team };
        self.pool
            .interact(move |conn| {
                diesel::insert_into(teams::table)
                    .values(&team)
                    .get_result::<Team>(conn)
                    .map_err(Error::from)
            })
            .await
    }

    #[instrument(skip(self))]
    async fn rename_team(&self, team_id: &TeamId, name: &str) -> Result<Team> {
        let user_id = self.user_id()?;
        let team_id = team_id.clone();
        let name = name.to_string();
        self.pool
            .interact(move |conn| {
                diesel::update(
                    teams::table
                        .filter(teams::dsl::id.eq(team_id))
                        .filter(teams::dsl::user_id.eq(user_id)),
                )
                .set(teams::dsl::name.eq(name))
                .get_result::<Team>(conn)
                .map_err(Error::from)
            })
            .await
    }

    #[instrument(skip(self))]
    async fn delete_team(&self, team_id: &TeamId) -> Result<()> {
        let user_id = self.user_id()?;
        let team_id = team_id.clone();
        let deleted = self
            .pool
            .interact(move |conn| {
                diesel::delete(
                    teams::table
                        .filter(teams::dsl::id.eq(team_id))
                        .filter(teams::dsl::user_id.eq(user_id)),
                )
                .execute(conn)
                .map_err(Error::from)
            })
            .await?;

        if deleted == 0 {
            return Err(Error::NotFound);
        }
        Ok(())
    }

    #[instrument(skip(self))]
    async fn list_players(&self, team_id: &TeamId) -> Result<Vec<Player>> {
        let user_id = self.user_id()?;
        let team_id = team_id.clone();
        let mut players = self
            .pool
            .interact(move |conn| {
                players::table
                    .inner_join(teams::table)
                    .filter(players::dsl::team_id.eq(team_id))
                    .filter(teams::dsl::user_id.eq(user_id))
                    .select(Player::as_select())
                    .load::<Player>(conn)
                    .map_err(Error::from)
            })
            .await?;

        sort_by_jersey(&mut players);
        Ok(players)
    }

    #[instrument(skip(self))]
    async fn team_has_players(&self, team_id: &TeamId) -> Result<bool> {
        let user_id = self.user_id()?;
        let team_id = team_id.clone();
        self.pool
            .interact(move |conn| {
                diesel::select(diesel::dsl::exists(
                    players::table
                        .inner_join(teams::table)
                        .filter(players::dsl::team_id.eq(team_id))
                        .filter(teams::dsl::user_id.eq(user_id)),
                ))
                .get_result::<bool>(conn)
                .map_err(Error::from)
            })
            .await
    }

    #[instrument(skip(self))]
    async fn get_player(&self, player_id: PlayerId) -> Result<Player> {
        let user_id = self.user_id()?;
        self.pool
            .interact(move |conn| {
                players::table
                    .inner_join(teams::table)
                    .filter(players::dsl::id.eq(player_id))
                    .filter(teams::dsl::user_id.eq(user_id))
                    .select(Player::as_select())
                    .first::<Player>(conn)
                    .map_err(Error::from)
            })
            .await
    }

    #[instrument(skip(self, players), fields(count = players.len()))]
    async fn insert_players(&self, players: Vec<NewPlayer>) -> Result<Vec<Player>> {
        if players.is_empty() {
            return Ok(Vec::new());
        }

        let user_id = self.user_id()?;
        self.pool
            .transaction(move |conn| {
                let mut team_ids = players.iter().map(|p| p.team_id.clone()).collect::<Vec<_>>();
                team_ids.sort();
                team_ids.dedup();

                let owned = teams::table
                    .filter(teams::dsl::id.eq_any(&team_ids))
                    .filter(teams::dsl::user_id.eq(user_id))
                    .count()
                    .get_result::<i64>(conn)?;
                if owned != team_ids.len() as i64 {
                    return Err(Error::NotFound);
                }

                diesel::insert_into(players::table)
                    .values(&players)
                    .get_results::<Player>(conn)
                    .map_err(Error::from)
            })
            .await
    }

    #[instrument(skip(self))]
    async fn update_player(&self, player_id: PlayerId, update: PlayerUpdate) -> Result<Player> {
        let user_id = self.user_id()?;
        self.pool
            .interact(move |conn| {
                let owned_teams = teams::table
                    .filter(teams::dsl::user_id.eq(user_id))
                    .select(teams::dsl::id);
                diesel::update(
                    players::table
                        .filter(players::dsl::id.eq(player_id))
                        .filter(players::dsl::team_id.eq_any(owned_teams)),
                )
                .set(&update)
                .get_result::<Player>(conn)
                .map_err(Error::from)
            })
            .await
    }

    #[instrument(skip(self))]
    async fn delete_player(&self, player_id: PlayerId) -> Result<()> {
        let user_id = self.user_id()?;
        let deleted = self
            .pool
            .interact(move |conn| {
                let owned_teams = teams::table
                    .filter(teams::dsl::user_id.eq(user_id))
                    .select(teams::dsl::id);
                diesel::delete(
                    players::table
                        .filter(players::dsl::id.eq(player_id))
                        .filter(players::dsl::team_id.eq_any(owned_teams)),
                )
                .execute(conn)
                .map_err(Error::from)
            })
            .await?;

        if deleted == 0 {
            return Err(Error::NotFound);
        }
        Ok(())
    }

    #[instrument(skip(self))]
    async fn list_all_players(&self) -> Result<Vec<PlayerWithTeam>> {
        let user_id = self.user_id()?;
        let rows = self
            .pool
            .interact(move |conn| {
                players::table
                    .inner_join(teams::table)
                    .filter(teams::dsl::user_id.eq(user_id))
                    .order(players::dsl::team_id.asc())
                    .select((Player::as_select(), teams::dsl::name))
                    .load::<(Player, String)>(conn)
                    .map_err(Error::from)
            })
            .await?;

        Ok(rows
            .into_iter()
            .map(|(player, team_name)| PlayerWithTeam {
                player,
                team_name: Some(team_name),
            })
            .collect())
    }
}

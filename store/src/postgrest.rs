use async_trait::async_trait;
use reqwest::{Method, RequestBuilder, Response, StatusCode};
use roster_auth::SessionContext;
use roster_db::{
    object_id::{PlayerId, TeamId},
    players::{NewPlayer, Player, PlayerUpdate, PlayerWithTeam},
    teams::{NewTeam, Team},
};
use serde::{de::DeserializeOwned, Deserialize};
use serde_json::json;
use tracing::{event, instrument, Level};

use crate::{Error, RestConfig, Result, RosterStore, UNIQUE_VIOLATION};

/// Talks to the hosted database through its REST interface. Requests carry the project key
/// and, when someone is signed in, their access token. Row level security on the server
/// decides which rows the user can see.
#[derive(Debug, Clone)]
pub struct PostgrestStore {
    client: reqwest::Client,
    base: String,
    anon_key: String,
    session: SessionContext,
}

#[derive(Debug, Default, Deserialize)]
struct ErrorBody {
    code: Option<String>,
    message: Option<String>,
    details: Option<String>,
    hint: Option<String>,
}

#[derive(Debug, Deserialize)]
struct TeamName {
    name: String,
}

#[derive(Debug, Deserialize)]
struct PlayerTeamRow {
    #[serde(flatten)]
    player: Player,
    teams: Option<TeamName>,
}

impl From<PlayerTeamRow> for PlayerWithTeam {
    fn from(row: PlayerTeamRow) -> Self {
        PlayerWithTeam {
            player: row.player,
            team_name: row.teams.map(|t| t.name),
        }
    }
}

fn eq(value: impl std::fmt::Display) -> String {
    format!("eq.{value}")
}

async fn store_error(response: Response) -> Error {
    let status = response.status();
    let body = response.json::<ErrorBody>().await.unwrap_or_default();
    let message = body
        .message
        .clone()
        .unwrap_or_else(|| status.canonical_reason().unwrap_or("unknown").to_string());

    event!(
        Level::WARN,
        status = status.as_u16(),
        code = ?body.code,
        %message,
        details = ?body.details,
        hint = ?body.hint,
        "Store request failed"
    );

    match (status, body.code) {
        (_, Some(code)) if code == UNIQUE_VIOLATION => Error::Conflict { code, message },
        (StatusCode::CONFLICT, None) => Error::Conflict {
            code: UNIQUE_VIOLATION.to_string(),
            message,
        },
        (StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN, _) => Error::Unauthenticated(message),
        (StatusCode::NOT_FOUND, _) => Error::NotFound,
        (_, code) => Error::Failure { code, message },
    }
}

impl PostgrestStore {
    pub fn new(config: &RestConfig, session: SessionContext) -> Result<Self> {
        let url = config.url.trim_end_matches('/');
        let client = reqwest::ClientBuilder::new()
            .timeout(config.timeout)
            .build()?;

        Ok(PostgrestStore {
            client,
            base: format!("{url}/rest/v1"),
            anon_key: config.anon_key.clone(),
            session,
        })
    }

    fn request(&self, method: Method, table: &str) -> RequestBuilder {
        // Without a user token the server falls back to the anonymous role, which row level
        // security keeps away from every row.
        let token = self
            .session
            .access_token()
            .unwrap_or_else(|| self.anon_key.clone());

        self.client
            .request(method, format!("{}/{table}", self.base))
            .header("apikey", &self.anon_key)
            .bearer_auth(token)
    }

    async fn send<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T> {
        let response = request.send().await?;
        if !response.status().is_success() {
            return Err(store_error(response).await);
        }

        Ok(response.json::<T>().await?)
    }

    /// Run a request that returns the affected rows, and expect exactly one of them.
    async fn send_one<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T> {
        let rows = self
            .send::<Vec<T>>(request.header("Prefer", "return=representation"))
            .await?;
        rows.into_iter().next().ok_or(Error::NotFound)
    }

    fn user_id_filter(&self) -> Result<String> {
        self.session
            .user_id()
            .map(eq)
            .ok_or_else(|| Error::Unauthenticated("no active session".to_string()))
    }
}

#[async_trait]
impl RosterStore for PostgrestStore {
    #[instrument(skip(self))]
    async fn list_teams(&self) -> Result<Vec<Team>> {
        let user_id = self.user_id_filter()?;
        self.send(
            self.request(Method::GET, "teams")
                .query(&[("user_id", user_id.as_str()), ("order", "created_at.asc")]),
        )
        .await
    }

    #[instrument(skip(self))]
    async fn create_team(&self, team: NewTeam) -> Result<Team> {
        self.send_one(self.request(Method::POST, "teams").json(&team))
            .await
    }

    #[instrument(skip(self))]
    async fn rename_team(&self, team_id: &TeamId, name: &str) -> Result<Team> {
        self.send_one(
            self.request(Method::PATCH, "teams")
                .query(&[("id", eq(team_id))])
                .json(&json!({ "name": name })),
        )
        .await
    }

    #[instrument(skip(self))]
    async fn delete_team(&self, team_id: &TeamId) -> Result<()> {
        self.send_one::<Team>(
            self.request(Method::DELETE, "teams")
                .query(&[("id", eq(team_id))]),
        )
        .await?;
        Ok(())
    }

    #[instrument(skip(self))]
    async fn list_players(&self, team_id: &TeamId) -> Result<Vec<Player>> {
        self.send(self.request(Method::GET, "players").query(&[
            ("team_id", eq(team_id)),
            ("order", "jersey_number.asc.nullslast".to_string()),
        ]))
        .await
    }

    #[instrument(skip(self))]
    async fn team_has_players(&self, team_id: &TeamId) -> Result<bool> {
        let rows = self
            .send::<Vec<serde_json::Value>>(self.request(Method::GET, "players").query(&[
                ("team_id", eq(team_id)),
                ("select", "id".to_string()),
                ("limit", "1".to_string()),
            ]))
            .await?;
        Ok(!rows.is_empty())
    }

    #[instrument(skip(self))]
    async fn get_player(&self, player_id: PlayerId) -> Result<Player> {
        let rows = self
            .send::<Vec<Player>>(
                self.request(Method::GET, "players")
                    .query(&[("id", eq(player_id))]),
            )
            .await?;
        rows.into_iter().next().ok_or(Error::NotFound)
    }

    #[instrument(skip(self, players), fields(count = players.len()))]
    async fn insert_players(&self, players: Vec<NewPlayer>) -> Result<Vec<Player>> {
        if players.is_empty() {
            return Ok(Vec::new());
        }

        self.send(
            self.request(Method::POST, "players")
                .header("Prefer", "return=representation")
                .json(&players),
        )
        .await
    }

    #[instrument(skip(self))]
    async fn update_player(&self, player_id: PlayerId, update: PlayerUpdate) -> Result<Player> {
        self.send_one(
            self.request(Method::PATCH, "players")
                .query(&[("id", eq(player_id))])
                .json(&update),
        )
        .await
    }

    #[instrument(skip(self))]
    async fn delete_player(&self, player_id: PlayerId) -> Result<()> {
        self.send_one::<Player>(
            self.request(Method::DELETE, "players")
                .query(&[("id", eq(player_id))]),
        )
        .await?;
        Ok(())
    }

    #[instrument(skip(self))]
    async fn list_all_players(&self) -> Result<Vec<PlayerWithTeam>> {
        let rows = self
            .send::<Vec<PlayerTeamRow>>(
                self.request(Method::GET, "players")
                    .query(&[("select", "*,teams(name)"), ("order", "team_id.asc")]),
            )
            .await?;
        Ok(rows.into_iter().map(PlayerWithTeam::from).collect())
    }
}

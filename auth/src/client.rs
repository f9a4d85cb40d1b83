use std::time::Duration;

use chrono::{TimeZone, Utc};
use reqwest::{Response, StatusCode};
use roster_db::object_id::UserId;
use serde::Deserialize;
use serde_json::json;
use tracing::{event, instrument, Level};

use crate::{Error, Result, Session, SessionUser};

/// Client for the hosted auth provider's password and token endpoints.
#[derive(Debug, Clone)]
pub struct AuthClient {
    client: reqwest::Client,
    base: String,
    anon_key: String,
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    refresh_token: Option<String>,
    expires_in: Option<i64>,
    expires_at: Option<i64>,
    user: TokenUser,
}

#[derive(Debug, Deserialize)]
struct TokenUser {
    id: UserId,
    email: Option<String>,
}

/// Different versions of the provider report errors under different keys.
#[derive(Debug, Default, Deserialize)]
struct ErrorBody {
    msg: Option<String>,
    error_description: Option<String>,
    message: Option<String>,
    error: Option<String>,
}

impl ErrorBody {
    fn into_message(self) -> Option<String> {
        self.msg
            .or(self.error_description)
            .or(self.message)
            .or(self.error)
    }
}

impl From<TokenResponse> for Session {
    fn from(t: TokenResponse) -> Self {
        let expires_at = t
            .expires_at
            .and_then(|at| Utc.timestamp_opt(at, 0).single())
            .or_else(|| {
                t.expires_in
                    .map(|secs| Utc::now() + chrono::Duration::seconds(secs))
            });

        Session {
            user: SessionUser {
                id: t.user.id,
                email: t.user.email,
            },
            access_token: Some(t.access_token),
            refresh_token: t.refresh_token,
            expires_at,
        }
    }
}

async fn provider_error(response: Response) -> Error {
    let status = response.status();
    let body = response.json::<ErrorBody>().await.unwrap_or_default();
    let message = body
        .into_message()
        .unwrap_or_else(|| "Ein Fehler ist aufgetreten".to_string());
    event!(Level::WARN, status = status.as_u16(), %message, "Auth provider error");
    Error::Provider {
        status: status.as_u16(),
        message,
    }
}

impl AuthClient {
    pub fn new(url: &str, anon_key: impl Into<String>, timeout: Duration) -> Result<Self> {
        let url = url.trim_end_matches('/');
        if !(url.starts_with("http://") || url.starts_with("https://")) {
            return Err(Error::InvalidUrl(url.to_string()));
        }

        let client = reqwest::ClientBuilder::new().timeout(timeout).build()?;
        Ok(AuthClient {
            client,
            base: format!("{url}/auth/v1"),
            anon_key: anon_key.into(),
        })
    }

    async fn token_request(&self, grant_type: &str, body: serde_json::Value) -> Result<Session> {
        let response = self
            .client
            .post(format!("{}/token", self.base))
            .query(&[("grant_type", grant_type)])
            .header("apikey", &self.anon_key)
            .json(&body)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(provider_error(response).await);
        }

        let token = response.json::<TokenResponse>().await?;
        Ok(Session::from(token))
    }

    #[instrument(skip(self, password))]
    pub async fn sign_in_with_password(&self, email: &str, password: &str) -> Result<Session> {
        self.token_request("password", json!({ "email": email, "password": password }))
            .await
    }

    /// Exchange the session's refresh token for a new session.
    #[instrument(skip_all, fields(user = %session.user.id))]
    pub async fn refresh(&self, session: &Session) -> Result<Session> {
        let refresh_token = session
            .refresh_token
            .as_deref()
            .ok_or(Error::MissingRefreshToken)?;
        self.token_request("refresh_token", json!({ "refresh_token": refresh_token }))
            .await
    }

    /// Revoke the session at the provider. A session the provider no longer knows about
    /// counts as signed out.
    #[instrument(skip_all, fields(user = %session.user.id))]
    pub async fn sign_out(&self, session: &Session) -> Result<()> {
        let Some(token) = session.access_token.as_deref() else {
            return Ok(());
        };

        let response = self
            .client
            .post(format!("{}/logout", self.base))
            .header("apikey", &self.anon_key)
            .bearer_auth(token)
            .send()
            .await?;

        match response.status() {
            s if s.is_success() => Ok(()),
            StatusCode::UNAUTHORIZED | StatusCode::NOT_FOUND => Ok(()),
            _ => Err(provider_error(response).await),
        }
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;
    use wiremock::{
        matchers::{body_json, header, method, path, query_param},
        Mock, MockServer, ResponseTemplate,
    };

    use super::*;

    const USER_ID: &str = "0e9b3d8c-8f7c-4a34-9f3f-4b7c3e1c2a11";

    fn client(server: &MockServer) -> AuthClient {
        AuthClient::new(&server.uri(), "anon", Duration::from_secs(5)).unwrap()
    }

    fn token_body(access_token: &str) -> serde_json::Value {
        json!({
            "access_token": access_token,
            "token_type": "bearer",
            "expires_in": 3600,
            "expires_at": 1_900_000_000,
            "refresh_token": "refresh-1",
            "user": { "id": USER_ID, "email": "coach@example.com" }
        })
    }

    #[tokio::test]
    async fn sign_in() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/auth/v1/token"))
            .and(query_param("grant_type", "password"))
            .and(header("apikey", "anon"))
            .and(body_json(json!({ "email": "coach@example.com", "password": "pw" })))
            .respond_with(ResponseTemplate::new(200).set_body_json(token_body("access-1")))
            .expect(1)
            .mount(&server)
            .await;

        let session = client(&server)
            .sign_in_with_password("coach@example.com", "pw")
            .await
            .unwrap();

        assert_eq!(session.user.id.to_string(), USER_ID);
        assert_eq!(session.user.email.as_deref(), Some("coach@example.com"));
        assert_eq!(session.access_token.as_deref(), Some("access-1"));
        assert_eq!(session.refresh_token.as_deref(), Some("refresh-1"));
        assert_eq!(
            session.expires_at.map(|t| t.timestamp()),
            Some(1_900_000_000)
        );
    }

    #[tokio::test]
    async fn sign_in_failure_uses_provider_message() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/auth/v1/token"))
            .respond_with(ResponseTemplate::new(400).set_body_json(json!({
                "error": "invalid_grant",
                "error_description": "Invalid login credentials"
            })))
            .mount(&server)
            .await;

        let err = client(&server)
            .sign_in_with_password("coach@example.com", "wrong")
            .await
            .expect_err("bad password");
        assert_matches!(err, Error::Provider { status: 400, .. });
        assert_eq!(err.user_message(), "Invalid login credentials");
    }

    #[tokio::test]
    async fn error_without_body_gets_generic_message() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let err = client(&server)
            .sign_in_with_password("a@b.c", "pw")
            .await
            .expect_err("server error");
        assert_eq!(err.user_message(), "Ein Fehler ist aufgetreten");
    }

    #[tokio::test]
    async fn refresh() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/auth/v1/token"))
            .and(query_param("grant_type", "refresh_token"))
            .and(body_json(json!({ "refresh_token": "refresh-1" })))
            .respond_with(ResponseTemplate::new(200).set_body_json(token_body("access-2")))
            .expect(1)
            .mount(&server)
            .await;

        let client = client(&server);
        let mut old = Session::local(USER_ID.parse().unwrap());
        assert_matches!(client.refresh(&old).await, Err(Error::MissingRefreshToken));

        old.refresh_token = Some("refresh-1".to_string());
        let session = client.refresh(&old).await.unwrap();
        assert_eq!(session.access_token.as_deref(), Some("access-2"));
    }

    #[tokio::test]
    async fn sign_out() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/auth/v1/logout"))
            .and(header("authorization", "Bearer access-1"))
            .respond_with(ResponseTemplate::new(204))
            .expect(1)
            .mount(&server)
            .await;

        let client = client(&server);
        let mut session = Session::local(USER_ID.parse().unwrap());
        // Nothing to revoke without a token.
        client.sign_out(&session).await.unwrap();

        session.access_token = Some("access-1".to_string());
        client.sign_out(&session).await.unwrap();
    }

    #[test]
    fn rejects_bad_url() {
        assert_matches!(
            AuthClient::new("localhost:54321", "anon", Duration::from_secs(1)),
            Err(Error::InvalidUrl(_))
        );
    }
}

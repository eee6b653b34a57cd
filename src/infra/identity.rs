//! Password-grant client for a GoTrue-compatible identity service.
//!
//! The session lives in memory only. Reading it refreshes an expired access
//! token when a refresh token is available; a failed refresh drops the
//! session and broadcasts [`AuthEvent::SignedOut`].

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::AUTHORIZATION;
use reqwest::{Client, RequestBuilder, Response, StatusCode, Url};
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use tokio::sync::{RwLock, broadcast};
use tracing::{debug, info, instrument, warn};

use crate::application::ports::{AuthEvent, ClientError, IdentityProvider, Session};
use crate::config::IdentitySettings;
use crate::infra::api::user_agent;
use crate::infra::error::InfraError;

const TOKEN_PATH: &str = "auth/v1/token";
const LOGOUT_PATH: &str = "auth/v1/logout";
const API_KEY_HEADER: &str = "apikey";
const EVENT_CAPACITY: usize = 16;
const SIGN_IN_FALLBACK: &str = "Sign-in failed";

pub struct GoTrueIdentity {
    client: Client,
    base: Url,
    anon_key: String,
    session: RwLock<Option<Session>>,
    events: broadcast::Sender<AuthEvent>,
}

#[derive(Serialize)]
struct PasswordGrant<'a> {
    email: &'a str,
    password: &'a str,
}

#[derive(Serialize)]
struct RefreshGrant<'a> {
    refresh_token: &'a str,
}

#[derive(Deserialize)]
struct TokenResponse {
    access_token: String,
    #[serde(default)]
    refresh_token: Option<String>,
    #[serde(default)]
    expires_in: Option<i64>,
    #[serde(default)]
    expires_at: Option<i64>,
    #[serde(default)]
    user: Option<TokenUser>,
}

#[derive(Deserialize)]
struct TokenUser {
    #[serde(default)]
    email: Option<String>,
}

/// The service reports failures under several keys depending on the endpoint.
#[derive(Deserialize, Default)]
struct AuthErrorBody {
    #[serde(default)]
    error_description: Option<String>,
    #[serde(default)]
    msg: Option<String>,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    error: Option<String>,
}

impl AuthErrorBody {
    fn into_message(self) -> Option<String> {
        [self.error_description, self.msg, self.message, self.error]
            .into_iter()
            .flatten()
            .find(|message| !message.trim().is_empty())
    }
}

impl TokenResponse {
    fn into_session(self, now: OffsetDateTime) -> Session {
        let expires_at = self
            .expires_at
            .and_then(|secs| OffsetDateTime::from_unix_timestamp(secs).ok())
            .or_else(|| {
                self.expires_in
                    .map(|secs| now + time::Duration::seconds(secs))
            });
        Session {
            access_token: self.access_token,
            refresh_token: self.refresh_token.filter(|token| !token.is_empty()),
            expires_at,
            email: self.user.and_then(|user| user.email),
        }
    }
}

impl GoTrueIdentity {
    pub fn new(settings: &IdentitySettings, timeout: Duration) -> Result<Self, InfraError> {
        let client = Client::builder()
            .user_agent(user_agent())
            .timeout(timeout)
            .build()?;
        let mut base = settings.url.clone();
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }
        let (events, _) = broadcast::channel(EVENT_CAPACITY);
        Ok(Self {
            client,
            base,
            anon_key: settings.anon_key.clone(),
            session: RwLock::new(None),
            events,
        })
    }

    fn token_url(&self, grant_type: &str) -> Result<Url, ClientError> {
        let mut url = self.base.join(TOKEN_PATH).map_err(ClientError::transport)?;
        url.query_pairs_mut().append_pair("grant_type", grant_type);
        Ok(url)
    }

    fn post(&self, url: Url) -> RequestBuilder {
        self.client
            .post(url)
            .header(API_KEY_HEADER, &self.anon_key)
    }

    fn emit(&self, event: AuthEvent) {
        // No subscribers is fine for one-shot commands.
        let _ = self.events.send(event);
    }

    async fn exchange(&self, request: RequestBuilder) -> Result<Session, ClientError> {
        let resp = request.send().await.map_err(ClientError::transport)?;
        if !resp.status().is_success() {
            return Err(auth_failure(resp).await);
        }
        let token: TokenResponse = resp.json().await.map_err(ClientError::decode)?;
        Ok(token.into_session(OffsetDateTime::now_utc()))
    }

    #[instrument(skip_all)]
    async fn refresh(&self, refresh_token: &str) -> Result<Session, ClientError> {
        let url = self.token_url("refresh_token")?;
        let request = self.post(url).json(&RefreshGrant { refresh_token });
        self.exchange(request).await
    }
}

#[async_trait]
impl IdentityProvider for GoTrueIdentity {
    async fn session(&self) -> Result<Option<Session>, ClientError> {
        let current = self.session.read().await.clone();
        let Some(current) = current else {
            return Ok(None);
        };
        if !current.is_expired(OffsetDateTime::now_utc()) {
            return Ok(Some(current));
        }

        let refreshed = match current.refresh_token.as_deref() {
            Some(token) => self.refresh(token).await,
            None => Err(ClientError::NotAuthenticated),
        };
        let mut guard = self.session.write().await;
        match refreshed {
            Ok(mut session) => {
                if session.email.is_none() {
                    session.email = current.email;
                }
                debug!("access token refreshed");
                *guard = Some(session.clone());
                drop(guard);
                self.emit(AuthEvent::TokenRefreshed);
                Ok(Some(session))
            }
            Err(err) => {
                warn!(error = %err, "session expired and could not be refreshed");
                *guard = None;
                drop(guard);
                self.emit(AuthEvent::SignedOut);
                Ok(None)
            }
        }
    }

    #[instrument(skip(self, password))]
    async fn sign_in_with_password(
        &self,
        email: &str,
        password: &str,
    ) -> Result<Session, ClientError> {
        let url = self.token_url("password")?;
        let request = self.post(url).json(&PasswordGrant { email, password });
        let mut session = self.exchange(request).await?;
        if session.email.is_none() {
            session.email = Some(email.to_string());
        }

        *self.session.write().await = Some(session.clone());
        info!("identity session established");
        self.emit(AuthEvent::SignedIn);
        Ok(session)
    }

    async fn sign_out(&self) -> Result<(), ClientError> {
        let current = self.session.read().await.clone();
        if let Some(session) = current {
            let url = self.base.join(LOGOUT_PATH).map_err(ClientError::transport)?;
            let resp = self
                .post(url)
                .header(AUTHORIZATION, format!("Bearer {}", session.access_token))
                .send()
                .await
                .map_err(ClientError::transport)?;
            let status = resp.status();
            // A token the service no longer knows is already signed out.
            if !status.is_success()
                && !matches!(
                    status,
                    StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN | StatusCode::NOT_FOUND
                )
            {
                return Err(auth_failure(resp).await);
            }
        }

        *self.session.write().await = None;
        self.emit(AuthEvent::SignedOut);
        Ok(())
    }

    fn subscribe(&self) -> broadcast::Receiver<AuthEvent> {
        self.events.subscribe()
    }
}

async fn auth_failure(resp: Response) -> ClientError {
    let status = resp.status();
    let bytes = resp.bytes().await.unwrap_or_default();
    let message = serde_json::from_slice::<AuthErrorBody>(&bytes)
        .ok()
        .and_then(AuthErrorBody::into_message)
        .unwrap_or_else(|| format!("{SIGN_IN_FALLBACK} (status {})", status.as_u16()));
    debug!(status = status.as_u16(), %message, "identity service rejected request");
    ClientError::Auth(message)
}

#[cfg(test)]
mod tests {
    use httpmock::prelude::*;

    use super::*;

    fn identity_for(server: &MockServer) -> GoTrueIdentity {
        let settings = IdentitySettings {
            url: Url::parse(&server.base_url()).expect("mock url"),
            anon_key: "anon-123".to_string(),
        };
        GoTrueIdentity::new(&settings, Duration::from_secs(5)).expect("identity client")
    }

    fn token_body(access: &str, refresh: &str) -> serde_json::Value {
        serde_json::json!({
            "access_token": access,
            "token_type": "bearer",
            "expires_in": 3600,
            "refresh_token": refresh,
            "user": { "id": "u-1", "email": "admin@example.com" }
        })
    }

    fn expired_session(refresh_token: Option<&str>) -> Session {
        Session {
            access_token: "stale".into(),
            refresh_token: refresh_token.map(str::to_string),
            expires_at: Some(OffsetDateTime::now_utc() - time::Duration::minutes(5)),
            email: Some("admin@example.com".into()),
        }
    }

    #[tokio::test]
    async fn password_sign_in_stores_session_and_notifies() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(POST)
                    .path("/auth/v1/token")
                    .query_param("grant_type", "password")
                    .header("apikey", "anon-123")
                    .json_body(serde_json::json!({
                        "email": "admin@example.com",
                        "password": "hunter2"
                    }));
                then.status(200).json_body(token_body("access-1", "refresh-1"));
            })
            .await;

        let identity = identity_for(&server);
        let mut events = identity.subscribe();
        let session = identity
            .sign_in_with_password("admin@example.com", "hunter2")
            .await
            .expect("sign in");

        mock.assert_async().await;
        assert_eq!(session.access_token, "access-1");
        assert_eq!(session.email.as_deref(), Some("admin@example.com"));
        assert!(session.expires_at.is_some());
        assert_eq!(events.recv().await.expect("event"), AuthEvent::SignedIn);

        let held = identity.session().await.expect("session").expect("some");
        assert_eq!(held.access_token, "access-1");
    }

    #[tokio::test]
    async fn rejected_credentials_surface_service_message() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(POST).path("/auth/v1/token");
                then.status(400).json_body(serde_json::json!({
                    "error": "invalid_grant",
                    "error_description": "Invalid login credentials"
                }));
            })
            .await;

        let identity = identity_for(&server);
        let err = identity
            .sign_in_with_password("admin@example.com", "wrong")
            .await
            .expect_err("bad password");
        assert_eq!(err.to_string(), "Invalid login credentials");
        assert!(identity.session().await.expect("lookup").is_none());
    }

    #[tokio::test]
    async fn unparseable_error_falls_back_to_status() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(POST).path("/auth/v1/token");
                then.status(502).body("<html>bad gateway</html>");
            })
            .await;

        let err = identity_for(&server)
            .sign_in_with_password("a@b.c", "pw")
            .await
            .expect_err("gateway error");
        assert_eq!(err.to_string(), "Sign-in failed (status 502)");
    }

    #[tokio::test]
    async fn expired_session_is_refreshed() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(POST)
                    .path("/auth/v1/token")
                    .query_param("grant_type", "refresh_token")
                    .json_body(serde_json::json!({ "refresh_token": "refresh-0" }));
                then.status(200).json_body(token_body("access-2", "refresh-2"));
            })
            .await;

        let identity = identity_for(&server);
        *identity.session.write().await = Some(expired_session(Some("refresh-0")));
        let mut events = identity.subscribe();

        let session = identity.session().await.expect("lookup").expect("some");
        mock.assert_async().await;
        assert_eq!(session.access_token, "access-2");
        assert_eq!(session.refresh_token.as_deref(), Some("refresh-2"));
        assert_eq!(events.recv().await.expect("event"), AuthEvent::TokenRefreshed);
    }

    #[tokio::test]
    async fn failed_refresh_signs_out() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(POST).path("/auth/v1/token");
                then.status(400)
                    .json_body(serde_json::json!({ "msg": "Invalid Refresh Token" }));
            })
            .await;

        let identity = identity_for(&server);
        *identity.session.write().await = Some(expired_session(Some("revoked")));
        let mut events = identity.subscribe();

        assert!(identity.session().await.expect("lookup").is_none());
        assert_eq!(events.recv().await.expect("event"), AuthEvent::SignedOut);
        assert!(identity.session.read().await.is_none());
    }

    #[tokio::test]
    async fn expired_session_without_refresh_token_is_dropped() {
        let server = MockServer::start_async().await;
        let identity = identity_for(&server);
        *identity.session.write().await = Some(expired_session(None));

        assert!(identity.session().await.expect("lookup").is_none());
    }

    #[tokio::test]
    async fn sign_out_revokes_token_and_notifies() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(POST)
                    .path("/auth/v1/logout")
                    .header("apikey", "anon-123")
                    .header("authorization", "Bearer live");
                then.status(204);
            })
            .await;

        let identity = identity_for(&server);
        *identity.session.write().await = Some(Session {
            access_token: "live".into(),
            refresh_token: None,
            expires_at: None,
            email: None,
        });
        let mut events = identity.subscribe();

        identity.sign_out().await.expect("sign out");
        mock.assert_async().await;
        assert_eq!(events.recv().await.expect("event"), AuthEvent::SignedOut);
        assert!(identity.session().await.expect("lookup").is_none());
    }

    #[tokio::test]
    async fn sign_out_tolerates_unknown_token() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(POST).path("/auth/v1/logout");
                then.status(401);
            })
            .await;

        let identity = identity_for(&server);
        *identity.session.write().await = Some(expired_session(None));
        identity.sign_out().await.expect("already signed out");
        assert!(identity.session.read().await.is_none());
    }
}

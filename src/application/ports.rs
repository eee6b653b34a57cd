//! Traits describing the identity service and the listings backend.

use async_trait::async_trait;
use thiserror::Error;
use time::{Duration, OffsetDateTime};
use tokio::sync::broadcast;

use crate::domain::error::DomainError;
use crate::domain::forms::PostSubmission;
use crate::domain::posts::Post;
use postdesk_api_types::HealthResponse;

/// Sessions this close to expiry are treated as expired.
const EXPIRY_MARGIN: Duration = Duration::seconds(10);

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("network error: {0}")]
    Transport(String),
    #[error("backend responded with status {status}{}", detail_suffix(.message))]
    Api {
        status: u16,
        message: Option<String>,
    },
    #[error("{0}")]
    Auth(String),
    #[error("not signed in")]
    NotAuthenticated,
    #[error("failed to parse body: {0}")]
    Decode(String),
    #[error(transparent)]
    Validation(#[from] DomainError),
}

fn detail_suffix(message: &Option<String>) -> String {
    message
        .as_deref()
        .map(|m| format!(": {m}"))
        .unwrap_or_default()
}

impl ClientError {
    pub fn transport(err: impl std::fmt::Display) -> Self {
        Self::Transport(err.to_string())
    }

    pub fn decode(err: impl std::fmt::Display) -> Self {
        Self::Decode(err.to_string())
    }

    /// Message shown to the user when this error aborts a mutation.
    pub fn mutation_detail<'a>(&'a self, fallback: &'a str) -> std::borrow::Cow<'a, str> {
        match self {
            ClientError::Api {
                message: Some(message),
                ..
            } => message.as_str().into(),
            ClientError::Api { message: None, .. } => fallback.into(),
            other => other.to_string().into(),
        }
    }

    /// Message shown in the page banner when a read fails.
    pub fn read_detail(&self) -> String {
        match self {
            ClientError::Api { status, .. } => format!("HTTP error! status: {status}"),
            other => other.to_string(),
        }
    }
}

/// Credential issued by the identity service.
#[derive(Clone, PartialEq, Eq)]
pub struct Session {
    pub access_token: String,
    pub refresh_token: Option<String>,
    pub expires_at: Option<OffsetDateTime>,
    pub email: Option<String>,
}

impl Session {
    pub fn is_expired(&self, now: OffsetDateTime) -> bool {
        self.expires_at
            .is_some_and(|expires_at| expires_at - EXPIRY_MARGIN <= now)
    }
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("email", &self.email)
            .field("expires_at", &self.expires_at)
            .finish_non_exhaustive()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthEvent {
    SignedIn,
    SignedOut,
    TokenRefreshed,
}

#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// Current session, if one is held and still valid.
    async fn session(&self) -> Result<Option<Session>, ClientError>;

    async fn sign_in_with_password(
        &self,
        email: &str,
        password: &str,
    ) -> Result<Session, ClientError>;

    async fn sign_out(&self) -> Result<(), ClientError>;

    fn subscribe(&self) -> broadcast::Receiver<AuthEvent>;
}

#[async_trait]
pub trait PostsApi: Send + Sync {
    async fn list_posts(&self, token: &str) -> Result<Vec<Post>, ClientError>;

    async fn create_post(
        &self,
        token: &str,
        submission: PostSubmission,
    ) -> Result<Post, ClientError>;

    async fn update_post(
        &self,
        token: &str,
        id: i64,
        submission: PostSubmission,
    ) -> Result<Post, ClientError>;

    async fn delete_post(&self, token: &str, id: i64) -> Result<(), ClientError>;

    async fn health(&self) -> Result<HealthResponse, ClientError>;
}

//! Wire types exchanged with the listings backend (`/api/posts`, `/api/health`).

use std::fmt;

use serde::{Deserialize, Serialize};

/// Listing status as stored by the backend.
///
/// The backend stores free text, so unknown values are kept verbatim in
/// [`PostStatus::Other`] instead of failing deserialization.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum PostStatus {
    #[default]
    Available,
    OnHold,
    Sold,
    Other(String),
}

impl PostStatus {
    pub fn as_str(&self) -> &str {
        match self {
            PostStatus::Available => "Available",
            PostStatus::OnHold => "On Hold",
            PostStatus::Sold => "Sold",
            PostStatus::Other(raw) => raw.as_str(),
        }
    }
}

impl From<String> for PostStatus {
    fn from(value: String) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "available" => PostStatus::Available,
            "on hold" => PostStatus::OnHold,
            "sold" => PostStatus::Sold,
            _ => PostStatus::Other(value),
        }
    }
}

impl From<PostStatus> for String {
    fn from(value: PostStatus) -> Self {
        match value {
            PostStatus::Other(raw) => raw,
            known => known.as_str().to_string(),
        }
    }
}

impl fmt::Display for PostStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A listing record as returned by `GET /api/posts`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Post {
    pub id: i64,
    pub post_id: String,
    pub platform: String,
    pub country: String,
    #[serde(default)]
    pub status: PostStatus,
    #[serde(default)]
    pub image_url: Option<String>,
    pub created_at: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
}

/// Error envelope carried by every non-2xx backend response.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ApiErrorBody {
    #[serde(default)]
    pub error: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: String,
}

/// Multipart field names used by the create and update endpoints.
pub mod fields {
    pub const ID: &str = "id";
    pub const POST_ID: &str = "post_id";
    pub const PLATFORM: &str = "platform";
    pub const COUNTRY: &str = "country";
    pub const STATUS: &str = "status";
    pub const IMAGE: &str = "image";
}

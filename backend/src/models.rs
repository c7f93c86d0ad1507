use rocket::serde::{Deserialize, Serialize};
use rocket::FromForm;

/// One video entry from the upstream search call.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SearchItem {
    pub video_id: String,
    pub channel_id: String,
    pub title: String,
    pub channel_title: String,
    pub thumbnail_url: String,
    pub published_at: String,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SearchPage {
    pub items: Vec<SearchItem>,
    pub next_page_token: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnrichedItem {
    pub thumbnail: String,
    pub title: String,
    pub channel_title: String,
    pub video_url: String,
    pub view_count: String,
    pub subscriber_count: String,
    pub published_at: String,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AggregatedResult {
    pub items: Vec<EnrichedItem>,
    pub next_page_token: String,
}

#[derive(Debug, FromForm)]
pub struct SearchParams {
    pub query: Option<String>,
    #[field(name = "pageToken")]
    pub page_token: Option<String>,
    /// Forwarded upstream as `videoCategoryId`.
    #[field(name = "categoryId")]
    pub category_id: Option<String>,
}

/// Body of `/api/register` and `/api/login`. Both fields are optional so
/// that a missing field is answered by the handler, not by Rocket's 422.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct Credentials {
    pub username: Option<String>,
    pub password: Option<String>,
}

impl Credentials {
    /// Returns both fields when present and non-empty.
    pub fn pair(&self) -> Option<(&str, &str)> {
        let username = self.username.as_deref().filter(|u| !u.is_empty())?;
        let password = self.password.as_deref().filter(|p| !p.is_empty())?;
        Some((username, password))
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

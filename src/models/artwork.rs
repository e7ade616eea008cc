use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub const ART_SUBMISSIONS_TABLE: &str = "art_submissions";

/// A stored artwork as returned by the remote store. `id` and `created_at`
/// are assigned by the store and never sent by this client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArtSubmission {
    pub id: String,
    pub title: String,
    pub creator_name: String,
    pub email: String,
    #[serde(default)]
    pub description: Option<String>,
    pub artwork_url: String,
    pub created_at: DateTime<Utc>,
}

impl ArtSubmission {
    /// Description text if present and non-blank.
    pub fn description_text(&self) -> Option<&str> {
        self.description
            .as_deref()
            .map(str::trim)
            .filter(|d| !d.is_empty())
    }
}

/// Insert payload for `art_submissions`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ArtSubmissionInput {
    pub title: String,
    pub creator_name: String,
    pub email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub artwork_url: String,
}

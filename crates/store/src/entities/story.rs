//! Story entity.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Story model. Location-tagged ephemeral post, discoverable through the
/// nearby-story query until it expires.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Story {
    pub id: String,
    pub user_id: String,
    pub content: String,
    pub media_url: Option<String>,
    pub latitude: f64,
    pub longitude: f64,
    pub expires_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

impl Story {
    /// Whether the story is still visible at `now`.
    #[must_use]
    pub fn is_live_at(&self, now: DateTime<Utc>) -> bool {
        self.expires_at > now
    }
}

/// Input for posting a story.
#[derive(Debug, Clone)]
pub struct NewStory {
    pub user_id: String,
    pub content: String,
    pub media_url: Option<String>,
    pub latitude: f64,
    pub longitude: f64,
    pub expires_at: DateTime<Utc>,
}

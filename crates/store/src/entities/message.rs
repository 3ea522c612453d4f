//! Message entity.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Message model. Belongs to exactly one match; the sender must be a
/// participant of that match (enforced by the messaging service, not here).
/// Mutated only to flip `is_read`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub id: String,
    pub match_id: String,
    pub sender_id: String,
    pub content: String,
    pub is_read: bool,
    pub sent_at: DateTime<Utc>,
}

/// Input for creating a message.
#[derive(Debug, Clone)]
pub struct NewMessage {
    pub match_id: String,
    pub sender_id: String,
    pub content: String,
}

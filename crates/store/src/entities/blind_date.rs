//! Blind date entity.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Blind date lifecycle status.
///
/// `Pending → Matched → Completed` is the only forward path; `Pending →
/// Cancelled` happens on explicit cancel or expiry refund.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum BlindDateStatus {
    #[default]
    Pending,
    Matched,
    Completed,
    Cancelled,
}

/// Blind date model. `user2_id` is Some iff status is `Matched` or later;
/// the escrow amount is debited from each participant's wallet at their
/// respective create/join time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BlindDate {
    pub id: String,
    /// The requester, whose escrow was debited at creation.
    pub user1_id: String,
    /// The joiner; None while the request is pending.
    pub user2_id: Option<String>,
    /// Center of the acceptable meeting area.
    pub center_lat: f64,
    pub center_lng: f64,
    /// Radius of the acceptable meeting area in kilometers.
    pub radius_km: f64,
    /// Escrowed amount per participant.
    pub amount: Decimal,
    pub status: BlindDateStatus,
    /// Set when a partner joins.
    pub scheduled_for: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl BlindDate {
    /// Whether the given user participates in this blind date.
    #[must_use]
    pub fn involves(&self, user_id: &str) -> bool {
        self.user1_id == user_id || self.user2_id.as_deref() == Some(user_id)
    }
}

/// Input for creating a blind date request.
#[derive(Debug, Clone)]
pub struct NewBlindDate {
    pub user1_id: String,
    pub center_lat: f64,
    pub center_lng: f64,
    pub radius_km: f64,
    pub amount: Decimal,
}

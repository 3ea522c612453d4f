//! Swipe entity.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Swipe action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SwipeAction {
    Like,
    Pass,
    SuperLike,
}

impl SwipeAction {
    /// Whether this action expresses interest for reciprocal matching.
    ///
    /// `SuperLike` counts as a like on both sides of the reciprocity check.
    #[must_use]
    pub const fn expresses_interest(self) -> bool {
        matches!(self, Self::Like | Self::SuperLike)
    }
}

/// Swipe model. At most one swipe exists per ordered (swiper, swiped) pair
/// and it is immutable once recorded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Swipe {
    pub id: String,
    /// The user who swiped.
    pub swiper_id: String,
    /// The user who was swiped on.
    pub swiped_id: String,
    pub action: SwipeAction,
    pub created_at: DateTime<Utc>,
}

/// Input for recording a swipe.
#[derive(Debug, Clone)]
pub struct NewSwipe {
    pub swiper_id: String,
    pub swiped_id: String,
    pub action: SwipeAction,
}

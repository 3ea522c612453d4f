//! Match entity.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Match model. Created only when both directions of a pair express
/// interest; the user1/user2 ordering carries no meaning beyond "user1
/// swiped last". Matches are soft-deactivated, never deleted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Match {
    pub id: String,
    pub user1_id: String,
    pub user2_id: String,
    pub is_active: bool,
    pub matched_at: DateTime<Utc>,
}

impl Match {
    /// Whether the given user participates in this match.
    #[must_use]
    pub fn involves(&self, user_id: &str) -> bool {
        self.user1_id == user_id || self.user2_id == user_id
    }

    /// The other participant's id, if `user_id` is a participant.
    #[must_use]
    pub fn partner_of(&self, user_id: &str) -> Option<&str> {
        if self.user1_id == user_id {
            Some(&self.user2_id)
        } else if self.user2_id == user_id {
            Some(&self.user1_id)
        } else {
            None
        }
    }
}

/// Input for creating a match.
#[derive(Debug, Clone)]
pub struct NewMatch {
    pub user1_id: String,
    pub user2_id: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partner_of_is_symmetric() {
        let m = Match {
            id: "m1".to_string(),
            user1_id: "a".to_string(),
            user2_id: "b".to_string(),
            is_active: true,
            matched_at: Utc::now(),
        };
        assert_eq!(m.partner_of("a"), Some("b"));
        assert_eq!(m.partner_of("b"), Some("a"));
        assert_eq!(m.partner_of("c"), None);
        assert!(m.involves("b"));
        assert!(!m.involves("c"));
    }
}

//! Match repository.

use crate::MemStore;
use crate::entities::matches::{Match, NewMatch};
use chrono::Utc;
use lovear_common::{AppError, AppResult};
use std::sync::Arc;

/// Repository for match operations.
#[derive(Debug, Clone)]
pub struct MatchRepository {
    store: Arc<MemStore>,
}

impl MatchRepository {
    /// Create a new match repository.
    #[must_use]
    pub const fn new(store: Arc<MemStore>) -> Self {
        Self { store }
    }

    /// Create a match.
    pub async fn create(&self, new: NewMatch) -> AppResult<Match> {
        let mut matches = self.store.matches.write().await;

        let m = Match {
            id: self.store.next_id(),
            user1_id: new.user1_id,
            user2_id: new.user2_id,
            is_active: true,
            matched_at: Utc::now(),
        };

        matches.insert(m.id.clone(), m.clone());
        Ok(m)
    }

    /// Find a match by ID.
    pub async fn find_by_id(&self, id: &str) -> AppResult<Option<Match>> {
        Ok(self.store.matches.read().await.get(id).cloned())
    }

    /// Get a match by ID, erroring when absent.
    pub async fn get_by_id(&self, id: &str) -> AppResult<Match> {
        self.find_by_id(id)
            .await?
            .ok_or_else(|| AppError::MatchNotFound(id.to_string()))
    }

    /// Find the match for an unordered user pair, if one exists.
    pub async fn find_by_pair(&self, user_a: &str, user_b: &str) -> AppResult<Option<Match>> {
        Ok(self
            .store
            .matches
            .read()
            .await
            .values()
            .find(|m| {
                (m.user1_id == user_a && m.user2_id == user_b)
                    || (m.user1_id == user_b && m.user2_id == user_a)
            })
            .cloned())
    }

    /// Active matches involving a user, newest first.
    pub async fn find_active_for_user(&self, user_id: &str) -> AppResult<Vec<Match>> {
        let mut found: Vec<Match> = self
            .store
            .matches
            .read()
            .await
            .values()
            .filter(|m| m.is_active && m.involves(user_id))
            .cloned()
            .collect();
        found.sort_by(|a, b| b.matched_at.cmp(&a.matched_at));
        Ok(found)
    }

    /// Soft-activate or deactivate a match. Matches are never hard-deleted.
    pub async fn set_active(&self, id: &str, is_active: bool) -> AppResult<Match> {
        let mut matches = self.store.matches.write().await;
        let m = matches
            .get_mut(id)
            .ok_or_else(|| AppError::MatchNotFound(id.to_string()))?;
        m.is_active = is_active;
        Ok(m.clone())
    }
}

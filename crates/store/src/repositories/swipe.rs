//! Swipe repository.

use crate::MemStore;
use crate::entities::swipe::{NewSwipe, Swipe};
use chrono::Utc;
use lovear_common::AppResult;
use std::sync::Arc;

/// Repository for swipe operations.
#[derive(Debug, Clone)]
pub struct SwipeRepository {
    store: Arc<MemStore>,
}

impl SwipeRepository {
    /// Create a new swipe repository.
    #[must_use]
    pub const fn new(store: Arc<MemStore>) -> Self {
        Self { store }
    }

    /// Record a swipe. The one-per-ordered-pair invariant is enforced by the
    /// matching service's duplicate guard before this is called.
    pub async fn create(&self, new: NewSwipe) -> AppResult<Swipe> {
        let mut swipes = self.store.swipes.write().await;

        let swipe = Swipe {
            id: self.store.next_id(),
            swiper_id: new.swiper_id,
            swiped_id: new.swiped_id,
            action: new.action,
            created_at: Utc::now(),
        };

        swipes.insert(swipe.id.clone(), swipe.clone());
        Ok(swipe)
    }

    /// Find the swipe for an exact ordered pair, if one exists.
    pub async fn find_by_pair(&self, swiper_id: &str, swiped_id: &str) -> AppResult<Option<Swipe>> {
        Ok(self
            .store
            .swipes
            .read()
            .await
            .values()
            .find(|s| s.swiper_id == swiper_id && s.swiped_id == swiped_id)
            .cloned())
    }

    /// All swipes involving a user, in either role.
    pub async fn find_involving(&self, user_id: &str) -> AppResult<Vec<Swipe>> {
        Ok(self
            .store
            .swipes
            .read()
            .await
            .values()
            .filter(|s| s.swiper_id == user_id || s.swiped_id == user_id)
            .cloned()
            .collect())
    }

    /// All swipes performed by a user.
    pub async fn find_by_swiper(&self, swiper_id: &str) -> AppResult<Vec<Swipe>> {
        Ok(self
            .store
            .swipes
            .read()
            .await
            .values()
            .filter(|s| s.swiper_id == swiper_id)
            .cloned()
            .collect())
    }
}

//! Story repository.

use crate::MemStore;
use crate::entities::story::{NewStory, Story};
use chrono::{DateTime, Utc};
use lovear_common::{AppError, AppResult, Position, within_radius};
use std::sync::Arc;

/// Repository for story operations.
#[derive(Debug, Clone)]
pub struct StoryRepository {
    store: Arc<MemStore>,
}

impl StoryRepository {
    /// Create a new story repository.
    #[must_use]
    pub const fn new(store: Arc<MemStore>) -> Self {
        Self { store }
    }

    /// Create a story.
    pub async fn create(&self, new: NewStory) -> AppResult<Story> {
        let mut stories = self.store.stories.write().await;

        let story = Story {
            id: self.store.next_id(),
            user_id: new.user_id,
            content: new.content,
            media_url: new.media_url,
            latitude: new.latitude,
            longitude: new.longitude,
            expires_at: new.expires_at,
            created_at: Utc::now(),
        };

        stories.insert(story.id.clone(), story.clone());
        Ok(story)
    }

    /// Find a story by ID.
    pub async fn find_by_id(&self, id: &str) -> AppResult<Option<Story>> {
        Ok(self.store.stories.read().await.get(id).cloned())
    }

    /// Get a story by ID, erroring when absent.
    pub async fn get_by_id(&self, id: &str) -> AppResult<Story> {
        self.find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Story {id}")))
    }

    /// Unexpired stories within `radius_km` of `center`, newest first.
    pub async fn find_live_within(
        &self,
        center: Position,
        radius_km: f64,
        now: DateTime<Utc>,
    ) -> AppResult<Vec<Story>> {
        let mut found: Vec<Story> = self
            .store
            .stories
            .read()
            .await
            .values()
            .filter(|s| s.is_live_at(now))
            .filter(|s| within_radius(center, Position::new(s.latitude, s.longitude), radius_km))
            .cloned()
            .collect();
        found.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(found)
    }

    /// Delete a story.
    pub async fn delete(&self, id: &str) -> AppResult<()> {
        self.store
            .stories
            .write()
            .await
            .remove(id)
            .map(|_| ())
            .ok_or_else(|| AppError::NotFound(format!("Story {id}")))
    }
}

//! Story service: short-lived location-tagged posts.

use chrono::{Duration, Utc};
use lovear_common::{AppError, AppResult, config::DiscoveryConfig};
use lovear_store::entities::{NewStory, Story};
use lovear_store::{StoryRepository, UserRepository};
use serde::Deserialize;
use validator::Validate;

/// Hours a story stays live.
const STORY_TTL_HOURS: i64 = 24;

/// Story service for business logic.
#[derive(Clone)]
pub struct StoryService {
    story_repo: StoryRepository,
    user_repo: UserRepository,
    discovery: DiscoveryConfig,
}

/// Input for posting a story.
#[derive(Debug, Deserialize, Validate)]
pub struct PostStoryInput {
    #[validate(length(min = 1, max = 500))]
    pub content: String,

    #[validate(url)]
    pub media_url: Option<String>,
}

impl StoryService {
    /// Create a new story service.
    #[must_use]
    pub const fn new(
        story_repo: StoryRepository,
        user_repo: UserRepository,
        discovery: DiscoveryConfig,
    ) -> Self {
        Self {
            story_repo,
            user_repo,
            discovery,
        }
    }

    /// Post a story pinned to the author's current position. Expires after
    /// 24 hours.
    pub async fn post(&self, user_id: &str, input: PostStoryInput) -> AppResult<Story> {
        input.validate()?;

        let user = self.user_repo.get_by_id(user_id).await?;
        let now = Utc::now();
        if user.is_suspended_at(now) {
            let until = user.suspended_until.unwrap_or(now);
            return Err(AppError::Suspended(until));
        }
        let Some(position) = user.position() else {
            return Err(AppError::BadRequest(
                "No position reported; update your location first".to_string(),
            ));
        };

        self.story_repo
            .create(NewStory {
                user_id: user_id.to_string(),
                content: input.content,
                media_url: input.media_url,
                latitude: position.latitude,
                longitude: position.longitude,
                expires_at: now + Duration::hours(STORY_TTL_HOURS),
            })
            .await
    }

    /// Live stories near the user, newest first.
    pub async fn nearby(&self, user_id: &str) -> AppResult<Vec<Story>> {
        let user = self.user_repo.get_by_id(user_id).await?;
        let Some(position) = user.position() else {
            return Err(AppError::BadRequest(
                "No position reported; update your location first".to_string(),
            ));
        };

        let radius_km = if user.max_distance_km > 0.0 {
            user.max_distance_km
        } else {
            self.discovery.default_radius_km
        };
        self.story_repo
            .find_live_within(position, radius_km, Utc::now())
            .await
    }

    /// Delete a story. Owner only.
    pub async fn delete(&self, story_id: &str, user_id: &str) -> AppResult<()> {
        let story = self.story_repo.get_by_id(story_id).await?;
        if story.user_id != user_id {
            return Err(AppError::Forbidden("Not your story".to_string()));
        }
        self.story_repo.delete(story_id).await
    }
}

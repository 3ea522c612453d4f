//! Story endpoints.

use axum::{
    Json, Router,
    extract::{Path, State},
    routing::{delete, get, post},
};
use chrono::{DateTime, Utc};
use lovear_common::AppResult;
use lovear_store::entities::Story;
use serde::{Deserialize, Serialize};

use crate::{
    extractors::AuthUser,
    middleware::AppState,
    response::{ApiResponse, ok},
};
use axum::response::IntoResponse;

/// Create the stories router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(post_story))
        .route("/nearby", get(nearby))
        .route("/{id}", delete(delete_story))
}

/// Story response.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StoryResponse {
    pub id: String,
    pub user_id: String,
    pub content: String,
    pub media_url: Option<String>,
    pub latitude: f64,
    pub longitude: f64,
    pub expires_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

impl From<Story> for StoryResponse {
    fn from(s: Story) -> Self {
        Self {
            id: s.id,
            user_id: s.user_id,
            content: s.content,
            media_url: s.media_url,
            latitude: s.latitude,
            longitude: s.longitude,
            expires_at: s.expires_at,
            created_at: s.created_at,
        }
    }
}

/// Post story request.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostStoryRequest {
    pub content: String,
    pub media_url: Option<String>,
}

/// Post a story pinned to the author's current position.
async fn post_story(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Json(req): Json<PostStoryRequest>,
) -> AppResult<ApiResponse<StoryResponse>> {
    let story = state
        .story_service
        .post(
            &user.id,
            lovear_core::PostStoryInput {
                content: req.content,
                media_url: req.media_url,
            },
        )
        .await?;
    Ok(ApiResponse::ok(story.into()))
}

/// Live stories near the authenticated user.
async fn nearby(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
) -> AppResult<ApiResponse<Vec<StoryResponse>>> {
    let stories = state.story_service.nearby(&user.id).await?;
    Ok(ApiResponse::ok(stories.into_iter().map(Into::into).collect()))
}

/// Delete one of the user's own stories.
async fn delete_story(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<impl IntoResponse> {
    state.story_service.delete(&id, &user.id).await?;
    Ok(ok())
}

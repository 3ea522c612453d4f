//! Discovery, swipe and match endpoints.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    routing::{delete, get, post},
};
use chrono::{DateTime, Utc};
use lovear_common::AppResult;
use lovear_store::entities::{Gender, Match, SwipeAction, User};
use serde::{Deserialize, Serialize};

use crate::{extractors::AuthUser, middleware::AppState, response::ApiResponse};

/// Create the matching router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/discovery", get(discover))
        .route("/swipes", post(swipe))
        .route("/matches", get(list_matches))
        .route("/matches/{id}", delete(unmatch))
}

/// Public candidate profile shown in discovery.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CandidateResponse {
    pub id: String,
    pub username: String,
    pub display_name: Option<String>,
    pub bio: Option<String>,
    pub gender: Gender,
    pub age: i32,
    pub is_verified: bool,
}

impl From<User> for CandidateResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            username: user.username,
            display_name: user.display_name,
            bio: user.bio,
            gender: user.gender,
            age: user.age,
            is_verified: user.is_verified,
        }
    }
}

/// Discovery query.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DiscoveryQuery {
    pub limit: Option<usize>,
}

/// Discovery candidates for the authenticated user.
async fn discover(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Query(query): Query<DiscoveryQuery>,
) -> AppResult<ApiResponse<Vec<CandidateResponse>>> {
    let candidates = state
        .matching_service
        .discover(&user.id, query.limit)
        .await?;
    Ok(ApiResponse::ok(
        candidates.into_iter().map(Into::into).collect(),
    ))
}

/// Swipe request.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SwipeRequest {
    pub swiped_id: String,
    pub action: SwipeAction,
}

/// Match response, shaped for one side of the pair.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchResponse {
    pub id: String,
    pub partner_id: String,
    pub is_active: bool,
    pub matched_at: DateTime<Utc>,
}

impl MatchResponse {
    fn for_viewer(m: Match, viewer_id: &str) -> Self {
        // The services only hand out matches the viewer participates in.
        let partner_id = m.partner_of(viewer_id).unwrap_or(&m.user2_id).to_string();
        Self {
            id: m.id,
            partner_id,
            is_active: m.is_active,
            matched_at: m.matched_at,
        }
    }
}

/// Swipe response: the recorded swipe plus the match, if one was created.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SwipeResponse {
    pub id: String,
    pub swiped_id: String,
    pub action: SwipeAction,
    #[serde(rename = "match", skip_serializing_if = "Option::is_none")]
    pub new_match: Option<MatchResponse>,
}

/// Record a swipe.
async fn swipe(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Json(req): Json<SwipeRequest>,
) -> AppResult<ApiResponse<SwipeResponse>> {
    let outcome = state
        .matching_service
        .record_swipe(&user.id, &req.swiped_id, req.action)
        .await?;

    Ok(ApiResponse::ok(SwipeResponse {
        id: outcome.swipe.id,
        swiped_id: outcome.swipe.swiped_id,
        action: outcome.swipe.action,
        new_match: outcome
            .new_match
            .map(|m| MatchResponse::for_viewer(m, &user.id)),
    }))
}

/// Active matches for the authenticated user.
async fn list_matches(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
) -> AppResult<ApiResponse<Vec<MatchResponse>>> {
    let matches = state.matching_service.matches_for(&user.id).await?;
    Ok(ApiResponse::ok(
        matches
            .into_iter()
            .map(|m| MatchResponse::for_viewer(m, &user.id))
            .collect(),
    ))
}

/// Deactivate a match.
async fn unmatch(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<ApiResponse<MatchResponse>> {
    let m = state.matching_service.deactivate_match(&id, &user.id).await?;
    Ok(ApiResponse::ok(MatchResponse::for_viewer(m, &user.id)))
}

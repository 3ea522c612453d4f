//! Profile endpoints for the authenticated user.

use axum::{
    Json, Router,
    extract::State,
    routing::{get, patch, put},
};
use chrono::{DateTime, Utc};
use lovear_common::AppResult;
use lovear_store::entities::{Gender, LookingFor, User};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::{extractors::AuthUser, middleware::AppState, response::ApiResponse};

/// Create the users router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/me", get(me))
        .route("/me", patch(update_me))
        .route("/me/position", put(update_position))
}

/// Full self view, including wallet and account flags.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MeResponse {
    pub id: String,
    pub username: String,
    pub email: String,
    pub display_name: Option<String>,
    pub bio: Option<String>,
    pub gender: Gender,
    pub looking_for: LookingFor,
    pub age: i32,
    pub age_min: i32,
    pub age_max: i32,
    pub max_distance_km: f64,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub wallet_balance: Decimal,
    pub suspended_until: Option<DateTime<Utc>>,
    pub is_premium: bool,
    pub is_verified: bool,
    pub created_at: DateTime<Utc>,
}

impl From<User> for MeResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            username: user.username,
            email: user.email,
            display_name: user.display_name,
            bio: user.bio,
            gender: user.gender,
            looking_for: user.looking_for,
            age: user.age,
            age_min: user.age_min,
            age_max: user.age_max,
            max_distance_km: user.max_distance_km,
            latitude: user.latitude,
            longitude: user.longitude,
            wallet_balance: user.wallet_balance,
            suspended_until: user.suspended_until,
            is_premium: user.is_premium,
            is_verified: user.is_verified,
            created_at: user.created_at,
        }
    }
}

/// Get the authenticated user's profile.
async fn me(AuthUser(user): AuthUser) -> AppResult<ApiResponse<MeResponse>> {
    Ok(ApiResponse::ok(user.into()))
}

/// Profile update request.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateMeRequest {
    pub display_name: Option<String>,
    pub bio: Option<String>,
    pub looking_for: Option<LookingFor>,
    pub age_min: Option<i32>,
    pub age_max: Option<i32>,
    pub max_distance_km: Option<f64>,
}

/// Update profile fields.
async fn update_me(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Json(req): Json<UpdateMeRequest>,
) -> AppResult<ApiResponse<MeResponse>> {
    let input = lovear_core::UpdateProfileInput {
        display_name: req.display_name,
        bio: req.bio,
        looking_for: req.looking_for,
        age_min: req.age_min,
        age_max: req.age_max,
        max_distance_km: req.max_distance_km,
    };

    let updated = state.account_service.update_profile(&user.id, input).await?;
    Ok(ApiResponse::ok(updated.into()))
}

/// Position update request.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdatePositionRequest {
    pub latitude: f64,
    pub longitude: f64,
}

/// Report the user's current position.
async fn update_position(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Json(req): Json<UpdatePositionRequest>,
) -> AppResult<ApiResponse<MeResponse>> {
    let updated = state
        .account_service
        .update_position(&user.id, req.latitude, req.longitude)
        .await?;
    Ok(ApiResponse::ok(updated.into()))
}

//! Authentication endpoints.

use axum::{Json, Router, extract::State, routing::post};
use lovear_common::AppResult;
use lovear_store::entities::{Gender, LookingFor};
use serde::{Deserialize, Serialize};

use crate::{middleware::AppState, response::ApiResponse};

/// Create the auth router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/auth/register", post(register))
        .route("/auth/login", post(login))
}

/// Registration request.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    pub username: String,
    pub email: String,
    pub password: String,
    pub display_name: Option<String>,
    pub gender: Gender,
    #[serde(default)]
    pub looking_for: LookingFor,
    pub age: i32,
    pub age_min: Option<i32>,
    pub age_max: Option<i32>,
    pub max_distance_km: Option<f64>,
}

/// Session response returned by both register and login.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionResponse {
    pub id: String,
    pub username: String,
    pub token: String,
}

/// Create a new account.
async fn register(
    State(state): State<AppState>,
    Json(req): Json<RegisterRequest>,
) -> AppResult<ApiResponse<SessionResponse>> {
    let input = lovear_core::RegisterInput {
        username: req.username,
        email: req.email,
        password: req.password,
        display_name: req.display_name,
        gender: req.gender,
        looking_for: req.looking_for,
        age: req.age,
        age_min: req.age_min.unwrap_or(18),
        age_max: req.age_max.unwrap_or(99),
        max_distance_km: req.max_distance_km.unwrap_or(50.0),
    };

    let user = state.account_service.register(input).await?;

    Ok(ApiResponse::ok(SessionResponse {
        id: user.id,
        username: user.username,
        token: user.token,
    }))
}

/// Login request.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    /// Username or email.
    pub username: String,
    pub password: String,
}

/// Log in to an existing account.
async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> AppResult<ApiResponse<SessionResponse>> {
    let user = state
        .account_service
        .login(&req.username, &req.password)
        .await?;

    Ok(ApiResponse::ok(SessionResponse {
        id: user.id,
        username: user.username,
        token: user.token,
    }))
}

//! Blind date endpoints.

use axum::{
    Json, Router,
    extract::{Path, State},
    routing::{get, post},
};
use chrono::{DateTime, Utc};
use lovear_common::AppResult;
use lovear_store::entities::{BlindDate, BlindDateStatus};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::{extractors::AuthUser, middleware::AppState, response::ApiResponse};

/// Create the blind dates router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(create))
        .route("/", get(list_mine))
        .route("/nearby", get(nearby))
        .route("/{id}/join", post(join))
        .route("/{id}/cancel", post(cancel))
        .route("/{id}/complete", post(complete))
}

/// Blind date response.
///
/// The partner's identity stays hidden until the date: only participation
/// and scheduling facts are exposed.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BlindDateResponse {
    pub id: String,
    pub center_lat: f64,
    pub center_lng: f64,
    pub radius_km: f64,
    pub amount: Decimal,
    pub status: BlindDateStatus,
    pub is_mine: bool,
    pub has_partner: bool,
    pub scheduled_for: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl BlindDateResponse {
    fn for_viewer(bd: BlindDate, viewer_id: &str) -> Self {
        Self {
            is_mine: bd.user1_id == viewer_id,
            has_partner: bd.user2_id.is_some(),
            id: bd.id,
            center_lat: bd.center_lat,
            center_lng: bd.center_lng,
            radius_km: bd.radius_km,
            amount: bd.amount,
            status: bd.status,
            scheduled_for: bd.scheduled_for,
            created_at: bd.created_at,
        }
    }
}

/// Create blind date request.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateBlindDateRequest {
    pub center_lat: f64,
    pub center_lng: f64,
    pub radius_km: f64,
    pub amount: Decimal,
}

/// Raise a blind date request, escrowing the stake.
async fn create(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Json(req): Json<CreateBlindDateRequest>,
) -> AppResult<ApiResponse<BlindDateResponse>> {
    let bd = state
        .blind_date_service
        .create(
            &user.id,
            lovear_core::CreateBlindDateInput {
                center_lat: req.center_lat,
                center_lng: req.center_lng,
                radius_km: req.radius_km,
                amount: req.amount,
            },
        )
        .await?;
    Ok(ApiResponse::ok(BlindDateResponse::for_viewer(bd, &user.id)))
}

/// Blind dates involving the authenticated user.
async fn list_mine(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
) -> AppResult<ApiResponse<Vec<BlindDateResponse>>> {
    let dates = state.blind_date_service.for_user(&user.id).await?;
    Ok(ApiResponse::ok(
        dates
            .into_iter()
            .map(|bd| BlindDateResponse::for_viewer(bd, &user.id))
            .collect(),
    ))
}

/// Open requests whose search area covers the user's position.
async fn nearby(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
) -> AppResult<ApiResponse<Vec<BlindDateResponse>>> {
    let dates = state.blind_date_service.nearby(&user.id).await?;
    Ok(ApiResponse::ok(
        dates
            .into_iter()
            .map(|bd| BlindDateResponse::for_viewer(bd, &user.id))
            .collect(),
    ))
}

/// Join a pending blind date.
async fn join(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<ApiResponse<BlindDateResponse>> {
    let bd = state.blind_date_service.join(&id, &user.id).await?;
    Ok(ApiResponse::ok(BlindDateResponse::for_viewer(bd, &user.id)))
}

/// Cancel a pending blind date and refund the stake.
async fn cancel(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<ApiResponse<BlindDateResponse>> {
    let bd = state.blind_date_service.cancel(&id, &user.id).await?;
    Ok(ApiResponse::ok(BlindDateResponse::for_viewer(bd, &user.id)))
}

/// Confirm a matched blind date took place.
async fn complete(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<ApiResponse<BlindDateResponse>> {
    let bd = state.blind_date_service.complete(&id, &user.id).await?;
    Ok(ApiResponse::ok(BlindDateResponse::for_viewer(bd, &user.id)))
}

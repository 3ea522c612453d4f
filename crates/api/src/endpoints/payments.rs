//! Payment endpoints.

use axum::{
    Json, Router,
    extract::{Path, State},
    routing::{get, post},
};
use chrono::{DateTime, Utc};
use lovear_common::AppResult;
use lovear_store::entities::{Payment, PaymentStatus, PaymentType};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::{extractors::AuthUser, middleware::AppState, response::ApiResponse};

/// Create the payments router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(create))
        .route("/", get(history))
        .route("/{id}", get(get_payment))
}

/// Payment response.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentResponse {
    pub id: String,
    pub amount: Decimal,
    pub payment_type: PaymentType,
    pub violation_id: Option<String>,
    pub status: PaymentStatus,
    pub created_at: DateTime<Utc>,
    pub settled_at: Option<DateTime<Utc>>,
}

impl From<Payment> for PaymentResponse {
    fn from(p: Payment) -> Self {
        Self {
            id: p.id,
            amount: p.amount,
            payment_type: p.payment_type,
            violation_id: p.violation_id,
            status: p.status,
            created_at: p.created_at,
            settled_at: p.settled_at,
        }
    }
}

/// Create payment request.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatePaymentRequest {
    #[serde(default)]
    pub amount: Decimal,
    pub payment_type: PaymentType,
    pub violation_id: Option<String>,
}

/// Initiate a payment. Settlement happens asynchronously after the
/// configured delay; poll `GET /payments/{id}` for the outcome.
async fn create(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Json(req): Json<CreatePaymentRequest>,
) -> AppResult<ApiResponse<PaymentResponse>> {
    let payment = state
        .payment_service
        .create(
            &user.id,
            lovear_core::CreatePaymentInput {
                amount: req.amount,
                payment_type: req.payment_type,
                violation_id: req.violation_id,
            },
        )
        .await?;

    let payment_service = state.payment_service.clone();
    let payment_id = payment.id.clone();
    let delay = Duration::from_secs(state.config.payments.settle_delay_secs);
    tokio::spawn(async move {
        tokio::time::sleep(delay).await;
        if let Err(e) = payment_service.settle(&payment_id, true).await {
            tracing::error!(payment_id = %payment_id, error = %e, "Delayed settlement failed");
        }
    });

    Ok(ApiResponse::ok(payment.into()))
}

/// Payment history for the authenticated user, newest first.
async fn history(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
) -> AppResult<ApiResponse<Vec<PaymentResponse>>> {
    let payments = state.payment_service.history(&user.id).await?;
    Ok(ApiResponse::ok(payments.into_iter().map(Into::into).collect()))
}

/// Fetch a single payment.
async fn get_payment(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<ApiResponse<PaymentResponse>> {
    let payment = state.payment_service.get(&id, &user.id).await?;
    Ok(ApiResponse::ok(payment.into()))
}

//! API middleware.

use axum::{body::Body, extract::State, http::Request, middleware::Next, response::Response};
use lovear_common::Config;
use lovear_core::{
    AccountService, BlindDateService, MatchingService, MessagingService, PaymentService,
    StoryService,
};

/// Application state.
#[derive(Clone)]
pub struct AppState {
    pub account_service: AccountService,
    pub matching_service: MatchingService,
    pub messaging_service: MessagingService,
    pub blind_date_service: BlindDateService,
    pub payment_service: PaymentService,
    pub story_service: StoryService,
    pub config: Config,
}

/// Authentication middleware. Resolves a bearer token to a user and stashes
/// it in request extensions for the `AuthUser` extractor.
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut req: Request<Body>,
    next: Next,
) -> Response {
    if let Some(auth_header) = req.headers().get("Authorization")
        && let Ok(auth_str) = auth_header.to_str()
        && let Some(token) = auth_str.strip_prefix("Bearer ")
        && let Ok(user) = state.account_service.authenticate_by_token(token).await
    {
        req.extensions_mut().insert(user);
    }

    next.run(req).await
}

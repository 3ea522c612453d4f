//! API endpoints.

mod auth;
mod blind_dates;
mod matching;
mod messaging;
mod payments;
mod stories;
mod users;

use axum::Router;

use crate::middleware::AppState;

/// Create the API router.
pub fn router() -> Router<AppState> {
    Router::new()
        .merge(auth::router())
        .merge(matching::router())
        .merge(messaging::router())
        .nest("/users", users::router())
        .nest("/blind-dates", blind_dates::router())
        .nest("/payments", payments::router())
        .nest("/stories", stories::router())
}

//! Lovear-rs server entry point.

use std::net::SocketAddr;
use std::time::Duration;

use axum::{Router, middleware};
use chrono::Utc;
use lovear_api::{middleware::AppState, router as api_router};
use lovear_common::Config;
use lovear_core::{
    AccountService, BlindDateService, MatchingService, MessagingService, ModerationFilter,
    PaymentService, StoryService,
};
use lovear_store::{
    BlindDateRepository, MatchRepository, MemStore, MessageRepository, PaymentRepository,
    StoryRepository, SwipeRepository, UserRepository, ViolationRepository,
};
use tokio::signal;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Interval between blind-date expiry sweeps.
const EXPIRY_SWEEP_INTERVAL: Duration = Duration::from_secs(60);

/// Waits for a shutdown signal (SIGINT or SIGTERM).
///
/// On Unix systems, this listens for both SIGINT (Ctrl+C) and SIGTERM.
/// On Windows, this only listens for Ctrl+C.
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            info!("Received SIGINT, initiating graceful shutdown...");
        },
        () = terminate => {
            info!("Received SIGTERM, initiating graceful shutdown...");
        },
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "lovear=debug,tower_http=debug".into()),
        )
        .init();

    info!("Starting lovear-rs server...");

    // Load configuration
    let config = Config::load()?;

    // Initialize the in-memory store and repositories
    let store = MemStore::new();
    let user_repo = UserRepository::new(store.clone());
    let swipe_repo = SwipeRepository::new(store.clone());
    let match_repo = MatchRepository::new(store.clone());
    let message_repo = MessageRepository::new(store.clone());
    let blind_date_repo = BlindDateRepository::new(store.clone());
    let story_repo = StoryRepository::new(store.clone());
    let violation_repo = ViolationRepository::new(store.clone());
    let payment_repo = PaymentRepository::new(store);

    // Initialize services
    let account_service = AccountService::new(user_repo.clone());
    let matching_service = MatchingService::new(
        swipe_repo,
        match_repo.clone(),
        user_repo.clone(),
        config.discovery.clone(),
    );
    let messaging_service = MessagingService::new(
        message_repo,
        match_repo,
        user_repo.clone(),
        violation_repo.clone(),
        account_service.clone(),
        ModerationFilter::new(config.moderation.strict_mode),
        config.moderation.clone(),
    );
    let blind_date_service = BlindDateService::new(
        blind_date_repo,
        user_repo.clone(),
        account_service.clone(),
        config.blind_date.clone(),
    );
    let payment_service = PaymentService::new(
        payment_repo,
        violation_repo,
        user_repo.clone(),
        account_service.clone(),
    );
    let story_service = StoryService::new(story_repo, user_repo, config.discovery.clone());

    let state = AppState {
        account_service,
        matching_service,
        messaging_service,
        blind_date_service: blind_date_service.clone(),
        payment_service,
        story_service,
        config: config.clone(),
    };

    // Background sweep: refund blind dates that stayed unmatched past the
    // refund window.
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(EXPIRY_SWEEP_INTERVAL);
        loop {
            ticker.tick().await;
            match blind_date_service.expire_unmatched(Utc::now()).await {
                Ok(0) => {}
                Ok(expired) => info!(expired, "Expired unmatched blind dates"),
                Err(e) => tracing::error!(error = %e, "Blind date expiry sweep failed"),
            }
        }
    });

    // Build router
    let app = Router::new()
        .nest("/api", api_router())
        .layer(middleware::from_fn_with_state(
            state.clone(),
            lovear_api::middleware::auth_middleware,
        ))
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state);

    // Start server with graceful shutdown
    let addr = SocketAddr::from(([0, 0, 0, 0], config.server.port));
    info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server shutdown complete");
    Ok(())
}

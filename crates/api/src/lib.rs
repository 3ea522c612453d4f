//! HTTP API layer for lovear-rs.
//!
//! This crate provides the REST API:
//!
//! - **Endpoints**: auth, profiles, discovery/swipes/matches, messaging,
//!   blind dates, payments and stories
//! - **Extractors**: bearer-token authentication
//! - **Middleware**: application state and token resolution
//!
//! Built on Axum 0.8 with Tower middleware stack.

pub mod endpoints;
pub mod extractors;
pub mod middleware;
pub mod response;

pub use endpoints::router;

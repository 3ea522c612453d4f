//! Core business logic for lovear-rs.

pub mod services;

pub use services::*;

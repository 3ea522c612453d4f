//! Common utilities and shared types for lovear-rs.
//!
//! This crate provides foundational components used across all lovear-rs
//! crates:
//!
//! - **Configuration**: Application settings via [`Config`]
//! - **Error handling**: Unified error types via [`AppError`] and [`AppResult`]
//! - **Geo math**: Planar nearby-query distance via [`geo`]
//! - **ID Generation**: Monotonic ULID identifiers via [`IdGenerator`]
//!
//! # Example
//!
//! ```no_run
//! use lovear_common::{AppResult, Config, IdGenerator};
//!
//! fn example() -> AppResult<()> {
//!     let config = Config::load()?;
//!     let id_gen = IdGenerator::new();
//!     let id = id_gen.generate();
//!     println!("Generated ID: {id}");
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod error;
pub mod geo;
pub mod id;

pub use config::Config;
pub use error::{AppError, AppResult};
pub use geo::{KM_PER_DEGREE, Position, planar_distance_km, within_radius};
pub use id::IdGenerator;

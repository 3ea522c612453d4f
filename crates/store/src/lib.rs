//! In-memory storage layer for lovear-rs.
//!
//! All entity state is process-lifetime only: a [`MemStore`] holds one keyed
//! map per entity type and is shared (via `Arc`) by one repository struct
//! per entity. Repositories own identity assignment (monotonic ULIDs) and
//! all read/filter queries; queries are linear scans with predicates.
//!
//! "Not found" is the only storage-level error condition, surfaced as a
//! distinguished value (`Option` from the `find_` variants, `AppError` from
//! the `get_` variants) — never a panic.

pub mod entities;
pub mod mem;
pub mod repositories;

pub use mem::MemStore;
pub use repositories::{
    BlindDateRepository, MatchRepository, MessageRepository, PaymentRepository, StoryRepository,
    SwipeRepository, UserRepository, ViolationRepository,
};

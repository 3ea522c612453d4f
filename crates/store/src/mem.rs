//! In-memory storage backend.

use crate::entities::{BlindDate, Match, Message, Payment, Story, Swipe, User, Violation};
use lovear_common::IdGenerator;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

/// Process-lifetime keyed storage shared by every repository.
///
/// One lock per entity type; a single repository call takes the locks it
/// needs for the duration of the call, so individual operations are atomic
/// with respect to each other. Constructed once at process start and passed
/// (dependency-injected) into the repositories — there is no ambient global
/// store.
#[derive(Debug, Default)]
pub struct MemStore {
    pub(crate) users: RwLock<HashMap<String, User>>,
    pub(crate) swipes: RwLock<HashMap<String, Swipe>>,
    pub(crate) matches: RwLock<HashMap<String, Match>>,
    pub(crate) messages: RwLock<HashMap<String, Message>>,
    pub(crate) blind_dates: RwLock<HashMap<String, BlindDate>>,
    pub(crate) stories: RwLock<HashMap<String, Story>>,
    pub(crate) violations: RwLock<HashMap<String, Violation>>,
    pub(crate) payments: RwLock<HashMap<String, Payment>>,
    pub(crate) id_gen: IdGenerator,
}

impl MemStore {
    /// Create a new empty store behind an `Arc` for sharing across
    /// repositories.
    #[must_use]
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Assign the next entity id.
    pub(crate) fn next_id(&self) -> String {
        self.id_gen.generate()
    }
}

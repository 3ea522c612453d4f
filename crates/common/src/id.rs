//! ID generation utilities.

use std::fmt;
use std::sync::{Arc, Mutex, PoisonError};
use ulid::{Generator, Ulid};

/// ID generator for entities.
///
/// Wraps a monotonic ULID generator so ids handed out by one process are
/// strictly lexicographically increasing, even within the same millisecond.
#[derive(Clone, Default)]
pub struct IdGenerator {
    inner: Arc<Mutex<Generator>>,
}

// `ulid::Generator` has no Debug impl, so the derive is off the table.
impl fmt::Debug for IdGenerator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IdGenerator").finish_non_exhaustive()
    }
}

impl IdGenerator {
    /// Create a new ID generator.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Generate a new ULID-based ID.
    ///
    /// ULIDs are:
    /// - Lexicographically sortable
    /// - Monotonically increasing (enforced by the shared generator)
    /// - Shorter than UUIDs when represented as strings
    #[must_use]
    pub fn generate(&self) -> String {
        let mut generator = self
            .inner
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        // The random component can only overflow ~2^80 times within one
        // millisecond; fall back to a fresh ULID if it ever does.
        generator
            .generate()
            .unwrap_or_else(|_| Ulid::new())
            .to_string()
            .to_lowercase()
    }

    /// Generate a cryptographically random access token.
    #[must_use]
    pub fn generate_token(&self) -> String {
        // Two independent ULIDs' random components; no time ordering wanted
        // for tokens, so plain Ulid::new is used here.
        format!("{}{}", Ulid::new().to_string().to_lowercase(), Ulid::new().to_string().to_lowercase())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_ulid() {
        let id_gen = IdGenerator::new();
        let id1 = id_gen.generate();
        let id2 = id_gen.generate();

        assert_eq!(id1.len(), 26);
        assert_eq!(id2.len(), 26);
        assert_ne!(id1, id2);
    }

    #[test]
    fn test_generated_ids_are_monotonic() {
        let id_gen = IdGenerator::new();
        let ids: Vec<String> = (0..1000).map(|_| id_gen.generate()).collect();

        let mut sorted = ids.clone();
        sorted.sort();
        assert_eq!(ids, sorted);
    }

    #[test]
    fn test_debug_is_opaque() {
        assert_eq!(format!("{:?}", IdGenerator::new()), "IdGenerator { .. }");
    }

    #[test]
    fn test_generate_token() {
        let id_gen = IdGenerator::new();
        let token = id_gen.generate_token();

        assert_eq!(token.len(), 52);
        assert_ne!(token, id_gen.generate_token());
    }
}

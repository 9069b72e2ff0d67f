//! Entity id generation
//!
//! All entities are keyed by opaque string ids minted at creation time.
//! The generator is injectable so tests can produce deterministic ids;
//! production code uses random UUIDs.

use std::sync::atomic::{AtomicU64, Ordering};

use uuid::Uuid;

/// A source of fresh entity ids
///
/// Implementations must never return the same id twice.
pub trait IdGenerator: Send + Sync {
    /// Mint a new unique id
    fn generate(&self) -> String;
}

/// Default generator backed by random v4 UUIDs
#[derive(Debug, Default)]
pub struct UuidIds;

impl IdGenerator for UuidIds {
    fn generate(&self) -> String {
        Uuid::new_v4().to_string()
    }
}

/// Deterministic generator producing `<prefix>-1`, `<prefix>-2`, ...
///
/// Intended for tests that need to predict or assert on generated ids.
#[derive(Debug)]
pub struct SequentialIds {
    prefix: String,
    counter: AtomicU64,
}

impl SequentialIds {
    /// Create a generator with the given id prefix
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            counter: AtomicU64::new(0),
        }
    }
}

impl IdGenerator for SequentialIds {
    fn generate(&self) -> String {
        let n = self.counter.fetch_add(1, Ordering::Relaxed) + 1;
        format!("{}-{}", self.prefix, n)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_uuid_ids_are_unique() {
        let ids = UuidIds;
        let a = ids.generate();
        let b = ids.generate();
        assert_ne!(a, b);
        // v4 UUIDs are 36 chars in canonical form
        assert_eq!(a.len(), 36);
    }

    #[test]
    fn test_sequential_ids() {
        let ids = SequentialIds::new("q");
        assert_eq!(ids.generate(), "q-1");
        assert_eq!(ids.generate(), "q-2");
        assert_eq!(ids.generate(), "q-3");
    }
}

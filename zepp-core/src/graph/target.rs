//! Target identities.
//!
//! Every observable thing (a plain object, a computed, a memo) gets a
//! `TargetId` when it is created. The dependency graph is keyed by these ids
//! rather than by the targets themselves, so the graph never keeps a target
//! alive.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

/// Unique identifier for an observable target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TargetId(u64);

impl TargetId {
    /// Generate a new unique target ID.
    pub fn new() -> Self {
        static COUNTER: AtomicU64 = AtomicU64::new(0);
        Self(COUNTER.fetch_add(1, Ordering::Relaxed))
    }

    /// Get the raw ID value.
    pub fn raw(&self) -> u64 {
        self.0
    }
}

impl Default for TargetId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for TargetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn target_ids_are_unique() {
        let id1 = TargetId::new();
        let id2 = TargetId::new();
        assert_ne!(id1, id2);
        assert!(id2.raw() > id1.raw());
    }

    #[test]
    fn display_uses_raw_value() {
        let id = TargetId::new();
        assert_eq!(id.to_string(), format!("#{}", id.raw()));
    }
}

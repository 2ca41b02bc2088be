//! Computed Implementation
//!
//! A `Computed` is a lazily evaluated, cached derived value.
//!
//! # How Computeds Work
//!
//! 1. Nothing runs at creation. The first [`value`](Computed::value) call
//!    installs an internal effect, which computes and caches the result.
//!
//! 2. When a dependency changes and nobody has read the computed from
//!    inside an effect yet, it only marks itself dirty. The next read
//!    recomputes.
//!
//! 3. Once an effect has read it, a dependency change recomputes right away
//!    and re-runs the effects that read it.
//!
//! # Why This Matters
//!
//! A computed nobody observes costs nothing until it is read again, no
//! matter how often its inputs change.

use std::fmt;
use std::sync::Arc;

use super::derived::{DerivedCell, EqualsFn, Recompute};
use crate::graph::TargetId;

/// A lazily evaluated derived value.
///
/// Cloning a `Computed` creates a new handle to the same cached value.
pub struct Computed<T>
where
    T: Clone + Send + Sync + 'static,
{
    cell: Arc<DerivedCell<T>>,
}

impl<T> Computed<T>
where
    T: Clone + Send + Sync + 'static,
{
    /// Create a computed value. The getter does not run until the first
    /// read.
    pub fn new<F>(getter: F) -> Self
    where
        F: Fn() -> T + Send + Sync + 'static,
    {
        Self {
            cell: DerivedCell::new(Recompute::Lazy, Arc::new(getter), None),
        }
    }

    /// Create a computed value that re-runs its readers only when `equals`
    /// says the recomputed value differs.
    pub fn with_equals<F, E>(getter: F, equals: E) -> Self
    where
        F: Fn() -> T + Send + Sync + 'static,
        E: Fn(&T, &T) -> bool + Send + Sync + 'static,
    {
        let equals: EqualsFn<T> = Arc::new(equals);
        Self {
            cell: DerivedCell::new(Recompute::Lazy, Arc::new(getter), Some(equals)),
        }
    }

    /// Get the current value, recomputing if dirty.
    ///
    /// Inside an effect, this also registers the effect as a dependent.
    pub fn value(&self) -> T {
        self.cell.read()
    }

    /// Check whether the next read will recompute.
    pub fn is_dirty(&self) -> bool {
        self.cell.is_dirty()
    }

    pub fn id(&self) -> TargetId {
        self.cell.id()
    }
}

impl<T> Clone for Computed<T>
where
    T: Clone + Send + Sync + 'static,
{
    fn clone(&self) -> Self {
        Self {
            cell: Arc::clone(&self.cell),
        }
    }
}

impl<T> fmt::Debug for Computed<T>
where
    T: Clone + Send + Sync + 'static,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Computed")
            .field("id", &self.id())
            .field("dirty", &self.is_dirty())
            .finish()
    }
}

/// Create a lazily evaluated derived value.
pub fn computed<T, F>(getter: F) -> Computed<T>
where
    T: Clone + Send + Sync + 'static,
    F: Fn() -> T + Send + Sync + 'static,
{
    Computed::new(getter)
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------

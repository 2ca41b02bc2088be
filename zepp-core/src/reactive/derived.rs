//! Derived Value Cell
//!
//! The shared primitive behind [`Computed`](super::Computed) and
//! [`Memo`](super::Memo). A cell caches the result of a getter and is itself
//! a graph target under the key `"value"`, so derived values can be read by
//! effects exactly like object properties.
//!
//! # Recompute Policies
//!
//! - [`Recompute::Lazy`]: the internal effect is installed on the first
//!   read. On later invalidations the cell recomputes and re-triggers only
//!   if somebody has read it from inside an effect; otherwise it just marks
//!   itself dirty and recomputes on the next read.
//!
//! - [`Recompute::Eager`]: the internal effect is installed at creation and
//!   recomputes on every invalidation.
//!
//! Either way, dependents are triggered only when the equality function (if
//! any) says the new value differs from the cached one.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, OnceLock, Weak};

use parking_lot::RwLock;
use tracing::debug;

use super::context::ReactiveContext;
use super::effect::{Effect, EffectOptions};
use crate::graph::{self, TargetId};

/// Key under which a derived value is tracked.
pub(crate) const VALUE_KEY: &str = "value";

/// Equality used to decide whether a recomputed value changed.
pub type EqualsFn<T> = Arc<dyn Fn(&T, &T) -> bool + Send + Sync>;

/// Getter of a derived value.
pub(crate) type GetterFn<T> = Arc<dyn Fn() -> T + Send + Sync>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Recompute {
    Lazy,
    Eager,
}

pub(crate) struct DerivedCell<T> {
    id: TargetId,
    policy: Recompute,
    getter: GetterFn<T>,
    equals: Option<EqualsFn<T>>,
    value: RwLock<Option<T>>,
    dirty: AtomicBool,
    /// Set once the value has been read from inside an effect.
    depended: AtomicBool,
    effect: OnceLock<Effect>,
}

impl<T> DerivedCell<T>
where
    T: Clone + Send + Sync + 'static,
{
    pub(crate) fn new(policy: Recompute, getter: GetterFn<T>, equals: Option<EqualsFn<T>>) -> Arc<Self> {
        Arc::new(Self {
            id: TargetId::new(),
            policy,
            getter,
            equals,
            value: RwLock::new(None),
            dirty: AtomicBool::new(true),
            depended: AtomicBool::new(false),
            effect: OnceLock::new(),
        })
    }

    pub(crate) fn id(&self) -> TargetId {
        self.id
    }

    /// Install the internal effect if it is not installed yet.
    ///
    /// The effect is stored before its first run computes the initial
    /// value, so a getter that panics on that run leaves exactly one
    /// installed effect behind.
    pub(crate) fn ensure_installed(self: &Arc<Self>) -> &Effect {
        let mut installed = false;
        let effect = self.effect.get_or_init(|| {
            installed = true;
            let weak = Arc::downgrade(self);
            match self.policy {
                Recompute::Eager => Effect::pending(
                    move || with_cell(&weak, |cell| cell.refresh()),
                    EffectOptions::new(),
                ),
                Recompute::Lazy => {
                    let on_invalidate = weak.clone();
                    Effect::pending(
                        move || with_cell(&weak, |cell| {
                            cell.recompute();
                        }),
                        EffectOptions::new()
                            .scheduler(move || with_cell(&on_invalidate, |cell| cell.invalidate())),
                    )
                }
            }
        });

        if installed {
            effect.run();
        }
        effect
    }

    /// Read the cached value, recomputing first when dirty.
    ///
    /// Inside an effect the read is tracked and the cell remembers that it
    /// has a dependent.
    pub(crate) fn read(self: &Arc<Self>) -> T {
        let effect = self.ensure_installed();

        if self.dirty.load(Ordering::SeqCst) {
            // Recompute under the internal effect so the getter's reads are
            // attributed to this cell, not to the reader.
            let _ctx = ReactiveContext::enter(effect.clone());
            self.recompute();
        }

        if ReactiveContext::is_active() {
            graph::track(self.id, VALUE_KEY);
            self.depended.store(true, Ordering::SeqCst);
        }

        self.cached()
    }

    pub(crate) fn is_dirty(&self) -> bool {
        self.dirty.load(Ordering::SeqCst)
    }

    fn cached(&self) -> T {
        self.value
            .read()
            .clone()
            .expect("derived value is computed before it is read")
    }

    /// Run the getter and store the result. Returns whether the value
    /// changed under the cell's equality.
    fn recompute(&self) -> bool {
        let next = (self.getter)();
        let previous = self.value.read().clone();

        let changed = match (&previous, &self.equals) {
            (Some(previous), Some(equals)) => !equals(previous, &next),
            _ => true,
        };

        *self.value.write() = Some(next);
        self.dirty.store(false, Ordering::SeqCst);
        drop(previous);

        debug!(derived = %self.id, changed, "derived value recomputed");
        changed
    }

    /// Recompute and notify dependents when the value changed.
    fn refresh(&self) {
        if self.recompute() {
            graph::trigger(self.id, VALUE_KEY);
        }
    }

    /// A dependency of a lazy cell changed.
    fn invalidate(&self) {
        if self.depended.load(Ordering::SeqCst) {
            self.refresh();
        } else {
            self.dirty.store(true, Ordering::SeqCst);
        }
    }
}

fn with_cell<T>(weak: &Weak<DerivedCell<T>>, f: impl FnOnce(&DerivedCell<T>)) {
    if let Some(cell) = weak.upgrade() {
        f(&cell);
    }
}

impl<T> Drop for DerivedCell<T> {
    fn drop(&mut self) {
        if let Some(effect) = self.effect.get() {
            effect.dispose();
        }
        graph::forget(self.id);
    }
}

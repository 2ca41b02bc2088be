//! Effect Implementation
//!
//! An Effect is a computation that re-runs whenever a property it read
//! changes.
//!
//! # How Effects Work
//!
//! 1. When created, the effect runs its body immediately. Every tracked
//!    read during that run records the effect in the dependency graph.
//!
//! 2. When one of those properties is written, [`trigger`](crate::graph::trigger)
//!    runs the effect again, synchronously, before the write returns.
//!
//! 3. Every run re-tracks its reads. Edges from earlier runs are kept (see
//!    the graph module's known limitation).
//!
//! # Schedulers
//!
//! An effect may carry a scheduler. The first run always executes the body;
//! every later run executes the scheduler instead, still with the effect
//! installed as the active effect. Derived values use this to swap a full
//! recomputation for cheap invalidation logic.
//!
//! # Identity
//!
//! Cloning an `Effect` clones the handle. Two handles are equal when they
//! refer to the same registration; re-creating an equivalent closure gives a
//! different effect.

use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::atomic::{AtomicBool, AtomicU64, AtomicUsize, Ordering};
use std::sync::Arc;

use indexmap::IndexSet;
use parking_lot::Mutex;
use tracing::debug;

use super::context::ReactiveContext;
use crate::graph::{self, TargetId};

/// Unique identifier for an effect.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct EffectId(u64);

impl EffectId {
    /// Generate a new unique effect ID.
    ///
    /// Uses an atomic counter to ensure uniqueness across threads.
    pub fn new() -> Self {
        static COUNTER: AtomicU64 = AtomicU64::new(0);
        Self(COUNTER.fetch_add(1, Ordering::Relaxed))
    }
}

impl Default for EffectId {
    fn default() -> Self {
        Self::new()
    }
}

/// Body or scheduler callback of an effect.
pub type EffectFn = Arc<dyn Fn() + Send + Sync>;

/// Options accepted by [`Effect::with_options`].
#[derive(Clone, Default)]
pub struct EffectOptions {
    scheduler: Option<EffectFn>,
}

impl EffectOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Run `scheduler` instead of the body on every run after the first.
    pub fn scheduler<F>(mut self, scheduler: F) -> Self
    where
        F: Fn() + Send + Sync + 'static,
    {
        self.scheduler = Some(Arc::new(scheduler));
        self
    }
}

impl fmt::Debug for EffectOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EffectOptions")
            .field("scheduler", &self.scheduler.is_some())
            .finish()
    }
}

struct EffectInner {
    id: EffectId,

    body: EffectFn,

    scheduler: Option<EffectFn>,

    /// Set once the first run has started.
    initialized: AtomicBool,

    disposed: AtomicBool,

    /// Completed runs.
    run_count: AtomicUsize,

    /// Edges this effect has been recorded on, in the order they were
    /// first tracked.
    dependencies: Mutex<IndexSet<(TargetId, String)>>,
}

/// A computation that re-runs when its dependencies change.
///
/// # Example
///
/// ```rust
/// use zepp_core::{effect, reactive, record};
///
/// let state = reactive(record! { "count" => 0 }).into_reactive().unwrap();
///
/// let view = state.clone();
/// effect(move || {
///     println!("count is {:?}", view.get("count"));
/// });
///
/// state.set("count", 5); // prints: count is Some(Number(5.0))
/// ```
#[derive(Clone)]
pub struct Effect {
    inner: Arc<EffectInner>,
}

impl Effect {
    /// Create a new effect and run it once immediately.
    pub fn new<F>(body: F) -> Self
    where
        F: Fn() + Send + Sync + 'static,
    {
        Self::with_options(body, EffectOptions::default())
    }

    /// Create a new effect with options and run it once immediately.
    pub fn with_options<F>(body: F, options: EffectOptions) -> Self
    where
        F: Fn() + Send + Sync + 'static,
    {
        let effect = Self::pending(body, options);
        effect.run();
        effect
    }

    /// Create an effect without running it. The first [`run`](Self::run)
    /// executes the body.
    pub(crate) fn pending<F>(body: F, options: EffectOptions) -> Self
    where
        F: Fn() + Send + Sync + 'static,
    {
        let effect = Self {
            inner: Arc::new(EffectInner {
                id: EffectId::new(),
                body: Arc::new(body),
                scheduler: options.scheduler,
                initialized: AtomicBool::new(false),
                disposed: AtomicBool::new(false),
                run_count: AtomicUsize::new(0),
                dependencies: Mutex::new(IndexSet::new()),
            }),
        };

        debug!(effect = ?effect.id(), scheduled = effect.inner.scheduler.is_some(), "effect registered");
        effect
    }

    /// Get the effect's unique ID.
    pub fn id(&self) -> EffectId {
        self.inner.id
    }

    /// Run the effect.
    ///
    /// Installs the effect as the active effect for the duration of the run
    /// and restores the previous one afterwards, also when the body panics.
    /// A disposed effect does nothing.
    pub fn run(&self) {
        if self.is_disposed() {
            return;
        }

        let _ctx = ReactiveContext::enter(self.clone());

        let first_run = !self.inner.initialized.swap(true, Ordering::SeqCst);
        match (&self.inner.scheduler, first_run) {
            (Some(scheduler), false) => scheduler(),
            _ => (self.inner.body)(),
        }

        self.inner.run_count.fetch_add(1, Ordering::SeqCst);
    }

    /// Stop the effect and remove all of its edges from the graph.
    pub fn dispose(&self) {
        if self.inner.disposed.swap(true, Ordering::SeqCst) {
            return;
        }

        let edges = std::mem::take(&mut *self.inner.dependencies.lock());
        graph::untrack_all(self, &edges);

        debug!(effect = ?self.id(), edges = edges.len(), "effect disposed");
    }

    /// Check if the effect has been disposed.
    pub fn is_disposed(&self) -> bool {
        self.inner.disposed.load(Ordering::SeqCst)
    }

    /// Get the number of completed runs.
    pub fn run_count(&self) -> usize {
        self.inner.run_count.load(Ordering::SeqCst)
    }

    /// Get the number of `(target, key)` edges this effect is recorded on.
    pub fn dependency_count(&self) -> usize {
        self.inner.dependencies.lock().len()
    }

    pub(crate) fn record_dependency(&self, target: TargetId, key: &str) {
        if self.is_disposed() {
            return;
        }
        self.inner
            .dependencies
            .lock()
            .insert((target, key.to_owned()));
    }

    pub(crate) fn forget_dependency(&self, target: TargetId, key: &str) {
        self.inner
            .dependencies
            .lock()
            .shift_remove(&(target, key.to_owned()));
    }
}

impl PartialEq for Effect {
    fn eq(&self, other: &Self) -> bool {
        self.inner.id == other.inner.id
    }
}

impl Eq for Effect {}

impl Hash for Effect {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.inner.id.hash(state);
    }
}

impl fmt::Debug for Effect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Effect")
            .field("id", &self.inner.id)
            .field("run_count", &self.run_count())
            .field("dependency_count", &self.dependency_count())
            .field("disposed", &self.is_disposed())
            .finish()
    }
}

/// Register `body` as an effect and run it once immediately.
pub fn effect<F>(body: F) -> Effect
where
    F: Fn() + Send + Sync + 'static,
{
    Effect::new(body)
}

/// Register `body` as an effect with options.
pub fn effect_with<F>(body: F, options: EffectOptions) -> Effect
where
    F: Fn() + Send + Sync + 'static,
{
    Effect::with_options(body, options)
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------

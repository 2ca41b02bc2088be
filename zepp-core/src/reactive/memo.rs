//! Memo Implementation
//!
//! A Memo is an eagerly recomputed derived value.
//!
//! # How Memos Work
//!
//! 1. The getter runs once at creation, inside the memo's internal effect.
//!
//! 2. Whenever a dependency changes, the getter runs again right away.
//!
//! 3. The new result is compared with the cached one. Only when they differ
//!    are the memo's own dependents re-run.
//!
//! # Why This Matters
//!
//! Downstream effects are insulated from upstream churn that does not change
//! the derived result: a memo over `floor(count / 10)` does not wake its
//! readers when `count` goes from 5 to 7.

use std::fmt;
use std::sync::Arc;

use super::derived::{DerivedCell, EqualsFn, Recompute};
use crate::graph::TargetId;
use crate::state::SameValue;

/// Options accepted by [`Memo::with_options`].
pub struct MemoOptions<T> {
    equals: Option<EqualsFn<T>>,
}

impl<T> MemoOptions<T> {
    pub fn new() -> Self {
        Self { equals: None }
    }

    /// Use `equals` instead of [`SameValue`] to detect changes.
    pub fn equals<E>(mut self, equals: E) -> Self
    where
        E: Fn(&T, &T) -> bool + Send + Sync + 'static,
    {
        self.equals = Some(Arc::new(equals));
        self
    }
}

impl<T> Default for MemoOptions<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> fmt::Debug for MemoOptions<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MemoOptions")
            .field("equals", &self.equals.is_some())
            .finish()
    }
}

/// An eagerly recomputed derived value.
///
/// Cloning a `Memo` creates a new handle to the same cached value.
pub struct Memo<T>
where
    T: Clone + Send + Sync + 'static,
{
    cell: Arc<DerivedCell<T>>,
}

impl<T> Memo<T>
where
    T: Clone + Send + Sync + SameValue + 'static,
{
    /// Create a memo and compute its first value.
    pub fn new<F>(getter: F) -> Self
    where
        F: Fn() -> T + Send + Sync + 'static,
    {
        Self::with_options(getter, MemoOptions::default())
    }

    /// Create a memo with options and compute its first value.
    pub fn with_options<F>(getter: F, options: MemoOptions<T>) -> Self
    where
        F: Fn() -> T + Send + Sync + 'static,
    {
        let equals = options
            .equals
            .unwrap_or_else(|| Arc::new(|a: &T, b: &T| a.same_value(b)));
        Self::with_equals_fn(getter, equals)
    }
}

impl<T> Memo<T>
where
    T: Clone + Send + Sync + 'static,
{
    /// Create a memo for a type without [`SameValue`], using `equals`.
    pub fn with_equals<F, E>(getter: F, equals: E) -> Self
    where
        F: Fn() -> T + Send + Sync + 'static,
        E: Fn(&T, &T) -> bool + Send + Sync + 'static,
    {
        Self::with_equals_fn(getter, Arc::new(equals))
    }

    fn with_equals_fn<F>(getter: F, equals: EqualsFn<T>) -> Self
    where
        F: Fn() -> T + Send + Sync + 'static,
    {
        let cell = DerivedCell::new(Recompute::Eager, Arc::new(getter), Some(equals));
        cell.ensure_installed();
        Self { cell }
    }

    /// Get the current value.
    ///
    /// Inside an effect, this also registers the effect as a dependent.
    pub fn get(&self) -> T {
        self.cell.read()
    }

    /// The memo as an accessor function.
    pub fn accessor(&self) -> impl Fn() -> T + Send + Sync + 'static {
        let memo = self.clone();
        move || memo.get()
    }

    pub fn id(&self) -> TargetId {
        self.cell.id()
    }
}

impl<T> Clone for Memo<T>
where
    T: Clone + Send + Sync + 'static,
{
    fn clone(&self) -> Self {
        Self {
            cell: Arc::clone(&self.cell),
        }
    }
}

impl<T> fmt::Debug for Memo<T>
where
    T: Clone + Send + Sync + fmt::Debug + 'static,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Memo").field("id", &self.id()).finish()
    }
}

/// Create an eagerly recomputed derived value and return its accessor.
pub fn memo<T, F>(getter: F) -> Memo<T>
where
    T: Clone + Send + Sync + SameValue + 'static,
    F: Fn() -> T + Send + Sync + 'static,
{
    Memo::new(getter)
}

/// Create an eagerly recomputed derived value with options.
pub fn memo_with<T, F>(getter: F, options: MemoOptions<T>) -> Memo<T>
where
    T: Clone + Send + Sync + SameValue + 'static,
    F: Fn() -> T + Send + Sync + 'static,
{
    Memo::with_options(getter, options)
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reactive::Effect;
    use crate::record;
    use crate::state::Reactive;
    use std::sync::atomic::{AtomicI32, Ordering};

    fn floor_tens(state: &Reactive) -> Memo<f64> {
        let view = state.clone();
        Memo::new(move || (view.get_as::<f64>("value").unwrap_or(0.0) / 10.0).floor())
    }

    fn count_runs(memo: &Memo<f64>) -> Arc<AtomicI32> {
        let runs = Arc::new(AtomicI32::new(0));
        let runs_clone = runs.clone();
        let reader = memo.clone();
        Effect::new(move || {
            reader.get();
            runs_clone.fetch_add(1, Ordering::SeqCst);
        });
        runs
    }

    #[test]
    fn memo_computes_on_creation() {
        let call_count = Arc::new(AtomicI32::new(0));
        let call_count_clone = call_count.clone();

        let memo = Memo::new(move || {
            call_count_clone.fetch_add(1, Ordering::SeqCst);
            42
        });

        assert_eq!(call_count.load(Ordering::SeqCst), 1);
        assert_eq!(memo.get(), 42);
        assert_eq!(memo.get(), 42);
        assert_eq!(call_count.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn memo_recomputes_eagerly() {
        let state = record! { "value" => 5 }.reactive();
        let call_count = Arc::new(AtomicI32::new(0));
        let call_count_clone = call_count.clone();

        let view = state.clone();
        let _memo = Memo::new(move || {
            call_count_clone.fetch_add(1, Ordering::SeqCst);
            view.get("value")
        });

        state.set("value", 6);
        state.set("value", 7);
        assert_eq!(call_count.load(Ordering::SeqCst), 3);
    }

    #[test]
    fn unchanged_result_does_not_trigger_dependents() {
        let state = record! { "value" => 5 }.reactive();
        let tens = floor_tens(&state);
        let runs = count_runs(&tens);

        state.set("value", 7);
        assert_eq!(tens.get(), 0.0);
        assert_eq!(runs.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn changed_result_triggers_dependents() {
        let state = record! { "value" => 5 }.reactive();
        let tens = floor_tens(&state);
        let runs = count_runs(&tens);

        state.set("value", 15);
        assert_eq!(tens.get(), 1.0);
        assert_eq!(runs.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn nan_results_count_as_unchanged() {
        let state = record! { "value" => 1 }.reactive();
        let view = state.clone();
        let ratio = Memo::new(move || {
            view.get_as::<f64>("value").unwrap_or(0.0);
            f64::NAN
        });
        let runs = count_runs(&ratio);

        state.set("value", 2);
        assert_eq!(runs.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn custom_equality_is_used() {
        let state = record! { "value" => 1 }.reactive();
        let view = state.clone();
        let always_same = Memo::with_options(
            move || view.get_as::<f64>("value").unwrap_or(0.0),
            MemoOptions::new().equals(|_: &f64, _: &f64| true),
        );
        let runs = count_runs(&always_same);

        state.set("value", 100);
        assert_eq!(runs.load(Ordering::SeqCst), 1);
        // The cache still follows the source.
        assert_eq!(always_same.get(), 100.0);
    }

    #[test]
    fn accessor_reads_the_memo() {
        let memo = Memo::new(|| String::from("ready"));
        let read = memo.accessor();
        assert_eq!(read(), "ready");
    }

    #[test]
    fn memo_clone_shares_state() {
        let memo1 = Memo::new(|| 42);
        let memo2 = memo1.clone();

        assert_eq!(memo1.id(), memo2.id());
        assert_eq!(memo2.get(), 42);
    }

    #[test]
    fn memo_depends_on_memo() {
        let state = record! { "value" => 5 }.reactive();

        let view = state.clone();
        let doubled = Memo::new(move || view.get_as::<f64>("value").unwrap_or(0.0) * 2.0);

        let upstream = doubled.clone();
        let plus_ten = Memo::new(move || upstream.get() + 10.0);

        assert_eq!(doubled.get(), 10.0);
        assert_eq!(plus_ten.get(), 20.0);

        state.set("value", 10);
        assert_eq!(doubled.get(), 20.0);
        assert_eq!(plus_ten.get(), 30.0);
    }
}

//! Integration Tests for the Reactive Runtime
//!
//! These tests verify that records, effects, derived values, watchers and
//! composition views work together correctly.

use std::panic::{self, AssertUnwindSafe};
use std::sync::atomic::{AtomicI32, Ordering};
use std::sync::Arc;

use parking_lot::Mutex;
use zepp_core::{
    computed, effect, graph, memo, merge, merge_props, reactive, record, watch, Effect,
    EffectOptions, Reactive, Source, Value, WriteTarget,
};

fn counter() -> (Arc<AtomicI32>, Arc<AtomicI32>) {
    let count = Arc::new(AtomicI32::new(0));
    (count.clone(), count)
}

/// Wrapping is idempotent and identity-stable.
#[test]
fn reactive_is_idempotent() {
    let object = record! { "count" => 0 };
    let once = reactive(object.clone());

    assert_eq!(reactive(once.clone()), once);
    assert_eq!(reactive(object), once);
}

/// A changed write re-runs the effect exactly once; an equal write does not.
#[test]
fn effect_reruns_only_on_change() {
    let state = record! { "count" => 5, "ratio" => f64::NAN }.reactive();
    let (runs, runs_clone) = counter();

    let view = state.clone();
    effect(move || {
        view.get("count");
        view.get("ratio");
        runs_clone.fetch_add(1, Ordering::SeqCst);
    });
    assert_eq!(runs.load(Ordering::SeqCst), 1);

    state.set("count", 5);
    state.set("ratio", f64::NAN);
    assert_eq!(runs.load(Ordering::SeqCst), 1);

    state.set("count", 6);
    assert_eq!(runs.load(Ordering::SeqCst), 2);
}

/// Reads after a nested effect finishes still belong to the outer effect.
#[test]
fn nested_effect_restores_outer() {
    let state = record! { "outer" => 0, "inner" => 0 }.reactive();
    let (outer_runs, outer_clone) = counter();
    let (inner_runs, inner_clone) = counter();

    let view = state.clone();
    let outer = effect(move || {
        outer_clone.fetch_add(1, Ordering::SeqCst);

        let inner_view = view.clone();
        let inner_clone = inner_clone.clone();
        effect(move || {
            inner_view.get("inner");
            inner_clone.fetch_add(1, Ordering::SeqCst);
        });

        view.get("outer");
    });

    assert_eq!(outer.dependency_count(), 1);

    state.set("outer", 1);
    assert_eq!(outer_runs.load(Ordering::SeqCst), 2);
    // The outer run registered a second inner effect.
    assert_eq!(inner_runs.load(Ordering::SeqCst), 2);

    state.set("inner", 1);
    assert_eq!(outer_runs.load(Ordering::SeqCst), 2);
    assert_eq!(inner_runs.load(Ordering::SeqCst), 4);
}

/// A panicking effect surfaces to the writer and leaves the context clean.
#[test]
fn failing_effect_surfaces_to_writer() {
    let state = record! { "count" => 0 }.reactive();

    let view = state.clone();
    effect(move || {
        if view.get_as::<f64>("count").unwrap_or(0.0) > 0.0 {
            panic!("count must stay at zero");
        }
    });

    let writer = state.clone();
    let result = panic::catch_unwind(AssertUnwindSafe(move || writer.set("count", 1)));
    assert!(result.is_err());

    // The write itself happened, and later writes still track normally.
    assert_eq!(state.target().get("count"), Some(Value::from(1)));
    assert!(zepp_core::reactive::ReactiveContext::current().is_none());
}

/// Two reads of a computed without an intervening write run the getter once.
#[test]
fn computed_caches_between_writes() {
    let state = record! { "value" => 3 }.reactive();
    let (calls, calls_clone) = counter();

    let view = state.clone();
    let squared = computed(move || {
        calls_clone.fetch_add(1, Ordering::SeqCst);
        let n = view.get_as::<f64>("value").unwrap_or(0.0);
        n * n
    });

    assert_eq!(squared.value(), 9.0);
    assert_eq!(squared.value(), 9.0);
    assert_eq!(calls.load(Ordering::SeqCst), 1);

    state.set("value", 4);
    assert_eq!(squared.value(), 16.0);
    assert_eq!(calls.load(Ordering::SeqCst), 2);
}

/// Memo insulates readers from changes that do not change its result.
#[test]
fn memo_versus_computed() {
    let source = record! { "value" => 5 }.reactive();

    let memo_view = source.clone();
    let tens_memo = memo(move || (memo_view.get_as::<f64>("value").unwrap_or(0.0) / 10.0).floor());

    let computed_view = source.clone();
    let tens_computed =
        computed(move || (computed_view.get_as::<f64>("value").unwrap_or(0.0) / 10.0).floor());

    let (memo_runs, memo_clone) = counter();
    let reader = tens_memo.clone();
    effect(move || {
        reader.get();
        memo_clone.fetch_add(1, Ordering::SeqCst);
    });

    let (computed_runs, computed_clone) = counter();
    let reader = tens_computed.clone();
    effect(move || {
        reader.value();
        computed_clone.fetch_add(1, Ordering::SeqCst);
    });

    source.set("value", 7);
    assert_eq!(memo_runs.load(Ordering::SeqCst), 1);
    // A computed re-runs its readers on every upstream change.
    assert_eq!(computed_runs.load(Ordering::SeqCst), 2);

    source.set("value", 15);
    assert_eq!(memo_runs.load(Ordering::SeqCst), 2);
    assert_eq!(computed_runs.load(Ordering::SeqCst), 3);
}

/// watch reports `(1, 0)` once for 0 -> 1 -> 1.
#[test]
fn watch_reports_changes_once() {
    let state = record! { "count" => 0 }.reactive();
    let calls = Arc::new(Mutex::new(Vec::new()));
    let calls_clone = calls.clone();

    let view = state.clone();
    watch(
        move || view.get_as::<f64>("count").unwrap_or(f64::NAN),
        move |new, old| calls_clone.lock().push((new, old)),
    );

    state.set("count", 1);
    state.set("count", 1);
    assert_eq!(*calls.lock(), vec![(1.0, 0.0)]);
}

/// merge reads both sources and parks unknown keys in the overflow.
#[test]
fn merge_two_records() {
    let view = merge(record! { "a" => 1 }, record! { "b" => 2 });

    assert_eq!(view.get("a"), Some(Value::from(1)));
    assert_eq!(view.get("b"), Some(Value::from(2)));
    assert_eq!(view.set("c", 3), WriteTarget::Overflow);
    assert!(view.has("c"));
}

/// merge_props prefers the last source and memoizes functions.
#[test]
fn merge_props_precedence() {
    let view = merge_props([record! { "x" => 1 }, record! { "x" => 2, "y" => 3 }]);
    assert_eq!(view.get("x"), Some(Value::from(2)));
    assert_eq!(view.get("y"), Some(Value::from(3)));

    let view = merge_props([
        Source::from(record! { "x" => 1 }),
        Source::from_fn(|| Value::from(5)),
    ]);
    assert_eq!(view.get("x"), Some(Value::from(5)));
}

/// Invalidation ripples through a chain of derived values into an effect.
#[test]
fn full_reactive_chain() {
    let state = record! { "celsius" => 0 }.reactive();

    let view = state.clone();
    let fahrenheit = memo(move || view.get_as::<f64>("celsius").unwrap_or(0.0) * 9.0 / 5.0 + 32.0);

    let upstream = fahrenheit.clone();
    let label = computed(move || format!("{}F", upstream.get()));

    let shown = Arc::new(Mutex::new(String::new()));
    let shown_clone = shown.clone();
    let reader = label.clone();
    effect(move || *shown_clone.lock() = reader.value());

    assert_eq!(*shown.lock(), "32F");

    state.set("celsius", 100);
    assert_eq!(*shown.lock(), "212F");
}

/// A scheduler replaces the body on later runs.
#[test]
fn scheduler_receives_later_triggers() {
    let state = record! { "count" => 0 }.reactive();
    let (body_runs, body_clone) = counter();
    let (scheduled, scheduled_clone) = counter();

    let view = state.clone();
    Effect::with_options(
        move || {
            view.get("count");
            body_clone.fetch_add(1, Ordering::SeqCst);
        },
        EffectOptions::new().scheduler(move || {
            scheduled_clone.fetch_add(1, Ordering::SeqCst);
        }),
    );

    state.set("count", 1);
    state.set("count", 2);
    assert_eq!(body_runs.load(Ordering::SeqCst), 1);
    assert_eq!(scheduled.load(Ordering::SeqCst), 2);
}

/// Edges from branches no longer taken are kept.
#[test]
fn stale_branch_edges_accumulate() {
    let state = record! { "flag" => true, "a" => 0, "b" => 0 }.reactive();
    let (runs, runs_clone) = counter();

    let view = state.clone();
    let branchy = effect(move || {
        runs_clone.fetch_add(1, Ordering::SeqCst);
        if view.get_as::<bool>("flag").unwrap_or(false) {
            view.get("a");
        } else {
            view.get("b");
        }
    });

    state.set("flag", false);
    assert_eq!(branchy.dependency_count(), 3);

    // `a` is no longer read, but still re-runs the effect.
    state.set("a", 1);
    assert_eq!(runs.load(Ordering::SeqCst), 3);
}

/// An effect writing a property it reads does not recurse into itself.
#[test]
fn self_writing_effect_runs_once_per_trigger() {
    let state = record! { "count" => 0 }.reactive();
    let (runs, runs_clone) = counter();

    let view = state.clone();
    effect(move || {
        runs_clone.fetch_add(1, Ordering::SeqCst);
        let count = view.get_as::<f64>("count").unwrap_or(0.0);
        view.set("count", count + 1.0);
    });

    assert_eq!(runs.load(Ordering::SeqCst), 1);
    assert_eq!(state.target().get("count"), Some(Value::from(1)));
}

/// Nested records read through a view are reactive too.
#[test]
fn reactivity_is_contagious() {
    let state = Reactive::new(record! { "style" => record! { "color" => 0x00ff00 } });
    let (runs, runs_clone) = counter();

    let view = state.clone();
    effect(move || {
        if let Some(style) = view.get("style").and_then(Value::into_reactive) {
            style.get("color");
        }
        runs_clone.fetch_add(1, Ordering::SeqCst);
    });

    let style = state.get_as::<Reactive>("style").unwrap();
    style.set("color", 0xff0000);
    assert_eq!(runs.load(Ordering::SeqCst), 2);
    assert_eq!(graph::dependent_count(style.id(), "color"), 1);
}

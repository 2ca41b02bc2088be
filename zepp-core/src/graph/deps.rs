//! The dependency graph.
//!
//! Maps `(target, key)` pairs to the effects that read them. The map is
//! process-wide and keyed by [`TargetId`], so the graph never owns a target;
//! targets call [`forget`] when their last handle drops.
//!
//! # Ordering
//!
//! Each key holds an insertion-ordered set of effects. [`trigger`] runs them
//! synchronously, in that order, before returning.
//!
//! # Locking
//!
//! Entries live in a sharded concurrent map. No shard guard is ever held
//! while user code runs: `trigger` snapshots the effect set first, and
//! removed effects are dropped only after their guard is released, because
//! dropping an effect can drop the last handle to another target and
//! re-enter [`forget`].

use std::sync::OnceLock;

use dashmap::DashMap;
use indexmap::{IndexMap, IndexSet};
use smallvec::SmallVec;
use tracing::trace;

use super::target::TargetId;
use crate::reactive::{Effect, ReactiveContext};

/// Effects depending on each key of a single target.
type KeyDeps = IndexMap<String, IndexSet<Effect>>;

static GRAPH: OnceLock<DashMap<TargetId, KeyDeps>> = OnceLock::new();

fn graph() -> &'static DashMap<TargetId, KeyDeps> {
    GRAPH.get_or_init(DashMap::new)
}

/// Record that the active effect depends on `key` of `target`.
///
/// Reads performed outside any effect are not tracked.
pub fn track(target: TargetId, key: &str) {
    let Some(effect) = ReactiveContext::current() else {
        return;
    };
    if effect.is_disposed() {
        return;
    }

    let inserted = {
        let mut deps = graph().entry(target).or_default();
        match deps.get_mut(key) {
            Some(set) => set.insert(effect.clone()),
            None => {
                let mut set = IndexSet::new();
                set.insert(effect.clone());
                deps.insert(key.to_owned(), set);
                true
            }
        }
    };

    if inserted {
        trace!(target_id = %target, key, effect = ?effect.id(), "track");
        effect.record_dependency(target, key);
    }
}

/// Run every effect that depends on `key` of `target`.
///
/// The effect currently on top of the context stack is skipped, so an effect
/// writing a property it has itself read does not recurse into itself.
/// Longer cycles (A writes what B reads, B writes what A reads) are not
/// detected.
pub fn trigger(target: TargetId, key: &str) {
    let effects: SmallVec<[Effect; 4]> = {
        let Some(deps) = graph().get(&target) else {
            return;
        };
        match deps.get(key) {
            Some(set) => set.iter().cloned().collect(),
            None => return,
        }
    };

    trace!(target_id = %target, key, count = effects.len(), "trigger");

    let current = ReactiveContext::current_id();
    for effect in &effects {
        if Some(effect.id()) == current {
            trace!(effect = ?effect.id(), "skipping re-entrant trigger");
            continue;
        }
        effect.run();
    }
}

/// Remove `effect` from the given edges.
pub(crate) fn untrack_all<'a, I>(effect: &Effect, edges: I)
where
    I: IntoIterator<Item = &'a (TargetId, String)>,
{
    let mut removed: SmallVec<[Effect; 4]> = SmallVec::new();
    let mut emptied: SmallVec<[TargetId; 4]> = SmallVec::new();

    for (target, key) in edges {
        if let Some(mut deps) = graph().get_mut(target) {
            if let Some(set) = deps.get_mut(key.as_str()) {
                if let Some(taken) = set.shift_take(effect) {
                    removed.push(taken);
                }
                if set.is_empty() {
                    deps.shift_remove(key.as_str());
                }
            }
            if deps.is_empty() {
                emptied.push(*target);
            }
        }
    }

    for target in emptied {
        graph().remove_if(&target, |_, deps| deps.is_empty());
    }

    drop(removed);
}

/// Drop every edge recorded against `target`.
///
/// Called when the last handle to a target is dropped.
pub fn forget(target: TargetId) {
    let Some((_, deps)) = graph().remove(&target) else {
        return;
    };

    for (key, effects) in &deps {
        for effect in effects {
            effect.forget_dependency(target, key);
        }
    }

    trace!(target_id = %target, keys = deps.len(), "forget");
}

/// Keys of `target` that currently have at least one dependent effect.
pub fn tracked_keys(target: TargetId) -> Vec<String> {
    graph()
        .get(&target)
        .map(|deps| deps.keys().cloned().collect())
        .unwrap_or_default()
}

/// Number of effects depending on `key` of `target`.
pub fn dependent_count(target: TargetId, key: &str) -> usize {
    graph()
        .get(&target)
        .and_then(|deps| deps.get(key).map(IndexSet::len))
        .unwrap_or(0)
}

/// Check whether the graph holds any entry for `target`.
pub fn is_tracked(target: TargetId) -> bool {
    graph().contains_key(&target)
}

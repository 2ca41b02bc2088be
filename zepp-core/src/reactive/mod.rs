//! Reactive Primitives
//!
//! This module implements the computations that sit on top of the
//! dependency graph: effects, lazy and eager derived values, and watchers.
//!
//! # Concepts
//!
//! ## Effects
//!
//! An Effect is a computation that runs once when registered and again,
//! synchronously, every time a property it read is written with a new
//! value.
//!
//! ## Computed and Memo
//!
//! Both cache the result of a getter and are graph targets themselves, so
//! effects can depend on them. A [`Computed`] is lazy: it recomputes on
//! read, or eagerly once something observes it. A [`Memo`] recomputes on
//! every invalidation and only wakes its readers when the result changed.
//!
//! ## Watchers
//!
//! [`watch`] turns "re-run on change" into "call back with `(new, old)`".
//!
//! # Implementation Notes
//!
//! The active effect lives on a thread-local stack ([`ReactiveContext`]).
//! Running an effect pushes it and the scoped guard pops it, so nesting and
//! panics never leave a stale active effect behind.

mod computed;
mod context;
mod derived;
mod effect;
mod memo;
mod watch;

pub use computed::{computed, Computed};
pub use context::{untrack, ReactiveContext};
pub use derived::EqualsFn;
pub use effect::{effect, effect_with, Effect, EffectFn, EffectId, EffectOptions};
pub use memo::{memo, memo_with, Memo, MemoOptions};
pub use watch::watch;

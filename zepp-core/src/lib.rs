//! Zepp Core
//!
//! This crate provides a fine-grained reactive state runtime. It implements:
//!
//! - Interceptable records: reads are tracked as dependencies of the running
//!   effect, writes re-run the effects that depend on them
//! - Effects with optional schedulers and re-entrant nesting
//! - Derived values, lazy ([`Computed`]) and eager ([`Memo`])
//! - Change watchers ([`watch`])
//! - Composition views over several records ([`merge`], [`merge_props`])
//!
//! Everything runs synchronously: a write returns only after every
//! dependent effect has re-run.
//!
//! # Architecture
//!
//! The crate is organized into several modules:
//!
//! - `graph`: the `(target, key) -> effects` dependency map
//! - `state`: property values, plain records and the reactive view
//! - `reactive`: effects, derived values and watchers
//! - `compose`: composition views
//!
//! # Example
//!
//! ```rust
//! use std::sync::Arc;
//! use parking_lot::Mutex;
//! use zepp_core::{effect, record};
//!
//! // A host widget whose display text is bound to reactive state.
//! let screen = Arc::new(Mutex::new(String::new()));
//! let state = record! { "text" => "count: 0" }.reactive();
//!
//! let view = state.clone();
//! let display = screen.clone();
//! effect(move || {
//!     let text = view.get_as::<String>("text").unwrap_or_default();
//!     *display.lock() = text;
//! });
//! assert_eq!(*screen.lock(), "count: 0");
//!
//! // Assigning to the state updates the screen, no manual wiring.
//! state.set("text", "count: 1");
//! assert_eq!(*screen.lock(), "count: 1");
//! ```

pub mod compose;
pub mod error;
pub mod graph;
mod macros;
pub mod reactive;
pub mod state;

pub use compose::{merge, merge_props, MergeView, PropsView, Record, Source, WriteTarget};
pub use error::{ReactiveError, Result};
pub use graph::TargetId;
pub use reactive::{
    computed, effect, effect_with, memo, memo_with, untrack, watch, Computed, Effect, EffectId,
    EffectOptions, Memo, MemoOptions,
};
pub use state::{reactive, FromValue, Object, Reactive, SameValue, Value};

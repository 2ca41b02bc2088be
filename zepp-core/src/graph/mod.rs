//! Dependency Graph
//!
//! This module records which effects depend on which properties, and re-runs
//! them when those properties are written.
//!
//! # Overview
//!
//! The graph is a two-level map:
//!
//! - outer: target identity ([`TargetId`]) to that target's key map
//! - inner: property key to the insertion-ordered set of dependent effects
//!
//! Entries are created lazily on the first [`track`]; a target nobody has
//! read inside an effect has no entry at all.
//!
//! # Known Limitation
//!
//! Edges are only ever added while an effect runs. An effect that read `p`
//! on one run and takes a branch that skips `p` on the next still depends on
//! `p`. Edges go away only through [`Effect::dispose`](crate::Effect::dispose)
//! or when the target itself is dropped.

mod deps;
mod target;

pub use deps::{dependent_count, forget, is_tracked, track, tracked_keys, trigger};
pub(crate) use deps::untrack_all;
pub use target::TargetId;

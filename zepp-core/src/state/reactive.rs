//! The interceptable view.
//!
//! A [`Reactive`] routes property access on an [`Object`] through the
//! dependency graph:
//!
//! - `get(k)` tracks `(object, k)` for the active effect, then returns the
//!   value. Nested records come back wrapped, so reactivity reaches the
//!   whole value graph, not just the first level.
//! - `set(k, v)` always stores `v`, and triggers `(object, k)` only when
//!   `v` differs from the previous value under [`SameValue`].
//!
//! The view has no state besides its target. Two views over the same record
//! are equal, which makes wrapping idempotent and identity-stable without an
//! identity cache.

use std::fmt;

use serde::ser::{Serialize, Serializer};

use super::object::Object;
use super::value::{FromValue, SameValue, Value};
use crate::error::{ReactiveError, Result};
use crate::graph::{self, TargetId};

/// Interceptable view over a plain record.
#[derive(Clone)]
pub struct Reactive {
    target: Object,
}

impl Reactive {
    /// Wrap `target`.
    pub fn new(target: Object) -> Self {
        Self { target }
    }

    /// The record behind this view. Access through it is untracked.
    pub fn target(&self) -> &Object {
        &self.target
    }

    pub fn id(&self) -> TargetId {
        self.target.id()
    }

    /// Read `key`, tracking it for the active effect.
    pub fn get(&self, key: &str) -> Option<Value> {
        graph::track(self.id(), key);
        self.target.get(key).map(wrap_nested)
    }

    /// Read `key` as a concrete type, tracking it for the active effect.
    pub fn get_as<T: FromValue>(&self, key: &str) -> Result<T> {
        let value = self
            .get(key)
            .ok_or_else(|| ReactiveError::MissingKey(key.to_owned()))?;

        T::from_value(&value).ok_or_else(|| ReactiveError::TypeMismatch {
            key: key.to_owned(),
            expected: T::EXPECTED,
            found: value.kind(),
        })
    }

    /// Write `key`. Dependents re-run before this returns when the value
    /// changed.
    pub fn set(&self, key: &str, value: impl Into<Value>) {
        let value = value.into();
        let previous = self.target.set(key, value.clone());

        let changed = previous
            .as_ref()
            .map_or(true, |previous| !previous.same_value(&value));
        drop(previous);

        if changed {
            graph::trigger(self.id(), key);
        }
    }

    /// Read `key`, compute a new value from it, and write it back.
    pub fn update<F>(&self, key: &str, f: F)
    where
        F: FnOnce(Option<Value>) -> Value,
    {
        let next = f(self.get(key));
        self.set(key, next);
    }

    /// Membership test. Not tracked.
    pub fn has(&self, key: &str) -> bool {
        self.target.has(key)
    }

    /// Keys in insertion order. Not tracked.
    pub fn keys(&self) -> Vec<String> {
        self.target.keys()
    }
}

/// Wrap a composite value read through a view.
fn wrap_nested(value: Value) -> Value {
    match value {
        Value::Object(object) => Value::Reactive(Reactive::new(object)),
        other => other,
    }
}

/// Make `value` interceptable.
///
/// Scalars and values that are already reactive are returned unchanged;
/// plain records are wrapped.
pub fn reactive(value: impl Into<Value>) -> Value {
    wrap_nested(value.into())
}

impl From<Object> for Reactive {
    fn from(target: Object) -> Self {
        Self::new(target)
    }
}

impl PartialEq for Reactive {
    fn eq(&self, other: &Self) -> bool {
        self.target.ptr_eq(&other.target)
    }
}

impl Eq for Reactive {}

impl SameValue for Object {
    fn same_value(&self, other: &Self) -> bool {
        self.ptr_eq(other)
    }
}

impl SameValue for Reactive {
    fn same_value(&self, other: &Self) -> bool {
        self == other
    }
}

impl fmt::Debug for Reactive {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Reactive").field(&self.target).finish()
    }
}

impl Serialize for Reactive {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        self.target.serialize(serializer)
    }
}

//! Two-source composition, first source wins.

use std::sync::Arc;

use tracing::warn;

use super::source::Source;
use super::{Record, WriteTarget};
use crate::state::{Object, Value};

struct MergeInner {
    first: Source,
    second: Source,
    overflow: Object,
}

/// A view over two sources. Lookups prefer `first`.
///
/// Cloning a `MergeView` creates a new handle to the same view.
#[derive(Clone)]
pub struct MergeView {
    inner: Arc<MergeInner>,
}

impl MergeView {
    pub fn new(first: impl Into<Source>, second: impl Into<Source>) -> Self {
        Self {
            inner: Arc::new(MergeInner {
                first: first.into().normalize(),
                second: second.into().normalize(),
                overflow: Object::new(),
            }),
        }
    }

    pub fn get(&self, key: &str) -> Option<Value> {
        let inner = &self.inner;
        if inner.first.has(key) {
            inner.first.get(key)
        } else if inner.second.has(key) {
            inner.second.get(key)
        } else {
            inner.overflow.get(key)
        }
    }

    /// Write through to the source owning `key`.
    ///
    /// A key neither source owns goes to the overflow record with a
    /// warning: the write succeeds, but nothing observes that key
    /// reactively.
    pub fn set(&self, key: &str, value: impl Into<Value>) -> WriteTarget {
        let value = value.into();
        let inner = &self.inner;

        if inner.first.write_owned(key, &value) {
            return WriteTarget::Source(0);
        }
        if inner.second.write_owned(key, &value) {
            return WriteTarget::Source(1);
        }

        warn!(key, "merge: key is in neither source, stored in overflow and not reactive");
        inner.overflow.set(key, value);
        WriteTarget::Overflow
    }

    pub fn has(&self, key: &str) -> bool {
        let inner = &self.inner;
        inner.first.has(key) || inner.second.has(key) || inner.overflow.has(key)
    }

    /// Keys of the first source, then the second, then the overflow.
    /// Keys present in both sources are listed twice.
    pub fn keys(&self) -> Vec<String> {
        let inner = &self.inner;
        let mut keys = inner.first.keys();
        keys.extend(inner.second.keys());
        keys.extend(inner.overflow.keys());
        keys
    }

    /// The overflow record.
    pub fn overflow(&self) -> &Object {
        &self.inner.overflow
    }
}

impl Record for MergeView {
    fn get(&self, key: &str) -> Option<Value> {
        MergeView::get(self, key)
    }

    fn set(&self, key: &str, value: Value) {
        MergeView::set(self, key, value);
    }

    fn has(&self, key: &str) -> bool {
        MergeView::has(self, key)
    }

    fn keys(&self) -> Vec<String> {
        MergeView::keys(self)
    }
}

/// Compose two sources into one view; `first` wins on shared keys.
pub fn merge(first: impl Into<Source>, second: impl Into<Source>) -> MergeView {
    MergeView::new(first, second)
}

//! Many-source composition, last source wins.

use std::sync::Arc;

use indexmap::IndexSet;

use super::source::Source;
use super::{Record, WriteTarget};
use crate::state::{Object, Value};

struct PropsInner {
    sources: Vec<Source>,
    overflow: Object,
}

/// A view over an ordered list of sources. Lookups scan from the last
/// source to the first.
///
/// Cloning a `PropsView` creates a new handle to the same view.
#[derive(Clone)]
pub struct PropsView {
    inner: Arc<PropsInner>,
}

impl PropsView {
    /// Build a view. Function sources are memoized here.
    pub fn new<I>(sources: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<Source>,
    {
        Self {
            inner: Arc::new(PropsInner {
                sources: sources
                    .into_iter()
                    .map(|source| source.into().normalize())
                    .collect(),
                overflow: Object::new(),
            }),
        }
    }

    pub fn get(&self, key: &str) -> Option<Value> {
        match self.inner.sources.iter().rev().find(|source| source.has(key)) {
            Some(source) => source.get(key),
            None => self.inner.overflow.get(key),
        }
    }

    /// Write to the last source that owns `key`, else to the overflow.
    pub fn set(&self, key: &str, value: impl Into<Value>) -> WriteTarget {
        let value = value.into();

        for (index, source) in self.inner.sources.iter().enumerate().rev() {
            if source.write_owned(key, &value) {
                return WriteTarget::Source(index);
            }
        }

        self.inner.overflow.set(key, value);
        WriteTarget::Overflow
    }

    pub fn has(&self, key: &str) -> bool {
        self.inner.sources.iter().any(|source| source.has(key)) || self.inner.overflow.has(key)
    }

    /// Union of every source's keys (first to last) and the overflow's,
    /// without duplicates.
    pub fn keys(&self) -> Vec<String> {
        let mut keys: IndexSet<String> = IndexSet::new();
        for source in &self.inner.sources {
            keys.extend(source.keys());
        }
        keys.extend(self.inner.overflow.keys());
        keys.into_iter().collect()
    }

    pub fn sources(&self) -> &[Source] {
        &self.inner.sources
    }

    /// The overflow record.
    pub fn overflow(&self) -> &Object {
        &self.inner.overflow
    }
}

impl Record for PropsView {
    fn get(&self, key: &str) -> Option<Value> {
        PropsView::get(self, key)
    }

    fn set(&self, key: &str, value: Value) {
        PropsView::set(self, key, value);
    }

    fn has(&self, key: &str) -> bool {
        PropsView::has(self, key)
    }

    fn keys(&self) -> Vec<String> {
        PropsView::keys(self)
    }
}

/// Compose `sources` into one view; later sources win on shared keys.
pub fn merge_props<I>(sources: I) -> PropsView
where
    I: IntoIterator,
    I::Item: Into<Source>,
{
    PropsView::new(sources)
}

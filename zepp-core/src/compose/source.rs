//! Backing sources of composition views.

use std::fmt;
use std::sync::Arc;

use crate::reactive::Memo;
use crate::state::{Object, Reactive, Value};

/// One backing source of a composition view.
#[derive(Clone)]
pub enum Source {
    /// A plain record. Reads and writes are untracked.
    Object(Object),
    /// A reactive view. Reads track, writes trigger.
    Reactive(Reactive),
    /// A function not yet memoized. Views normalize it into an
    /// [`Accessor`](Source::Accessor) on construction.
    Function(Arc<dyn Fn() -> Value + Send + Sync>),
    /// A memoized accessor.
    Accessor(Memo<Value>),
}

impl Source {
    /// A function source.
    pub fn from_fn<F>(f: F) -> Self
    where
        F: Fn() -> Value + Send + Sync + 'static,
    {
        Source::Function(Arc::new(f))
    }

    /// Memoize a function source. Other sources are returned unchanged.
    pub(crate) fn normalize(self) -> Self {
        match self {
            Source::Function(f) => Source::Accessor(Memo::new(move || f())),
            other => other,
        }
    }

    /// Current value of an accessor source.
    fn resolve(&self) -> Option<Value> {
        match self {
            Source::Function(f) => Some(f()),
            Source::Accessor(memo) => Some(memo.get()),
            _ => None,
        }
    }

    pub(crate) fn has(&self, key: &str) -> bool {
        match self {
            Source::Object(object) => object.has(key),
            Source::Reactive(view) => view.has(key),
            _ => match self.resolve() {
                Some(Value::Null) | None => false,
                Some(resolved) => resolved.as_object().map_or(true, |object| object.has(key)),
            },
        }
    }

    pub(crate) fn get(&self, key: &str) -> Option<Value> {
        match self {
            Source::Object(object) => object.get(key),
            Source::Reactive(view) => view.get(key),
            _ => match self.resolve()? {
                Value::Null => None,
                Value::Object(object) => object.get(key),
                Value::Reactive(view) => view.get(key),
                scalar => Some(scalar),
            },
        }
    }

    /// Write `key` if this source already owns it.
    pub(crate) fn write_owned(&self, key: &str, value: &Value) -> bool {
        match self {
            Source::Object(object) if object.has(key) => {
                object.set(key, value.clone());
                true
            }
            Source::Reactive(view) if view.has(key) => {
                view.set(key, value.clone());
                true
            }
            Source::Function(_) | Source::Accessor(_) => match self.resolve() {
                Some(Value::Object(object)) if object.has(key) => {
                    object.set(key, value.clone());
                    true
                }
                Some(Value::Reactive(view)) if view.has(key) => {
                    view.set(key, value.clone());
                    true
                }
                _ => false,
            },
            _ => false,
        }
    }

    pub(crate) fn keys(&self) -> Vec<String> {
        match self {
            Source::Object(object) => object.keys(),
            Source::Reactive(view) => view.keys(),
            _ => self
                .resolve()
                .and_then(|resolved| resolved.as_object().map(Object::keys))
                .unwrap_or_default(),
        }
    }
}

impl From<Object> for Source {
    fn from(object: Object) -> Self {
        Source::Object(object)
    }
}

impl From<Reactive> for Source {
    fn from(view: Reactive) -> Self {
        Source::Reactive(view)
    }
}

impl From<Memo<Value>> for Source {
    fn from(memo: Memo<Value>) -> Self {
        Source::Accessor(memo)
    }
}

impl fmt::Debug for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Source::Object(object) => f.debug_tuple("Object").field(&object.id()).finish(),
            Source::Reactive(view) => f.debug_tuple("Reactive").field(&view.id()).finish(),
            Source::Function(_) => f.write_str("Function"),
            Source::Accessor(memo) => f.debug_tuple("Accessor").field(&memo.id()).finish(),
        }
    }
}

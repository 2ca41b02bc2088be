//! Composition views.
//!
//! A composition view is a read/write record with no storage of its own. It
//! routes each key to one of several backing [`Source`]s by a precedence
//! rule, and keeps an overflow record for keys no source owns.
//!
//! - [`merge`]: two sources, first source wins.
//! - [`merge_props`]: any number of sources, last source wins. Function
//!   sources are memoized so they stay reactive.

mod merge;
mod props;
mod source;

pub use merge::{merge, MergeView};
pub use props::{merge_props, PropsView};
pub use source::Source;

use crate::state::{Object, Reactive, Value};

/// Where a write through a composition view landed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteTarget {
    /// The source at this index (in the order the sources were given).
    Source(usize),
    /// The view's overflow record.
    Overflow,
}

/// Minimal record interface shared by plain records, reactive views and
/// composition views.
pub trait Record {
    fn get(&self, key: &str) -> Option<Value>;

    fn set(&self, key: &str, value: Value);

    fn has(&self, key: &str) -> bool;

    fn keys(&self) -> Vec<String>;
}

impl Record for Object {
    fn get(&self, key: &str) -> Option<Value> {
        Object::get(self, key)
    }

    fn set(&self, key: &str, value: Value) {
        Object::set(self, key, value);
    }

    fn has(&self, key: &str) -> bool {
        Object::has(self, key)
    }

    fn keys(&self) -> Vec<String> {
        Object::keys(self)
    }
}

impl Record for Reactive {
    fn get(&self, key: &str) -> Option<Value> {
        Reactive::get(self, key)
    }

    fn set(&self, key: &str, value: Value) {
        Reactive::set(self, key, value);
    }

    fn has(&self, key: &str) -> bool {
        Reactive::has(self, key)
    }

    fn keys(&self) -> Vec<String> {
        Reactive::keys(self)
    }
}

//! Plain records.
//!
//! An [`Object`] is a shared handle to an insertion-ordered field map. It
//! has no reactivity of its own: reading or writing through an `Object`
//! never tracks and never triggers. Wrap it in a
//! [`Reactive`](super::Reactive) view for that.
//!
//! The record's [`TargetId`] keys its entry in the dependency graph. When
//! the last handle drops, that entry is removed.
//!
//! The graph itself never holds a record, but the effects in it do hold
//! their closures. An effect whose closure captures a handle (directly or
//! through a [`Reactive`](super::Reactive) view) keeps that record alive
//! until the effect is disposed with
//! [`Effect::dispose`](crate::Effect::dispose).

use std::fmt;
use std::sync::Arc;

use indexmap::IndexMap;
use parking_lot::RwLock;
use serde::ser::{Serialize, SerializeMap, Serializer};

use super::reactive::Reactive;
use super::value::Value;
use crate::graph::{self, TargetId};

struct ObjectData {
    id: TargetId,
    fields: RwLock<IndexMap<String, Value>>,
}

impl Drop for ObjectData {
    fn drop(&mut self) {
        graph::forget(self.id);
    }
}

/// A shared, plain record.
///
/// Cloning an `Object` clones the handle, not the fields.
#[derive(Clone)]
pub struct Object {
    data: Arc<ObjectData>,
}

impl Object {
    /// Create an empty record.
    pub fn new() -> Self {
        Self {
            data: Arc::new(ObjectData {
                id: TargetId::new(),
                fields: RwLock::new(IndexMap::new()),
            }),
        }
    }

    /// Build a record from a JSON value. Non-object JSON gives an empty
    /// record.
    pub fn from_json(json: serde_json::Value) -> Self {
        match Value::from(json) {
            Value::Object(object) => object,
            _ => Self::new(),
        }
    }

    pub fn id(&self) -> TargetId {
        self.data.id
    }

    /// Check whether two handles refer to the same record.
    pub fn ptr_eq(&self, other: &Object) -> bool {
        Arc::ptr_eq(&self.data, &other.data)
    }

    pub fn get(&self, key: &str) -> Option<Value> {
        self.data.fields.read().get(key).cloned()
    }

    /// Store `value` under `key`, returning the previous value.
    pub fn set(&self, key: &str, value: impl Into<Value>) -> Option<Value> {
        let value = value.into();
        let mut fields = self.data.fields.write();
        match fields.get_mut(key) {
            Some(slot) => Some(std::mem::replace(slot, value)),
            None => {
                fields.insert(key.to_owned(), value);
                None
            }
        }
    }

    pub fn has(&self, key: &str) -> bool {
        self.data.fields.read().contains_key(key)
    }

    /// Remove `key`, returning its value.
    pub fn remove(&self, key: &str) -> Option<Value> {
        self.data.fields.write().shift_remove(key)
    }

    /// Keys in insertion order.
    pub fn keys(&self) -> Vec<String> {
        self.data.fields.read().keys().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.data.fields.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.fields.read().is_empty()
    }

    /// Wrap this record in an interceptable view.
    pub fn reactive(&self) -> Reactive {
        Reactive::new(self.clone())
    }

    /// Copy of the current fields.
    pub fn snapshot(&self) -> IndexMap<String, Value> {
        self.data.fields.read().clone()
    }
}

impl Default for Object {
    fn default() -> Self {
        Self::new()
    }
}

impl<K, V> FromIterator<(K, V)> for Object
where
    K: Into<String>,
    V: Into<Value>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let object = Object::new();
        {
            let mut fields = object.data.fields.write();
            for (key, value) in iter {
                fields.insert(key.into(), value.into());
            }
        }
        object
    }
}

impl PartialEq for Object {
    fn eq(&self, other: &Self) -> bool {
        self.ptr_eq(other)
    }
}

impl Eq for Object {}

impl fmt::Debug for Object {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Object")
            .field("id", &self.id())
            .field("fields", &*self.data.fields.read())
            .finish()
    }
}

impl Serialize for Object {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let fields = self.snapshot();
        let mut map = serializer.serialize_map(Some(fields.len()))?;
        for (key, value) in &fields {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}

//! Typed per-connection attributes.
//!
//! Keys are identified by name. Values are stored type-erased and recovered
//! with a checked downcast, so a read through a key of the wrong type yields
//! `None` rather than a bogus value.

use parking_lot::RwLock;
use std::any::Any;
use std::collections::HashMap;
use std::fmt;
use std::marker::PhantomData;
use std::sync::Arc;

/// Key into an [`AttributeMap`] carrying the value type.
pub struct AttributeKey<T> {
    name: &'static str,
    _marker: PhantomData<fn() -> T>,
}

impl<T> AttributeKey<T> {
    /// Create a key. Two keys with the same name address the same slot.
    pub const fn new(name: &'static str) -> Self {
        Self {
            name,
            _marker: PhantomData,
        }
    }

    /// Key name.
    pub const fn name(&self) -> &'static str {
        self.name
    }
}

impl<T> Clone for AttributeKey<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for AttributeKey<T> {}

impl<T> fmt::Debug for AttributeKey<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("AttributeKey").field(&self.name).finish()
    }
}

type Value = Arc<dyn Any + Send + Sync>;

/// Concurrent attribute set owned by a connection.
#[derive(Default)]
pub struct AttributeMap {
    entries: RwLock<HashMap<&'static str, Value>>,
}

impl AttributeMap {
    /// Create an empty map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether the key is present, whatever its value.
    pub fn has<T>(&self, key: &AttributeKey<T>) -> bool {
        self.entries.read().contains_key(key.name)
    }

    /// Current value, if present and of type `T`.
    pub fn get<T>(&self, key: &AttributeKey<T>) -> Option<T>
    where
        T: Clone + Send + Sync + 'static,
    {
        self.entries
            .read()
            .get(key.name)
            .and_then(|value| value.downcast_ref::<T>())
            .cloned()
    }

    /// Set the value, replacing any previous one.
    pub fn set<T>(&self, key: &AttributeKey<T>, value: T)
    where
        T: Send + Sync + 'static,
    {
        self.entries.write().insert(key.name, Arc::new(value));
    }

    /// Set the value only if the key is absent.
    ///
    /// Check and insert happen under one write lock. Returns `true` if this
    /// call inserted the value.
    pub fn set_if_absent<T>(&self, key: &AttributeKey<T>, value: T) -> bool
    where
        T: Send + Sync + 'static,
    {
        let mut entries = self.entries.write();
        if entries.contains_key(key.name) {
            return false;
        }
        entries.insert(key.name, Arc::new(value));
        true
    }

    /// Remove the key. Returns `true` if it was present.
    pub fn remove<T>(&self, key: &AttributeKey<T>) -> bool {
        self.entries.write().remove(key.name).is_some()
    }

    /// Number of attributes set.
    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    /// Whether no attribute is set.
    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }
}

impl fmt::Debug for AttributeMap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let entries = self.entries.read();
        let mut keys: Vec<&&str> = entries.keys().collect();
        keys.sort();
        f.debug_struct("AttributeMap").field("keys", &keys).finish()
    }
}

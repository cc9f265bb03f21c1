//! Purpose: Ordered, unique-key string map backing JSON objects.
//! Exports: `Map`.
//! Role: Keeps first-seen key order for round-trip stable output.
//! Invariants: Re-inserting an existing key replaces its value in place (position unchanged).
//! Invariants: Equality compares key sets and values, never order.
use indexmap::IndexMap;
use indexmap::map::{IntoIter, Iter, IterMut, Keys, Values};

use crate::core::value::JsonValue;

#[derive(Clone, Debug, Default)]
pub struct Map {
    entries: IndexMap<String, JsonValue>,
}

impl Map {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: IndexMap::with_capacity(capacity),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, key: &str) -> Option<&JsonValue> {
        self.entries.get(key)
    }

    pub fn get_mut(&mut self, key: &str) -> Option<&mut JsonValue> {
        self.entries.get_mut(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// Inserts `value` under `key`, returning the value it replaced.
    ///
    /// An existing key keeps its original position.
    pub fn insert(&mut self, key: impl Into<String>, value: JsonValue) -> Option<JsonValue> {
        self.entries.insert(key.into(), value)
    }

    /// Removes `key`, shifting later entries down so relative order survives.
    pub fn remove(&mut self, key: &str) -> Option<JsonValue> {
        self.entries.shift_remove(key)
    }

    pub fn iter(&self) -> Iter<'_, String, JsonValue> {
        self.entries.iter()
    }

    pub fn iter_mut(&mut self) -> IterMut<'_, String, JsonValue> {
        self.entries.iter_mut()
    }

    pub fn keys(&self) -> Keys<'_, String, JsonValue> {
        self.entries.keys()
    }

    pub fn values(&self) -> Values<'_, String, JsonValue> {
        self.entries.values()
    }
}

impl PartialEq for Map {
    fn eq(&self, other: &Self) -> bool {
        // IndexMap equality is order-insensitive.
        self.entries == other.entries
    }
}

impl<K: Into<String>> FromIterator<(K, JsonValue)> for Map {
    fn from_iter<I: IntoIterator<Item = (K, JsonValue)>>(iter: I) -> Self {
        let mut map = Map::new();
        map.extend(iter);
        map
    }
}

impl<K: Into<String>> Extend<(K, JsonValue)> for Map {
    fn extend<I: IntoIterator<Item = (K, JsonValue)>>(&mut self, iter: I) {
        for (key, value) in iter {
            self.insert(key, value);
        }
    }
}

impl IntoIterator for Map {
    type Item = (String, JsonValue);
    type IntoIter = IntoIter<String, JsonValue>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

impl<'a> IntoIterator for &'a Map {
    type Item = (&'a String, &'a JsonValue);
    type IntoIter = Iter<'a, String, JsonValue>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

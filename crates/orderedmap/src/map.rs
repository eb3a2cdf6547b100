//! The insertion-ordered map.

use std::cmp::Ordering;
use std::collections::HashMap;
use std::fmt;

use utils_deepcopy::CopyError;

use crate::Value;

pub(crate) const NULL: &Value = &Value::Null;

/// A key/value pair, used to build maps from literal entries.
#[derive(Debug, PartialEq)]
pub struct Pair {
    pub key: String,
    pub value: Value,
}

impl Pair {
    pub fn new(key: impl Into<String>, value: impl Into<Value>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }
}

/// A string-keyed map that remembers the order in which keys were first
/// inserted.
///
/// Every key of `keys` has exactly one entry in `values` and vice versa.
/// Updating an existing key keeps its position; deleting and re-inserting a
/// key moves it to the end.
///
/// ```
/// use utils_orderedmap::OrderedMap;
///
/// let mut map = OrderedMap::new();
/// map.set("b", 1);
/// map.set("a", 1);
/// map.set("b", 2);
/// assert_eq!(map.keys(), ["b", "a"]);
/// assert_eq!(map.get("b").and_then(|v| v.as_i64()), Some(2));
/// ```
#[derive(Default)]
pub struct OrderedMap {
    keys: Vec<String>,
    values: HashMap<String, Value>,
}

impl OrderedMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            keys: Vec::with_capacity(capacity),
            values: HashMap::with_capacity(capacity),
        }
    }

    /// Builds a map from `pairs`, in order. Later duplicates update earlier
    /// entries in place.
    pub fn from_pairs(pairs: impl IntoIterator<Item = Pair>) -> Self {
        let pairs = pairs.into_iter();
        let mut map = Self::with_capacity(pairs.size_hint().0);
        for Pair { key, value } in pairs {
            map.set(key, value);
        }
        map
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.values.get(key)
    }

    pub fn get_mut(&mut self, key: &str) -> Option<&mut Value> {
        self.values.get_mut(key)
    }

    /// Like [`get`](Self::get), but a missing key reads as [`Value::Null`].
    pub fn get_or_nil(&self, key: &str) -> &Value {
        self.get(key).unwrap_or(NULL)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    /// Inserts or updates `key`. A new key is appended to the order, an
    /// existing one keeps its position.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        let key = key.into();
        let value = value.into();
        if let Some(slot) = self.values.get_mut(&key) {
            *slot = value;
            return;
        }
        self.keys.push(key.clone());
        self.values.insert(key, value);
    }

    /// Removes `key` and returns its value. Deleting a missing key is a no-op.
    pub fn delete(&mut self, key: &str) -> Option<Value> {
        let value = self.values.remove(key)?;
        if let Some(index) = self.keys.iter().position(|k| k == key) {
            self.keys.remove(index);
        }
        Some(value)
    }

    /// The keys in order.
    ///
    /// This is a view of the map's own order: it cannot be modified while
    /// borrowed, use [`sort_keys_by`](Self::sort_keys_by) or
    /// [`sort_by`](Self::sort_by) to reorder.
    pub fn keys(&self) -> &[String] {
        &self.keys
    }

    /// Iterates over entries in order.
    pub fn iter(&self) -> Iter<'_> {
        Iter {
            keys: self.keys.iter(),
            values: &self.values,
        }
    }

    /// Reorders the keys with a comparator on the keys alone. The sort is
    /// stable.
    pub fn sort_keys_by<F>(&mut self, mut compare: F)
    where
        F: FnMut(&str, &str) -> Ordering,
    {
        self.keys.sort_by(|a, b| compare(a, b));
    }

    /// Reorders the keys with a comparator on whole entries. The sort is
    /// stable.
    pub fn sort_by<F>(&mut self, mut compare: F)
    where
        F: FnMut((&str, &Value), (&str, &Value)) -> Ordering,
    {
        let values = &self.values;
        self.keys.sort_by(|a, b| {
            let a_value = values.get(a).unwrap_or(NULL);
            let b_value = values.get(b).unwrap_or(NULL);
            compare((a, a_value), (b, b_value))
        });
    }

    /// Deep copy of the map and everything it holds.
    pub fn deep_clone(&self) -> Result<OrderedMap, CopyError> {
        utils_deepcopy::copy(self)
    }

    /// Converts the map to a [`serde_json::Value`], recursively and in key
    /// order. Fails if the tree holds a [`Value::Any`].
    pub fn to_json_value(&self) -> Result<serde_json::Value, serde_json::Error> {
        serde_json::to_value(self)
    }
}

impl PartialEq for OrderedMap {
    /// Equal maps hold equal entries in the same order.
    fn eq(&self, other: &Self) -> bool {
        self.keys == other.keys && self.iter().zip(other.iter()).all(|((_, a), (_, b))| a == b)
    }
}

impl fmt::Debug for OrderedMap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for OrderedMap {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self::from_pairs(iter.into_iter().map(|(key, value)| Pair::new(key, value)))
    }
}

// ── Iteration ─────────────────────────────────────────────────────────────

/// Iterator over the entries of an [`OrderedMap`], in order.
pub struct Iter<'a> {
    keys: std::slice::Iter<'a, String>,
    values: &'a HashMap<String, Value>,
}

impl<'a> Iterator for Iter<'a> {
    type Item = (&'a str, &'a Value);

    fn next(&mut self) -> Option<Self::Item> {
        let values = self.values;
        self.keys
            .by_ref()
            .find_map(|key| values.get(key).map(|value| (key.as_str(), value)))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (0, self.keys.size_hint().1)
    }
}

impl<'a> IntoIterator for &'a OrderedMap {
    type Item = (&'a str, &'a Value);
    type IntoIter = Iter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl IntoIterator for OrderedMap {
    type Item = (String, Value);
    type IntoIter = std::vec::IntoIter<(String, Value)>;

    fn into_iter(mut self) -> Self::IntoIter {
        let entries: Vec<(String, Value)> = self
            .keys
            .into_iter()
            .filter_map(|key| self.values.remove(&key).map(|value| (key, value)))
            .collect();
        entries.into_iter()
    }
}

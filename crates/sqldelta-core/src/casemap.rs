//! Insertion-ordered, case-insensitive keyed collection.
//!
//! Schema objects are looked up by name case-insensitively (for unquoted
//! spellings) while their original spelling must be preserved for reporting.
//! Rather than relying on a language built-in, this wrapper stores the
//! normalized key alongside the original spelling explicitly.

use std::collections::HashMap;
use std::fmt;

use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Normalizes a name for identity comparison: surrounding double quotes are
/// trimmed and the remainder is lower-cased.
#[must_use]
pub fn normalize_key(name: &str) -> String {
    trim_quotes(name).to_lowercase()
}

/// Strips one level of surrounding double quotes, if present.
#[must_use]
pub fn trim_quotes(name: &str) -> &str {
    if name.len() >= 2 && name.starts_with('"') && name.ends_with('"') {
        &name[1..name.len() - 1]
    } else {
        name
    }
}

/// An insertion-ordered map keyed case-insensitively, retaining the original
/// key spelling.
#[derive(Debug, Clone, Default)]
pub struct CaseInsensitiveMap<V> {
    entries: Vec<(String, V)>,
    positions: HashMap<String, usize>,
}

impl<V> CaseInsensitiveMap<V> {
    /// Creates an empty map.
    #[must_use]
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
            positions: HashMap::new(),
        }
    }

    /// Number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the map has no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Whether a value is stored under the given key (case-insensitively).
    #[must_use]
    pub fn contains_key(&self, key: &str) -> bool {
        self.positions.contains_key(&normalize_key(key))
    }

    /// Looks up a value by key, case-insensitively.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&V> {
        self.positions
            .get(&normalize_key(key))
            .map(|&i| &self.entries[i].1)
    }

    /// Looks up the original key spelling for a key, case-insensitively.
    #[must_use]
    pub fn get_original_key(&self, key: &str) -> Option<&str> {
        self.positions
            .get(&normalize_key(key))
            .map(|&i| self.entries[i].0.as_str())
    }

    /// Inserts a value, returning the previous value stored under an
    /// equivalent key, if any. On replacement the new key spelling wins.
    pub fn insert(&mut self, key: impl Into<String>, value: V) -> Option<V> {
        let key = key.into();
        let normalized = normalize_key(&key);
        if let Some(&i) = self.positions.get(&normalized) {
            let (stored_key, stored_value) = &mut self.entries[i];
            *stored_key = key;
            Some(std::mem::replace(stored_value, value))
        } else {
            self.positions.insert(normalized, self.entries.len());
            self.entries.push((key, value));
            None
        }
    }

    /// Removes and returns the value stored under the given key, if any.
    pub fn remove(&mut self, key: &str) -> Option<V> {
        let normalized = normalize_key(key);
        let index = self.positions.remove(&normalized)?;
        let (_, value) = self.entries.remove(index);
        for position in self.positions.values_mut() {
            if *position > index {
                *position -= 1;
            }
        }
        Some(value)
    }

    /// Iterates entries in insertion order as `(original key, value)`.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &V)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Iterates original key spellings in insertion order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }

    /// Iterates values in insertion order.
    pub fn values(&self) -> impl Iterator<Item = &V> {
        self.entries.iter().map(|(_, v)| v)
    }
}

impl<V: PartialEq> PartialEq for CaseInsensitiveMap<V> {
    fn eq(&self, other: &Self) -> bool {
        self.entries == other.entries
    }
}

impl<V: Eq> Eq for CaseInsensitiveMap<V> {}

impl<V> FromIterator<(String, V)> for CaseInsensitiveMap<V> {
    fn from_iter<T: IntoIterator<Item = (String, V)>>(iter: T) -> Self {
        let mut map = Self::new();
        for (key, value) in iter {
            map.insert(key, value);
        }
        map
    }
}

impl<V: Serialize> Serialize for CaseInsensitiveMap<V> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (key, value) in &self.entries {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}

impl<'de, V: Deserialize<'de>> Deserialize<'de> for CaseInsensitiveMap<V> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct MapVisitor<V>(std::marker::PhantomData<V>);

        impl<'de, V: Deserialize<'de>> Visitor<'de> for MapVisitor<V> {
            type Value = CaseInsensitiveMap<V>;

            fn expecting(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
                formatter.write_str("a map keyed by object name")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
                let mut map = CaseInsensitiveMap::new();
                while let Some((key, value)) = access.next_entry::<String, V>()? {
                    map.insert(key, value);
                }
                Ok(map)
            }
        }

        deserializer.deserialize_map(MapVisitor(std::marker::PhantomData))
    }
}

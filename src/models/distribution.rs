//! Insertion-ordered category map
//!
//! Category order matters to the reconciler (ties are broken by first-seen
//! order), so allocations are kept as an ordered list of entries rather than
//! a hash map. Serialized as a JSON object in insertion order.

use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::marker::PhantomData;

use super::money::Money;
use super::percent::Percent;

/// Category name -> value, in the order categories were first inserted
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Distribution<V> {
    entries: Vec<(String, V)>,
}

/// Category name -> percentage of available income
pub type PercentageAllocation = Distribution<Percent>;

/// Category name -> monetary amount
pub type CategoryAmounts = Distribution<Money>;

impl<V> Distribution<V> {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Insert or replace a value; replacing keeps the original position
    pub fn insert(&mut self, category: impl Into<String>, value: V) -> Option<V> {
        let category = category.into();
        match self.position(&category) {
            Some(idx) => Some(std::mem::replace(&mut self.entries[idx].1, value)),
            None => {
                self.entries.push((category, value));
                None
            }
        }
    }

    pub fn get(&self, category: &str) -> Option<&V> {
        self.position(category).map(|idx| &self.entries[idx].1)
    }

    pub fn get_mut(&mut self, category: &str) -> Option<&mut V> {
        self.position(category)
            .map(move |idx| &mut self.entries[idx].1)
    }

    pub fn contains_key(&self, category: &str) -> bool {
        self.position(category).is_some()
    }

    pub fn remove(&mut self, category: &str) -> Option<V> {
        self.position(category)
            .map(|idx| self.entries.remove(idx).1)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &V)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = (&str, &mut V)> {
        self.entries.iter_mut().map(|(k, v)| (k.as_str(), v))
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }

    pub fn values(&self) -> impl Iterator<Item = &V> {
        self.entries.iter().map(|(_, v)| v)
    }

    fn position(&self, category: &str) -> Option<usize> {
        self.entries.iter().position(|(k, _)| k == category)
    }
}

impl<V: Ord> Distribution<V> {
    /// The category holding the largest value, earliest entry winning ties
    pub fn largest(&self) -> Option<&str> {
        let mut best: Option<(&str, &V)> = None;
        for (k, v) in self.iter() {
            match best {
                Some((_, current)) if v <= current => {}
                _ => best = Some((k, v)),
            }
        }
        best.map(|(k, _)| k)
    }
}

impl<V> Default for Distribution<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: Into<String>, V> FromIterator<(K, V)> for Distribution<V> {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut dist = Self::new();
        for (k, v) in iter {
            dist.insert(k, v);
        }
        dist
    }
}

impl<V> IntoIterator for Distribution<V> {
    type Item = (String, V);
    type IntoIter = std::vec::IntoIter<(String, V)>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

impl<V: Serialize> Serialize for Distribution<V> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (k, v) in &self.entries {
            map.serialize_entry(k, v)?;
        }
        map.end()
    }
}

struct DistributionVisitor<V>(PhantomData<V>);

impl<'de, V: Deserialize<'de>> Visitor<'de> for DistributionVisitor<V> {
    type Value = Distribution<V>;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("a map of category names to values")
    }

    fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
        let mut dist = Distribution::new();
        while let Some((k, v)) = access.next_entry::<String, V>()? {
            dist.insert(k, v);
        }
        Ok(dist)
    }
}

impl<'de, V: Deserialize<'de>> Deserialize<'de> for Distribution<V> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_map(DistributionVisitor(PhantomData))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_preserves_order() {
        let mut dist = Distribution::new();
        dist.insert("Housing", 1);
        dist.insert("Food", 2);
        dist.insert("Housing", 3);

        let keys: Vec<_> = dist.keys().collect();
        assert_eq!(keys, vec!["Housing", "Food"]);
        assert_eq!(dist.get("Housing"), Some(&3));
    }

    #[test]
    fn test_largest_first_seen_tie_break() {
        let dist: Distribution<i64> = [("A", 5), ("B", 9), ("C", 9)].into_iter().collect();
        assert_eq!(dist.largest(), Some("B"));

        let empty: Distribution<i64> = Distribution::new();
        assert_eq!(empty.largest(), None);
    }

    #[test]
    fn test_remove() {
        let mut dist: Distribution<i64> = [("A", 1), ("B", 2)].into_iter().collect();
        assert_eq!(dist.remove("A"), Some(1));
        assert_eq!(dist.remove("A"), None);
        assert_eq!(dist.len(), 1);
    }

    #[test]
    fn test_json_keeps_insertion_order() {
        let dist: PercentageAllocation = [
            ("Transport", Percent::from_hundredths(1250)),
            ("Housing", Percent::from_hundredths(8750)),
        ]
        .into_iter()
        .collect();

        let json = serde_json::to_string(&dist).unwrap();
        assert_eq!(json, r#"{"Transport":12.5,"Housing":87.5}"#);

        let parsed: PercentageAllocation = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, dist);
    }
}

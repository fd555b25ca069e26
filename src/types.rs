// src/types.rs

use serde::{
    de::{MapAccess, Visitor},
    ser::SerializeMap,
    Deserialize, Deserializer, Serialize, Serializer,
};
use std::{fmt, marker::PhantomData};

use crate::catalog::CODE_CATALOG;

/// Seven price points describing one code's distribution in one region.
#[derive(Debug, Serialize, Deserialize, PartialEq, Clone, Copy, Default)]
pub struct PercentileRecord {
    pub p5: f64,
    pub p10: f64,
    pub p25: f64,
    pub p50: f64,
    pub p75: f64,
    pub p90: f64,
    pub p95: f64,
}

/// One accepted input record, after cleaning.
#[derive(Debug, Clone, PartialEq)]
pub struct BenchmarkRow {
    pub code: String,
    pub region: String,
    pub percentiles: PercentileRecord,
}

/// String-keyed map that remembers insertion order.
///
/// Re-inserting a key replaces the value but keeps the key where it was first
/// seen. Serializes as a JSON object in that order, and deserializes keeping
/// document order.
#[derive(Debug, Clone, PartialEq)]
pub struct OrderedMap<V> {
    entries: Vec<(String, V)>,
}

impl<V> Default for OrderedMap<V> {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
        }
    }
}

impl<V> OrderedMap<V> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace. Returns the previous value for `key`, if any.
    pub fn insert(&mut self, key: impl Into<String>, value: V) -> Option<V> {
        let key = key.into();
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some((_, slot)) => Some(std::mem::replace(slot, value)),
            None => {
                self.entries.push((key, value));
                None
            }
        }
    }

    pub fn get(&self, key: &str) -> Option<&V> {
        self.entries.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    pub fn get_mut(&mut self, key: &str) -> Option<&mut V> {
        self.entries
            .iter_mut()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &V)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }
}

impl<V: Serialize> Serialize for OrderedMap<V> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (k, v) in &self.entries {
            map.serialize_entry(k, v)?;
        }
        map.end()
    }
}

struct OrderedMapVisitor<V>(PhantomData<V>);

impl<'de, V: Deserialize<'de>> Visitor<'de> for OrderedMapVisitor<V> {
    type Value = OrderedMap<V>;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("a map with string keys")
    }

    fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
        let mut map = OrderedMap {
            entries: Vec::with_capacity(access.size_hint().unwrap_or(0)),
        };
        while let Some((k, v)) = access.next_entry::<String, V>()? {
            map.insert(k, v);
        }
        Ok(map)
    }
}

impl<'de, V: Deserialize<'de>> Deserialize<'de> for OrderedMap<V> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_map(OrderedMapVisitor(PhantomData))
    }
}

/// Everything known about a single procedure code.
#[derive(Debug, Serialize, Deserialize, PartialEq, Clone)]
pub struct CodeEntry {
    pub description: String,
    /// region → percentile record, in first-seen order
    pub percentiles: OrderedMap<PercentileRecord>,
}

/// What happened when a row was folded into the table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Fold {
    Inserted,
    /// An earlier row for the same (code, region) was overwritten.
    Replaced,
    UnknownCode,
}

/// code → entry, in catalog order.
#[derive(Debug, Serialize, Deserialize, PartialEq, Clone, Default)]
#[serde(transparent)]
pub struct BenchmarkTable(OrderedMap<CodeEntry>);

impl BenchmarkTable {
    /// One entry per catalog code, each with no regions yet.
    pub fn from_catalog() -> Self {
        let mut codes = OrderedMap::new();
        for (code, desc) in CODE_CATALOG {
            codes.insert(
                *code,
                CodeEntry {
                    description: desc.to_string(),
                    percentiles: OrderedMap::new(),
                },
            );
        }
        Self(codes)
    }

    /// Fold `row` into `table[code].percentiles[region]`; last write wins.
    pub fn fold(&mut self, row: BenchmarkRow) -> Fold {
        match self.0.get_mut(&row.code) {
            None => Fold::UnknownCode,
            Some(entry) => match entry.percentiles.insert(row.region, row.percentiles) {
                Some(_) => Fold::Replaced,
                None => Fold::Inserted,
            },
        }
    }

    pub fn get(&self, code: &str) -> Option<&CodeEntry> {
        self.0.get(code)
    }

    pub fn codes(&self) -> impl Iterator<Item = &str> {
        self.0.keys()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &CodeEntry)> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Result;

    fn row(code: &str, region: &str, p50: f64) -> BenchmarkRow {
        BenchmarkRow {
            code: code.into(),
            region: region.into(),
            percentiles: PercentileRecord {
                p50,
                ..Default::default()
            },
        }
    }

    #[test]
    fn ordered_map_keeps_first_position_on_replace() {
        let mut m = OrderedMap::new();
        assert_eq!(m.insert("b", 1), None);
        assert_eq!(m.insert("a", 2), None);
        assert_eq!(m.insert("b", 3), Some(1));
        assert_eq!(m.keys().collect::<Vec<_>>(), vec!["b", "a"]);
        assert_eq!(m.get("b"), Some(&3));
        assert_eq!(m.len(), 2);
    }

    #[test]
    fn ordered_map_serializes_in_insertion_order() -> Result<()> {
        let mut m = OrderedMap::new();
        m.insert("zeta", 1);
        m.insert("alpha", 2);
        assert_eq!(serde_json::to_string(&m)?, r#"{"zeta":1,"alpha":2}"#);

        let back: OrderedMap<i32> = serde_json::from_str(r#"{"zeta":1,"alpha":2}"#)?;
        assert_eq!(back, m);
        Ok(())
    }

    #[test]
    fn table_starts_with_every_catalog_code() {
        let table = BenchmarkTable::from_catalog();
        let codes: Vec<&str> = table.codes().collect();
        let expected: Vec<&str> = CODE_CATALOG.iter().map(|(c, _)| *c).collect();
        assert_eq!(codes, expected);
        assert!(table.iter().all(|(_, e)| e.percentiles.is_empty()));
    }

    #[test]
    fn fold_last_write_wins_and_drops_unknown() {
        let mut table = BenchmarkTable::from_catalog();
        assert_eq!(table.fold(row("97153", "CA", 40.0)), Fold::Inserted);
        assert_eq!(table.fold(row("97153", "TX", 30.0)), Fold::Inserted);
        assert_eq!(table.fold(row("97153", "CA", 45.0)), Fold::Replaced);
        assert_eq!(table.fold(row("99999", "CA", 1.0)), Fold::UnknownCode);

        let entry = table.get("97153").unwrap();
        assert_eq!(entry.percentiles.keys().collect::<Vec<_>>(), vec!["CA", "TX"]);
        assert_eq!(entry.percentiles.get("CA").unwrap().p50, 45.0);
        assert!(table.get("99999").is_none());
        assert_eq!(table.len(), CODE_CATALOG.len());
    }
}

//! Collections — the ordered containers that hold parsed children
//!
//! `List` keeps insertion order, `Catalog` keeps insertion order of its keys
//! and replaces the value when a key is put twice, `Range` is defined by its
//! endpoints and how each end is bounded.

use serde::{Deserialize, Serialize};

// ── List ──────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct List<T> {
    items: Vec<T>,
}

impl<T> List<T> {
    pub fn new() -> Self {
        List { items: Vec::new() }
    }

    pub fn append(&mut self, item: T) {
        self.items.push(item);
    }

    pub fn size(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&T> {
        self.items.get(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.items.iter()
    }
}

impl<T> Default for List<T> {
    fn default() -> Self {
        List::new()
    }
}

impl<T> FromIterator<T> for List<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        List {
            items: iter.into_iter().collect(),
        }
    }
}

impl<'a, T> IntoIterator for &'a List<T> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

// ── Catalog ───────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Association<K, V> {
    pub key: K,
    pub value: V,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Catalog<K, V> {
    associations: Vec<Association<K, V>>,
}

impl<K: PartialEq, V> Catalog<K, V> {
    pub fn new() -> Self {
        Catalog {
            associations: Vec::new(),
        }
    }

    /// Insert or replace; a replaced key keeps its original position
    pub fn put(&mut self, key: K, value: V) -> Option<V> {
        match self.associations.iter_mut().find(|a| a.key == key) {
            Some(existing) => Some(std::mem::replace(&mut existing.value, value)),
            None => {
                self.associations.push(Association { key, value });
                None
            }
        }
    }

    pub fn get(&self, key: &K) -> Option<&V> {
        self.associations
            .iter()
            .find(|a| a.key == *key)
            .map(|a| &a.value)
    }

    pub fn contains_key(&self, key: &K) -> bool {
        self.get(key).is_some()
    }

    pub fn size(&self) -> usize {
        self.associations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.associations.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = &K> {
        self.associations.iter().map(|a| &a.key)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Association<K, V>> {
        self.associations.iter()
    }
}

impl<K: PartialEq, V> Default for Catalog<K, V> {
    fn default() -> Self {
        Catalog::new()
    }
}

impl<K: PartialEq, V> FromIterator<(K, V)> for Catalog<K, V> {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut catalog = Catalog::new();
        for (key, value) in iter {
            catalog.put(key, value);
        }
        catalog
    }
}

// ── Range ─────────────────────────────────────────────────

/// Which ends of a range are included
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Extent {
    /// `..`
    Inclusive,
    /// `<..`
    LeftExclusive,
    /// `..<`
    RightExclusive,
    /// `<..<`
    Exclusive,
}

impl Extent {
    pub fn from_delimiter(text: &str) -> Option<Extent> {
        match text {
            ".." => Some(Extent::Inclusive),
            "<.." => Some(Extent::LeftExclusive),
            "..<" => Some(Extent::RightExclusive),
            "<..<" => Some(Extent::Exclusive),
            _ => None,
        }
    }

    pub fn delimiter(&self) -> &'static str {
        match self {
            Extent::Inclusive => "..",
            Extent::LeftExclusive => "<..",
            Extent::RightExclusive => "..<",
            Extent::Exclusive => "<..<",
        }
    }

    pub fn includes_first(&self) -> bool {
        matches!(self, Extent::Inclusive | Extent::RightExclusive)
    }

    pub fn includes_last(&self) -> bool {
        matches!(self, Extent::Inclusive | Extent::LeftExclusive)
    }
}

/// A range with optional endpoints; a missing endpoint is unbounded
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Range<T> {
    pub first: Option<T>,
    pub extent: Extent,
    pub last: Option<T>,
}

impl<T> Range<T> {
    pub fn new(first: Option<T>, extent: Extent, last: Option<T>) -> Self {
        Range {
            first,
            extent,
            last,
        }
    }
}

impl Range<i64> {
    /// The integers in the range, or `None` when an end is unbounded
    pub fn size(&self) -> Option<u64> {
        let (first, last) = (self.first?, self.last?);
        let low = if self.extent.includes_first() {
            first as i128
        } else {
            first as i128 + 1
        };
        let high = if self.extent.includes_last() {
            last as i128
        } else {
            last as i128 - 1
        };
        Some(if high < low { 0 } else { (high - low + 1) as u64 })
    }
}

impl Range<f64> {
    pub fn contains(&self, value: f64) -> bool {
        let above = match self.first {
            Some(first) if self.extent.includes_first() => value >= first,
            Some(first) => value > first,
            None => true,
        };
        let below = match self.last {
            Some(last) if self.extent.includes_last() => value <= last,
            Some(last) => value < last,
            None => true,
        };
        above && below
    }
}

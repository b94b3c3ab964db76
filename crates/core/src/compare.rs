//! Per-marketplace comparison selections, capped at [`MAX_COMPARE`] ids.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::types::MarketplaceKind;

pub const MAX_COMPARE: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddOutcome {
    Added,
    AlreadyPresent,
    Full,
}

/// Ordered, de-duplicated ids selected for side-by-side comparison.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ComparisonSet {
    ids: Vec<String>,
}

impl ComparisonSet {
    /// Rebuild from stored ids, dropping blanks and duplicates and anything
    /// past the cap.
    pub fn from_stored<I, S>(ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut set = Self::default();
        for id in ids {
            let id = id.into();
            if !id.trim().is_empty() {
                set.add(id);
            }
        }
        set
    }

    pub fn ids(&self) -> &[String] {
        &self.ids
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.ids.len() >= MAX_COMPARE
    }

    pub fn contains(&self, id: &str) -> bool {
        self.ids.iter().any(|i| i == id)
    }

    pub fn add(&mut self, id: impl Into<String>) -> AddOutcome {
        let id = id.into();
        if self.contains(&id) {
            return AddOutcome::AlreadyPresent;
        }
        if self.is_full() {
            return AddOutcome::Full;
        }
        self.ids.push(id);
        AddOutcome::Added
    }

    pub fn remove(&mut self, id: &str) -> bool {
        let before = self.ids.len();
        self.ids.retain(|i| i != id);
        before != self.ids.len()
    }

    pub fn clear(&mut self) {
        self.ids.clear();
    }

    /// Append stored ids that exist in `available`, keeping current
    /// selections first and stopping at the cap.
    pub fn merge_stored(
        &mut self,
        stored: &[String],
        available: impl Fn(&str) -> bool,
    ) -> bool {
        let mut changed = false;
        for id in stored {
            if self.is_full() {
                break;
            }
            if available(id.as_str()) && self.add(id.clone()) == AddOutcome::Added {
                changed = true;
            }
        }
        changed
    }
}

/// All comparison selections, keyed by marketplace.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ComparisonBook {
    sets: BTreeMap<String, ComparisonSet>,
}

impl ComparisonBook {
    pub fn get(&self, kind: MarketplaceKind) -> ComparisonSet {
        self.sets.get(kind.as_str()).cloned().unwrap_or_default()
    }

    pub fn set(&mut self, kind: MarketplaceKind, set: ComparisonSet) {
        if set.is_empty() {
            self.sets.remove(kind.as_str());
        } else {
            self.sets.insert(kind.as_str().to_string(), set);
        }
    }

    pub fn update<F, R>(&mut self, kind: MarketplaceKind, f: F) -> R
    where
        F: FnOnce(&mut ComparisonSet) -> R,
    {
        let mut set = self.get(kind);
        let out = f(&mut set);
        self.set(kind, set);
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cap_at_three() {
        let mut set = ComparisonSet::default();
        assert_eq!(set.add("a"), AddOutcome::Added);
        assert_eq!(set.add("b"), AddOutcome::Added);
        assert_eq!(set.add("a"), AddOutcome::AlreadyPresent);
        assert_eq!(set.add("c"), AddOutcome::Added);
        assert_eq!(set.add("d"), AddOutcome::Full);
        assert_eq!(set.ids(), ["a", "b", "c"]);
    }

    #[test]
    fn test_remove_and_clear() {
        let mut set = ComparisonSet::from_stored(["a", "b"]);
        assert!(set.remove("a"));
        assert!(!set.remove("zzz"));
        assert_eq!(set.ids(), ["b"]);
        set.clear();
        assert!(set.is_empty());
    }

    #[test]
    fn test_from_stored_sanitises() {
        let set = ComparisonSet::from_stored(["a", "", "a", "b", "c", "d"]);
        assert_eq!(set.ids(), ["a", "b", "c"]);
    }

    #[test]
    fn test_merge_keeps_current_first_and_skips_missing() {
        let mut set = ComparisonSet::from_stored(["x"]);
        let stored = vec!["gone".to_string(), "y".to_string(), "z".to_string(), "w".to_string()];
        let changed = set.merge_stored(&stored, |id| id != "gone");
        assert!(changed);
        assert_eq!(set.ids(), ["x", "y", "z"]);
    }

    #[test]
    fn test_book_is_keyed_by_marketplace() {
        let mut book = ComparisonBook::default();
        book.update(MarketplaceKind::Courses, |s| s.add("c1"));
        book.update(MarketplaceKind::Financial, |s| s.add("f1"));
        assert_eq!(book.get(MarketplaceKind::Courses).ids(), ["c1"]);
        assert_eq!(book.get(MarketplaceKind::Financial).ids(), ["f1"]);
        assert!(book.get(MarketplaceKind::Events).is_empty());

        let json = serde_json::to_string(&book).unwrap();
        assert_eq!(json, r#"{"courses":["c1"],"financial":["f1"]}"#);
        let back: ComparisonBook = serde_json::from_str(&json).unwrap();
        assert_eq!(back, book);
    }

    #[test]
    fn test_emptied_set_is_dropped_from_book() {
        let mut book = ComparisonBook::default();
        book.update(MarketplaceKind::Events, |s| s.add("e1"));
        book.update(MarketplaceKind::Events, |s| s.remove("e1"));
        assert_eq!(serde_json::to_string(&book).unwrap(), "{}");
    }
}

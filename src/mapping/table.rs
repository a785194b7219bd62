//! Override table: highest priority seen per route key.
//!
//! The table has two states. `OverrideTableBuilder` accumulates priorities
//! during the scan; `freeze` turns it into a read-only `OverrideTable` that the
//! registration pass consults. A frozen table is never modified again.

use indexmap::IndexMap;

use crate::mapping::candidate::RouteKey;

/// Mutable table used while scanning candidates.
#[derive(Debug, Default)]
pub struct OverrideTableBuilder {
    priorities: IndexMap<RouteKey, i32>,
}

impl OverrideTableBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a candidate priority for `key`.
    ///
    /// Only a strictly greater priority replaces the stored one, so among equal
    /// priorities the first registration is kept. Returns true if stored.
    pub fn register(&mut self, key: &RouteKey, priority: i32) -> bool {
        match self.priorities.get_mut(key) {
            Some(max) if *max < priority => {
                *max = priority;
                true
            }
            Some(_) => false,
            None => {
                self.priorities.insert(key.clone(), priority);
                true
            }
        }
    }

    pub fn freeze(self) -> OverrideTable {
        OverrideTable {
            priorities: self.priorities,
        }
    }
}

/// Read-only table consulted during route registration.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OverrideTable {
    priorities: IndexMap<RouteKey, i32>,
}

impl OverrideTable {
    pub fn max_priority(&self, key: &RouteKey) -> Option<i32> {
        self.priorities.get(key).copied()
    }

    /// Whether a route registration should be dropped.
    ///
    /// `method_priority` is `None` for handlers without an override marker,
    /// which are never suppressed.
    pub fn is_overridden(&self, key: &RouteKey, method_priority: Option<i32>) -> bool {
        match (self.max_priority(key), method_priority) {
            (Some(max), Some(own)) => max != own,
            _ => false,
        }
    }

    pub fn len(&self) -> usize {
        self.priorities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.priorities.is_empty()
    }

    /// Entries in first-registration order.
    pub fn iter(&self) -> impl Iterator<Item = (&RouteKey, i32)> {
        self.priorities.iter().map(|(k, v)| (k, *v))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key() -> RouteKey {
        RouteKey::get("/{baseSiteId}/products/search")
    }

    #[test]
    fn test_higher_priority_wins() {
        let mut builder = OverrideTableBuilder::new();
        assert!(builder.register(&key(), 3));
        assert!(builder.register(&key(), 5));
        assert!(!builder.register(&key(), 4));
        let table = builder.freeze();

        assert_eq!(table.max_priority(&key()), Some(5));
        assert!(!table.is_overridden(&key(), Some(5)));
        assert!(table.is_overridden(&key(), Some(3)));
    }

    #[test]
    fn test_tie_keeps_first_and_suppresses_neither() {
        let mut builder = OverrideTableBuilder::new();
        assert!(builder.register(&key(), 5));
        assert!(!builder.register(&key(), 5));
        let table = builder.freeze();

        assert_eq!(table.len(), 1);
        assert!(!table.is_overridden(&key(), Some(5)));
    }

    #[test]
    fn test_unmarked_never_overridden() {
        let mut builder = OverrideTableBuilder::new();
        builder.register(&key(), 10);
        let table = builder.freeze();
        assert!(!table.is_overridden(&key(), None));
    }

    #[test]
    fn test_unknown_key_not_overridden() {
        let table = OverrideTableBuilder::new().freeze();
        assert!(table.is_empty());
        assert!(!table.is_overridden(&key(), Some(1)));
    }

    #[test]
    fn test_negative_priorities() {
        let mut builder = OverrideTableBuilder::new();
        builder.register(&key(), -2);
        builder.register(&key(), -1);
        assert_eq!(builder.freeze().max_priority(&key()), Some(-1));
    }
}

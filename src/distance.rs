//! Distance lookup backed by a loaded distance table.
//!
//! Entries are stored per direction: (A, B) may exist without (B, A).
//! Missing pairs report [`UNREACHABLE`] instead of failing.

use std::collections::HashMap;

use crate::traits::DistanceLookup;

/// Sentinel distance for pairs with no table entry.
pub const UNREACHABLE: f64 = f64::INFINITY;

pub fn is_unreachable(distance: f64) -> bool {
    !distance.is_finite()
}

/// Two-level origin -> destination -> distance table.
///
/// Built once by the loader and read-only afterwards.
#[derive(Debug, Clone, Default)]
pub struct DistanceTable {
    entries: HashMap<String, HashMap<String, f64>>,
}

impl DistanceTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the distance from `from` to `to`. Later rows for the same pair win.
    pub fn insert(&mut self, from: impl Into<String>, to: impl Into<String>, distance: f64) {
        self.entries
            .entry(from.into())
            .or_default()
            .insert(to.into(), distance);
    }

    /// Number of stored (origin, destination) pairs.
    pub fn len(&self) -> usize {
        self.entries.values().map(HashMap::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.values().all(HashMap::is_empty)
    }
}

impl FromIterator<(String, String, f64)> for DistanceTable {
    fn from_iter<I: IntoIterator<Item = (String, String, f64)>>(iter: I) -> Self {
        let mut table = Self::new();
        for (from, to, distance) in iter {
            table.insert(from, to, distance);
        }
        table
    }
}

impl DistanceLookup for DistanceTable {
    fn distance(&self, from: &str, to: &str) -> f64 {
        self.entries
            .get(from)
            .and_then(|row| row.get(to))
            .copied()
            .unwrap_or(UNREACHABLE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_pair() {
        let mut table = DistanceTable::new();
        table.insert("Hub", "A", 2.0);
        assert_eq!(table.distance("Hub", "A"), 2.0);
    }

    #[test]
    fn test_storage_is_directional() {
        let mut table = DistanceTable::new();
        table.insert("Hub", "A", 2.0);
        assert!(is_unreachable(table.distance("A", "Hub")), "reverse pair was never stored");
    }

    #[test]
    fn test_unknown_origin_is_unreachable() {
        let table = DistanceTable::new();
        assert_eq!(table.distance("Nowhere", "A"), UNREACHABLE);
        assert!(table.is_empty());
    }

    #[test]
    fn test_overwrite_keeps_single_entry() {
        let table: DistanceTable = vec![
            ("Hub".to_string(), "A".to_string(), 2.0),
            ("Hub".to_string(), "A".to_string(), 2.5),
        ]
        .into_iter()
        .collect();
        assert_eq!(table.len(), 1);
        assert_eq!(table.distance("Hub", "A"), 2.5);
    }
}

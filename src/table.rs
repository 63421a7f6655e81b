//! Key to hit count mapping.

use indexmap::IndexMap;

/// Hit counts per key, remembering the order keys were first seen.
///
/// Entries are stored in first-insertion order so that a stable sort over
/// [`FrequencyTable::entries`] is deterministic for a given input history.
#[derive(Debug, Clone, Default)]
pub struct FrequencyTable {
    entries: IndexMap<String, u64>,
}

impl FrequencyTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add one hit for `key`, creating it with a count of 1 if new.
    pub fn increment(&mut self, key: &str) {
        if let Some(count) = self.entries.get_mut(key) {
            *count += 1;
            return;
        }
        self.entries.insert(key.to_owned(), 1);
    }

    /// Number of distinct keys.
    pub fn size(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, key: &str) -> Option<u64> {
        self.entries.get(key).copied()
    }

    /// Sum of all counts.
    pub fn total(&self) -> u64 {
        self.entries.values().sum()
    }

    /// All entries in first-seen order.
    pub fn entries(&self) -> &IndexMap<String, u64> {
        &self.entries
    }

    /// Owned copy of the entries in first-seen order.
    pub fn snapshot(&self) -> Vec<(String, u64)> {
        self.entries
            .iter()
            .map(|(key, count)| (key.clone(), *count))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_increment_creates_and_adds() {
        let mut table = FrequencyTable::new();
        assert!(table.is_empty());

        table.increment("GET");
        assert_eq!(table.get("GET"), Some(1));

        table.increment("GET");
        table.increment("POST");
        assert_eq!(table.get("GET"), Some(2));
        assert_eq!(table.get("POST"), Some(1));
        assert_eq!(table.get("PUT"), None);
        assert_eq!(table.size(), 2);
        assert_eq!(table.total(), 3);
    }

    #[test]
    fn test_snapshot_keeps_first_seen_order() {
        let mut table = FrequencyTable::new();
        for key in ["b", "a", "b", "c", "a", "b"] {
            table.increment(key);
        }
        assert_eq!(
            table.snapshot(),
            vec![
                ("b".to_string(), 3),
                ("a".to_string(), 2),
                ("c".to_string(), 1)
            ]
        );
    }

    #[test]
    fn test_repeated_key_is_stored_once() {
        let mut table = FrequencyTable::new();
        for _ in 0..1000 {
            table.increment("same");
        }
        table.increment("other");

        assert_eq!(table.size(), 2);
        assert_eq!(table.entries().get_index(0), Some((&"same".to_string(), &1000)));
        assert_eq!(table.entries().get_index_of("other"), Some(1));
    }

    #[test]
    fn test_empty_key_is_allowed() {
        let mut table = FrequencyTable::new();
        table.increment("");
        assert_eq!(table.get(""), Some(1));
    }
}

//! Popularity ledger: how often each actor has spoken

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One ledger row
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerEntry {
    pub real_name: String,
    /// Denormalised for persistence and display
    pub display_name: String,
    pub count: u64,
}

/// Persisted value for a single actor
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerRecordEntry {
    pub count: u64,
    pub character_name: String,
}

/// Persisted ledger shape: `{ id: {count, character_name} }`
pub type LedgerRecord = BTreeMap<String, LedgerRecordEntry>;

/// Occurrence counts in insertion order.
///
/// Entries are never removed; an actor that leaves the pool keeps its count.
///
/// ```
/// use legion_domain::ledger::PopularityLedger;
///
/// let mut ledger = PopularityLedger::new();
/// ledger.register("Yoda", "Master Yoda");
/// ledger.register("Karlach", "Karlach");
/// ledger.increment("Karlach");
/// assert_eq!(ledger.top_k(1)[0].real_name, "Karlach");
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PopularityLedger {
    entries: Vec<LedgerEntry>,
}

impl PopularityLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Ensure an entry exists; refreshes the display name if it does
    pub fn register(&mut self, real_name: &str, display_name: &str) {
        match self.entry_mut(real_name) {
            Some(entry) => entry.display_name = display_name.to_string(),
            None => self.entries.push(LedgerEntry {
                real_name: real_name.to_string(),
                display_name: display_name.to_string(),
                count: 0,
            }),
        }
    }

    /// Bump a count, creating the entry if needed. Returns the new count.
    pub fn increment(&mut self, real_name: &str) -> u64 {
        if self.entry_mut(real_name).is_none() {
            self.register(real_name, real_name);
        }
        match self.entry_mut(real_name) {
            Some(entry) => {
                entry.count += 1;
                entry.count
            }
            None => 0,
        }
    }

    pub fn count(&self, real_name: &str) -> u64 {
        self.entry(real_name).map(|e| e.count).unwrap_or(0)
    }

    pub fn contains(&self, real_name: &str) -> bool {
        self.entry(real_name).is_some()
    }

    pub fn entry(&self, real_name: &str) -> Option<&LedgerEntry> {
        self.entries.iter().find(|e| e.real_name == real_name)
    }

    fn entry_mut(&mut self, real_name: &str) -> Option<&mut LedgerEntry> {
        self.entries.iter_mut().find(|e| e.real_name == real_name)
    }

    pub fn entries(&self) -> &[LedgerEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The `n` most frequent entries; equal counts keep insertion order
    pub fn top_k(&self, n: usize) -> Vec<&LedgerEntry> {
        let mut sorted: Vec<&LedgerEntry> = self.entries.iter().collect();
        sorted.sort_by(|a, b| b.count.cmp(&a.count));
        sorted.truncate(n);
        sorted
    }

    /// Fold a persisted ledger in.
    ///
    /// Unknown ids are appended; for known ids the persisted count wins when
    /// it is higher, so a reload never loses progress.
    pub fn merge_record(&mut self, record: &LedgerRecord) {
        for (real_name, persisted) in record {
            match self.entry_mut(real_name) {
                Some(entry) => entry.count = entry.count.max(persisted.count),
                None => self.entries.push(LedgerEntry {
                    real_name: real_name.clone(),
                    display_name: persisted.character_name.clone(),
                    count: persisted.count,
                }),
            }
        }
    }

    pub fn to_record(&self) -> LedgerRecord {
        self.entries
            .iter()
            .map(|e| {
                (
                    e.real_name.clone(),
                    LedgerRecordEntry {
                        count: e.count,
                        character_name: e.display_name.clone(),
                    },
                )
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ledger() -> PopularityLedger {
        let mut ledger = PopularityLedger::new();
        for name in ["A", "B", "C", "D"] {
            ledger.register(name, name);
        }
        ledger
    }

    #[test]
    fn test_register_is_idempotent() {
        let mut ledger = ledger();
        ledger.increment("B");
        ledger.register("B", "Bee");
        assert_eq!(ledger.len(), 4);
        assert_eq!(ledger.count("B"), 1);
        assert_eq!(ledger.entry("B").unwrap().display_name, "Bee");
    }

    #[test]
    fn test_increment_unknown_creates_entry() {
        let mut ledger = PopularityLedger::new();
        assert_eq!(ledger.increment("Ghost"), 1);
        assert!(ledger.contains("Ghost"));
    }

    #[test]
    fn test_top_k_sorted_and_stable() {
        let mut ledger = ledger();
        ledger.increment("C");
        ledger.increment("C");
        ledger.increment("B");
        ledger.increment("D");

        let names = |l: &PopularityLedger| -> Vec<String> {
            l.top_k(3).iter().map(|e| e.real_name.clone()).collect()
        };
        assert_eq!(names(&ledger), vec!["C", "B", "D"]);
        assert_eq!(names(&ledger), names(&ledger));
        assert_eq!(ledger.top_k(10).len(), 4);
    }

    #[test]
    fn test_merge_record_keeps_higher_count() {
        let mut ledger = ledger();
        ledger.increment("A");
        let mut record = LedgerRecord::new();
        record.insert(
            "A".to_string(),
            LedgerRecordEntry {
                count: 7,
                character_name: "A".to_string(),
            },
        );
        record.insert(
            "Z".to_string(),
            LedgerRecordEntry {
                count: 2,
                character_name: "Zed".to_string(),
            },
        );
        ledger.merge_record(&record);
        assert_eq!(ledger.count("A"), 7);
        assert_eq!(ledger.count("Z"), 2);
        assert_eq!(ledger.entries().last().unwrap().display_name, "Zed");
    }

    #[test]
    fn test_record_shape() {
        let mut ledger = PopularityLedger::new();
        ledger.register("Yoda", "Master Yoda");
        ledger.increment("Yoda");
        let json = serde_json::to_value(ledger.to_record()).unwrap();
        assert_eq!(json["Yoda"]["count"], 1);
        assert_eq!(json["Yoda"]["character_name"], "Master Yoda");
    }
}

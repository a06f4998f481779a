use std::collections::HashSet;

use serde::{Deserialize, Serialize};

/// Maximum number of candidates embedded in a prompt or returned to a caller.
pub const MAX_CANDIDATES: usize = 20;

#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq, Eq)]
pub enum Category {
    Food,
    Cafe,
    Bar,
    Activity,
    Park,
    Shop,
}

impl Category {
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Food => "Food",
            Category::Cafe => "Cafe",
            Category::Bar => "Bar",
            Category::Activity => "Activity",
            Category::Park => "Park",
            Category::Shop => "Shop",
        }
    }

    /// Lenient lookup for category strings coming back from the AI model.
    /// Anything unrecognized lands in the catch-all `Activity`.
    pub fn from_label(label: &str) -> Self {
        match label.trim().to_lowercase().as_str() {
            "food" => Category::Food,
            "cafe" => Category::Cafe,
            "bar" => Category::Bar,
            "park" => Category::Park,
            "shop" => Category::Shop,
            _ => Category::Activity,
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct PlaceRecord {
    pub name: String,
    pub address: String,
    pub lat: f64,
    pub lng: f64,
    pub category: Category,
}

/// Insertion-ordered collection of candidate places, keyed by address with
/// first-write-wins semantics. The address doubles as the uniqueness key, so
/// records without one are rejected at the door.
#[derive(Debug, Default)]
pub struct CandidateSet {
    records: Vec<PlaceRecord>,
    seen_addresses: HashSet<String>,
}

impl CandidateSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a record unless its address is empty or already present.
    /// Returns whether the record was kept.
    pub fn insert(&mut self, record: PlaceRecord) -> bool {
        if record.address.trim().is_empty() {
            return false;
        }
        if !self.seen_addresses.insert(record.address.clone()) {
            return false;
        }
        self.records.push(record);
        true
    }

    pub fn merge(&mut self, records: Vec<PlaceRecord>) {
        for record in records {
            self.insert(record);
        }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Caps the set at `MAX_CANDIDATES`, keeping the earliest insertions.
    pub fn finalize(mut self) -> Vec<PlaceRecord> {
        self.records.truncate(MAX_CANDIDATES);
        self.records
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(name: &str, address: &str) -> PlaceRecord {
        PlaceRecord {
            name: name.to_string(),
            address: address.to_string(),
            lat: 39.7,
            lng: -104.9,
            category: Category::Activity,
        }
    }

    #[test]
    fn test_first_write_wins_dedup() {
        let mut set = CandidateSet::new();
        assert!(set.insert(record("First Bar", "12 Main St")));
        assert!(!set.insert(record("Renamed Bar", "12 Main St")));

        let records = set.finalize();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].name, "First Bar");
    }

    #[test]
    fn test_empty_address_is_dropped() {
        let mut set = CandidateSet::new();
        assert!(!set.insert(record("Ghost Venue", "")));
        assert!(!set.insert(record("Ghost Venue", "   ")));
        assert!(set.is_empty());
    }

    #[test]
    fn test_finalize_truncates_in_insertion_order() {
        let mut set = CandidateSet::new();
        for i in 0..30 {
            set.insert(record(&format!("Venue {}", i), &format!("{} Elm St", i)));
        }
        assert_eq!(set.len(), 30);

        let records = set.finalize();
        assert_eq!(records.len(), MAX_CANDIDATES);
        assert_eq!(records[0].address, "0 Elm St");
        assert_eq!(records[19].address, "19 Elm St");
    }

    #[test]
    fn test_category_label_fallback() {
        assert_eq!(Category::from_label("bar"), Category::Bar);
        assert_eq!(Category::from_label(" Park "), Category::Park);
        assert_eq!(Category::from_label("speakeasy"), Category::Activity);
    }
}

//! Swipe deck
//!
//! The ordered record list the card cycles through, plus the confidence each
//! record had before its latest local change (for trend arrows).

use std::collections::HashMap;

use crate::confidence;
use crate::models::{Record, VoteKind};

#[derive(Debug, Default)]
pub struct Deck {
    records: Vec<Record>,
    index: usize,
    previous: HashMap<String, i64>,
}

impl Deck {
    pub fn new(records: Vec<Record>) -> Self {
        let mut deck = Self::default();
        deck.replace(records);
        deck
    }

    /// Swap in a freshly fetched list. Trend baselines reset to the fetched
    /// values and the cursor returns to the first record.
    pub fn replace(&mut self, records: Vec<Record>) {
        self.previous = records
            .iter()
            .map(|r| (r.id.clone(), r.confidence))
            .collect();
        self.records = records;
        self.index = 0;
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn current(&self) -> Option<&Record> {
        self.records.get(self.index)
    }

    /// Move to the next record, wrapping to the first after the last.
    pub fn advance(&mut self) {
        if !self.records.is_empty() {
            self.index = (self.index + 1) % self.records.len();
        }
    }

    /// Jump to the record with `id`. Returns false if it is not in the deck.
    pub fn select(&mut self, id: &str) -> bool {
        match self.records.iter().position(|r| r.id == id) {
            Some(idx) => {
                self.index = idx;
                true
            }
            None => false,
        }
    }

    /// Put a newly created record first and show it.
    pub fn push_front(&mut self, record: Record) {
        self.previous.insert(record.id.clone(), record.confidence);
        self.records.insert(0, record);
        self.index = 0;
    }

    pub fn previous_confidence(&self, id: &str) -> Option<i64> {
        self.previous.get(id).copied()
    }

    /// Optimistically apply a vote to the current record.
    ///
    /// Returns the record id and its new local confidence.
    pub fn apply_local_vote(&mut self, kind: VoteKind) -> Option<(String, i64)> {
        let record = self.records.get_mut(self.index)?;
        self.previous.insert(record.id.clone(), record.confidence);
        record.confidence = confidence::apply_delta(record.confidence, kind);
        Some((record.id.clone(), record.confidence))
    }

    /// Adopt the server's recomputed confidence. The trend baseline stays at
    /// the value from before the local vote.
    pub fn reconcile(&mut self, id: &str, server_confidence: i64) -> bool {
        match self.records.iter_mut().find(|r| r.id == id) {
            Some(record) => {
                record.confidence = confidence::clamp(server_confidence);
                true
            }
            None => false,
        }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use chrono::{Duration, Utc};

    pub(crate) fn sample(id: &str, name: &str, confidence: i64) -> Record {
        Record {
            id: id.into(),
            name: name.into(),
            pill: "Pill".into(),
            tag: "Tag".into(),
            caption: "Caption".into(),
            description: "Description".into(),
            about_text: "About".into(),
            confidence,
            media_id: "dQw4w9WgXcQ".into(),
            website: "#".into(),
            social: "#".into(),
            owner_id: None,
            created_at: Utc::now() - Duration::minutes(confidence),
        }
    }

    #[test]
    fn test_advance_wraps() {
        let mut deck = Deck::new(vec![sample("a", "A", 50), sample("b", "B", 50)]);
        assert_eq!(deck.current().unwrap().id, "a");
        deck.advance();
        assert_eq!(deck.current().unwrap().id, "b");
        deck.advance();
        assert_eq!(deck.current().unwrap().id, "a");
    }

    #[test]
    fn test_empty_deck() {
        let mut deck = Deck::new(Vec::new());
        deck.advance();
        assert!(deck.current().is_none());
        assert!(deck.apply_local_vote(VoteKind::Yes).is_none());
    }

    #[test]
    fn test_optimistic_then_reconcile() {
        let mut deck = Deck::new(vec![sample("a", "A", 50)]);
        assert_eq!(deck.apply_local_vote(VoteKind::Yes), Some(("a".into(), 52)));
        assert_eq!(deck.previous_confidence("a"), Some(50));

        // another client voted meanwhile
        assert!(deck.reconcile("a", 51));
        assert_eq!(deck.current().unwrap().confidence, 51);
        assert_eq!(deck.previous_confidence("a"), Some(50));
        assert!(!deck.reconcile("zzz", 10));
    }

    #[test]
    fn test_push_front() {
        let mut deck = Deck::new(vec![sample("a", "A", 50), sample("b", "B", 50)]);
        deck.advance();
        deck.push_front(sample("new", "New", 50));
        assert_eq!(deck.len(), 3);
        assert_eq!(deck.current().unwrap().id, "new");
        assert_eq!(deck.previous_confidence("new"), Some(50));
    }

    #[test]
    fn test_select() {
        let mut deck = Deck::new(vec![sample("a", "A", 50), sample("b", "B", 50)]);
        assert!(deck.select("b"));
        assert_eq!(deck.index(), 1);
        assert!(!deck.select("c"));
        assert_eq!(deck.index(), 1);
    }
}

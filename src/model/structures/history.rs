use std::collections::VecDeque;

use chrono::NaiveDate;

use crate::model::constants::HISTORY_CAPACITY;

#[derive(Debug, Clone, PartialEq)]
pub struct HistoryEntry<T> {
    pub date: NaiveDate,
    pub value: T
}

/// Ordered log of dated values. Holds at most [`HISTORY_CAPACITY`] entries;
/// pushing onto a full log evicts the oldest entry.
#[derive(Debug, Clone, PartialEq)]
pub struct HistoryLog<T> {
    entries: VecDeque<HistoryEntry<T>>
}

impl<T> Default for HistoryLog<T> {
    fn default() -> Self {
        Self { entries: VecDeque::new() }
    }
}

impl<T> HistoryLog<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, date: NaiveDate, value: T) {
        while self.entries.len() >= HISTORY_CAPACITY {
            self.entries.pop_front();
        }

        self.entries.push_back(HistoryEntry { date, value });
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn last(&self) -> Option<&HistoryEntry<T>> {
        self.entries.back()
    }

    pub fn iter(&self) -> impl Iterator<Item = &HistoryEntry<T>> {
        self.entries.iter()
    }
}

impl<T> FromIterator<HistoryEntry<T>> for HistoryLog<T> {
    /// Keeps the most recent entries when the source exceeds capacity.
    fn from_iter<I: IntoIterator<Item = HistoryEntry<T>>>(iter: I) -> Self {
        let mut log = Self::new();
        for entry in iter {
            log.push(entry.date, entry.value);
        }
        log
    }
}

use std::collections::VecDeque;

use crate::error::ChatError;
use crate::orchestrator::record::ResponseRecord;

/// Newest-first log of records with a carousel cursor.
///
/// `current_index` stays inside `[0, len)` whenever the history is non-empty.
#[derive(Debug, Default)]
pub struct ResponseHistory {
    records: VecDeque<ResponseRecord>,
    current_index: usize,
}

impl ResponseHistory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, record: ResponseRecord) {
        self.records.push_front(record);
        self.current_index = 0;
    }

    pub fn next(&mut self) {
        if self.records.len() <= 1 {
            return;
        }
        self.current_index = (self.current_index + 1) % self.records.len();
    }

    pub fn previous(&mut self) {
        if self.records.len() <= 1 {
            return;
        }
        self.current_index = if self.current_index == 0 {
            self.records.len() - 1
        } else {
            self.current_index - 1
        };
    }

    pub fn jump_to(&mut self, index: usize) -> Result<(), ChatError> {
        if index >= self.records.len() {
            return Err(ChatError::index_out_of_range(index, self.records.len()));
        }
        self.current_index = index;
        Ok(())
    }

    pub fn clear(&mut self) {
        self.records.clear();
        self.current_index = 0;
    }

    pub fn current(&self) -> Option<&ResponseRecord> {
        self.records.get(self.current_index)
    }

    pub fn current_index(&self) -> usize {
        self.current_index
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn records(&self) -> Vec<ResponseRecord> {
        self.records.iter().cloned().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::ResponseHistory;
    use crate::orchestrator::record::{CompletionOutcome, ResponseRecord};
    use crate::params::ParameterSet;

    fn record(id: i64) -> ResponseRecord {
        ResponseRecord::new(
            id,
            format!("prompt {}", id),
            CompletionOutcome::Success(format!("answer {}", id)),
            ParameterSet::builtin_defaults(),
        )
    }

    fn history_of(n: i64) -> ResponseHistory {
        let mut history = ResponseHistory::new();
        for id in 1..=n {
            history.push(record(id));
        }
        history
    }

    #[test]
    fn push_prepends_and_resets_cursor() {
        let mut history = history_of(2);
        history.next();
        assert_eq!(history.current_index(), 1);

        history.push(record(3));
        assert_eq!(history.current_index(), 0);
        assert_eq!(history.current().map(|r| r.id()), Some(3));
        assert_eq!(history.len(), 3);
    }

    #[test]
    fn previous_from_zero_wraps_to_last() {
        let mut history = history_of(3);
        history.previous();
        assert_eq!(history.current_index(), 2);
        assert_eq!(history.current().map(|r| r.id()), Some(1));
    }

    #[test]
    fn next_from_last_wraps_to_zero() {
        let mut history = history_of(3);
        history.jump_to(2).unwrap();
        history.next();
        assert_eq!(history.current_index(), 0);
    }

    #[test]
    fn navigation_is_noop_for_single_record() {
        let mut history = history_of(1);
        history.next();
        history.previous();
        assert_eq!(history.current_index(), 0);

        let mut empty = ResponseHistory::new();
        empty.next();
        empty.previous();
        assert_eq!(empty.current_index(), 0);
        assert!(empty.current().is_none());
    }

    #[test]
    fn jump_to_rejects_out_of_range() {
        let mut history = history_of(2);
        let err = history.jump_to(2).unwrap_err();
        assert!(err.is_index());
        assert_eq!(history.current_index(), 0);

        assert!(ResponseHistory::new().jump_to(0).is_err());
    }

    #[test]
    fn clear_empties_and_resets() {
        let mut history = history_of(4);
        history.jump_to(3).unwrap();
        history.clear();
        assert!(history.is_empty());
        assert_eq!(history.current_index(), 0);
        assert!(history.current().is_none());
    }
}

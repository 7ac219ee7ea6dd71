use serde::Serialize;
use std::collections::BTreeMap;

use crate::model::ids::QuestionId;
use crate::model::question::Question;

/// Latest free-text answer per question. Entries are overwritten, never removed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct AnswerMap {
    entries: BTreeMap<QuestionId, String>,
}

impl AnswerMap {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Store `text` for `id`, replacing any previous answer.
    pub fn record(&mut self, id: QuestionId, text: impl Into<String>) {
        self.entries.insert(id, text.into());
    }

    #[must_use]
    pub fn get(&self, id: QuestionId) -> Option<&str> {
        self.entries.get(&id).map(String::as_str)
    }

    #[must_use]
    pub fn contains(&self, id: QuestionId) -> bool {
        self.entries.contains_key(&id)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of `questions` that have an entry in this map.
    #[must_use]
    pub fn answered_in(&self, questions: &[Question]) -> usize {
        questions.iter().filter(|q| self.contains(q.id())).count()
    }

    pub fn iter(&self) -> impl Iterator<Item = (QuestionId, &str)> {
        self.entries.iter().map(|(id, text)| (*id, text.as_str()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn last_write_wins() {
        let mut answers = AnswerMap::new();
        answers.record(QuestionId::new(1), "first");
        answers.record(QuestionId::new(1), "second");
        assert_eq!(answers.get(QuestionId::new(1)), Some("second"));
        assert_eq!(answers.len(), 1);
    }

    #[test]
    fn recording_same_text_twice_is_idempotent() {
        let mut once = AnswerMap::new();
        once.record(QuestionId::new(2), "x");
        let mut twice = once.clone();
        twice.record(QuestionId::new(2), "x");
        assert_eq!(once, twice);
    }

    #[test]
    fn empty_text_still_counts_as_an_entry() {
        let mut answers = AnswerMap::new();
        answers.record(QuestionId::new(3), "");
        assert!(answers.contains(QuestionId::new(3)));
        assert!(answers.get(QuestionId::new(9)).is_none());
    }

    #[test]
    fn serializes_as_object_keyed_by_id() {
        let mut answers = AnswerMap::new();
        answers.record(QuestionId::new(3), "x");
        let json = serde_json::to_string(&answers).unwrap();
        assert_eq!(json, r#"{"3":"x"}"#);
    }
}

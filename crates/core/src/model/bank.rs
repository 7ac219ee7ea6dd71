use serde::Deserialize;
use std::collections::{BTreeMap, HashSet};
use thiserror::Error;

use crate::model::ids::QuestionId;
use crate::model::question::{Question, QuestionDraft, QuestionError};

/// Bank used when a caller asks for a type key that does not exist.
pub const DEFAULT_BANK_KEY: &str = "general";

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error)]
#[non_exhaustive]
pub enum BankError {
    #[error("bank {key:?} contains no questions")]
    EmptyBank { key: String },

    #[error("default bank {key:?} is missing")]
    MissingDefault { key: String },

    #[error("bank {key:?} contains question id {id} more than once")]
    DuplicateQuestionId { key: String, id: QuestionId },

    #[error("bank {key:?}: {source}")]
    InvalidQuestion {
        key: String,
        #[source]
        source: QuestionError,
    },

    #[error("invalid bank document: {0}")]
    Parse(#[from] serde_json::Error),
}

//
// ─── SELECTION ─────────────────────────────────────────────────────────────────
//

/// Result of resolving a type key against the bank.
#[derive(Debug, Clone, Copy)]
pub struct BankSelection<'a> {
    /// The key that was actually used.
    pub key: &'a str,
    pub questions: &'a [Question],
    /// True when the requested key was unknown and the default bank was used.
    pub fell_back: bool,
}

/// Per-bank figures shown before a session starts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BankOverview {
    pub key: String,
    pub question_count: usize,
    pub total_time_limit_secs: u64,
    pub estimated_minutes: u64,
}

//
// ─── BANK ──────────────────────────────────────────────────────────────────────
//

/// Immutable lookup from a type key to an ordered, non-empty list of questions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuestionBank {
    banks: BTreeMap<String, Vec<Question>>,
    default_key: String,
}

#[derive(Deserialize)]
struct BankDocument {
    #[serde(default = "default_key")]
    default: String,
    banks: BTreeMap<String, Vec<QuestionDraft>>,
}

fn default_key() -> String {
    DEFAULT_BANK_KEY.to_string()
}

impl QuestionBank {
    /// Build a bank from already validated questions.
    ///
    /// # Errors
    ///
    /// Returns `BankError::EmptyBank` if any bank has no questions,
    /// `BankError::DuplicateQuestionId` if ids repeat inside one bank,
    /// and `BankError::MissingDefault` if `default_key` has no bank.
    pub fn new(
        banks: BTreeMap<String, Vec<Question>>,
        default_key: impl Into<String>,
    ) -> Result<Self, BankError> {
        let default_key = default_key.into();

        for (key, questions) in &banks {
            if questions.is_empty() {
                return Err(BankError::EmptyBank { key: key.clone() });
            }
            let mut seen = HashSet::with_capacity(questions.len());
            for question in questions {
                if !seen.insert(question.id()) {
                    return Err(BankError::DuplicateQuestionId {
                        key: key.clone(),
                        id: question.id(),
                    });
                }
            }
        }

        if !banks.contains_key(&default_key) {
            return Err(BankError::MissingDefault { key: default_key });
        }

        Ok(Self { banks, default_key })
    }

    /// Validate drafts and build a bank from them.
    ///
    /// # Errors
    ///
    /// Returns `BankError::InvalidQuestion` for a draft that fails validation,
    /// plus every error `QuestionBank::new` can return.
    pub fn from_drafts(
        drafts: BTreeMap<String, Vec<QuestionDraft>>,
        default_key: impl Into<String>,
    ) -> Result<Self, BankError> {
        let mut banks = BTreeMap::new();
        for (key, list) in drafts {
            let questions = list
                .into_iter()
                .map(QuestionDraft::validate)
                .collect::<Result<Vec<_>, _>>()
                .map_err(|source| BankError::InvalidQuestion {
                    key: key.clone(),
                    source,
                })?;
            banks.insert(key, questions);
        }
        Self::new(banks, default_key)
    }

    /// Parse a JSON bank document: `{ "default": "general", "banks": { "<key>": [..] } }`.
    ///
    /// `default` may be omitted and falls back to [`DEFAULT_BANK_KEY`].
    ///
    /// # Errors
    ///
    /// Returns `BankError::Parse` for malformed JSON, otherwise the errors of `from_drafts`.
    pub fn from_json(raw: &str) -> Result<Self, BankError> {
        let doc: BankDocument = serde_json::from_str(raw)?;
        Self::from_drafts(doc.banks, doc.default)
    }

    #[must_use]
    pub fn default_key(&self) -> &str {
        &self.default_key
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.banks.keys().map(String::as_str)
    }

    #[must_use]
    pub fn contains(&self, key: &str) -> bool {
        self.banks.contains_key(key)
    }

    /// Resolve `key` to a bank, using the default bank for unknown keys.
    #[must_use]
    pub fn select(&self, key: &str) -> BankSelection<'_> {
        self.select_or(key, &self.default_key)
    }

    /// Resolve `key` to a bank, using `fallback` for unknown keys.
    ///
    /// An unknown `fallback` resolves to the bank's own default.
    #[must_use]
    pub fn select_or(&self, key: &str, fallback: &str) -> BankSelection<'_> {
        if let Some((key, questions)) = self.banks.get_key_value(key) {
            return BankSelection {
                key,
                questions,
                fell_back: false,
            };
        }

        // The default key is checked in `new`, so the last lookup cannot miss.
        let (key, questions) = self
            .banks
            .get_key_value(fallback)
            .or_else(|| self.banks.get_key_value(&self.default_key))
            .map_or((self.default_key.as_str(), &[][..]), |(k, q)| {
                (k.as_str(), q.as_slice())
            });
        BankSelection {
            key,
            questions,
            fell_back: true,
        }
    }

    /// Question counts and total time budget per bank, in key order.
    #[must_use]
    pub fn overview(&self) -> Vec<BankOverview> {
        self.banks
            .iter()
            .map(|(key, questions)| {
                let total_time_limit_secs: u64 = questions
                    .iter()
                    .map(|q| u64::from(q.time_limit_secs()))
                    .sum();
                BankOverview {
                    key: key.clone(),
                    question_count: questions.len(),
                    total_time_limit_secs,
                    estimated_minutes: (total_time_limit_secs + 30) / 60,
                }
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::question::Difficulty;

    fn question(id: u64, limit: u32) -> Question {
        QuestionDraft {
            id: QuestionId::new(id),
            prompt: format!("Q{id}"),
            kind: String::new(),
            category: "General".into(),
            difficulty: Difficulty::Beginner,
            time_limit: limit,
            hints: Vec::new(),
        }
        .validate()
        .unwrap()
    }

    fn bank() -> QuestionBank {
        let mut banks = BTreeMap::new();
        banks.insert(
            "general".to_string(),
            vec![question(1, 120), question(2, 120), question(3, 180)],
        );
        banks.insert("technical".to_string(), vec![question(1, 300)]);
        QuestionBank::new(banks, DEFAULT_BANK_KEY).unwrap()
    }

    #[test]
    fn select_known_key() {
        let bank = bank();
        let selection = bank.select("technical");
        assert_eq!(selection.key, "technical");
        assert_eq!(selection.questions.len(), 1);
        assert!(!selection.fell_back);
        assert!(bank.contains("technical"));
        assert!(!bank.contains("foo"));
    }

    #[test]
    fn select_unknown_key_falls_back_to_default() {
        let bank = bank();
        let selection = bank.select("foo");
        assert_eq!(selection.key, "general");
        assert_eq!(selection.questions.len(), 3);
        assert!(selection.fell_back);
    }

    #[test]
    fn select_or_prefers_the_given_fallback() {
        let bank = bank();
        let selection = bank.select_or("foo", "technical");
        assert_eq!(selection.key, "technical");
        assert!(selection.fell_back);

        let selection = bank.select_or("general", "technical");
        assert_eq!(selection.key, "general");
        assert!(!selection.fell_back);

        let selection = bank.select_or("foo", "missing");
        assert_eq!(selection.key, "general");
    }

    #[test]
    fn empty_bank_is_rejected() {
        let mut banks = BTreeMap::new();
        banks.insert("general".to_string(), vec![question(1, 60)]);
        banks.insert("behavioral".to_string(), Vec::new());
        let err = QuestionBank::new(banks, DEFAULT_BANK_KEY).unwrap_err();
        assert!(matches!(err, BankError::EmptyBank { key } if key == "behavioral"));
    }

    #[test]
    fn missing_default_is_rejected() {
        let mut banks = BTreeMap::new();
        banks.insert("technical".to_string(), vec![question(1, 60)]);
        let err = QuestionBank::new(banks, DEFAULT_BANK_KEY).unwrap_err();
        assert!(matches!(err, BankError::MissingDefault { .. }));
    }

    #[test]
    fn duplicate_ids_within_a_bank_are_rejected() {
        let mut banks = BTreeMap::new();
        banks.insert(
            "general".to_string(),
            vec![question(1, 60), question(1, 90)],
        );
        let err = QuestionBank::new(banks, DEFAULT_BANK_KEY).unwrap_err();
        assert!(matches!(err, BankError::DuplicateQuestionId { .. }));
    }

    #[test]
    fn overview_rounds_minutes() {
        let bank = bank();
        let overview = bank.overview();
        let general = overview.iter().find(|o| o.key == "general").unwrap();
        assert_eq!(general.question_count, 3);
        assert_eq!(general.total_time_limit_secs, 420);
        assert_eq!(general.estimated_minutes, 7);
    }

    #[test]
    fn from_json_reads_bank_document() {
        let raw = r#"{
            "banks": {
                "general": [
                    { "id": 1, "prompt": "Why us?", "category": "Motivation",
                      "difficulty": "beginner", "timeLimit": 90 }
                ]
            }
        }"#;
        let bank = QuestionBank::from_json(raw).unwrap();
        assert_eq!(bank.default_key(), "general");
        assert_eq!(bank.select("general").questions[0].time_limit_secs(), 90);
    }

    #[test]
    fn from_json_surfaces_invalid_questions() {
        let raw = r#"{
            "banks": {
                "general": [
                    { "id": 1, "prompt": "Why us?", "category": "Motivation",
                      "difficulty": "beginner", "timeLimit": 0 }
                ]
            }
        }"#;
        let err = QuestionBank::from_json(raw).unwrap_err();
        assert!(matches!(err, BankError::InvalidQuestion { .. }));
    }
}

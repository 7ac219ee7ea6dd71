use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

use crate::model::ids::QuestionId;

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum QuestionError {
    #[error("question {id} has an empty prompt")]
    EmptyPrompt { id: QuestionId },

    #[error("question {id} has an empty category")]
    EmptyCategory { id: QuestionId },

    #[error("question {id} time limit must be > 0")]
    InvalidTimeLimit { id: QuestionId },

    #[error("unknown difficulty: {0}")]
    UnknownDifficulty(String),
}

//
// ─── DIFFICULTY ────────────────────────────────────────────────────────────────
//

/// How demanding a question is expected to be.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Beginner,
    Intermediate,
    Advanced,
}

impl Difficulty {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Difficulty::Beginner => "beginner",
            Difficulty::Intermediate => "intermediate",
            Difficulty::Advanced => "advanced",
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Difficulty {
    type Err = QuestionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "beginner" => Ok(Self::Beginner),
            "intermediate" => Ok(Self::Intermediate),
            "advanced" => Ok(Self::Advanced),
            _ => Err(QuestionError::UnknownDifficulty(s.to_string())),
        }
    }
}

//
// ─── DRAFT ─────────────────────────────────────────────────────────────────────
//

/// Unvalidated question record, as found in bank files.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestionDraft {
    pub id: QuestionId,
    #[serde(alias = "question")]
    pub prompt: String,
    #[serde(default, alias = "type")]
    pub kind: String,
    pub category: String,
    pub difficulty: Difficulty,
    pub time_limit: u32,
    #[serde(default)]
    pub hints: Vec<String>,
}

impl QuestionDraft {
    /// Validate and normalize the draft into an immutable question.
    ///
    /// # Errors
    ///
    /// Returns `QuestionError` if the prompt or category is blank, or the time limit is zero.
    pub fn validate(self) -> Result<Question, QuestionError> {
        let id = self.id;
        let prompt = self.prompt.trim().to_string();
        if prompt.is_empty() {
            return Err(QuestionError::EmptyPrompt { id });
        }
        let category = self.category.trim().to_string();
        if category.is_empty() {
            return Err(QuestionError::EmptyCategory { id });
        }
        if self.time_limit == 0 {
            return Err(QuestionError::InvalidTimeLimit { id });
        }

        let hints = self
            .hints
            .into_iter()
            .map(|hint| hint.trim().to_string())
            .filter(|hint| !hint.is_empty())
            .collect();

        Ok(Question {
            id,
            prompt,
            kind: self.kind.trim().to_string(),
            category,
            difficulty: self.difficulty,
            time_limit_secs: self.time_limit,
            hints,
        })
    }
}

//
// ─── QUESTION ──────────────────────────────────────────────────────────────────
//

/// A single interview question. Immutable once loaded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Question {
    id: QuestionId,
    prompt: String,
    kind: String,
    category: String,
    difficulty: Difficulty,
    time_limit_secs: u32,
    hints: Vec<String>,
}

impl Question {
    #[must_use]
    pub fn id(&self) -> QuestionId {
        self.id
    }

    #[must_use]
    pub fn prompt(&self) -> &str {
        &self.prompt
    }

    /// Free-form format label such as "coding" or "situational". May be empty.
    #[must_use]
    pub fn kind(&self) -> &str {
        &self.kind
    }

    #[must_use]
    pub fn category(&self) -> &str {
        &self.category
    }

    #[must_use]
    pub fn difficulty(&self) -> Difficulty {
        self.difficulty
    }

    /// Time budget for this question, always > 0.
    #[must_use]
    pub fn time_limit_secs(&self) -> u32 {
        self.time_limit_secs
    }

    #[must_use]
    pub fn hints(&self) -> &[String] {
        &self.hints
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn draft(id: u64) -> QuestionDraft {
        QuestionDraft {
            id: QuestionId::new(id),
            prompt: "  Why this role?  ".into(),
            kind: "motivation".into(),
            category: "Motivation".into(),
            difficulty: Difficulty::Beginner,
            time_limit: 120,
            hints: vec!["Research the company".into(), "   ".into()],
        }
    }

    #[test]
    fn validate_trims_and_drops_blank_hints() {
        let question = draft(1).validate().unwrap();
        assert_eq!(question.prompt(), "Why this role?");
        assert_eq!(question.hints(), ["Research the company".to_string()]);
        assert_eq!(question.time_limit_secs(), 120);
    }

    #[test]
    fn validate_rejects_zero_time_limit() {
        let mut d = draft(3);
        d.time_limit = 0;
        assert_eq!(
            d.validate().unwrap_err(),
            QuestionError::InvalidTimeLimit {
                id: QuestionId::new(3)
            }
        );
    }

    #[test]
    fn validate_rejects_blank_prompt() {
        let mut d = draft(4);
        d.prompt = "\n".into();
        assert!(matches!(
            d.validate(),
            Err(QuestionError::EmptyPrompt { .. })
        ));
    }

    #[test]
    fn difficulty_parses_case_insensitively() {
        assert_eq!("Advanced".parse::<Difficulty>().unwrap(), Difficulty::Advanced);
        assert!("expert".parse::<Difficulty>().is_err());
    }

    #[test]
    fn draft_accepts_original_field_names() {
        let json = r#"{
            "id": 2,
            "question": "Where do you see yourself in 5 years?",
            "type": "career",
            "difficulty": "beginner",
            "timeLimit": 120,
            "category": "Career Goals",
            "hints": ["Be realistic"]
        }"#;
        let question = serde_json::from_str::<QuestionDraft>(json)
            .unwrap()
            .validate()
            .unwrap();
        assert_eq!(question.kind(), "career");
        assert_eq!(question.difficulty(), Difficulty::Beginner);
    }
}

use thiserror::Error;

use crate::model::{BankError, QuestionError, SessionSummaryError, SettingsError};

#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Question(#[from] QuestionError),
    #[error(transparent)]
    Bank(#[from] BankError),
    #[error(transparent)]
    Settings(#[from] SettingsError),
    #[error(transparent)]
    Summary(#[from] SessionSummaryError),
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{QuestionBank, SessionSettings};

    fn load(raw: &str) -> Result<QuestionBank, Error> {
        Ok(QuestionBank::from_json(raw)?)
    }

    #[test]
    fn layer_errors_convert() {
        let err = load("{ not json").unwrap_err();
        assert!(matches!(err, Error::Bank(_)));

        let err: Error = SessionSettings::new("", 1_000, 30).unwrap_err().into();
        assert!(matches!(err, Error::Settings(SettingsError::EmptyDefaultBank)));
    }
}

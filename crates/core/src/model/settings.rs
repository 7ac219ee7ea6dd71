use thiserror::Error;

use crate::model::bank::DEFAULT_BANK_KEY;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum SettingsError {
    #[error("default bank key cannot be empty")]
    EmptyDefaultBank,

    #[error("tick period must be between 1 and 60000 ms")]
    InvalidTickPeriod,

    #[error("warning threshold must be at most 3600 seconds")]
    InvalidWarningThreshold,
}

/// Tunables for an interview session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionSettings {
    default_bank: String,
    tick_period_ms: u64,
    warning_threshold_secs: u32,
}

impl SessionSettings {
    /// Creates custom session settings.
    ///
    /// # Errors
    ///
    /// Returns `SettingsError` if the default bank is blank or a value is out of range.
    pub fn new(
        default_bank: impl Into<String>,
        tick_period_ms: u64,
        warning_threshold_secs: u32,
    ) -> Result<Self, SettingsError> {
        let default_bank = default_bank.into().trim().to_string();
        if default_bank.is_empty() {
            return Err(SettingsError::EmptyDefaultBank);
        }
        if !(1..=60_000).contains(&tick_period_ms) {
            return Err(SettingsError::InvalidTickPeriod);
        }
        if warning_threshold_secs > 3_600 {
            return Err(SettingsError::InvalidWarningThreshold);
        }

        Ok(Self {
            default_bank,
            tick_period_ms,
            warning_threshold_secs,
        })
    }

    /// Bank used when the requested type key is unknown.
    #[must_use]
    pub fn default_bank(&self) -> &str {
        &self.default_bank
    }

    /// Wall-clock length of one countdown second, in milliseconds.
    #[must_use]
    pub fn tick_period_ms(&self) -> u64 {
        self.tick_period_ms
    }

    #[must_use]
    pub fn tick_period(&self) -> std::time::Duration {
        std::time::Duration::from_millis(self.tick_period_ms)
    }

    /// Remaining time at or below which the timer is flagged.
    #[must_use]
    pub fn warning_threshold_secs(&self) -> u32 {
        self.warning_threshold_secs
    }
}

impl Default for SessionSettings {
    fn default() -> Self {
        Self {
            default_bank: DEFAULT_BANK_KEY.to_string(),
            tick_period_ms: 1_000,
            warning_threshold_secs: 30,
        }
    }
}

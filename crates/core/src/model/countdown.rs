use serde::Serialize;

/// Outcome of a single countdown tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CountdownTick {
    /// Time is left; carries the new remaining value.
    Running(u32),
    /// The budget is used up.
    Expired,
}

/// Remaining-seconds counter for the active question.
///
/// `remaining_secs` always stays within `0..=limit_secs`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Countdown {
    limit_secs: u32,
    remaining_secs: u32,
}

impl Countdown {
    /// A countdown that has never been armed.
    #[must_use]
    pub fn idle() -> Self {
        Self::default()
    }

    /// A full countdown for a question with the given time limit.
    #[must_use]
    pub fn armed(limit_secs: u32) -> Self {
        Self {
            limit_secs,
            remaining_secs: limit_secs,
        }
    }

    #[must_use]
    pub fn limit_secs(&self) -> u32 {
        self.limit_secs
    }

    #[must_use]
    pub fn remaining_secs(&self) -> u32 {
        self.remaining_secs
    }

    /// Consume one second. The tick that reaches zero reports `Expired`.
    pub fn tick(&mut self) -> CountdownTick {
        self.remaining_secs = self.remaining_secs.saturating_sub(1);
        if self.remaining_secs == 0 {
            CountdownTick::Expired
        } else {
            CountdownTick::Running(self.remaining_secs)
        }
    }

    /// True while time is left but no more than `threshold_secs` of it.
    #[must_use]
    pub fn is_warning(&self, threshold_secs: u32) -> bool {
        self.remaining_secs > 0 && self.remaining_secs <= threshold_secs
    }
}

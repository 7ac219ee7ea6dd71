/// User intents forwarded by the presentation layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionIntent {
    Start,
    Pause,
    Resume,
    /// Pause when running, resume when paused.
    TogglePause,
    Next,
    Previous,
    /// 0-based question index.
    JumpTo(usize),
    End,
    RecordAnswer(String),
}

/// What an intent or tick did to the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    /// Not valid in the current state; nothing changed.
    Ignored,
    /// State changed without resetting the countdown.
    Updated,
    /// The countdown was reset to a question's full time limit.
    Rearmed,
    /// The session entered `Complete`.
    Completed,
}

impl Transition {
    #[must_use]
    pub fn is_accepted(self) -> bool {
        !matches!(self, Transition::Ignored)
    }
}

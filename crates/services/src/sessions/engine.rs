use chrono::{DateTime, Utc};
use std::fmt;
use tracing::{debug, info, warn};

use interview_core::Clock;
use interview_core::model::{
    AnswerMap, BankSelection, Countdown, CountdownTick, EndReason, Question, QuestionBank,
    SessionSettings, SessionStatus, SessionSummary,
};

use super::intent::{SessionIntent, Transition};
use super::observer::SessionObserver;
use super::progress::SessionProgress;
use super::ticker::{SubscriptionId, Tick, TickSubscription, Ticker};
use super::view::SessionSnapshot;
use crate::error::SessionError;

//
// ─── STATE ─────────────────────────────────────────────────────────────────────
//

/// The single mutable record behind a session. Only the engine touches it.
#[derive(Debug, Clone, Default)]
struct SessionState {
    current_index: usize,
    countdown: Countdown,
    status: SessionStatus,
    answers: AnswerMap,
}

//
// ─── ENGINE ────────────────────────────────────────────────────────────────────
//

/// Drives one interview session: lifecycle, countdown, navigation and answers.
///
/// The engine owns at most one tick subscription at any time. It acquires one
/// when entering `Running`, releases it on every exit from `Running`, and swaps
/// it for a fresh one whenever the countdown is re-armed while running.
pub struct SessionEngine {
    bank_key: String,
    questions: Vec<Question>,
    state: SessionState,
    warning_threshold_secs: u32,
    clock: Clock,
    ticker: Box<dyn Ticker>,
    subscription: Option<Box<dyn TickSubscription>>,
    last_subscription: u64,
    observer: Option<Box<dyn SessionObserver>>,
    started_at: Option<DateTime<Utc>>,
    end_reason: Option<EndReason>,
    time_spent_secs: u64,
    summary: Option<SessionSummary>,
}

impl SessionEngine {
    /// Create a session for `type_key`, falling back to the bank's default for unknown keys.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Empty` if the selected bank has no questions.
    pub fn new(
        bank: &QuestionBank,
        type_key: &str,
        ticker: Box<dyn Ticker>,
    ) -> Result<Self, SessionError> {
        Self::from_selection(bank.select(type_key), type_key, ticker)
    }

    /// Create a session for `type_key` with `settings` applied.
    ///
    /// Unknown keys fall back to `settings.default_bank()`, then to the bank's default.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Empty` if the selected bank has no questions.
    pub fn configured(
        bank: &QuestionBank,
        type_key: &str,
        settings: &SessionSettings,
        ticker: Box<dyn Ticker>,
    ) -> Result<Self, SessionError> {
        let selection = bank.select_or(type_key, settings.default_bank());
        Ok(Self::from_selection(selection, type_key, ticker)?.with_settings(settings))
    }

    fn from_selection(
        selection: BankSelection<'_>,
        requested: &str,
        ticker: Box<dyn Ticker>,
    ) -> Result<Self, SessionError> {
        if selection.fell_back {
            warn!(
                requested,
                using = selection.key,
                "unknown interview type, using default bank"
            );
        }
        Self::from_questions(selection.key, selection.questions.to_vec(), ticker)
    }

    /// Create a session over an explicit question list.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Empty` if `questions` is empty.
    pub fn from_questions(
        bank_key: impl Into<String>,
        questions: Vec<Question>,
        ticker: Box<dyn Ticker>,
    ) -> Result<Self, SessionError> {
        if questions.is_empty() {
            return Err(SessionError::Empty);
        }

        Ok(Self {
            bank_key: bank_key.into(),
            questions,
            state: SessionState::default(),
            warning_threshold_secs: SessionSettings::default().warning_threshold_secs(),
            clock: Clock::default(),
            ticker,
            subscription: None,
            last_subscription: 0,
            observer: None,
            started_at: None,
            end_reason: None,
            time_spent_secs: 0,
            summary: None,
        })
    }

    #[must_use]
    pub fn with_clock(mut self, clock: Clock) -> Self {
        self.clock = clock;
        self
    }

    #[must_use]
    pub fn with_settings(mut self, settings: &SessionSettings) -> Self {
        self.warning_threshold_secs = settings.warning_threshold_secs();
        self
    }

    #[must_use]
    pub fn with_observer(mut self, observer: Box<dyn SessionObserver>) -> Self {
        self.observer = Some(observer);
        self
    }

    // ─── Accessors ─────────────────────────────────────────────────────────────

    #[must_use]
    pub fn bank_key(&self) -> &str {
        &self.bank_key
    }

    #[must_use]
    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    #[must_use]
    pub fn status(&self) -> SessionStatus {
        self.state.status
    }

    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.state.status.is_terminal()
    }

    #[must_use]
    pub fn current_index(&self) -> usize {
        self.state.current_index
    }

    #[must_use]
    pub fn current_question(&self) -> &Question {
        // `current_index` is kept below `questions.len()` by every transition.
        &self.questions[self.state.current_index]
    }

    #[must_use]
    pub fn remaining_secs(&self) -> u32 {
        self.state.countdown.remaining_secs()
    }

    #[must_use]
    pub fn answers(&self) -> &AnswerMap {
        &self.state.answers
    }

    #[must_use]
    pub fn end_reason(&self) -> Option<EndReason> {
        self.end_reason
    }

    /// Present once the session is complete.
    #[must_use]
    pub fn summary(&self) -> Option<&SessionSummary> {
        self.summary.as_ref()
    }

    /// The live tick subscription, if the countdown is running.
    #[must_use]
    pub fn active_subscription(&self) -> Option<SubscriptionId> {
        self.subscription.as_ref().map(|s| s.id())
    }

    #[must_use]
    pub fn time_spent_secs(&self) -> u64 {
        self.time_spent_secs
    }

    /// Sum of all time limits, rounded to whole minutes.
    #[must_use]
    pub fn estimated_minutes(&self) -> u64 {
        let total: u64 = self
            .questions
            .iter()
            .map(|q| u64::from(q.time_limit_secs()))
            .sum();
        (total + 30) / 60
    }

    #[must_use]
    pub fn progress(&self) -> SessionProgress {
        SessionProgress {
            total: self.questions.len(),
            answered: self.state.answers.answered_in(&self.questions),
            position: self.state.current_index + 1,
            is_complete: self.is_complete(),
        }
    }

    #[must_use]
    pub fn snapshot(&self) -> SessionSnapshot {
        let status = self.state.status;
        let live = matches!(status, SessionStatus::Running | SessionStatus::Paused);
        SessionSnapshot {
            bank_key: self.bank_key.clone(),
            status,
            current_index: self.state.current_index,
            total: self.questions.len(),
            remaining_secs: self.remaining_secs(),
            question: self.current_question().clone(),
            answers: self.state.answers.clone(),
            time_warning: live && self.state.countdown.is_warning(self.warning_threshold_secs),
            end_reason: self.end_reason,
            answered: self
                .questions
                .iter()
                .map(|q| self.state.answers.contains(q.id()))
                .collect(),
        }
    }

    // ─── Lifecycle ─────────────────────────────────────────────────────────────

    /// Begin the interview at the first question. Only valid before the first start.
    pub fn start(&mut self) -> Transition {
        if self.state.status != SessionStatus::NotStarted {
            debug!(status = %self.state.status, "start ignored");
            return Transition::Ignored;
        }

        self.started_at = Some(self.clock.now());
        self.state.status = SessionStatus::Running;
        self.arm(0);
        info!(
            bank = %self.bank_key,
            questions = self.questions.len(),
            "interview started"
        );
        self.settle(Transition::Rearmed)
    }

    /// Freeze the countdown, keeping the remaining time.
    pub fn pause(&mut self) -> Transition {
        if self.state.status != SessionStatus::Running {
            return Transition::Ignored;
        }
        self.state.status = SessionStatus::Paused;
        debug!(remaining = self.remaining_secs(), "interview paused");
        self.settle(Transition::Updated)
    }

    /// Continue the countdown from where it was frozen.
    pub fn resume(&mut self) -> Transition {
        if self.state.status != SessionStatus::Paused {
            return Transition::Ignored;
        }
        self.state.status = SessionStatus::Running;
        debug!(remaining = self.remaining_secs(), "interview resumed");
        self.settle(Transition::Updated)
    }

    pub fn toggle_pause(&mut self) -> Transition {
        match self.state.status {
            SessionStatus::Running => self.pause(),
            SessionStatus::Paused => self.resume(),
            SessionStatus::NotStarted | SessionStatus::Complete => Transition::Ignored,
        }
    }

    /// End the interview now. Repeated calls are no-ops.
    pub fn end(&mut self) -> Transition {
        if self.is_complete() {
            return Transition::Ignored;
        }
        self.complete(EndReason::EndedEarly)
    }

    // ─── Navigation ────────────────────────────────────────────────────────────

    /// Move to the next question, or finish the interview from the last one.
    pub fn next(&mut self) -> Transition {
        if !self.is_navigable() {
            return Transition::Ignored;
        }
        let next = self.state.current_index + 1;
        if next < self.questions.len() {
            self.arm(next);
            self.settle(Transition::Rearmed)
        } else {
            self.complete(EndReason::Finished)
        }
    }

    /// Move to the previous question. No-op on the first question.
    pub fn previous(&mut self) -> Transition {
        if !self.is_navigable() || self.state.current_index == 0 {
            return Transition::Ignored;
        }
        self.arm(self.state.current_index - 1);
        self.settle(Transition::Rearmed)
    }

    /// Move to `index`, re-arming the countdown even if it is the current question.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::IndexOutOfRange` if `index` is not a valid question index.
    /// The session is left unchanged.
    pub fn jump_to(&mut self, index: usize) -> Result<Transition, SessionError> {
        let len = self.questions.len();
        if index >= len {
            warn!(index, len, "jump rejected: index out of range");
            return Err(SessionError::IndexOutOfRange { index, len });
        }
        if !self.is_navigable() {
            return Ok(Transition::Ignored);
        }
        self.arm(index);
        Ok(self.settle(Transition::Rearmed))
    }

    // ─── Answers ───────────────────────────────────────────────────────────────

    /// Store `text` as the answer to the current question, replacing any earlier one.
    pub fn record_answer(&mut self, text: impl Into<String>) -> Transition {
        if self.is_complete() {
            return Transition::Ignored;
        }
        let id = self.current_question().id();
        self.state.answers.record(id, text);
        self.settle(Transition::Updated)
    }

    // ─── Countdown ─────────────────────────────────────────────────────────────

    /// Apply one elapsed time unit. Ticks from anything but the live subscription are dropped.
    pub fn on_tick(&mut self, tick: Tick) -> Transition {
        if self.state.status != SessionStatus::Running {
            debug!(subscription = tick.subscription.value(), "tick ignored: not running");
            return Transition::Ignored;
        }
        if self.active_subscription() != Some(tick.subscription) {
            debug!(subscription = tick.subscription.value(), "stale tick ignored");
            return Transition::Ignored;
        }

        self.time_spent_secs += 1;
        match self.state.countdown.tick() {
            CountdownTick::Running(_) => self.settle(Transition::Updated),
            CountdownTick::Expired => self.expire(),
        }
    }

    /// Dispatch a presentation-layer intent.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::IndexOutOfRange` for an invalid `JumpTo`.
    pub fn apply(&mut self, intent: SessionIntent) -> Result<Transition, SessionError> {
        let transition = match intent {
            SessionIntent::Start => self.start(),
            SessionIntent::Pause => self.pause(),
            SessionIntent::Resume => self.resume(),
            SessionIntent::TogglePause => self.toggle_pause(),
            SessionIntent::Next => self.next(),
            SessionIntent::Previous => self.previous(),
            SessionIntent::JumpTo(index) => self.jump_to(index)?,
            SessionIntent::End => self.end(),
            SessionIntent::RecordAnswer(text) => self.record_answer(text),
        };
        Ok(transition)
    }

    // ─── Internals ─────────────────────────────────────────────────────────────

    fn is_navigable(&self) -> bool {
        matches!(
            self.state.status,
            SessionStatus::Running | SessionStatus::Paused
        )
    }

    fn arm(&mut self, index: usize) {
        self.state.current_index = index;
        self.state.countdown = Countdown::armed(self.questions[index].time_limit_secs());
    }

    fn expire(&mut self) -> Transition {
        self.release();
        let index = self.state.current_index;
        debug!(index, "time expired");
        if index + 1 < self.questions.len() {
            self.arm(index + 1);
            self.settle(Transition::Rearmed)
        } else {
            self.complete(EndReason::TimeExpired)
        }
    }

    fn complete(&mut self, reason: EndReason) -> Transition {
        self.state.status = SessionStatus::Complete;
        self.end_reason = Some(reason);
        self.release();

        match self.build_summary(reason) {
            Ok(summary) => {
                info!(
                    bank = %self.bank_key,
                    answered = summary.answered_questions(),
                    total = summary.total_questions(),
                    reason = ?reason,
                    "interview complete"
                );
                self.summary = Some(summary);
            }
            Err(err) => warn!(error = %err, "could not build session summary"),
        }

        self.settle(Transition::Completed)
    }

    fn build_summary(&self, reason: EndReason) -> Result<SessionSummary, SessionError> {
        let now = self.clock.now();
        let started_at = self.started_at.unwrap_or(now);
        // Wall clock may step backwards between start and end.
        let completed_at = now.max(started_at);
        Ok(SessionSummary::new(
            self.bank_key.clone(),
            self.questions.len(),
            self.state.answers.answered_in(&self.questions),
            self.state.answers.clone(),
            reason,
            started_at,
            completed_at,
            self.time_spent_secs,
        )?)
    }

    /// Bring the tick subscription in line with the new state, then notify the observer.
    fn settle(&mut self, transition: Transition) -> Transition {
        let running = self.state.status == SessionStatus::Running;
        match transition {
            Transition::Ignored => return transition,
            Transition::Rearmed if running => self.acquire(),
            Transition::Updated if running => {
                if self.subscription.is_none() {
                    self.acquire();
                }
            }
            Transition::Rearmed | Transition::Updated | Transition::Completed => self.release(),
        }

        self.publish();
        if transition == Transition::Completed {
            if let (Some(observer), Some(summary)) = (self.observer.as_mut(), self.summary.as_ref())
            {
                observer.on_complete(summary);
            }
        }
        transition
    }

    fn acquire(&mut self) {
        self.release();
        self.last_subscription += 1;
        let id = SubscriptionId::new(self.last_subscription);
        self.subscription = Some(self.ticker.subscribe(id));
        debug!(
            subscription = id.value(),
            index = self.state.current_index,
            remaining = self.remaining_secs(),
            "countdown subscribed"
        );
    }

    fn release(&mut self) {
        if let Some(mut subscription) = self.subscription.take() {
            subscription.cancel();
            debug!(subscription = subscription.id().value(), "countdown released");
        }
    }

    fn publish(&mut self) {
        if self.observer.is_none() {
            return;
        }
        let snapshot = self.snapshot();
        if let Some(observer) = self.observer.as_mut() {
            observer.on_snapshot(&snapshot);
        }
    }
}

impl Drop for SessionEngine {
    fn drop(&mut self) {
        self.release();
    }
}

impl fmt::Debug for SessionEngine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionEngine")
            .field("bank_key", &self.bank_key)
            .field("questions_len", &self.questions.len())
            .field("state", &self.state)
            .field("subscription", &self.active_subscription())
            .field("end_reason", &self.end_reason)
            .finish_non_exhaustive()
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//

use tokio::sync::mpsc;
use tracing::{debug, warn};

use interview_core::Clock;
use interview_core::model::{QuestionBank, SessionSettings, SessionSummary};

use super::engine::SessionEngine;
use super::intent::SessionIntent;
use super::observer::SessionObserver;
use super::ticker::{Tick, TokioTicker};
use crate::error::SessionError;

/// Runs a session engine against live ticks and incoming intents.
///
/// Ticks and intents are handled one at a time on a single task, so the
/// engine never sees overlapping mutations.
#[derive(Debug)]
pub struct SessionLoop {
    engine: SessionEngine,
    ticks: mpsc::UnboundedReceiver<Tick>,
}

impl SessionLoop {
    /// `ticks` must be the receiver fed by the engine's ticker.
    #[must_use]
    pub fn new(engine: SessionEngine, ticks: mpsc::UnboundedReceiver<Tick>) -> Self {
        Self { engine, ticks }
    }

    /// Build a session for `type_key` driven by a `TokioTicker` at the configured period.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Empty` if the selected bank has no questions.
    pub fn tokio(
        bank: &QuestionBank,
        type_key: &str,
        settings: &SessionSettings,
        clock: Clock,
    ) -> Result<Self, SessionError> {
        let (ticker, ticks) = TokioTicker::new(settings.tick_period());
        let engine =
            SessionEngine::configured(bank, type_key, settings, Box::new(ticker))?.with_clock(clock);
        Ok(Self::new(engine, ticks))
    }

    #[must_use]
    pub fn with_observer(mut self, observer: Box<dyn SessionObserver>) -> Self {
        self.engine = self.engine.with_observer(observer);
        self
    }

    #[must_use]
    pub fn engine(&self) -> &SessionEngine {
        &self.engine
    }

    /// Process ticks and intents until the session completes.
    ///
    /// Closing the intent channel ends the session.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::MissingSummary` if the session completed without a summary.
    pub async fn run(
        mut self,
        mut intents: mpsc::Receiver<SessionIntent>,
    ) -> Result<SessionSummary, SessionError> {
        while !self.engine.is_complete() {
            tokio::select! {
                Some(tick) = self.ticks.recv() => {
                    self.engine.on_tick(tick);
                }
                intent = intents.recv() => match intent {
                    Some(intent) => {
                        if let Err(err) = self.engine.apply(intent) {
                            warn!(error = %err, "intent rejected");
                        }
                    }
                    None => {
                        debug!("intent channel closed, ending session");
                        self.engine.end();
                    }
                },
            }
        }

        self.engine
            .summary()
            .cloned()
            .ok_or(SessionError::MissingSummary)
    }
}

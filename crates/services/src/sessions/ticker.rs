use std::collections::BTreeSet;
use std::fmt;
use std::sync::{Arc, Mutex, PoisonError};

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::{Duration, Instant, interval_at};

//
// ─── TICKS ─────────────────────────────────────────────────────────────────────
//

/// Identity of one countdown subscription. Never reused within a session.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SubscriptionId(u64);

impl SubscriptionId {
    #[must_use]
    pub fn new(id: u64) -> Self {
        Self(id)
    }

    #[must_use]
    pub fn value(&self) -> u64 {
        self.0
    }
}

impl fmt::Debug for SubscriptionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SubscriptionId({})", self.0)
    }
}

/// One elapsed time unit, stamped with the subscription that produced it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Tick {
    pub subscription: SubscriptionId,
}

impl Tick {
    #[must_use]
    pub fn new(subscription: SubscriptionId) -> Self {
        Self { subscription }
    }
}

//
// ─── CAPABILITY ────────────────────────────────────────────────────────────────
//

/// A live, cancelable stream of ticks.
pub trait TickSubscription: Send {
    fn id(&self) -> SubscriptionId;

    /// Stop producing ticks. Calling it twice is harmless.
    fn cancel(&mut self);
}

/// Source of repeating one-unit notifications.
pub trait Ticker: Send {
    fn subscribe(&mut self, id: SubscriptionId) -> Box<dyn TickSubscription>;
}

//
// ─── MANUAL TICKER ─────────────────────────────────────────────────────────────
//

#[derive(Debug, Default)]
struct ManualState {
    active: BTreeSet<SubscriptionId>,
    subscribed: usize,
    cancelled: usize,
}

/// Ticker that never fires on its own; callers deliver ticks by hand.
///
/// Clones share state, so a test can keep one clone to inspect subscriptions
/// while the engine owns another.
#[derive(Debug, Clone, Default)]
pub struct ManualTicker {
    state: Arc<Mutex<ManualState>>,
}

impl ManualTicker {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn with_state<R>(&self, f: impl FnOnce(&mut ManualState) -> R) -> R {
        let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        f(&mut state)
    }

    /// Subscriptions that have been created and not yet cancelled.
    #[must_use]
    pub fn active(&self) -> Vec<SubscriptionId> {
        self.with_state(|s| s.active.iter().copied().collect())
    }

    /// Total number of subscriptions ever created.
    #[must_use]
    pub fn subscribe_count(&self) -> usize {
        self.with_state(|s| s.subscribed)
    }

    /// Total number of subscriptions cancelled.
    #[must_use]
    pub fn cancel_count(&self) -> usize {
        self.with_state(|s| s.cancelled)
    }
}

impl Ticker for ManualTicker {
    fn subscribe(&mut self, id: SubscriptionId) -> Box<dyn TickSubscription> {
        self.with_state(|s| {
            s.active.insert(id);
            s.subscribed += 1;
        });
        Box::new(ManualSubscription {
            id,
            ticker: self.clone(),
            live: true,
        })
    }
}

struct ManualSubscription {
    id: SubscriptionId,
    ticker: ManualTicker,
    live: bool,
}

impl TickSubscription for ManualSubscription {
    fn id(&self) -> SubscriptionId {
        self.id
    }

    fn cancel(&mut self) {
        if !self.live {
            return;
        }
        self.live = false;
        let id = self.id;
        self.ticker.with_state(|s| {
            s.active.remove(&id);
            s.cancelled += 1;
        });
    }
}

impl Drop for ManualSubscription {
    fn drop(&mut self) {
        self.cancel();
    }
}

//
// ─── TOKIO TICKER ──────────────────────────────────────────────────────────────
//

/// Ticker backed by `tokio::time::interval`, delivering ticks over a channel.
///
/// Must be used from within a Tokio runtime.
pub struct TokioTicker {
    period: Duration,
    tx: mpsc::UnboundedSender<Tick>,
}

impl TokioTicker {
    /// Create a ticker and the receiving end its subscriptions will feed.
    #[must_use]
    pub fn new(period: Duration) -> (Self, mpsc::UnboundedReceiver<Tick>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { period, tx }, rx)
    }
}

impl Ticker for TokioTicker {
    fn subscribe(&mut self, id: SubscriptionId) -> Box<dyn TickSubscription> {
        let period = self.period;
        let tx = self.tx.clone();
        let task = tokio::spawn(async move {
            // The first tick lands one full period after subscribing.
            let mut interval = interval_at(Instant::now() + period, period);
            loop {
                interval.tick().await;
                if tx.send(Tick::new(id)).is_err() {
                    break;
                }
            }
        });
        Box::new(TokioSubscription { id, task })
    }
}

struct TokioSubscription {
    id: SubscriptionId,
    task: JoinHandle<()>,
}

impl TickSubscription for TokioSubscription {
    fn id(&self) -> SubscriptionId {
        self.id
    }

    fn cancel(&mut self) {
        self.task.abort();
    }
}

impl Drop for TokioSubscription {
    fn drop(&mut self) {
        self.task.abort();
    }
}

mod engine;
mod intent;
mod observer;
mod progress;
mod ticker;
mod view;
mod workflow;

// Public API of the session subsystem.
pub use crate::error::SessionError;
pub use engine::SessionEngine;
pub use intent::{SessionIntent, Transition};
pub use observer::SessionObserver;
pub use progress::SessionProgress;
pub use ticker::{ManualTicker, SubscriptionId, Tick, TickSubscription, Ticker, TokioTicker};
pub use view::SessionSnapshot;
pub use workflow::SessionLoop;

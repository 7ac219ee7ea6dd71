#![forbid(unsafe_code)]

pub mod error;
pub mod sessions;

pub use interview_core::Clock;
pub use sessions as session;

pub use error::SessionError;

pub use sessions::{
    ManualTicker, SessionEngine, SessionIntent, SessionLoop, SessionObserver, SessionProgress,
    SessionSnapshot, SubscriptionId, Tick, TickSubscription, Ticker, TokioTicker, Transition,
};

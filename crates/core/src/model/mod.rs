mod answers;
mod bank;
mod countdown;
mod ids;
mod question;
mod session;
mod settings;

pub use ids::{ParseIdError, QuestionId};

pub use answers::AnswerMap;
pub use bank::{BankError, BankOverview, BankSelection, DEFAULT_BANK_KEY, QuestionBank};
pub use countdown::{Countdown, CountdownTick};
pub use question::{Difficulty, Question, QuestionDraft, QuestionError};
pub use session::{EndReason, SessionStatus, SessionSummary, SessionSummaryError};
pub use settings::{SessionSettings, SettingsError};

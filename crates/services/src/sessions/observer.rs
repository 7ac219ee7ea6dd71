use interview_core::model::SessionSummary;

use super::view::SessionSnapshot;

/// Receives engine output: snapshots for the presentation layer and the
/// summary for the results view.
pub trait SessionObserver: Send {
    /// Called after every accepted transition and every live tick.
    fn on_snapshot(&mut self, snapshot: &SessionSnapshot);

    /// Called once, when the session enters `Complete`.
    fn on_complete(&mut self, summary: &SessionSummary) {
        let _ = summary;
    }
}

use serde::Serialize;

/// Aggregated view of session progress, useful for UI.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SessionProgress {
    pub total: usize,
    pub answered: usize,
    /// 1-based position of the current question.
    pub position: usize,
    pub is_complete: bool,
}

impl SessionProgress {
    /// Share of the interview reached so far, counting the current question.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn percent(&self) -> f64 {
        if self.total == 0 {
            return 0.0;
        }
        self.position as f64 / self.total as f64 * 100.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn percent_counts_current_question() {
        let progress = SessionProgress {
            total: 4,
            answered: 0,
            position: 1,
            is_complete: false,
        };
        assert!((progress.percent() - 25.0).abs() < f64::EPSILON);
    }
}

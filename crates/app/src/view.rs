use interview_core::model::{SessionStatus, SessionSummary};
use interview_core::time::format_countdown;
use services::{SessionObserver, SessionSnapshot};

/// Prints session snapshots to stdout.
///
/// The full question is printed when the question or status changes; the
/// timer is printed every half minute, and every ten seconds once the
/// warning threshold is crossed.
#[derive(Debug, Default)]
pub struct TerminalView {
    last: Option<(usize, SessionStatus)>,
}

impl SessionObserver for TerminalView {
    fn on_snapshot(&mut self, snapshot: &SessionSnapshot) {
        let key = (snapshot.current_index, snapshot.status);
        if self.last != Some(key) {
            self.last = Some(key);
            print_question(snapshot);
            return;
        }

        let remaining = snapshot.remaining_secs;
        let step = if snapshot.time_warning { 10 } else { 30 };
        if snapshot.status == SessionStatus::Running && remaining % step == 0 {
            let marker = if snapshot.time_warning { " (!)" } else { "" };
            println!("  time remaining: {}{marker}", format_countdown(remaining));
        }
    }

    fn on_complete(&mut self, summary: &SessionSummary) {
        println!();
        println!(
            "Interview complete: answered {} of {} questions.",
            summary.answered_questions(),
            summary.total_questions()
        );
    }
}

fn print_question(snapshot: &SessionSnapshot) {
    let question = &snapshot.question;
    match snapshot.status {
        SessionStatus::Complete => return,
        SessionStatus::Paused => {
            println!(
                "[paused] question {} of {}, {} left (type `resume` or `p`)",
                snapshot.current_index + 1,
                snapshot.total,
                format_countdown(snapshot.remaining_secs)
            );
            return;
        }
        SessionStatus::NotStarted | SessionStatus::Running => {}
    }

    let progress = snapshot.progress();
    println!();
    println!(
        "Question {} of {} ({:.0}%) | {} | {} | {}",
        progress.position,
        progress.total,
        progress.percent(),
        question.difficulty(),
        question.category(),
        format_countdown(snapshot.remaining_secs)
    );
    println!("{}", question.prompt());
    for hint in question.hints() {
        println!("  hint: {hint}");
    }
    if let Some(answer) = snapshot.current_answer() {
        println!("  your answer: {answer}");
    }
}

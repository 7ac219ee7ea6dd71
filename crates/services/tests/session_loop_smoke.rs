use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use interview_core::catalog::builtin_bank;
use interview_core::model::{
    Difficulty, EndReason, QuestionBank, QuestionDraft, QuestionId, SessionSettings,
    SessionStatus, SessionSummary,
};
use interview_core::time::fixed_now;
use services::{Clock, SessionIntent, SessionLoop, SessionObserver, SessionSnapshot};
use tokio::sync::mpsc;

fn quick_bank() -> QuestionBank {
    let drafts: Vec<QuestionDraft> = [(1, 2), (2, 3)]
        .into_iter()
        .map(|(id, limit)| QuestionDraft {
            id: QuestionId::new(id),
            prompt: format!("Quick question {id}"),
            kind: "warmup".into(),
            category: "Warmup".into(),
            difficulty: Difficulty::Beginner,
            time_limit: limit,
            hints: Vec::new(),
        })
        .collect();
    let mut banks = BTreeMap::new();
    banks.insert("general".to_string(), drafts);
    QuestionBank::from_drafts(banks, "general").unwrap()
}

#[derive(Clone, Default)]
struct Recorder {
    snapshots: Arc<Mutex<Vec<SessionSnapshot>>>,
    summaries: Arc<Mutex<Vec<SessionSummary>>>,
}

impl SessionObserver for Recorder {
    fn on_snapshot(&mut self, snapshot: &SessionSnapshot) {
        self.snapshots.lock().unwrap().push(snapshot.clone());
    }

    fn on_complete(&mut self, summary: &SessionSummary) {
        self.summaries.lock().unwrap().push(summary.clone());
    }
}

#[tokio::test(start_paused = true)]
async fn session_loop_runs_out_the_clock() {
    let bank = quick_bank();
    let session = SessionLoop::tokio(
        &bank,
        "general",
        &SessionSettings::default(),
        Clock::fixed(fixed_now()),
    )
    .unwrap();

    let (tx, rx) = mpsc::channel(8);
    tx.send(SessionIntent::Start).await.unwrap();
    tx.send(SessionIntent::RecordAnswer("first".into()))
        .await
        .unwrap();

    let summary = session.run(rx).await.unwrap();
    drop(tx);

    assert_eq!(summary.end_reason(), EndReason::TimeExpired);
    assert_eq!(summary.total_questions(), 2);
    assert_eq!(summary.answered_questions(), 1);
    assert_eq!(summary.time_spent_secs(), 5);
}

#[tokio::test(start_paused = true)]
async fn closing_intents_ends_the_session() {
    let bank = quick_bank();
    let session = SessionLoop::tokio(
        &bank,
        "general",
        &SessionSettings::default(),
        Clock::fixed(fixed_now()),
    )
    .unwrap();

    let (tx, rx) = mpsc::channel(8);
    tx.send(SessionIntent::Start).await.unwrap();
    tx.send(SessionIntent::Next).await.unwrap();
    drop(tx);

    let summary = session.run(rx).await.unwrap();
    assert_eq!(summary.end_reason(), EndReason::EndedEarly);
    assert_eq!(summary.answered_questions(), 0);
}

#[tokio::test(start_paused = true)]
async fn pause_freezes_live_countdown() {
    let bank = builtin_bank().unwrap();
    let recorder = Recorder::default();
    let session = SessionLoop::tokio(
        &bank,
        "behavioral",
        &SessionSettings::default(),
        Clock::fixed(fixed_now()),
    )
    .unwrap()
    .with_observer(Box::new(recorder.clone()));

    let (tx, rx) = mpsc::channel(8);
    let driver = tokio::spawn(async move {
        tx.send(SessionIntent::Start).await.unwrap();
        tokio::time::sleep(Duration::from_millis(2_500)).await;
        tx.send(SessionIntent::Pause).await.unwrap();
        tokio::time::sleep(Duration::from_secs(5)).await;
        tx.send(SessionIntent::End).await.unwrap();
    });

    let summary = session.run(rx).await.unwrap();
    driver.await.unwrap();

    assert_eq!(summary.bank_key(), "behavioral");
    assert_eq!(summary.time_spent_secs(), 2);
    assert_eq!(summary.end_reason(), EndReason::EndedEarly);

    let snapshots = recorder.snapshots.lock().unwrap();
    let paused = snapshots
        .iter()
        .find(|s| s.status == SessionStatus::Paused)
        .unwrap();
    assert_eq!(paused.remaining_secs, 238);
    assert_eq!(snapshots.last().unwrap().remaining_secs, 238);
    assert_eq!(recorder.summaries.lock().unwrap().len(), 1);
}

#[tokio::test(start_paused = true)]
async fn rejected_jump_keeps_session_alive() {
    let bank = quick_bank();
    let session = SessionLoop::tokio(
        &bank,
        "general",
        &SessionSettings::default(),
        Clock::fixed(fixed_now()),
    )
    .unwrap();

    let (tx, rx) = mpsc::channel(8);
    tx.send(SessionIntent::Start).await.unwrap();
    tx.send(SessionIntent::JumpTo(9)).await.unwrap();
    tx.send(SessionIntent::JumpTo(1)).await.unwrap();
    tx.send(SessionIntent::RecordAnswer("second".into()))
        .await
        .unwrap();
    tx.send(SessionIntent::Next).await.unwrap();

    let summary = session.run(rx).await.unwrap();
    drop(tx);

    assert_eq!(summary.end_reason(), EndReason::Finished);
    assert_eq!(summary.answers().get(QuestionId::new(2)), Some("second"));
}

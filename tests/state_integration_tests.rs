//! Integration tests for session state and quiz events
//!
//! These tests verify that:
//! - QuizService emits events for serving, judging, marking and resetting
//! - Multiple subscribers receive the same events
//! - UsedTracker stays consistent under concurrent access
//! - Concurrent readers never observe a half-built corpus during reloads

use camino::Utf8PathBuf;
use std::collections::HashSet;
use std::fs;
use std::sync::Arc;
use tempfile::TempDir;
use tokio::time::{Duration, timeout};
use tokio_test::{assert_pending, assert_ready_ok, task};
use trivia::services::NextQuestion;
use trivia::{QuestionStore, QuizEvent, QuizService, UsedTracker};

fn quiz_with(contents: &str) -> (Arc<QuizService>, TempDir) {
    let temp_dir = TempDir::new().unwrap();
    let path = Utf8PathBuf::try_from(temp_dir.path().join("questions.txt")).unwrap();
    fs::write(&path, contents).unwrap();
    (Arc::new(QuizService::open(&path).unwrap()), temp_dir)
}

#[tokio::test]
async fn test_question_served_event_emitted() {
    let (quiz, _dir) = quiz_with("2+2? | 4\n");
    let mut rx = quiz.subscribe();

    let question = quiz.get_next_question().unwrap().into_question().unwrap();

    let event = timeout(Duration::from_millis(100), rx.recv())
        .await
        .expect("Timeout waiting for event")
        .expect("Channel closed");

    assert_eq!(event, QuizEvent::QuestionServed { id: question.id });
}

#[tokio::test]
async fn test_correct_submission_events_in_order() {
    let (quiz, _dir) = quiz_with("2+2? | 4\n");
    let id = quiz.get_next_question().unwrap().into_question().unwrap().id;

    let mut rx = quiz.subscribe();
    quiz.submit_answer(&id, "4").unwrap();

    let first = timeout(Duration::from_millis(100), rx.recv())
        .await
        .expect("Timeout")
        .expect("Channel closed");
    let second = timeout(Duration::from_millis(100), rx.recv())
        .await
        .expect("Timeout")
        .expect("Channel closed");

    assert_eq!(
        first,
        QuizEvent::AnswerChecked {
            id: id.clone(),
            correct: true
        }
    );
    assert_eq!(second, QuizEvent::QuestionMarkedServed { id });
}

#[tokio::test]
async fn test_incorrect_submission_does_not_mark() {
    let (quiz, _dir) = quiz_with("2+2? | 4\n");
    let id = quiz.get_next_question().unwrap().into_question().unwrap().id;

    let mut rx = quiz.subscribe();
    quiz.submit_answer(&id, "5").unwrap();

    let event = timeout(Duration::from_millis(100), rx.recv())
        .await
        .expect("Timeout")
        .expect("Channel closed");
    assert!(matches!(
        event,
        QuizEvent::AnswerChecked { correct: false, .. }
    ));

    // Nothing else follows: no QuestionMarkedServed is queued
    let mut next = task::spawn(rx.recv());
    assert_pending!(next.poll());
}

#[tokio::test]
async fn test_multiple_subscribers_receive_reset() {
    let (quiz, _dir) = quiz_with("A? | a\n");
    let mut rx1 = quiz.subscribe();
    let mut rx2 = quiz.subscribe();

    quiz.reset_session();

    // Events are sent synchronously, so both receivers are ready immediately
    for rx in [&mut rx1, &mut rx2] {
        let event = assert_ready_ok!(task::spawn(rx.recv()).poll());
        assert_eq!(event, QuizEvent::SessionReset { cleared: 0 });
    }
}

#[tokio::test]
async fn test_exhausted_and_reload_events() {
    let (quiz, dir) = quiz_with("A? | a\n");
    let id = quiz.get_next_question().unwrap().into_question().unwrap().id;
    quiz.mark_served(&id);

    let mut rx = quiz.subscribe();
    assert!(quiz.get_next_question().unwrap().is_exhausted());
    let event = timeout(Duration::from_millis(100), rx.recv())
        .await
        .expect("Timeout")
        .expect("Channel closed");
    assert_eq!(event, QuizEvent::QuestionsExhausted);

    fs::write(dir.path().join("questions.txt"), "A? | a\nB? | b\n").unwrap();
    quiz.force_reload().unwrap();
    let event = timeout(Duration::from_millis(100), rx.recv())
        .await
        .expect("Timeout")
        .expect("Channel closed");
    assert_eq!(event, QuizEvent::CorpusReloaded { questions: 2 });
}

#[tokio::test]
async fn test_concurrent_tracker_access() {
    let tracker = Arc::new(UsedTracker::new());
    let mut handles = vec![];

    for i in 0..10 {
        let tracker = Arc::clone(&tracker);
        handles.push(tokio::spawn(async move {
            for j in 0..20 {
                tracker.mark_served(&format!("{}-{}", i, j));
            }
        }));
    }

    for handle in handles {
        handle.await.unwrap();
    }

    assert_eq!(tracker.len(), 200);

    tracker.reset();
    assert!(tracker.is_empty());
}

#[test]
fn test_concurrent_play_never_repeats_a_marked_question() {
    let contents: String = (0..50).map(|i| format!("Q{}? | {}\n", i, i)).collect();
    let (quiz, _dir) = quiz_with(&contents);

    // Each worker takes the next question and races to claim it; only the
    // thread whose mark inserts the id counts it as won.
    let handles: Vec<_> = (0..4)
        .map(|_| {
            let quiz = Arc::clone(&quiz);
            std::thread::spawn(move || {
                let mut won = Vec::new();
                while let NextQuestion::Question(question) = quiz.get_next_question().unwrap() {
                    if quiz.mark_served(&question.id) {
                        won.push(question.id);
                    }
                }
                won
            })
        })
        .collect();

    let mut all = Vec::new();
    for handle in handles {
        all.extend(handle.join().unwrap());
    }

    let unique: HashSet<_> = all.iter().collect();
    assert_eq!(all.len(), 50);
    assert_eq!(unique.len(), 50);
    assert!(quiz.get_next_question().unwrap().is_exhausted());
}

#[test]
fn test_readers_see_whole_snapshots_during_reloads() {
    let temp_dir = TempDir::new().unwrap();
    let path = Utf8PathBuf::try_from(temp_dir.path().join("questions.txt")).unwrap();
    let small: String = (0..10).map(|i| format!("S{}? | s\n", i)).collect();
    let large: String = (0..40).map(|i| format!("L{}? | l\n", i)).collect();
    fs::write(&path, &small).unwrap();

    let store = Arc::new(QuestionStore::from_path(&path).unwrap());

    let reloader = {
        let store = Arc::clone(&store);
        let path = path.clone();
        let (small, large) = (small.clone(), large.clone());
        let staging = path.with_extension("tmp");
        std::thread::spawn(move || {
            for round in 0..20 {
                let contents = if round % 2 == 0 { &large } else { &small };
                // Replace the file atomically so each reload parses a whole corpus
                fs::write(&staging, contents).unwrap();
                fs::rename(&staging, &path).unwrap();
                store.force_reload().unwrap();
            }
        })
    };

    let readers: Vec<_> = (0..4)
        .map(|_| {
            let store = Arc::clone(&store);
            std::thread::spawn(move || {
                for _ in 0..200 {
                    if let Some(snapshot) = store.cached() {
                        let texts: Vec<_> = snapshot.iter().map(|q| q.text.clone()).collect();
                        let all_small = texts.iter().all(|t| t.starts_with('S'));
                        let all_large = texts.iter().all(|t| t.starts_with('L'));
                        assert!(
                            (all_small && texts.len() == 10) || (all_large && texts.len() == 40),
                            "Observed a mixed snapshot of {} questions",
                            texts.len()
                        );
                    }
                }
            })
        })
        .collect();

    reloader.join().unwrap();
    for reader in readers {
        reader.join().unwrap();
    }
}

//! End-to-end runs against the bundled model artifacts
//!
//! Time is paused so full-length runs finish instantly.

use std::path::PathBuf;

use taskbot::config::Config;
use taskbot::domain::RunOutcome;
use taskbot::{App, SessionEvent};

fn models_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("..").join("models")
}

fn app() -> App {
    let mut config = Config::default();
    config.model.vectorizer_path = models_dir().join("tfidf_vectorizer.json");
    config.model.model_path = models_dir().join("conversation_model.json");
    App::new(config).expect("bundled artifacts load")
}

#[tokio::test(start_paused = true)]
async fn test_reject_three_times_then_accept() {
    let app = app();
    let mut events = app.session().subscribe_events();

    for expected in 1..=3 {
        let outcome = app.executor().execute_by_name("Reading", false, None).await.unwrap();
        match outcome {
            RunOutcome::Rejected {
                response,
                rejections,
                warning,
                ..
            } => {
                assert_eq!(response, "Books will wait for you, but not forever. Maybe later?");
                assert_eq!(rejections, expected);
                assert_eq!(warning, expected >= 3);
            }
            other => panic!("expected rejection, got {:?}", other),
        }
    }

    let snap = app.session().snapshot().await.unwrap();
    assert!(snap.warning);
    assert_eq!(snap.log.len(), 6);

    let outcome = app.executor().execute_by_name("Eating", true, None).await.unwrap();
    assert_eq!(outcome, RunOutcome::Completed {
        task: "Eating".to_string()
    });

    let snap = app.session().snapshot().await.unwrap();
    assert_eq!(snap.rejections, 0);
    assert!(!snap.warning);
    assert_eq!(snap.progress_of("Eating"), Some(1.0));
    let messages: Vec<&str> = snap.log.iter().map(|e| e.message.as_str()).collect();
    assert_eq!(&messages[6..], &[
        "Eating time! Running for 3 seconds...",
        "Eating done, nailed it!"
    ]);

    let mut warned = false;
    while let Ok(event) = events.try_recv() {
        if let SessionEvent::RejectionWarning { rejections } = event {
            assert_eq!(rejections, 3);
            warned = true;
        }
    }
    assert!(warned);

    app.shutdown().await.unwrap();
}

#[tokio::test]
async fn test_chat_uses_bundled_model() {
    let app = app();
    assert_eq!(
        app.ask("hello there").unwrap().to_string(),
        "Bot Response: Hello! How can I help you today?"
    );
    assert_eq!(app.ask("   ").unwrap().to_string(), "Please enter a message.");
    app.shutdown().await.unwrap();
}

#[tokio::test(start_paused = true)]
async fn test_scheduler_runs_every_task() {
    let app = app();
    app.scheduler().start().await.unwrap();

    // Longest period is Homework: 6 + 5 units; its first run ends at 17s
    tokio::time::sleep(std::time::Duration::from_millis(17_500)).await;
    app.scheduler().stop().await.unwrap();
    app.scheduler().wait_stopped().await;

    let snap = app.session().snapshot().await.unwrap();
    for task in ["Reading", "Eating", "Homework"] {
        let done = format!("{} done, nailed it!", task);
        assert!(snap.log.iter().any(|e| e.message == done), "{task} never finished");
    }
    assert!(snap.log.iter().any(|e| e.message == "Scheduler's out, peace!"));
    app.shutdown().await.unwrap();
}

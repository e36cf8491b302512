//! End-to-end tests for the `tc` binary against the bundled demo artifacts

use std::path::PathBuf;

use assert_cmd::Command;
use predicates::prelude::*;

fn models_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("..").join("models")
}

fn tc() -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_tc"));
    cmd.arg("--vectorizer")
        .arg(models_dir().join("tfidf_vectorizer.json"))
        .arg("--model")
        .arg(models_dir().join("conversation_model.json"))
        .env("NO_COLOR", "1");
    cmd
}

#[test]
fn ask_returns_bot_response() {
    tc().args(["ask", "hello there"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Bot Response: Hello! How can I help you today?"));
}

#[test]
fn ask_task_name_gets_canned_response() {
    tc().args(["ask", "Reading"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Books will wait"));
}

#[test]
fn ask_empty_message_prompts() {
    tc().args(["ask", ""])
        .assert()
        .success()
        .stdout(predicate::str::contains("Please enter a message."));
}

#[test]
fn info_lists_classes() {
    tc().arg("info")
        .assert()
        .success()
        .stdout(predicate::str::contains("Classes: 7"));
}

#[test]
fn missing_artifacts_fail_at_startup() {
    let temp = tempfile::tempdir().unwrap();
    Command::new(env!("CARGO_BIN_EXE_tc"))
        .arg("--vectorizer")
        .arg(temp.path().join("missing.json"))
        .arg("--model")
        .arg(temp.path().join("missing-model.json"))
        .args(["ask", "hi"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to load model artifacts"));
}

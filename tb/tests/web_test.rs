//! Web UI tests, driven through the router with `oneshot`

use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use serde_json::Value;
use taskbot::config::Config;
use taskbot::scheduler::SchedulerConfig;
use taskbot::{App, web};
use textclass::{Classifier, ClassifierError};
use tower::ServiceExt;

/// Answers with the lowercased input
struct Echo;

impl Classifier for Echo {
    fn predict(&self, text: &str) -> Result<String, ClassifierError> {
        Ok(format!("echo {}", text.to_lowercase()))
    }
}

fn test_app() -> App {
    let config = Config {
        scheduler: SchedulerConfig {
            tick_ms: 10,
            ..Default::default()
        },
        ..Default::default()
    };
    App::with_classifier(config, Arc::new(Echo)).expect("app")
}

async fn send(router: &Router, req: Request<Body>) -> axum::response::Response {
    router.clone().oneshot(req).await.expect("oneshot failed")
}

async fn get(router: &Router, path: &str) -> axum::response::Response {
    send(router, Request::get(path).body(Body::empty()).unwrap()).await
}

async fn post_form(router: &Router, path: &str, form: &str) -> axum::response::Response {
    let req = Request::post(path)
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
        .body(Body::from(form.to_string()))
        .unwrap();
    send(router, req).await
}

async fn body_text(resp: axum::response::Response) -> String {
    let bytes = axum::body::to_bytes(resp.into_body(), 1024 * 1024)
        .await
        .expect("failed to read body");
    String::from_utf8(bytes.to_vec()).expect("utf-8 body")
}

async fn state(router: &Router) -> Value {
    let resp = get(router, "/api/state").await;
    assert_eq!(resp.status(), StatusCode::OK);
    serde_json::from_str(&body_text(resp).await).expect("json state")
}

#[tokio::test]
async fn test_health() {
    let router = web::router(test_app());
    let resp = get(&router, "/health").await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert!(body_text(resp).await.contains("\"ok\""));
}

#[tokio::test]
async fn test_index_lists_catalog() {
    let router = web::router(test_app());
    let resp = get(&router, "/").await;
    assert_eq!(resp.status(), StatusCode::OK);

    let html = body_text(resp).await;
    for name in ["Reading", "Eating", "Homework"] {
        assert!(html.contains(&format!("<option>{}</option>", name)), "missing {name}");
    }
    assert!(html.contains("Status: <b>stopped</b>"));
    assert!(!html.contains("http-equiv=\"refresh\""));
}

#[tokio::test]
async fn test_run_accepted_completes_and_logs() {
    let router = web::router(test_app());
    let resp = post_form(&router, "/run", "task=Eating&accept=on").await;
    assert_eq!(resp.status(), StatusCode::OK);

    let html = body_text(resp).await;
    assert!(html.contains("Eating complete"));
    assert!(html.contains("Eating time! Running for 3 seconds..."));
    assert!(html.contains("Eating done, nailed it!"));

    let snap = state(&router).await;
    let eating = snap["progress"]
        .as_array()
        .unwrap()
        .iter()
        .find(|p| p["task"] == "Eating")
        .unwrap();
    assert_eq!(eating["progress"].as_f64(), Some(1.0));
    assert_eq!(snap["rejections"], 0);
}

#[tokio::test]
async fn test_three_rejections_show_warning() {
    let router = web::router(test_app());

    for _ in 0..2 {
        let html = body_text(post_form(&router, "/run", "task=Reading").await).await;
        assert!(!html.contains("class=\"warning\""));
    }
    let html = body_text(post_form(&router, "/run", "task=Reading").await).await;
    assert!(html.contains("You rejected Reading? Alright:-"));
    assert!(html.contains("AI says: echo reading"));
    assert!(html.contains("Hey, 3 rejections in a row? You get a warning!"));

    let snap = state(&router).await;
    assert_eq!(snap["rejections"], 3);
    assert_eq!(snap["warning"], true);

    post_form(&router, "/run", "task=Eating&accept=on").await;
    let snap = state(&router).await;
    assert_eq!(snap["rejections"], 0);
    assert_eq!(snap["warning"], false);
}

#[tokio::test]
async fn test_run_none_and_unknown_task() {
    let router = web::router(test_app());

    let resp = post_form(&router, "/run", "task=None&accept=on").await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(state(&router).await["log"].as_array().unwrap().len(), 0);

    let resp = post_form(&router, "/run", "task=Napping&accept=on").await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_ask_replies_and_escapes() {
    let router = web::router(test_app());

    let html = body_text(post_form(&router, "/ask", "message=%3Cb%3EHi%3C%2Fb%3E").await).await;
    assert!(html.contains("Bot Response: echo &lt;b&gt;hi&lt;/b&gt;"));
    assert!(!html.contains("<b>hi</b>"));

    let html = body_text(post_form(&router, "/ask", "message=++").await).await;
    assert!(html.contains("Please enter a message."));
}

#[tokio::test]
async fn test_scheduler_start_stop_round_trip() {
    let router = web::router(test_app());

    let resp = post_form(&router, "/scheduler/start", "").await;
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert_eq!(resp.headers()[header::LOCATION], "/");

    let html = body_text(get(&router, "/").await).await;
    assert!(html.contains("http-equiv=\"refresh\""));
    assert!(html.contains("Scheduler&#39;s alive, tasks incoming!"));

    let resp = post_form(&router, "/scheduler/stop", "").await;
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);

    let snap = state(&router).await;
    assert_eq!(snap["running"], false);
    let log: Vec<&str> = snap["log"].as_array().unwrap().iter().filter_map(Value::as_str).collect();
    assert!(log[0].ends_with("Scheduler's alive, tasks incoming!"));
    assert!(log.iter().any(|line| line.ends_with("Scheduler's out, peace!")));
}

#[tokio::test]
async fn test_state_log_is_stable_across_polls() {
    let app = test_app();
    let router = web::router(app.clone());
    app.session().log("hello").await.unwrap();

    let first = state(&router).await;
    assert_eq!(first["log"].as_array().unwrap().len(), 1);
    let second = state(&router).await;
    assert_eq!(second["log"].as_array().unwrap().len(), 1);
    assert_eq!(first["log"], second["log"]);
}

/// Fails every prediction
struct Broken;

impl Classifier for Broken {
    fn predict(&self, _text: &str) -> Result<String, ClassifierError> {
        Err(ClassifierError::NotFitted)
    }
}

#[tokio::test]
async fn test_classifier_failure_renders_error_page() {
    let router = web::router(App::with_classifier(Config::default(), Arc::new(Broken)).expect("app"));

    let resp = post_form(&router, "/run", "task=Reading").await;
    assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let html = body_text(resp).await;
    assert!(html.contains("<p class=\"error\">Classifier failed:"));

    let snap = state(&router).await;
    assert_eq!(snap["rejections"], 0);
    let log: Vec<&str> = snap["log"].as_array().unwrap().iter().filter_map(Value::as_str).collect();
    assert_eq!(log.len(), 1);
    assert!(log[0].ends_with("You rejected Reading? Alright:-"));

    let resp = post_form(&router, "/ask", "message=hello").await;
    assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert!(body_text(resp).await.contains("value=\"hello\""));
}

#[tokio::test]
async fn test_stopped_session_answers_503() {
    let app = test_app();
    let router = web::router(app.clone());
    app.session().shutdown().await.unwrap();

    assert_eq!(get(&router, "/").await.status(), StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(get(&router, "/api/state").await.status(), StatusCode::SERVICE_UNAVAILABLE);
}

#[tokio::test(start_paused = true)]
async fn test_dropped_run_request_still_finishes() {
    let app = App::with_classifier(Config::default(), Arc::new(Echo)).expect("app");
    let router = web::router(app.clone());

    let waited = tokio::time::timeout(
        std::time::Duration::from_millis(2500),
        post_form(&router, "/run", "task=Homework&accept=on"),
    )
    .await;
    assert!(waited.is_err(), "request should still be running when dropped");

    tokio::time::sleep(std::time::Duration::from_secs(30)).await;

    let snap = state(&router).await;
    let homework = snap["progress"]
        .as_array()
        .unwrap()
        .iter()
        .find(|p| p["task"] == "Homework")
        .unwrap();
    assert_eq!(homework["progress"].as_f64(), Some(1.0));
    let log: Vec<&str> = snap["log"].as_array().unwrap().iter().filter_map(Value::as_str).collect();
    assert!(log.last().unwrap().ends_with("Homework done, nailed it!"));
}

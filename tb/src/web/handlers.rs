//! HTTP handlers for the web UI

use axum::Json;
use axum::extract::{Form, State};
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Redirect, Response};
use serde::Deserialize;
use textclass::Reply;
use tracing::{debug, error};

use crate::app::App;
use crate::domain::RunOutcome;
use crate::executor::ExecError;
use crate::session::SessionError;

use super::render::{Flash, PageView, page};

/// Errors surfaced to the browser
#[derive(Debug)]
pub enum WebError {
    Session(SessionError),
    Exec(ExecError),
}

impl From<SessionError> for WebError {
    fn from(e: SessionError) -> Self {
        Self::Session(e)
    }
}

impl From<ExecError> for WebError {
    fn from(e: ExecError) -> Self {
        Self::Exec(e)
    }
}

impl IntoResponse for WebError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            Self::Exec(ExecError::UnknownTask(name)) => (StatusCode::BAD_REQUEST, format!("Unknown task: {}", name)),
            Self::Exec(e) => (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()),
            Self::Session(e) => (StatusCode::SERVICE_UNAVAILABLE, e.to_string()),
        };
        error!(%status, %message, "request failed");
        (status, message).into_response()
    }
}

async fn render(app: &App, flash: Option<Flash>, reply: Option<Reply>, message: &str) -> Result<Html<String>, WebError> {
    let snapshot = app.session().snapshot().await?;
    Ok(Html(page(&PageView {
        catalog: app.catalog(),
        snapshot: &snapshot,
        flash,
        reply,
        message,
    })))
}

pub async fn index(State(app): State<App>) -> Result<Html<String>, WebError> {
    debug!("index: called");
    render(&app, None, None, "").await
}

pub async fn start_scheduler(State(app): State<App>) -> Result<Redirect, WebError> {
    debug!("start_scheduler: called");
    app.scheduler().start().await?;
    Ok(Redirect::to("/"))
}

pub async fn stop_scheduler(State(app): State<App>) -> Result<Redirect, WebError> {
    debug!("stop_scheduler: called");
    app.scheduler().stop().await?;
    Ok(Redirect::to("/"))
}

#[derive(Debug, Deserialize)]
pub struct RunForm {
    #[serde(default)]
    pub task: String,
    /// Present (any value) when the Accept checkbox is ticked
    #[serde(default)]
    pub accept: Option<String>,
}

/// Page with an inline error, served as a 500
async fn render_failure(app: &App, message: String, chat: &str) -> Result<Response, WebError> {
    error!(%message, "request failed");
    let page = render(app, Some(Flash::Error(message)), None, chat).await?;
    Ok((StatusCode::INTERNAL_SERVER_ERROR, page).into_response())
}

/// Run the selected task and wait for it; "None" does nothing
pub async fn run_task(State(app): State<App>, Form(form): Form<RunForm>) -> Result<Response, WebError> {
    debug!(task = %form.task, accept = form.accept.is_some(), "run_task: called");
    let task = form.task.trim();
    if task.is_empty() || task == "None" {
        return Ok(render(&app, None, None, "").await?.into_response());
    }

    let flash = match app.run_task(task, form.accept.is_some()).await {
        Ok(RunOutcome::Completed { task }) => Flash::Info(format!("{} complete", task)),
        Ok(RunOutcome::Rejected { task, response, .. }) => Flash::Info(format!("{} rejected. AI says: {}", task, response)),
        Err(ExecError::Classifier(e)) => return render_failure(&app, format!("Classifier failed: {}", e), "").await,
        Err(e) => return Err(e.into()),
    };
    Ok(render(&app, Some(flash), None, "").await?.into_response())
}

#[derive(Debug, Deserialize)]
pub struct AskForm {
    #[serde(default)]
    pub message: String,
}

pub async fn ask(State(app): State<App>, Form(form): Form<AskForm>) -> Result<Response, WebError> {
    debug!("ask: called");
    match app.ask(&form.message) {
        Ok(reply) => Ok(render(&app, None, Some(reply), &form.message).await?.into_response()),
        Err(e) => render_failure(&app, format!("Classifier failed: {}", e), &form.message).await,
    }
}

/// JSON view of the session, drained
pub async fn api_state(State(app): State<App>) -> Result<Json<serde_json::Value>, WebError> {
    let snapshot = app.session().snapshot().await?;
    Ok(Json(serde_json::json!({
        "running": snapshot.running,
        "rejections": snapshot.rejections,
        "warning": snapshot.warning,
        "progress": snapshot.progress,
        "log": snapshot.log.iter().map(ToString::to_string).collect::<Vec<_>>(),
        "tasks": app.catalog().tasks(),
    })))
}

pub async fn health() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "ok"
    }))
}

//! Web UI shell
//!
//! A single form-driven page re-rendered on every interaction, plus a JSON
//! state endpoint for polling.
//!
//! | Route                    | Purpose                                  |
//! |--------------------------|------------------------------------------|
//! | `GET /`                  | catalog, progress, logs, forms           |
//! | `POST /scheduler/start`  | Stopped -> Running, redirect to `/`      |
//! | `POST /scheduler/stop`   | Running -> Stopped, redirect to `/`      |
//! | `POST /run`              | manual run (`task`, `accept`)            |
//! | `POST /ask`              | free-text query (`message`)              |
//! | `GET /api/state`         | session snapshot as JSON                 |
//! | `GET /health`            | liveness                                 |

mod handlers;
mod render;

use axum::Router;
use axum::routing::{get, post};
use eyre::{Context, Result};
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::app::App;

pub use handlers::{AskForm, RunForm, WebError};
pub use render::{Flash, PageView, escape, page, warning_text};

/// Build the router over an application context
pub fn router(app: App) -> Router {
    Router::new()
        .route("/", get(handlers::index))
        .route("/scheduler/start", post(handlers::start_scheduler))
        .route("/scheduler/stop", post(handlers::stop_scheduler))
        .route("/run", post(handlers::run_task))
        .route("/ask", post(handlers::ask))
        .route("/api/state", get(handlers::api_state))
        .route("/health", get(handlers::health))
        .layer(TraceLayer::new_for_http())
        .with_state(app)
}

/// Serve the UI until Ctrl+C, then shut the app down
pub async fn serve(app: App, bind: &str) -> Result<()> {
    let listener = tokio::net::TcpListener::bind(bind)
        .await
        .context(format!("Failed to bind {}", bind))?;
    let local_addr = listener.local_addr()?;

    info!("web UI listening on http://{local_addr}");
    println!("TaskBot UI: http://{local_addr}");

    axum::serve(listener, router(app.clone()))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Web server failed")?;

    app.shutdown().await
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for Ctrl+C");
    }
    info!("Shutdown signal received");
}

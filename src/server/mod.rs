//! HTTP surface: Slack webhooks and a liveness route.
//!
//! | Route                 | Handler                       |
//! |-----------------------|-------------------------------|
//! | `GET /`               | [`status`]                    |
//! | `POST /slack/events`  | [`events::slack_events`]      |
//! | `POST /slack/insight` | [`insight::slack_insight`]    |
//!
//! Every collaborator with I/O sits behind a trait object in [`AppState`] so
//! the router can be driven end to end in tests.

pub mod events;
pub mod insight;

use crate::config::BotConfig;
use crate::dedup::{spawn_sweeper, AnswerCache};
use crate::pipeline::llm::CompletionClient;
use crate::pipeline::DocumentRenderer;
use crate::slack::ChatPlatform;
use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post};
use axum::{Json, Router};
use secrecy::{ExposeSecret, SecretString};
use serde_json::{json, Value};
use std::future::Future;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing::info;

/// Largest `/slack/insight` body accepted (reports are scanned PDFs).
pub const MAX_UPLOAD_BYTES: usize = 25 * 1024 * 1024;

/// Shared state handed to every handler.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<BotConfig>,
    pub answers: Arc<AnswerCache>,
    pub completions: Arc<dyn CompletionClient>,
    pub chat: Arc<dyn ChatPlatform>,
    pub renderer: Arc<dyn DocumentRenderer>,
    verification_token: SecretString,
}

impl AppState {
    pub fn new(
        config: BotConfig,
        verification_token: SecretString,
        completions: Arc<dyn CompletionClient>,
        chat: Arc<dyn ChatPlatform>,
        renderer: Arc<dyn DocumentRenderer>,
    ) -> Self {
        let answers = Arc::new(AnswerCache::new(config.answer_window));
        Self {
            config: Arc::new(config),
            answers,
            completions,
            chat,
            renderer,
            verification_token,
        }
    }

    /// Compare a slash-command token against the configured secret.
    pub fn verify_token(&self, token: &str) -> bool {
        !token.is_empty() && token == self.verification_token.expose_secret()
    }
}

/// Build the router with all routes and request tracing.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(status))
        .route("/slack/events", post(events::slack_events))
        .route(
            "/slack/insight",
            post(insight::slack_insight).layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES)),
        )
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// `GET /`
pub async fn status() -> Json<Value> {
    Json(json!({ "status": "running" }))
}

/// Serve until `shutdown` resolves, sweeping the answer cache in the background.
pub async fn serve<F>(listener: TcpListener, state: AppState, shutdown: F) -> std::io::Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    let sweeper = spawn_sweeper(Arc::clone(&state.answers), state.config.sweep_interval);

    info!(
        address = %listener.local_addr()?,
        model = %state.config.model,
        answer_window_secs = state.answers.window().as_secs(),
        "Slack webhook server listening"
    );

    let result = axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown)
        .await;

    sweeper.abort();
    info!("Slack webhook server stopped");
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn status_reports_running() {
        let Json(body) = status().await;
        assert_eq!(body, json!({ "status": "running" }));
    }
}

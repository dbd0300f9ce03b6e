//! # mbti-insight-bot
//!
//! A Slack bot with two tricks:
//!
//! * **Mentions**: `@bot ENFP you are great @alice ESTJ` asks the model for a
//!   two-paragraph compatibility read of the pair and replies in the channel.
//! * **`/insight`**: a slash command with an attached MBTI report PDF. Every
//!   page is rasterised and sent to a vision model; the answer comes back as a
//!   Slack message and as a downloadable PDF.
//!
//! ## Request Flow
//!
//! ```text
//! POST /slack/events   ─▶ dedup ─▶ mbti::match_mention ─▶ LLM ─▶ chat.postMessage
//! POST /slack/insight  ─▶ token ─▶ render ─▶ encode ─▶ LLM ─┬▶ format   ─▶ chat.postMessage
//!                                                          └▶ document ─▶ file upload
//! ```
//!
//! The only shared mutable state is the [`dedup::AnswerCache`], which stops
//! the bot from answering the same person in the same channel twice within
//! the answer window.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use mbti_insight_bot::{
//!     serve, AppState, BotConfig, LlmCompletionClient, PdfiumRenderer, SlackClient,
//! };
//! use secrecy::SecretString;
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = BotConfig::default();
//!     let state = AppState::new(
//!         config.clone(),
//!         SecretString::from(std::env::var("SLACK_VERIFICATION_TOKEN")?),
//!         Arc::new(LlmCompletionClient::from_config(&config)?),
//!         Arc::new(SlackClient::new(
//!             SecretString::from(std::env::var("SLACK_BOT_TOKEN")?),
//!             &config.slack_api_base,
//!         )),
//!         Arc::new(PdfiumRenderer::new(config.dpi, None)),
//!     );
//!     let listener = tokio::net::TcpListener::bind("127.0.0.1:3000").await?;
//!     serve(listener, state, async { let _ = tokio::signal::ctrl_c().await; }).await?;
//!     Ok(())
//! }
//! ```

// ── Modules ──────────────────────────────────────────────────────────────

pub mod config;
pub mod dedup;
pub mod error;
pub mod mbti;
pub mod pipeline;
pub mod prompts;
pub mod server;
pub mod slack;

// ── Re-exports ───────────────────────────────────────────────────────────

pub use config::{BotConfig, BotConfigBuilder};
pub use dedup::{answer_key, spawn_sweeper, AnswerCache};
pub use error::BotError;
pub use mbti::{match_mention, MentionIntent, MentionMatch, TypeCode, MBTI_TYPES};
pub use pipeline::llm::{Completion, CompletionClient, CompletionRequest, LlmCompletionClient};
pub use pipeline::{DocumentRenderer, PdfiumRenderer};
pub use server::{router, serve, AppState};
pub use slack::{ChatPlatform, FileUpload, SlackClient, SlackError};

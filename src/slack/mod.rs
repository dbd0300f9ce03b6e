//! Slack integration: wire types and the outbound Web API client.
//!
//! Handlers depend on [`ChatPlatform`] only, so the HTTP surface can be tested
//! against an in-memory fake.

mod client;
mod error;
pub mod types;

use async_trait::async_trait;

pub use client::SlackClient;
pub use error::SlackError;
pub use types::FileUpload;

/// Outbound chat operations used by the bot.
#[async_trait]
pub trait ChatPlatform: Send + Sync {
    /// Post `text` to `channel`.
    async fn post_message(&self, channel: &str, text: &str) -> Result<(), SlackError>;

    /// Share a file into `channel`.
    async fn upload_file(&self, channel: &str, file: FileUpload) -> Result<(), SlackError>;
}

//! Slack-related errors.

use thiserror::Error;

/// Errors that can occur when calling the Slack Web API.
///
/// None of these reach the inbound webhook caller; handlers log them.
#[derive(Debug, Error)]
pub enum SlackError {
    /// HTTP request failed.
    #[error("Slack request failed: {0}")]
    Request(String),

    /// Failed to parse response.
    #[error("Slack response error: {0}")]
    Response(String),

    /// Slack API returned `ok: false`.
    #[error("Slack API error: {0}")]
    Api(String),

    /// The file upload URL rejected the bytes.
    #[error("Slack file upload failed with HTTP {status}")]
    Upload { status: u16 },
}

//! Slack Web API client.
//!
//! Posts messages and shares files through the external upload flow
//! (`files.getUploadURLExternal` → upload → `files.completeUploadExternal`),
//! which replaced the retired `files.upload` method.

use async_trait::async_trait;
use reqwest::Client;
use secrecy::{ExposeSecret, SecretString};
use tracing::{debug, error, instrument};

use super::error::SlackError;
use super::types::{
    ApiResponse, CompleteUpload, CompletedFile, FileUpload, PostMessage, PostMessageResponse,
    UploadUrlResponse,
};
use super::ChatPlatform;

/// Slack API client authenticated with a bot token.
#[derive(Clone)]
pub struct SlackClient {
    client: Client,
    bot_token: SecretString,
    api_base: String,
}

impl std::fmt::Debug for SlackClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SlackClient")
            .field("bot_token", &"[REDACTED]")
            .field("api_base", &self.api_base)
            .finish_non_exhaustive()
    }
}

impl SlackClient {
    /// Create a new Slack client against `api_base` (normally `https://slack.com/api`).
    #[must_use]
    pub fn new(bot_token: SecretString, api_base: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            bot_token,
            api_base: api_base.into().trim_end_matches('/').to_string(),
        }
    }

    fn url(&self, method: &str) -> String {
        format!("{}/{method}", self.api_base)
    }

    async fn get_upload_url(&self, filename: &str, length: usize) -> Result<(String, String), SlackError> {
        let length = length.to_string();
        let response = self
            .client
            .post(self.url("files.getUploadURLExternal"))
            .bearer_auth(self.bot_token.expose_secret())
            .form(&[("filename", filename), ("length", length.as_str())])
            .send()
            .await
            .map_err(|e| SlackError::Request(e.to_string()))?;

        let result: UploadUrlResponse = response
            .json()
            .await
            .map_err(|e| SlackError::Response(e.to_string()))?;

        if !result.ok {
            return Err(SlackError::Api(
                result.error.unwrap_or_else(|| "Unknown error".to_string()),
            ));
        }

        match (result.upload_url, result.file_id) {
            (Some(url), Some(id)) => Ok((url, id)),
            _ => Err(SlackError::Response(
                "upload_url or file_id missing from response".to_string(),
            )),
        }
    }
}

#[async_trait]
impl ChatPlatform for SlackClient {
    #[instrument(skip(self, text), fields(channel = %channel))]
    async fn post_message(&self, channel: &str, text: &str) -> Result<(), SlackError> {
        let response = self
            .client
            .post(self.url("chat.postMessage"))
            .bearer_auth(self.bot_token.expose_secret())
            .json(&PostMessage { channel, text })
            .send()
            .await
            .map_err(|e| SlackError::Request(e.to_string()))?;

        let result: PostMessageResponse = response
            .json()
            .await
            .map_err(|e| SlackError::Response(e.to_string()))?;

        if !result.ok {
            error!(
                error = ?result.error,
                "Slack API error posting message"
            );
            return Err(SlackError::Api(
                result.error.unwrap_or_else(|| "Unknown error".to_string()),
            ));
        }

        debug!(
            ts = ?result.ts,
            channel = ?result.channel,
            "Message posted to Slack"
        );

        Ok(())
    }

    #[instrument(skip(self, file), fields(channel = %channel, filename = %file.filename))]
    async fn upload_file(&self, channel: &str, file: FileUpload) -> Result<(), SlackError> {
        let (upload_url, file_id) = self.get_upload_url(&file.filename, file.bytes.len()).await?;

        let upload = self
            .client
            .post(&upload_url)
            .bearer_auth(self.bot_token.expose_secret())
            .body(file.bytes)
            .send()
            .await
            .map_err(|e| SlackError::Request(e.to_string()))?;
        if !upload.status().is_success() {
            return Err(SlackError::Upload {
                status: upload.status().as_u16(),
            });
        }

        let complete = CompleteUpload {
            files: vec![CompletedFile {
                id: &file_id,
                title: &file.title,
            }],
            channel_id: channel,
            initial_comment: file.initial_comment.as_deref(),
        };
        let response = self
            .client
            .post(self.url("files.completeUploadExternal"))
            .bearer_auth(self.bot_token.expose_secret())
            .json(&complete)
            .send()
            .await
            .map_err(|e| SlackError::Request(e.to_string()))?;

        let result: ApiResponse = response
            .json()
            .await
            .map_err(|e| SlackError::Response(e.to_string()))?;

        if !result.ok {
            error!(
                error = ?result.error,
                "Slack API error completing upload"
            );
            return Err(SlackError::Api(
                result.error.unwrap_or_else(|| "Unknown error".to_string()),
            ));
        }

        debug!(file_id = %file_id, "File shared to Slack");
        Ok(())
    }
}

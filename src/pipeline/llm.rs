//! Completion client: build chat messages and call the vision LLM.
//!
//! Handlers talk to the [`CompletionClient`] trait, never to `edgequake_llm`
//! directly. The production implementation, [`LlmCompletionClient`], wraps an
//! `Arc<dyn LLMProvider>`; tests swap in a recording fake.
//!
//! There is no retry here: a failed completion is reported straight back to
//! the handler, which decides what the Slack user sees.

use crate::config::BotConfig;
use crate::error::BotError;
use async_trait::async_trait;
use edgequake_llm::{ChatMessage, CompletionOptions, ImageData, LLMProvider, ProviderFactory};
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, warn};

/// One completion request: a system prompt, user text parts and images.
#[derive(Debug, Clone, Default)]
pub struct CompletionRequest {
    pub system: String,
    pub text: Vec<String>,
    pub images: Vec<ImageData>,
    pub max_tokens: Option<usize>,
}

impl CompletionRequest {
    pub fn new(system: impl Into<String>) -> Self {
        Self {
            system: system.into(),
            ..Default::default()
        }
    }

    pub fn text(mut self, part: impl Into<String>) -> Self {
        self.text.push(part.into());
        self
    }

    pub fn images(mut self, images: Vec<ImageData>) -> Self {
        self.images.extend(images);
        self
    }

    pub fn max_tokens(mut self, n: usize) -> Self {
        self.max_tokens = Some(n);
        self
    }

    /// Text parts as a single user message body.
    pub fn user_text(&self) -> String {
        self.text.join("\n\n")
    }
}

/// A successful completion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Completion {
    /// Generated text, trimmed.
    pub text: String,
    pub input_tokens: usize,
    pub output_tokens: usize,
}

/// A chat-style completion endpoint.
#[async_trait]
pub trait CompletionClient: Send + Sync {
    async fn complete(&self, request: CompletionRequest) -> Result<Completion, BotError>;
}

/// [`CompletionClient`] backed by an `edgequake_llm` provider.
pub struct LlmCompletionClient {
    provider: Arc<dyn LLMProvider>,
}

impl LlmCompletionClient {
    pub fn new(provider: Arc<dyn LLMProvider>) -> Self {
        Self { provider }
    }

    /// Create the provider named in `config` (API key read from the environment).
    pub fn from_config(config: &BotConfig) -> Result<Self, BotError> {
        let provider = ProviderFactory::create_llm_provider(&config.provider_name, &config.model)
            .map_err(|e| BotError::ProviderNotConfigured {
                provider: config.provider_name.clone(),
                hint: format!("{e}"),
            })?;
        Ok(Self::new(provider))
    }
}

#[async_trait]
impl CompletionClient for LlmCompletionClient {
    async fn complete(&self, request: CompletionRequest) -> Result<Completion, BotError> {
        let start = Instant::now();
        let messages = build_messages(&request);
        let options = build_options(&request);

        let response = self
            .provider
            .chat(&messages, Some(&options))
            .await
            .map_err(|e| {
                warn!("Completion failed: {}", e);
                BotError::CompletionFailed {
                    message: format!("{}", e),
                }
            })?;

        debug!(
            "Completion: {} input tokens, {} output tokens, {:?}",
            response.prompt_tokens,
            response.completion_tokens,
            start.elapsed()
        );

        let text = response.content.trim().to_string();
        if text.is_empty() {
            return Err(BotError::EmptyCompletion);
        }

        Ok(Completion {
            text,
            input_tokens: response.prompt_tokens as usize,
            output_tokens: response.completion_tokens as usize,
        })
    }
}

/// System message followed by one user message carrying text and images.
fn build_messages(request: &CompletionRequest) -> Vec<ChatMessage> {
    let user_text = request.user_text();
    let user = if request.images.is_empty() {
        ChatMessage::user(&user_text)
    } else {
        ChatMessage::user_with_images(&user_text, request.images.clone())
    };
    vec![ChatMessage::system(&request.system), user]
}

fn build_options(request: &CompletionRequest) -> CompletionOptions {
    CompletionOptions {
        max_tokens: request.max_tokens,
        ..Default::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn user_text_joins_parts() {
        let req = CompletionRequest::new("sys")
            .text("Analyze this MBTI report.")
            .text("Focus on work.");
        assert_eq!(req.user_text(), "Analyze this MBTI report.\n\nFocus on work.");
    }

    #[test]
    fn build_options_carries_token_budget() {
        let req = CompletionRequest::new("sys").max_tokens(900);
        assert_eq!(build_options(&req).max_tokens, Some(900));
        assert_eq!(build_options(&CompletionRequest::new("sys")).max_tokens, None);
    }

    #[test]
    fn messages_are_system_then_user() {
        let req = CompletionRequest::new("sys").text("hello");
        assert_eq!(build_messages(&req).len(), 2);
    }
}

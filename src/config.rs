//! Configuration types for the bot.
//!
//! All tunable behaviour lives in [`BotConfig`], built via its
//! [`BotConfigBuilder`]. Secrets (Slack bot token, verification token) are not
//! part of this struct; they are handed straight to the components that use
//! them as [`secrecy::SecretString`] so they never end up in a `Debug` dump.

use crate::error::BotError;
use std::path::PathBuf;
use std::time::Duration;

/// Default rendering DPI for uploaded report pages.
pub const DEFAULT_DPI: u32 = 200;

/// Default model for both the comparison and the report insight.
pub const DEFAULT_MODEL: &str = "gpt-4o";

/// Default provider name passed to `edgequake_llm::ProviderFactory`.
pub const DEFAULT_PROVIDER: &str = "openai";

/// Output token budget for a report insight.
pub const DEFAULT_INSIGHT_MAX_TOKENS: usize = 900;

/// How long a (channel, user) pair stays suppressed after an answer.
pub const DEFAULT_ANSWER_WINDOW: Duration = Duration::from_secs(60 * 60);

/// How often expired dedup entries are swept.
pub const DEFAULT_SWEEP_INTERVAL: Duration = Duration::from_secs(60);

/// Slack Web API base URL.
pub const DEFAULT_SLACK_API_BASE: &str = "https://slack.com/api";

/// Runtime configuration for the bot.
///
/// Built via [`BotConfig::builder()`] or using [`BotConfig::default()`].
///
/// # Example
/// ```rust
/// use mbti_insight_bot::BotConfig;
/// use std::time::Duration;
///
/// let config = BotConfig::builder()
///     .model("gpt-4.1")
///     .answer_window(Duration::from_secs(7200))
///     .build()
///     .unwrap();
/// assert_eq!(config.answer_window.as_secs(), 7200);
/// ```
#[derive(Debug, Clone)]
pub struct BotConfig {
    /// Rendering DPI used when rasterising report pages. Range: 72–400. Default: 200.
    pub dpi: u32,

    /// LLM model identifier. Default: `gpt-4o`.
    pub model: String,

    /// LLM provider name (e.g. "openai", "anthropic", "ollama"). Default: `openai`.
    pub provider_name: String,

    /// Maximum tokens the LLM may generate for a report insight. Default: 900.
    pub insight_max_tokens: usize,

    /// Dedup window for mention replies. Default: 1 hour.
    pub answer_window: Duration,

    /// Interval of the background dedup sweep. Default: 60 s.
    pub sweep_interval: Duration,

    /// Path to a pdfium shared library. If None, the system library is used.
    pub pdfium_lib_path: Option<PathBuf>,

    /// Slack Web API base URL. Overridden in tests.
    pub slack_api_base: String,
}

impl Default for BotConfig {
    fn default() -> Self {
        Self {
            dpi: DEFAULT_DPI,
            model: DEFAULT_MODEL.to_string(),
            provider_name: DEFAULT_PROVIDER.to_string(),
            insight_max_tokens: DEFAULT_INSIGHT_MAX_TOKENS,
            answer_window: DEFAULT_ANSWER_WINDOW,
            sweep_interval: DEFAULT_SWEEP_INTERVAL,
            pdfium_lib_path: None,
            slack_api_base: DEFAULT_SLACK_API_BASE.to_string(),
        }
    }
}

impl BotConfig {
    /// Create a new builder for `BotConfig`.
    pub fn builder() -> BotConfigBuilder {
        BotConfigBuilder {
            config: Self::default(),
        }
    }
}

/// Builder for [`BotConfig`].
#[derive(Debug)]
pub struct BotConfigBuilder {
    config: BotConfig,
}

impl BotConfigBuilder {
    pub fn dpi(mut self, dpi: u32) -> Self {
        self.config.dpi = dpi;
        self
    }

    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.config.model = model.into();
        self
    }

    pub fn provider_name(mut self, name: impl Into<String>) -> Self {
        self.config.provider_name = name.into();
        self
    }

    pub fn insight_max_tokens(mut self, n: usize) -> Self {
        self.config.insight_max_tokens = n;
        self
    }

    pub fn answer_window(mut self, window: Duration) -> Self {
        self.config.answer_window = window;
        self
    }

    pub fn sweep_interval(mut self, interval: Duration) -> Self {
        self.config.sweep_interval = interval;
        self
    }

    pub fn pdfium_lib_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.pdfium_lib_path = Some(path.into());
        self
    }

    pub fn slack_api_base(mut self, base: impl Into<String>) -> Self {
        self.config.slack_api_base = base.into();
        self
    }

    /// Build the configuration, validating constraints.
    pub fn build(self) -> Result<BotConfig, BotError> {
        let c = &self.config;
        if c.dpi < 72 || c.dpi > 400 {
            return Err(BotError::InvalidConfig(format!(
                "DPI must be 72–400, got {}",
                c.dpi
            )));
        }
        if c.model.trim().is_empty() {
            return Err(BotError::InvalidConfig("Model must not be empty".into()));
        }
        if c.insight_max_tokens == 0 {
            return Err(BotError::InvalidConfig(
                "Insight max tokens must be ≥ 1".into(),
            ));
        }
        if c.answer_window.is_zero() {
            return Err(BotError::InvalidConfig(
                "Answer window must be longer than zero".into(),
            ));
        }
        if c.sweep_interval.is_zero() {
            return Err(BotError::InvalidConfig(
                "Sweep interval must be longer than zero".into(),
            ));
        }
        Ok(self.config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_documented_values() {
        let c = BotConfig::default();
        assert_eq!(c.dpi, 200);
        assert_eq!(c.model, "gpt-4o");
        assert_eq!(c.insight_max_tokens, 900);
        assert_eq!(c.answer_window, Duration::from_secs(3600));
        assert_eq!(c.sweep_interval, Duration::from_secs(60));
        assert!(c.pdfium_lib_path.is_none());
    }

    #[test]
    fn rejects_out_of_range_dpi() {
        let err = BotConfig::builder().dpi(50).build().unwrap_err();
        assert!(err.to_string().contains("DPI"), "got: {err}");
    }

    #[test]
    fn rejects_zero_window() {
        assert!(BotConfig::builder()
            .answer_window(Duration::ZERO)
            .build()
            .is_err());
    }

    #[test]
    fn builder_overrides() {
        let c = BotConfig::builder()
            .model("claude-sonnet-4-20250514")
            .provider_name("anthropic")
            .slack_api_base("http://127.0.0.1:9999/api")
            .build()
            .unwrap();
        assert_eq!(c.provider_name, "anthropic");
        assert_eq!(c.slack_api_base, "http://127.0.0.1:9999/api");
    }
}

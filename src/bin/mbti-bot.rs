//! Server binary for mbti-insight-bot.
//!
//! A thin shim over the library crate that maps CLI flags and environment
//! variables to `BotConfig`, wires the production clients and serves the
//! webhook router until Ctrl-C.

use anyhow::{Context, Result};
use clap::Parser;
use mbti_insight_bot::{
    serve, AppState, BotConfig, LlmCompletionClient, PdfiumRenderer, SlackClient,
};
use secrecy::SecretString;
use std::io;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

const AFTER_HELP: &str = r#"SLACK APP SETUP:
  Event Subscriptions  → Request URL: https://<host>/slack/events
                         Subscribe to bot event: app_mention
  Slash Commands       → /insight  Request URL: https://<host>/slack/insight
  OAuth scopes         → app_mentions:read, chat:write, files:write

ENVIRONMENT VARIABLES:
  SLACK_BOT_TOKEN           Bot user OAuth token (xoxb-…)
  SLACK_VERIFICATION_TOKEN  Verification token sent with slash commands
  OPENAI_API_KEY            OpenAI API key (or the key for --provider)
  PDFIUM_LIB_PATH           Path to libpdfium; system library used if unset
  RUST_LOG                  Overrides the log filter (e.g. mbti_insight_bot=debug)

  A .env file in the working directory is loaded first.
"#;

/// Slack bot comparing MBTI type pairs and summarising MBTI report PDFs.
#[derive(Parser, Debug)]
#[command(
    name = "mbti-bot",
    version,
    about = "Slack bot comparing MBTI type pairs and summarising MBTI report PDFs",
    color = clap::ColorChoice::Auto,
    after_long_help = AFTER_HELP
)]
struct Cli {
    /// Interface to bind.
    #[arg(long, env = "HOST", default_value = "127.0.0.1")]
    host: String,

    /// Port to bind.
    #[arg(short, long, env = "PORT", default_value_t = 3000)]
    port: u16,

    /// Slack bot token.
    #[arg(long, env = "SLACK_BOT_TOKEN", hide_env_values = true)]
    slack_bot_token: String,

    /// Slack verification token for slash commands.
    #[arg(long, env = "SLACK_VERIFICATION_TOKEN", hide_env_values = true)]
    slack_verification_token: String,

    /// LLM model ID.
    #[arg(long, env = "MBTI_BOT_MODEL", default_value = "gpt-4o")]
    model: String,

    /// LLM provider: openai, anthropic, gemini, ollama, azure.
    #[arg(long, env = "MBTI_BOT_PROVIDER", default_value = "openai")]
    provider: String,

    /// Rendering DPI for report pages (72–400).
    #[arg(long, env = "MBTI_BOT_DPI", default_value_t = 200,
          value_parser = clap::value_parser!(u32).range(72..=400))]
    dpi: u32,

    /// Max LLM output tokens for a report insight.
    #[arg(long, env = "MBTI_BOT_MAX_TOKENS", default_value_t = 900)]
    max_tokens: usize,

    /// Seconds during which repeat mentions from the same user and channel are ignored.
    #[arg(long, env = "MBTI_BOT_ANSWER_WINDOW_SECS", default_value_t = 3600)]
    answer_window_secs: u64,

    /// Path to the pdfium shared library.
    #[arg(long, env = "PDFIUM_LIB_PATH")]
    pdfium_lib_path: Option<PathBuf>,

    /// Enable DEBUG-level tracing logs.
    #[arg(short, long, env = "MBTI_BOT_VERBOSE")]
    verbose: bool,
}

fn build_config(cli: &Cli) -> Result<BotConfig> {
    let mut builder = BotConfig::builder()
        .model(&cli.model)
        .provider_name(&cli.provider)
        .dpi(cli.dpi)
        .insight_max_tokens(cli.max_tokens)
        .answer_window(Duration::from_secs(cli.answer_window_secs));
    if let Some(ref path) = cli.pdfium_lib_path {
        builder = builder.pdfium_lib_path(path.clone());
    }
    builder.build().context("Invalid configuration")
}

#[tokio::main]
async fn main() -> Result<()> {
    // Missing .env is fine; real deployments set variables directly.
    let _ = dotenvy::dotenv();
    let cli = Cli::parse();

    // ── Logging setup ────────────────────────────────────────────────────
    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_writer(io::stderr)
        .init();

    // ── Wire clients ─────────────────────────────────────────────────────
    let config = build_config(&cli)?;
    let completions = LlmCompletionClient::from_config(&config)
        .context("Failed to configure the LLM provider")?;
    let slack = SlackClient::new(
        SecretString::from(cli.slack_bot_token.clone()),
        &config.slack_api_base,
    );
    let renderer = PdfiumRenderer::new(config.dpi, config.pdfium_lib_path.clone());

    let state = AppState::new(
        config,
        SecretString::from(cli.slack_verification_token.clone()),
        Arc::new(completions),
        Arc::new(slack),
        Arc::new(renderer),
    );

    // ── Serve ────────────────────────────────────────────────────────────
    let addr: SocketAddr = format!("{}:{}", cli.host, cli.port)
        .parse()
        .with_context(|| format!("Invalid bind address {}:{}", cli.host, cli.port))?;
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;

    serve(listener, state, wait_for_shutdown())
        .await
        .context("Server terminated unexpectedly")?;

    Ok(())
}

async fn wait_for_shutdown() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for Ctrl-C");
        std::future::pending::<()>().await;
    }
}

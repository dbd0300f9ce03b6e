//! Error types for the mbti-insight-bot library.
//!
//! Every failure here is scoped to a single request: there is no error that
//! leaves the process in an unrecoverable state. Handlers map each variant to
//! the HTTP status the webhook caller sees (or to a log line when the caller
//! has already been acknowledged).
//!
//! Slack Web API failures have their own type, [`crate::slack::SlackError`],
//! because they are never surfaced to the inbound caller.

use thiserror::Error;

/// All errors returned by the document pipeline, the completion client and
/// configuration validation.
#[derive(Debug, Error)]
pub enum BotError {
    // ── Document errors ───────────────────────────────────────────────────
    /// The uploaded bytes could not be opened as a PDF.
    #[error("Uploaded file is not a readable PDF: {detail}")]
    CorruptPdf { detail: String },

    /// The PDF opened but has no pages to analyse.
    #[error("PDF has no pages")]
    EmptyPdf,

    /// pdfium-render returned an error for a specific page.
    #[error("Rasterisation failed for page {page}: {detail}")]
    RasterisationFailed { page: usize, detail: String },

    /// A rendered page could not be PNG-encoded.
    #[error("Image encoding failed for page {page}: {detail}")]
    EncodingFailed { page: usize, detail: String },

    /// Writing the generated insight document failed.
    #[error("Failed to write insight PDF: {detail}")]
    DocumentWriteFailed { detail: String },

    // ── Completion errors ─────────────────────────────────────────────────
    /// The configured provider is not initialised (missing API key etc.).
    #[error("LLM provider '{provider}' is not configured.\n{hint}")]
    ProviderNotConfigured { provider: String, hint: String },

    /// The LLM API call failed.
    #[error("LLM API error: {message}")]
    CompletionFailed { message: String },

    /// The LLM answered with nothing but whitespace.
    #[error("LLM returned an empty completion")]
    EmptyCompletion,

    // ── Config errors ─────────────────────────────────────────────────────
    /// Builder validation failed.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    // ── Pdfium binding errors ─────────────────────────────────────────────
    /// Could not bind to a pdfium library.
    #[error(
        "Failed to bind to pdfium library: {0}\n\
Set PDFIUM_LIB_PATH=/path/to/libpdfium or install pdfium system-wide."
    )]
    PdfiumBindingFailed(String),

    // ── Catch-all ─────────────────────────────────────────────────────────
    /// Unexpected internal error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl BotError {
    /// Whether the failure came from the completion API rather than from
    /// local document handling.
    pub fn is_completion_error(&self) -> bool {
        matches!(
            self,
            BotError::ProviderNotConfigured { .. }
                | BotError::CompletionFailed { .. }
                | BotError::EmptyCompletion
        )
    }
}

//! `POST /slack/insight`: slash command that turns an attached MBTI report
//! PDF into a written insight.
//!
//! Flow: verify token → pick the first PDF → rasterise pages → one vision
//! completion → post the insight as Slack markup and upload it as a PDF.

use super::AppState;
use crate::error::BotError;
use crate::pipeline::encode::encode_pages;
use crate::pipeline::format::slack_format;
use crate::pipeline::llm::CompletionRequest;
use crate::prompts::{
    INSIGHT_FILENAME, INSIGHT_HEADER, INSIGHT_LEAD_IN, INSIGHT_SYSTEM_PROMPT, INSIGHT_TITLE,
    INSIGHT_UPLOAD_COMMENT, MISSING_PDF_MESSAGE,
};
use crate::slack::FileUpload;
use axum::body::Bytes;
use axum::extract::{FromRequest, Multipart, Request, State};
use axum::http::header::CONTENT_TYPE;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Form;
use std::collections::HashMap;
use tracing::{error, info, instrument};

/// A file part of the command submission.
#[derive(Debug, Clone)]
pub struct Attachment {
    pub filename: String,
    pub bytes: Bytes,
}

impl Attachment {
    pub fn is_pdf(&self) -> bool {
        self.filename.to_ascii_lowercase().ends_with(".pdf")
    }
}

/// Slash-command form fields plus any attached files.
///
/// Accepts `multipart/form-data` (fields and files) or
/// `application/x-www-form-urlencoded` (fields only).
#[derive(Debug, Clone)]
pub struct CommandSubmission {
    pub token: String,
    pub user_id: String,
    pub channel_id: String,
    pub text: String,
    pub files: Vec<Attachment>,
}

impl CommandSubmission {
    fn from_fields(
        mut fields: HashMap<String, String>,
        files: Vec<Attachment>,
    ) -> Result<Self, Response> {
        let mut required = |name: &str| {
            fields.remove(name).ok_or_else(|| {
                (StatusCode::BAD_REQUEST, format!("Missing form field '{name}'")).into_response()
            })
        };
        let token = required("token")?;
        let user_id = required("user_id")?;
        let channel_id = required("channel_id")?;
        let text = fields.remove("text").unwrap_or_default();

        Ok(Self {
            token,
            user_id,
            channel_id,
            text,
            files,
        })
    }

    /// First attachment whose name ends in `.pdf`.
    pub fn first_pdf(&self) -> Option<&Attachment> {
        self.files.iter().find(|f| f.is_pdf())
    }
}

impl<S> FromRequest<S> for CommandSubmission
where
    S: Send + Sync,
{
    type Rejection = Response;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let is_multipart = req
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .is_some_and(|ct| ct.starts_with("multipart/form-data"));

        if !is_multipart {
            let Form(fields) = Form::<HashMap<String, String>>::from_request(req, state)
                .await
                .map_err(IntoResponse::into_response)?;
            return Self::from_fields(fields, Vec::new());
        }

        let mut multipart = Multipart::from_request(req, state)
            .await
            .map_err(IntoResponse::into_response)?;

        let mut fields = HashMap::new();
        let mut files = Vec::new();
        while let Some(field) = multipart
            .next_field()
            .await
            .map_err(IntoResponse::into_response)?
        {
            let name = field.name().unwrap_or_default().to_string();
            match field.file_name().map(str::to_string) {
                Some(filename) => {
                    let bytes = field.bytes().await.map_err(IntoResponse::into_response)?;
                    files.push(Attachment { filename, bytes });
                }
                None => {
                    let value = field.text().await.map_err(IntoResponse::into_response)?;
                    fields.insert(name, value);
                }
            }
        }

        Self::from_fields(fields, files)
    }
}

/// The finished analysis, ready to share.
#[derive(Debug, Clone)]
pub struct Insight {
    /// Slack-markup message body.
    pub message: String,
    /// Generated PDF bytes.
    pub document: Vec<u8>,
}

/// Handle one `/insight` submission.
#[instrument(skip_all, fields(user = %submission.user_id, channel = %submission.channel_id))]
pub async fn slack_insight(
    State(state): State<AppState>,
    submission: CommandSubmission,
) -> Response {
    if !state.verify_token(&submission.token) {
        info!("Rejected command with invalid token");
        return (StatusCode::FORBIDDEN, "Invalid token").into_response();
    }

    let Some(pdf) = submission.first_pdf().filter(|f| !f.bytes.is_empty()) else {
        return (StatusCode::OK, MISSING_PDF_MESSAGE).into_response();
    };
    info!(file = %pdf.filename, bytes = pdf.bytes.len(), "Analysing MBTI report");

    let insight = match analyse_report(&state, pdf.bytes.to_vec(), &submission.text).await {
        Ok(insight) => insight,
        Err(e) => {
            error!(
                error = %e,
                completion = e.is_completion_error(),
                "Report analysis failed"
            );
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("Error while analyzing MBTI report: {e}"),
            )
                .into_response();
        }
    };

    share_insight(&state, &submission.channel_id, insight).await;
    (StatusCode::OK, "").into_response()
}

/// Render → encode → complete → format and re-render.
pub async fn analyse_report(
    state: &AppState,
    pdf: Vec<u8>,
    extra_text: &str,
) -> Result<Insight, BotError> {
    let pages = state.renderer.page_images(pdf).await?;
    let images = encode_pages(&pages)?;
    info!(pages = images.len(), "Rendered report pages");

    let mut request = CompletionRequest::new(INSIGHT_SYSTEM_PROMPT)
        .text(INSIGHT_LEAD_IN)
        .max_tokens(state.config.insight_max_tokens);
    let extra_text = extra_text.trim();
    if !extra_text.is_empty() {
        request = request.text(extra_text);
    }
    let completion = state.completions.complete(request.images(images)).await?;
    info!(
        input_tokens = completion.input_tokens,
        output_tokens = completion.output_tokens,
        "Insight completion received"
    );

    let message = format!("{INSIGHT_HEADER}\n\n{}", slack_format(&completion.text));
    let document = state.renderer.text_document(completion.text).await?;

    Ok(Insight { message, document })
}

/// Upload the PDF, then post the message. Failures are logged only.
async fn share_insight(state: &AppState, channel: &str, insight: Insight) {
    let upload = FileUpload {
        filename: INSIGHT_FILENAME.to_string(),
        title: INSIGHT_TITLE.to_string(),
        initial_comment: Some(INSIGHT_UPLOAD_COMMENT.to_string()),
        bytes: insight.document,
    };
    if let Err(e) = state.chat.upload_file(channel, upload).await {
        error!(channel, error = %e, "Failed to upload insight PDF");
    }
    if let Err(e) = state.chat.post_message(channel, &insight.message).await {
        error!(channel, error = %e, "Failed to post insight message");
    }
}

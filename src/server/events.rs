//! `POST /slack/events`: Events API webhook.
//!
//! Slack expects an acknowledgement within a few seconds and retries
//! otherwise, so every path ends in `{"ok": true}` with HTTP 200; failures
//! while talking to the model or to Slack are only logged.

use super::AppState;
use crate::dedup::answer_key;
use crate::mbti::match_mention;
use crate::pipeline::llm::CompletionRequest;
use crate::prompts::{comparison_prompt, comparison_reply, COMPARISON_SYSTEM_PROMPT, USAGE_MESSAGE};
use crate::slack::types::{EventEnvelope, SlackEvent};
use axum::body::Bytes;
use axum::extract::State;
use axum::Json;
use serde_json::{json, Value};
use std::time::Instant;
use tracing::{error, info, warn};

fn ack() -> Json<Value> {
    Json(json!({ "ok": true }))
}

/// Handle one Events API delivery.
pub async fn slack_events(State(state): State<AppState>, body: Bytes) -> Json<Value> {
    let envelope = match serde_json::from_slice::<Value>(&body) {
        Ok(body) => EventEnvelope::from_json(&body),
        Err(e) => {
            warn!(error = %e, "Unreadable event payload");
            EventEnvelope::default()
        }
    };

    if let Some(challenge) = envelope.challenge {
        return Json(json!({ "challenge": challenge }));
    }

    let Some(event) = envelope.event else {
        return ack();
    };

    let channel = event.channel.as_deref().unwrap_or_default();
    let user = event.user.as_deref().unwrap_or_default();
    let key = answer_key(channel, user);

    if state.answers.should_skip(&key, Instant::now()) {
        info!(channel, user, "Already answered recently, skipping");
        return ack();
    }

    if event.is_app_mention() {
        if let Some(reply) = mention_reply(&state, &event).await {
            if let Err(e) = state.chat.post_message(channel, &reply).await {
                error!(channel, error = %e, "Failed to post mention reply");
            }
        }
        state.answers.mark_answered(&key, Instant::now());
    }

    ack()
}

/// Work out what to say to a mention, if anything.
///
/// Returns `None` when the text does not follow the expected shape at all or
/// when the completion failed.
async fn mention_reply(state: &AppState, event: &SlackEvent) -> Option<String> {
    let text = event.text.as_deref().unwrap_or_default();
    let requester = event.user.as_deref().unwrap_or_default();

    let found = match_mention(text)?;
    let Some(intent) = found.validate() else {
        info!(
            requester_code = %found.requester_code,
            mentioned_code = %found.mentioned_code,
            "Mention carries an unknown type code"
        );
        return Some(USAGE_MESSAGE.to_string());
    };

    info!(
        "Comparing {} with {}",
        intent.requester_type, intent.mentioned_type
    );
    let request = CompletionRequest::new(COMPARISON_SYSTEM_PROMPT).text(comparison_prompt(
        intent.requester_type.as_str(),
        intent.mentioned_type.as_str(),
    ));

    match state.completions.complete(request).await {
        Ok(completion) => {
            info!(
                input_tokens = completion.input_tokens,
                output_tokens = completion.output_tokens,
                "Comparison completion received"
            );
            Some(comparison_reply(
                requester,
                intent.requester_type.as_str(),
                &intent.mentioned_user,
                intent.mentioned_type.as_str(),
                &completion.text,
            ))
        }
        Err(e) => {
            error!(error = %e, "Comparison completion failed");
            None
        }
    }
}

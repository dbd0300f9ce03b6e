//! Slack wire types: inbound event envelopes and Web API request/response
//! bodies.
//!
//! Inbound envelopes are read field by field from raw JSON: Slack adds, omits
//! and retypes fields between event kinds, and a missing or odd field must
//! never turn into a rejected webhook.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Body of `POST /slack/events`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EventEnvelope {
    /// Present only on the `url_verification` handshake; echoed verbatim.
    pub challenge: Option<Value>,
    pub event: Option<SlackEvent>,
}

impl EventEnvelope {
    /// Read an envelope from an arbitrary JSON body.
    ///
    /// `challenge` counts as present whenever the key exists, `null` included.
    /// Event fields of an unexpected type read as absent instead of failing
    /// the whole payload.
    pub fn from_json(body: &Value) -> Self {
        Self {
            challenge: body.get("challenge").cloned(),
            event: body
                .get("event")
                .filter(|e| e.is_object())
                .map(SlackEvent::from_json),
        }
    }
}

/// The inner `event` object.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SlackEvent {
    pub kind: Option<String>,
    pub channel: Option<String>,
    pub user: Option<String>,
    pub text: Option<String>,
}

impl SlackEvent {
    pub const APP_MENTION: &'static str = "app_mention";

    fn from_json(event: &Value) -> Self {
        let field = |name: &str| event.get(name).and_then(Value::as_str).map(str::to_string);
        Self {
            kind: field("type"),
            channel: field("channel"),
            user: field("user"),
            text: field("text"),
        }
    }

    pub fn is_app_mention(&self) -> bool {
        self.kind.as_deref() == Some(Self::APP_MENTION)
    }
}

/// `chat.postMessage` request.
#[derive(Debug, Clone, Serialize)]
pub struct PostMessage<'a> {
    pub channel: &'a str,
    pub text: &'a str,
}

/// Common `{ ok, error }` envelope of every Web API response.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiResponse {
    pub ok: bool,
    #[serde(default)]
    pub error: Option<String>,
}

/// `chat.postMessage` response.
#[derive(Debug, Clone, Deserialize)]
pub struct PostMessageResponse {
    pub ok: bool,
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub channel: Option<String>,
    #[serde(default)]
    pub ts: Option<String>,
}

/// `files.getUploadURLExternal` response.
#[derive(Debug, Clone, Deserialize)]
pub struct UploadUrlResponse {
    pub ok: bool,
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub upload_url: Option<String>,
    #[serde(default)]
    pub file_id: Option<String>,
}

/// `files.completeUploadExternal` request.
#[derive(Debug, Clone, Serialize)]
pub struct CompleteUpload<'a> {
    pub files: Vec<CompletedFile<'a>>,
    pub channel_id: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub initial_comment: Option<&'a str>,
}

#[derive(Debug, Clone, Serialize)]
pub struct CompletedFile<'a> {
    pub id: &'a str,
    pub title: &'a str,
}

/// A file to share into a channel.
#[derive(Debug, Clone)]
pub struct FileUpload {
    pub filename: String,
    pub title: String,
    pub initial_comment: Option<String>,
    pub bytes: Vec<u8>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn parses_challenge() {
        let env = EventEnvelope::from_json(&json!({
            "token": "x", "challenge": "3eZbrw1aBm2rZgRNFdxV2595E9CY3gmdALWMmHkvFXO7tYXAYM8P",
            "type": "url_verification"
        }));
        assert_eq!(
            env.challenge,
            Some(json!("3eZbrw1aBm2rZgRNFdxV2595E9CY3gmdALWMmHkvFXO7tYXAYM8P"))
        );
        assert!(env.event.is_none());
    }

    #[test]
    fn parses_app_mention() {
        let env = EventEnvelope::from_json(&json!({
            "type": "event_callback",
            "event": {
                "type": "app_mention",
                "user": "U1",
                "channel": "C1",
                "text": "<@UBOT> ENFP <@U2> ESTJ",
                "ts": "1515449522.000016"
            }
        }));
        let event = env.event.unwrap();
        assert!(event.is_app_mention());
        assert_eq!(event.user.as_deref(), Some("U1"));
    }

    #[test]
    fn null_challenge_is_still_a_challenge() {
        let env = EventEnvelope::from_json(&json!({ "challenge": null }));
        assert_eq!(env.challenge, Some(Value::Null));
    }

    #[test]
    fn challenge_survives_odd_event_field() {
        let env = EventEnvelope::from_json(&json!({ "challenge": "abc", "event": "x" }));
        assert_eq!(env.challenge, Some(json!("abc")));
        assert!(env.event.is_none());
    }

    #[test]
    fn object_valued_user_reads_as_absent() {
        let env = EventEnvelope::from_json(&json!({
            "event": {
                "type": "user_change",
                "user": { "id": "U1", "name": "alice" }
            }
        }));
        let event = env.event.unwrap();
        assert_eq!(event.kind.as_deref(), Some("user_change"));
        assert!(event.user.is_none());
        assert!(!event.is_app_mention());
    }

    #[test]
    fn complete_upload_omits_missing_comment() {
        let body = CompleteUpload {
            files: vec![CompletedFile {
                id: "F1",
                title: "T",
            }],
            channel_id: "C1",
            initial_comment: None,
        };
        let v = serde_json::to_value(&body).unwrap();
        assert!(v.get("initial_comment").is_none());
        assert_eq!(v["files"][0]["id"], "F1");
    }
}

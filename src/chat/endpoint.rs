//! Remote chat handler: one request, one guest-facing reply.
//!
//! Pure parsing in `parse_reply` for testability.

use std::time::Duration;

use serde::Serialize;
use serde_json::Value;
use tracing::debug;

use crate::config::ChatTimeouts;
use crate::i18n::LanguageCode;

/// Reply used when the handler answers without any guest-facing text.
pub const ACKNOWLEDGEMENT: &str = "Thanks! Our team will review your request.";

// =============================================================================
// ERROR
// =============================================================================

#[derive(Debug, thiserror::Error)]
pub enum ChatError {
    #[error("chat request failed: {0}")]
    Request(String),

    #[error("chat handler returned {status}: {body}")]
    Status { status: u16, body: String },

    #[error("chat response parse failed: {0}")]
    Parse(String),

    #[error("chat request exceeded {0:?} deadline")]
    Timeout(Duration),

    #[error("chat request cancelled")]
    Cancelled,

    #[error("HTTP client build failed: {0}")]
    HttpClientBuild(String),
}

// =============================================================================
// WIRE TYPES
// =============================================================================

/// Body posted to the chat handler. Absent optionals are omitted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatRequest {
    pub message: String,
    pub hotel_id: String,
    pub last_name: String,
    pub room_number: String,
    pub language: LanguageCode,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub session_code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub guest_id: Option<String>,
}

// =============================================================================
// TRAIT
// =============================================================================

/// Provider-neutral chat handler. Enables mocking in tests.
#[async_trait::async_trait]
pub trait ChatEndpoint: Send + Sync {
    /// Post one guest message and return the guest-facing reply text.
    ///
    /// `token` is the current auth access token, if any.
    ///
    /// # Errors
    ///
    /// Returns a [`ChatError`] on transport failure, non-success status, or
    /// an unparseable body.
    async fn send(&self, token: Option<&str>, request: &ChatRequest) -> Result<String, ChatError>;
}

// =============================================================================
// HTTP CLIENT
// =============================================================================

pub struct HttpChatEndpoint {
    http: reqwest::Client,
    url: String,
}

impl HttpChatEndpoint {
    /// # Errors
    ///
    /// Returns [`ChatError::HttpClientBuild`] if the HTTP client fails to build.
    pub fn new(url: impl Into<String>, timeouts: ChatTimeouts) -> Result<Self, ChatError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeouts.request_secs))
            .connect_timeout(Duration::from_secs(timeouts.connect_secs))
            .build()
            .map_err(|e| ChatError::HttpClientBuild(e.to_string()))?;
        Ok(Self { http, url: url.into() })
    }
}

#[async_trait::async_trait]
impl ChatEndpoint for HttpChatEndpoint {
    async fn send(&self, token: Option<&str>, request: &ChatRequest) -> Result<String, ChatError> {
        let authorization = token
            .filter(|t| !t.is_empty())
            .map(|t| format!("Bearer {t}"))
            .unwrap_or_default();

        let response = self
            .http
            .post(&self.url)
            .header("Authorization", authorization)
            .json(request)
            .send()
            .await
            .map_err(|e| ChatError::Request(e.to_string()))?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| ChatError::Request(e.to_string()))?;

        if !status.is_success() {
            return Err(ChatError::Status { status: status.as_u16(), body: text });
        }

        debug!(status = status.as_u16(), body_len = text.len(), "chat handler replied");
        parse_reply(&text)
    }
}

// =============================================================================
// PARSING
// =============================================================================

type ReplyRule = fn(&Value) -> Option<&str>;

/// Candidate reply fields, first non-empty wins.
const REPLY_RULES: &[ReplyRule] = &[guest_response, message];

fn guest_response(body: &Value) -> Option<&str> {
    non_empty_str(body, "guestResponse")
}

fn message(body: &Value) -> Option<&str> {
    non_empty_str(body, "message")
}

fn non_empty_str<'a>(body: &'a Value, field: &str) -> Option<&'a str> {
    body.get(field)
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
}

fn parse_reply(json: &str) -> Result<String, ChatError> {
    let body: Value = serde_json::from_str(json).map_err(|e| ChatError::Parse(e.to_string()))?;
    let reply = REPLY_RULES
        .iter()
        .find_map(|rule| rule(&body))
        .unwrap_or(ACKNOWLEDGEMENT);
    Ok(reply.to_string())
}

#[cfg(test)]
#[path = "endpoint_test.rs"]
mod tests;

//! Guest-facing domain types shared by signup, bootstrap, and chat.

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

use crate::i18n::LanguageCode;

/// Hotel name used when the hotel configuration never arrived.
pub const FALLBACK_HOTEL_NAME: &str = "Our Hotel";

// =============================================================================
// GUEST IDENTITY
// =============================================================================

/// The checked-in guest for the duration of a chat session.
///
/// Serialized with camelCase keys; this is also the shape of the persisted
/// `guest_info` cookie.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GuestIdentity {
    /// Guest record id. Empty until the record is created.
    #[serde(default)]
    pub id: String,
    pub name: String,
    pub room_number: String,
    pub language: LanguageCode,
    pub hotel_name: String,
    #[serde(default)]
    pub hotel_languages: Vec<String>,
}

// =============================================================================
// HOTEL CONFIG
// =============================================================================

/// Hotel configuration fetched once per signup flow.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HotelConfig {
    pub name: String,
    pub supported_languages: Vec<String>,
    pub default_language: LanguageCode,
}

// =============================================================================
// CHAT MESSAGE
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sender {
    Guest,
    Ai,
}

/// A single entry in the client-local conversation log.
#[derive(Debug, Clone, PartialEq)]
pub struct ChatMessage {
    pub id: String,
    pub content: String,
    pub sender: Sender,
    pub timestamp: OffsetDateTime,
}

impl ChatMessage {
    #[must_use]
    pub fn new(sender: Sender, content: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            content: content.into(),
            sender,
            timestamp: OffsetDateTime::now_utc(),
        }
    }

    #[must_use]
    pub fn guest(content: impl Into<String>) -> Self {
        Self::new(Sender::Guest, content)
    }

    #[must_use]
    pub fn ai(content: impl Into<String>) -> Self {
        Self::new(Sender::Ai, content)
    }
}

#[cfg(test)]
#[path = "model_test.rs"]
mod tests;

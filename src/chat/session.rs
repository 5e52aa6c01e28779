//! Client-side chat session: greeting reset, language switching, and the
//! single-request send loop.
//!
//! DESIGN
//! ======
//! A send is split into `begin_send` (synchronous: echo the guest message,
//! raise the in-flight flag) and `finish_send` (append the reply or the
//! apology, lower the flag). The network call between them only borrows the
//! session immutably, so the in-flight guard is the one thing deciding
//! whether a second send may start.
//!
//! Every call runs under a deadline and a `CancellationToken` minted by
//! `begin_send` for that exchange alone, so the in-flight flag cannot stay
//! raised forever and a cancel never outlives the send it targeted.
//!
//! TRADE-OFFS
//! ==========
//! Changing language replaces the whole log with a fresh greeting. Earlier
//! conversation is discarded rather than translated.

use std::sync::Arc;
use std::time::Duration;

use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use super::endpoint::{ChatEndpoint, ChatError, ChatRequest};
use crate::backend::AuthBackend;
use crate::i18n::{LanguageCode, TranslationKey, fill_placeholders, get_translation};
use crate::model::{ChatMessage, GuestIdentity};
use crate::session::SessionContext;
use crate::store::GuestPersistence;

/// Shown in place of a reply whenever the exchange fails for any reason.
pub const APOLOGY: &str = "Sorry, there was a problem sending your message. Please try again.";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatSettings {
    pub hotel_id: String,
    /// Upper bound on one request/response exchange.
    pub deadline: Duration,
}

/// A send that has been echoed locally and awaits its network round trip.
#[derive(Debug)]
pub struct PendingSend {
    request: ChatRequest,
    cancel: CancellationToken,
}

pub struct ChatSession {
    guest: GuestIdentity,
    language: LanguageCode,
    messages: Vec<ChatMessage>,
    in_flight: bool,
    input: String,
    cancel: CancellationToken,
    settings: ChatSettings,
    endpoint: Arc<dyn ChatEndpoint>,
    auth: Arc<dyn AuthBackend>,
    persistence: GuestPersistence,
}

impl ChatSession {
    /// Start a session for `guest`, seeded with the greeting in the guest's language.
    #[must_use]
    pub fn new(
        guest: GuestIdentity,
        settings: ChatSettings,
        endpoint: Arc<dyn ChatEndpoint>,
        auth: Arc<dyn AuthBackend>,
        persistence: GuestPersistence,
    ) -> Self {
        let language = guest.language;
        let mut session = Self {
            guest,
            language,
            messages: Vec::new(),
            in_flight: false,
            input: String::new(),
            cancel: CancellationToken::new(),
            settings,
            endpoint,
            auth,
            persistence,
        };
        session.reset_greeting();
        session
    }

    #[must_use]
    pub fn language(&self) -> LanguageCode {
        self.language
    }

    #[must_use]
    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    #[must_use]
    pub fn is_in_flight(&self) -> bool {
        self.in_flight
    }

    #[must_use]
    pub fn input(&self) -> &str {
        &self.input
    }

    pub fn set_input(&mut self, value: impl Into<String>) {
        self.input = value.into();
    }

    #[must_use]
    pub fn guest(&self) -> &GuestIdentity {
        &self.guest
    }

    /// Compose the welcome message for `language`.
    #[must_use]
    pub fn greeting(&self, language: LanguageCode) -> String {
        let intro = fill_placeholders(
            get_translation(language, TranslationKey::GreetNameRoom),
            &[("name", self.guest.name.as_str()), ("roomNumber", self.guest.room_number.as_str())],
        );
        let welcome = fill_placeholders(
            get_translation(language, TranslationKey::InitialGreeting),
            &[("hotelName", self.guest.hotel_name.as_str())],
        );
        format!("{intro} {welcome}")
    }

    fn reset_greeting(&mut self) {
        let greeting = ChatMessage::ai(self.greeting(self.language));
        self.messages = vec![greeting];
    }

    /// Switch language: reset the log to a fresh greeting, update the
    /// session context, and rewrite the persisted language when allowed.
    pub fn change_language(&mut self, language: LanguageCode, context: &mut SessionContext) {
        info!(from = %self.language, to = %language, "chat language changed");
        self.language = language;
        self.guest.language = language;
        self.reset_greeting();
        context.update_language(language);

        match self.persistence.update_language(language) {
            Ok(true) => debug!("persisted language updated"),
            Ok(false) => {}
            Err(e) => warn!(error = %e, "failed to persist language change"),
        }
    }

    /// Abort the exchange in flight, if any. Does nothing while idle.
    pub fn cancel_in_flight(&self) {
        if self.in_flight {
            self.cancel.cancel();
        }
    }

    /// Echo the input as a guest message and raise the in-flight flag.
    ///
    /// Returns `None` without touching any state when the input is blank or
    /// another send is in flight.
    pub fn begin_send(&mut self) -> Option<PendingSend> {
        let text = self.input.trim();
        if text.is_empty() || self.in_flight {
            return None;
        }
        let text = text.to_string();

        let request = ChatRequest {
            message: text.clone(),
            hotel_id: self.settings.hotel_id.clone(),
            last_name: self.guest.name.clone(),
            room_number: self.guest.room_number.clone(),
            language: self.language,
            session_code: self.persistence.session_code(),
            guest_id: Some(self.guest.id.clone()).filter(|id| !id.is_empty()),
        };

        self.messages.push(ChatMessage::guest(text));
        self.input.clear();
        self.in_flight = true;
        // Each exchange gets its own token; a stale cancel cannot leak into it.
        self.cancel = CancellationToken::new();

        Some(PendingSend { request, cancel: self.cancel.clone() })
    }

    /// Run the network exchange for `pending` under the deadline and its
    /// cancellation token.
    ///
    /// # Errors
    ///
    /// Returns a [`ChatError`] for any failed, timed-out, or cancelled exchange.
    pub async fn dispatch(&self, pending: &PendingSend) -> Result<String, ChatError> {
        let token = match self.auth.current_session().await {
            Ok(session) => session.map(|s| s.access_token),
            Err(e) => {
                warn!(error = %e, "could not read auth session, sending without credential");
                None
            }
        };

        let deadline = self.settings.deadline;
        let call = self.endpoint.send(token.as_deref(), &pending.request);
        tokio::select! {
            biased;
            () = pending.cancel.cancelled() => Err(ChatError::Cancelled),
            result = tokio::time::timeout(deadline, call) => {
                result.unwrap_or(Err(ChatError::Timeout(deadline)))
            }
        }
    }

    /// Append the reply (or the apology) and lower the in-flight flag.
    pub fn finish_send(&mut self, outcome: Result<String, ChatError>) {
        let content = match outcome {
            Ok(reply) => reply,
            Err(e) => {
                warn!(error = %e, "chat exchange failed");
                APOLOGY.to_string()
            }
        };
        self.messages.push(ChatMessage::ai(content));
        self.in_flight = false;
    }

    /// Send the current input. Returns whether an exchange took place.
    pub async fn send_message(&mut self) -> bool {
        let Some(pending) = self.begin_send() else {
            return false;
        };
        debug!(message_len = pending.request.message.len(), "sending chat message");
        let outcome = self.dispatch(&pending).await;
        self.finish_send(outcome);
        true
    }
}

#[cfg(test)]
#[path = "session_test.rs"]
mod tests;

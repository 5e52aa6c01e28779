//! Guest signup: hotel configuration, input validation, anonymous identity,
//! guest record, persistence.
//!
//! DESIGN
//! ======
//! `SignupFlow` is a small state machine (`Idle → Loading → Success|Failed`)
//! over the auth and data backends. Failure re-enables the form; only a
//! submission already in `Loading` is refused.
//!
//! ERROR HANDLING
//! ==============
//! A failed hotel fetch is not fatal: a notice is queued and the form keeps
//! working with fallbacks. Auth and guest-record failures fail the
//! submission with a readable message. If the guest record cannot be
//! created after the anonymous sign-in succeeded, the identity would be
//! orphaned; the flow signs it out again (best effort) and reports its user
//! id in the error.

use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::backend::{AuthBackend, BackendError, DataBackend, NewGuest};
use crate::i18n::{self, LanguageCode};
use crate::model::{FALLBACK_HOTEL_NAME, GuestIdentity, HotelConfig};
use crate::store::GuestPersistence;

pub const HOTEL_LOAD_FAILED: &str = "Failed to load hotel information";
pub const WELCOME_NOTICE: &str = "Welcome! Setting up your chat experience...";

const MIN_NAME_CHARS: usize = 2;

// =============================================================================
// TYPES
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SignupField {
    Name,
    RoomNumber,
    Language,
}

#[derive(Debug, thiserror::Error)]
pub enum SignupError {
    #[error("{message}")]
    Validation { field: SignupField, message: String },

    #[error("Authentication failed: {0}")]
    Auth(#[source] BackendError),

    /// The anonymous identity was created but its guest record was not.
    #[error("Failed to create guest record: {source}")]
    GuestRecord {
        #[source]
        source: BackendError,
        orphaned_user_id: String,
    },
}

#[derive(Debug)]
pub enum SignupState {
    Idle,
    Loading,
    Success(GuestIdentity),
    Failed(SignupError),
}

/// Transient, non-blocking message for the guest.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    Success(String),
    Error(String),
}

struct ValidSignup {
    name: String,
    room_number: String,
    language: LanguageCode,
}

// =============================================================================
// FLOW
// =============================================================================

pub struct SignupFlow {
    hotel_id: String,
    auth: Arc<dyn AuthBackend>,
    data: Arc<dyn DataBackend>,
    persistence: GuestPersistence,
    hotel: Option<HotelConfig>,
    name: String,
    room_number: String,
    language: String,
    language_edited: bool,
    state: SignupState,
    notices: Vec<Notice>,
}

impl SignupFlow {
    #[must_use]
    pub fn new(
        hotel_id: impl Into<String>,
        auth: Arc<dyn AuthBackend>,
        data: Arc<dyn DataBackend>,
        persistence: GuestPersistence,
    ) -> Self {
        Self {
            hotel_id: hotel_id.into(),
            auth,
            data,
            persistence,
            hotel: None,
            name: String::new(),
            room_number: String::new(),
            language: String::new(),
            language_edited: false,
            state: SignupState::Idle,
            notices: Vec::new(),
        }
    }

    /// Fetch the hotel configuration. On success the language field takes
    /// the hotel default unless the guest already picked one.
    pub async fn load_hotel(&mut self) {
        match self.data.fetch_hotel(&self.hotel_id).await {
            Ok(hotel) => {
                info!(hotel_id = %self.hotel_id, languages = hotel.supported_languages.len(), "hotel configuration loaded");
                if !self.language_edited {
                    self.language = hotel.default_language.code().to_string();
                }
                self.hotel = Some(hotel);
            }
            Err(e) => {
                warn!(hotel_id = %self.hotel_id, error = %e, "hotel configuration fetch failed");
                self.notices.push(Notice::Error(HOTEL_LOAD_FAILED.into()));
            }
        }
    }

    #[must_use]
    pub fn hotel(&self) -> Option<&HotelConfig> {
        self.hotel.as_ref()
    }

    #[must_use]
    pub fn state(&self) -> &SignupState {
        &self.state
    }

    #[must_use]
    pub fn is_loading(&self) -> bool {
        matches!(self.state, SignupState::Loading)
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn room_number(&self) -> &str {
        &self.room_number
    }

    #[must_use]
    pub fn language(&self) -> &str {
        &self.language
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    pub fn set_room_number(&mut self, room_number: impl Into<String>) {
        self.room_number = room_number.into();
    }

    /// Set the language field. Marks it as chosen by the guest.
    pub fn set_language(&mut self, language: impl Into<String>) {
        self.language = language.into();
        self.language_edited = true;
    }

    /// Languages the picker should offer.
    #[must_use]
    pub fn available_languages(&self) -> Vec<LanguageCode> {
        let offered = self
            .hotel
            .as_ref()
            .map_or(&[][..], |h| h.supported_languages.as_slice());
        i18n::available_languages(offered)
    }

    #[must_use]
    pub fn notices(&self) -> &[Notice] {
        &self.notices
    }

    pub fn take_notices(&mut self) -> Vec<Notice> {
        std::mem::take(&mut self.notices)
    }

    /// Check the form fields without contacting any backend.
    fn checked(&self) -> Result<ValidSignup, SignupError> {
        let name = self.name.trim();
        if name.chars().count() < MIN_NAME_CHARS {
            return Err(invalid(SignupField::Name, "Name must be at least 2 characters"));
        }
        let room_number = self.room_number.trim();
        if room_number.is_empty() {
            return Err(invalid(SignupField::RoomNumber, "Room number is required"));
        }

        let raw = self.language.trim();
        if raw.is_empty() {
            return Err(invalid(SignupField::Language, "Please select a language"));
        }
        let language: LanguageCode = raw
            .parse()
            .map_err(|e: i18n::UnknownLanguage| invalid(SignupField::Language, &e.to_string()))?;
        let offered = self.hotel.as_ref().map(|h| h.supported_languages.as_slice());
        if let Some(offered) = offered.filter(|o| !o.is_empty()) {
            if !offered.iter().any(|code| code == language.code()) {
                return Err(invalid(SignupField::Language, "Language not offered by this hotel"));
            }
        }

        Ok(ValidSignup { name: name.to_string(), room_number: room_number.to_string(), language })
    }

    /// Submit the form. Returns the new guest on success.
    ///
    /// A submission while one is already loading is ignored. Any failure is
    /// recorded in [`SignupFlow::state`] and queued as an error notice.
    pub async fn submit(&mut self) -> Option<GuestIdentity> {
        if self.is_loading() {
            debug!("signup already in progress");
            return None;
        }
        let input = match self.checked() {
            Ok(input) => input,
            Err(e) => {
                self.state = SignupState::Failed(e);
                return None;
            }
        };

        self.state = SignupState::Loading;
        let outcome = self.register(input).await;
        match outcome {
            Ok(guest) => {
                self.notices.push(Notice::Success(WELCOME_NOTICE.into()));
                self.state = SignupState::Success(guest.clone());
                Some(guest)
            }
            Err(e) => {
                warn!(error = %e, "signup failed");
                self.notices.push(Notice::Error(e.to_string()));
                self.state = SignupState::Failed(e);
                None
            }
        }
    }

    async fn register(&self, input: ValidSignup) -> Result<GuestIdentity, SignupError> {
        let user = self
            .auth
            .sign_in_anonymously()
            .await
            .map_err(SignupError::Auth)?;

        let row = NewGuest {
            user_id: user.id.clone(),
            hotel_id: self.hotel_id.clone(),
            last_name: input.name.clone(),
            room_number: input.room_number.clone(),
            language: input.language.code().to_string(),
        };
        let record = match self.data.insert_guest(&row).await {
            Ok(record) => record,
            Err(source) => {
                if let Err(e) = self.auth.sign_out().await {
                    warn!(user_id = %user.id, error = %e, "failed to sign out orphaned identity");
                }
                return Err(SignupError::GuestRecord { source, orphaned_user_id: user.id });
            }
        };

        let guest = GuestIdentity {
            id: record.id,
            name: input.name,
            room_number: input.room_number,
            language: input.language,
            hotel_name: self
                .hotel
                .as_ref()
                .map_or_else(|| FALLBACK_HOTEL_NAME.to_string(), |h| h.name.clone()),
            hotel_languages: self
                .hotel
                .as_ref()
                .map(|h| h.supported_languages.clone())
                .unwrap_or_default(),
        };
        info!(guest_id = %guest.id, user_id = %user.id, "guest registered");

        match self.persistence.save_guest(&guest) {
            Ok(true) => debug!("guest session persisted"),
            Ok(false) => {}
            Err(e) => warn!(error = %e, "failed to persist guest session"),
        }
        Ok(guest)
    }
}

fn invalid(field: SignupField, message: &str) -> SignupError {
    SignupError::Validation { field, message: message.to_string() }
}

#[cfg(test)]
#[path = "signup_test.rs"]
mod tests;

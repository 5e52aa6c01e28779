//! Consent-gated persistence of guest session state.
//!
//! DESIGN
//! ======
//! Every write of guest data goes through [`GuestPersistence`], and every
//! write method checks consent itself. Call sites never test consent before
//! writing, so a forgotten check cannot leak a cookie.
//!
//! ERROR HANDLING
//! ==============
//! Malformed cookie payloads are treated exactly like missing ones. Only
//! jar I/O failures surface as errors.

use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, warn};

use super::{CookieStore, StoreError};
use crate::i18n::LanguageCode;
use crate::model::GuestIdentity;

pub const CONSENT_COOKIE: &str = "cookie_consent";
pub const CONSENT_GRANTED: &str = "1";
pub const GUEST_COOKIE: &str = "guest_info";
pub const SESSION_CODE_COOKIE: &str = "guest_session";

pub const CONSENT_TTL: Duration = Duration::from_secs(60 * 60 * 24 * 365);
pub const GUEST_TTL: Duration = Duration::from_secs(60 * 60);

#[derive(Clone)]
pub struct GuestPersistence {
    jar: Arc<dyn CookieStore>,
}

impl GuestPersistence {
    #[must_use]
    pub fn new(jar: Arc<dyn CookieStore>) -> Self {
        Self { jar }
    }

    /// Underlying jar, so tests can plant or inspect raw entries.
    #[cfg(test)]
    pub(crate) fn jar(&self) -> Arc<dyn CookieStore> {
        Arc::clone(&self.jar)
    }

    /// True iff the consent marker is present and equals the sentinel.
    #[must_use]
    pub fn has_consent(&self) -> bool {
        self.jar.read(CONSENT_COOKIE).as_deref() == Some(CONSENT_GRANTED)
    }

    /// Whether the guest has been asked at all. A declined prompt writes
    /// nothing, so this only reports prior acceptance.
    #[must_use]
    pub fn consent_decided(&self) -> bool {
        self.jar.read(CONSENT_COOKIE).is_some()
    }

    /// Record the guest's acceptance of cookies.
    ///
    /// # Errors
    ///
    /// Returns a [`StoreError`] if the jar cannot be written.
    pub fn grant_consent(&self) -> Result<(), StoreError> {
        self.jar.write(CONSENT_COOKIE, CONSENT_GRANTED, CONSENT_TTL)
    }

    /// Withdraw consent. Guest data already written stays until it expires.
    ///
    /// # Errors
    ///
    /// Returns a [`StoreError`] if the jar cannot be written.
    pub fn revoke_consent(&self) -> Result<(), StoreError> {
        self.jar.erase(CONSENT_COOKIE)
    }

    /// Persist the guest identity if consent was granted.
    ///
    /// Returns whether anything was written.
    ///
    /// # Errors
    ///
    /// Returns a [`StoreError`] if the jar cannot be written.
    pub fn save_guest(&self, guest: &GuestIdentity) -> Result<bool, StoreError> {
        if !self.has_consent() {
            debug!("no cookie consent, guest not persisted");
            return Ok(false);
        }
        let raw = serde_json::to_string(guest)?;
        self.jar.write(GUEST_COOKIE, &raw, GUEST_TTL)?;
        Ok(true)
    }

    /// Load the persisted guest identity. Malformed payloads read as `None`.
    #[must_use]
    pub fn load_guest(&self) -> Option<GuestIdentity> {
        let raw = self.jar.read(GUEST_COOKIE)?;
        match serde_json::from_str(&raw) {
            Ok(guest) => Some(guest),
            Err(e) => {
                debug!(error = %e, "ignoring malformed guest cookie");
                None
            }
        }
    }

    /// Rewrite only the `language` field of an existing persisted record,
    /// refreshing its expiry. Requires consent and an existing record.
    ///
    /// Returns whether anything was written.
    ///
    /// # Errors
    ///
    /// Returns a [`StoreError`] if the jar cannot be written.
    pub fn update_language(&self, language: LanguageCode) -> Result<bool, StoreError> {
        if !self.has_consent() {
            return Ok(false);
        }
        let Some(raw) = self.jar.read(GUEST_COOKIE) else {
            return Ok(false);
        };
        // Edit the raw object so fields we do not model survive the rewrite.
        let mut record = match serde_json::from_str::<serde_json::Value>(&raw) {
            Ok(serde_json::Value::Object(map)) => map,
            Ok(_) | Err(_) => {
                warn!("guest cookie is not an object, language not persisted");
                return Ok(false);
            }
        };
        record.insert("language".into(), serde_json::Value::String(language.code().into()));
        let raw = serde_json::to_string(&record)?;
        self.jar.write(GUEST_COOKIE, &raw, GUEST_TTL)?;
        Ok(true)
    }

    /// Opaque session code issued by the backend. Read-only here.
    #[must_use]
    pub fn session_code(&self) -> Option<String> {
        self.jar
            .read(SESSION_CODE_COOKIE)
            .filter(|code| !code.is_empty())
    }
}

#[cfg(test)]
#[path = "persistence_test.rs"]
mod tests;

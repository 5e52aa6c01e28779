use tracing::info;

use crate::i18n::LanguageCode;
use crate::model::GuestIdentity;

/// Holder of the signed-in guest. Signed in iff a guest is present.
#[derive(Debug, Clone, Default)]
pub struct SessionContext {
    guest: Option<GuestIdentity>,
}

impl SessionContext {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn guest(&self) -> Option<&GuestIdentity> {
        self.guest.as_ref()
    }

    #[must_use]
    pub fn is_signed_in(&self) -> bool {
        self.guest.is_some()
    }

    /// Replace the current guest wholesale.
    pub fn sign_in(&mut self, guest: GuestIdentity) {
        info!(guest_id = %guest.id, language = %guest.language, "guest signed in");
        self.guest = Some(guest);
    }

    /// Update the guest's language. Returns `false` when nobody is signed in.
    pub fn update_language(&mut self, language: LanguageCode) -> bool {
        match &mut self.guest {
            Some(guest) => {
                guest.language = language;
                true
            }
            None => false,
        }
    }

    /// Tear down the context, returning the guest that was signed in.
    pub fn sign_out(&mut self) -> Option<GuestIdentity> {
        self.guest.take()
    }
}

#[cfg(test)]
#[path = "context_test.rs"]
mod tests;

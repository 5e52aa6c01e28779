//! Top-level composition of the guest client.
//!
//! ARCHITECTURE
//! ============
//! `ConciergeApp` owns the session context and the shared collaborators
//! (persistence, backends, chat endpoint) and hands them to the signup flow
//! and chat session it creates. The lifecycle is:
//!
//! `start` (bootstrap once) → `signup_flow` + `complete_signup` when nobody
//! was restored → `open_chat` → `sign_out`.

use std::sync::Arc;

use tracing::{info, warn};

use crate::backend::{AuthBackend, BackendError, DataBackend, SupabaseClient};
use crate::chat::{ChatEndpoint, ChatError, ChatSession, ChatSettings, HttpChatEndpoint};
use crate::config::ConciergeConfig;
use crate::i18n::LanguageCode;
use crate::model::GuestIdentity;
use crate::session::{SessionContext, bootstrap};
use crate::signup::SignupFlow;
use crate::store::{CookieStore, FileCookieJar, GuestPersistence};

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("no guest is signed in")]
    NotSignedIn,
    #[error(transparent)]
    Backend(#[from] BackendError),
    #[error(transparent)]
    Chat(#[from] ChatError),
}

pub struct ConciergeApp {
    context: SessionContext,
    persistence: GuestPersistence,
    auth: Arc<dyn AuthBackend>,
    data: Arc<dyn DataBackend>,
    endpoint: Arc<dyn ChatEndpoint>,
    settings: ChatSettings,
    started: bool,
}

impl ConciergeApp {
    #[must_use]
    pub fn new(
        persistence: GuestPersistence,
        auth: Arc<dyn AuthBackend>,
        data: Arc<dyn DataBackend>,
        endpoint: Arc<dyn ChatEndpoint>,
        settings: ChatSettings,
    ) -> Self {
        Self {
            context: SessionContext::new(),
            persistence,
            auth,
            data,
            endpoint,
            settings,
            started: false,
        }
    }

    /// Wire the production collaborators: a file cookie jar, the hosted
    /// backend (sharing that jar for its auth session), and the HTTP chat
    /// handler.
    ///
    /// # Errors
    ///
    /// Returns an [`AppError`] if an HTTP client cannot be built.
    pub fn from_config(config: &ConciergeConfig) -> Result<Self, AppError> {
        let jar: Arc<dyn CookieStore> = Arc::new(FileCookieJar::open(&config.cookie_jar_path));
        let backend = Arc::new(SupabaseClient::from_config(config)?.with_session_jar(Arc::clone(&jar)));
        let endpoint = Arc::new(HttpChatEndpoint::new(config.chat_url(), config.timeouts)?);
        let deadline = config.timeouts.deadline();

        Ok(Self::new(
            GuestPersistence::new(jar),
            backend.clone(),
            backend,
            endpoint,
            ChatSettings { hotel_id: config.hotel_id.clone(), deadline },
        ))
    }

    /// Run session bootstrap. Only the first call does anything.
    ///
    /// Returns whether a guest is signed in afterwards.
    pub async fn start(&mut self) -> bool {
        if self.started {
            return self.context.is_signed_in();
        }
        self.started = true;
        if let Some(guest) = bootstrap(&self.persistence, self.auth.as_ref()).await {
            self.context.sign_in(guest);
        }
        self.context.is_signed_in()
    }

    #[must_use]
    pub fn context(&self) -> &SessionContext {
        &self.context
    }

    #[must_use]
    pub fn persistence(&self) -> &GuestPersistence {
        &self.persistence
    }

    #[must_use]
    pub fn signup_flow(&self) -> SignupFlow {
        SignupFlow::new(
            self.settings.hotel_id.clone(),
            Arc::clone(&self.auth),
            Arc::clone(&self.data),
            self.persistence.clone(),
        )
    }

    /// Adopt the identity emitted by a successful signup.
    pub fn complete_signup(&mut self, guest: GuestIdentity) {
        self.context.sign_in(guest);
    }

    /// Open a chat session for the signed-in guest.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotSignedIn`] when the context holds no guest.
    pub fn open_chat(&self) -> Result<ChatSession, AppError> {
        let guest = self.context.guest().cloned().ok_or(AppError::NotSignedIn)?;
        Ok(ChatSession::new(
            guest,
            self.settings.clone(),
            Arc::clone(&self.endpoint),
            Arc::clone(&self.auth),
            self.persistence.clone(),
        ))
    }

    pub fn change_language(&mut self, chat: &mut ChatSession, language: LanguageCode) {
        chat.change_language(language, &mut self.context);
    }

    /// Terminate the auth session and tear down the context. The persisted
    /// guest cookie is left alone.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Backend`] if the backend sign-out fails. The
    /// context is torn down either way.
    pub async fn sign_out(&mut self) -> Result<Option<GuestIdentity>, AppError> {
        let guest = self.context.sign_out();
        info!(signed_in = guest.is_some(), "signing out");
        if let Err(e) = self.auth.sign_out().await {
            warn!(error = %e, "backend sign-out failed");
            return Err(e.into());
        }
        Ok(guest)
    }
}

#[cfg(test)]
#[path = "app_test.rs"]
mod tests;

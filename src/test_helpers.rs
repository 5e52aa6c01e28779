//! Shared fixtures and hand-written backend mocks for unit tests.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use crate::backend::{AuthBackend, AuthSession, AuthUser, BackendError, DataBackend, GuestRecord, NewGuest};
use crate::chat::{ChatEndpoint, ChatError, ChatRequest};
use crate::i18n::LanguageCode;
use crate::model::{GuestIdentity, HotelConfig};
use crate::store::{GuestPersistence, MemoryCookieJar};

// =========================================================================
// Fixtures
// =========================================================================

/// Maria in room 204 at Hotel Sol, speaking Spanish.
#[must_use]
pub fn maria() -> GuestIdentity {
    GuestIdentity {
        id: "guest-1".into(),
        name: "Maria".into(),
        room_number: "204".into(),
        language: LanguageCode::Es,
        hotel_name: "Hotel Sol".into(),
        hotel_languages: vec!["en".into(), "es".into()],
    }
}

#[must_use]
pub fn hotel_sol() -> HotelConfig {
    HotelConfig {
        name: "Hotel Sol".into(),
        supported_languages: vec!["en".into(), "es".into()],
        default_language: LanguageCode::En,
    }
}

/// Persistence over a fresh in-memory jar, optionally with consent granted.
#[must_use]
pub fn memory_persistence(consent: bool) -> GuestPersistence {
    let persistence = GuestPersistence::new(Arc::new(MemoryCookieJar::new()));
    if consent {
        persistence.grant_consent().unwrap();
    }
    persistence
}

/// Serve `router` on an ephemeral local port and return its base URL.
pub async fn spawn_server(router: axum::Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    format!("http://{addr}")
}

// =========================================================================
// MockAuth
// =========================================================================

#[derive(Default)]
pub struct MockAuth {
    pub session: Mutex<Option<AuthSession>>,
    pub fail_current: bool,
    pub fail_sign_in: bool,
    pub fail_sign_out: bool,
    pub sign_in_calls: AtomicUsize,
    pub sign_out_calls: AtomicUsize,
}

impl MockAuth {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A mock already holding a session for `user_id`.
    #[must_use]
    pub fn signed_in(user_id: &str) -> Self {
        let auth = Self::new();
        *auth.session.lock().unwrap() = Some(session_for(user_id));
        auth
    }

    #[must_use]
    pub fn has_session(&self) -> bool {
        self.session.lock().unwrap().is_some()
    }

    pub fn sign_out_count(&self) -> usize {
        self.sign_out_calls.load(Ordering::SeqCst)
    }

    pub fn sign_in_count(&self) -> usize {
        self.sign_in_calls.load(Ordering::SeqCst)
    }
}

fn session_for(user_id: &str) -> AuthSession {
    AuthSession { access_token: format!("token-{user_id}"), user: AuthUser { id: user_id.into() } }
}

#[async_trait::async_trait]
impl AuthBackend for MockAuth {
    async fn current_session(&self) -> Result<Option<AuthSession>, BackendError> {
        if self.fail_current {
            return Err(BackendError::Request("auth unreachable".into()));
        }
        Ok(self.session.lock().unwrap().clone())
    }

    async fn sign_in_anonymously(&self) -> Result<AuthUser, BackendError> {
        self.sign_in_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_sign_in {
            return Err(BackendError::Response { status: 422, body: "anonymous sign-ins are disabled".into() });
        }
        let session = session_for("user-1");
        let user = session.user.clone();
        *self.session.lock().unwrap() = Some(session);
        Ok(user)
    }

    async fn sign_out(&self) -> Result<(), BackendError> {
        self.sign_out_calls.fetch_add(1, Ordering::SeqCst);
        self.session.lock().unwrap().take();
        if self.fail_sign_out {
            return Err(BackendError::Request("logout failed".into()));
        }
        Ok(())
    }
}

// =========================================================================
// MockData
// =========================================================================

pub struct MockData {
    /// `None` makes every hotel fetch fail.
    pub hotel: Option<HotelConfig>,
    pub fail_insert: bool,
    pub inserted: Mutex<Vec<NewGuest>>,
}

impl MockData {
    #[must_use]
    pub fn new(hotel: Option<HotelConfig>) -> Self {
        Self { hotel, fail_insert: false, inserted: Mutex::new(Vec::new()) }
    }

    #[must_use]
    pub fn inserted(&self) -> Vec<NewGuest> {
        self.inserted.lock().unwrap().clone()
    }
}

#[async_trait::async_trait]
impl DataBackend for MockData {
    async fn fetch_hotel(&self, hotel_id: &str) -> Result<HotelConfig, BackendError> {
        self.hotel
            .clone()
            .ok_or_else(|| BackendError::Response { status: 406, body: format!("no hotel {hotel_id}") })
    }

    async fn insert_guest(&self, guest: &NewGuest) -> Result<GuestRecord, BackendError> {
        if self.fail_insert {
            return Err(BackendError::Response { status: 403, body: "row-level security".into() });
        }
        self.inserted.lock().unwrap().push(guest.clone());
        Ok(GuestRecord { id: "guest-1".into() })
    }
}

// =========================================================================
// MockChat
// =========================================================================

pub enum MockReply {
    Reply(String),
    Fail(ChatError),
    /// Reply only after the delay; used to trip deadlines and cancellation.
    Slow(Duration, String),
}

pub struct MockChat {
    reply: Mutex<Option<MockReply>>,
    pub requests: Mutex<Vec<(Option<String>, ChatRequest)>>,
}

impl MockChat {
    #[must_use]
    pub fn new(reply: MockReply) -> Self {
        Self { reply: Mutex::new(Some(reply)), requests: Mutex::new(Vec::new()) }
    }

    #[must_use]
    pub fn replying(text: &str) -> Self {
        Self::new(MockReply::Reply(text.into()))
    }

    /// Every captured `(token, request)` pair, in call order.
    #[must_use]
    pub fn requests(&self) -> Vec<(Option<String>, ChatRequest)> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait::async_trait]
impl ChatEndpoint for MockChat {
    async fn send(&self, token: Option<&str>, request: &ChatRequest) -> Result<String, ChatError> {
        self.requests
            .lock()
            .unwrap()
            .push((token.map(str::to_string), request.clone()));
        let reply = self.reply.lock().unwrap().take();
        match reply {
            Some(MockReply::Reply(text)) => Ok(text),
            Some(MockReply::Fail(e)) => Err(e),
            Some(MockReply::Slow(delay, text)) => {
                tokio::time::sleep(delay).await;
                Ok(text)
            }
            None => Ok("done".into()),
        }
    }
}

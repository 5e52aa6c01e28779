//! Hosted backend seams: authentication and guest/hotel data.
//!
//! ARCHITECTURE
//! ============
//! Signup and bootstrap only talk to [`AuthBackend`] and [`DataBackend`].
//! The production implementation is [`supabase::SupabaseClient`]; tests plug
//! in hand-written mocks.

pub mod supabase;

use serde::{Deserialize, Serialize};

use crate::model::HotelConfig;

pub use supabase::SupabaseClient;

// =============================================================================
// ERROR
// =============================================================================

#[derive(Debug, thiserror::Error)]
pub enum BackendError {
    /// The HTTP request failed before a response arrived.
    #[error("request failed: {0}")]
    Request(String),

    /// The backend returned a non-success status.
    #[error("backend returned status {status}: {body}")]
    Response { status: u16, body: String },

    /// The response body did not have the expected shape.
    #[error("response parse failed: {0}")]
    Parse(String),

    /// The underlying HTTP client could not be constructed.
    #[error("HTTP client build failed: {0}")]
    HttpClientBuild(String),

    /// The operation needs an authenticated session and there is none.
    #[error("no active session")]
    NoSession,
}

// =============================================================================
// AUTH TYPES
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthUser {
    pub id: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthSession {
    pub access_token: String,
    pub user: AuthUser,
}

// =============================================================================
// DATA TYPES
// =============================================================================

/// Guest row to insert, scoped to a hotel and the authenticated user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NewGuest {
    pub user_id: String,
    pub hotel_id: String,
    pub last_name: String,
    pub room_number: String,
    pub language: String,
}

/// Guest row as returned by the data backend. Other columns are ignored.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct GuestRecord {
    pub id: String,
}

// =============================================================================
// TRAITS
// =============================================================================

#[async_trait::async_trait]
pub trait AuthBackend: Send + Sync {
    /// The session this client currently holds, if any.
    ///
    /// # Errors
    ///
    /// Returns a [`BackendError`] if the session cannot be determined.
    async fn current_session(&self) -> Result<Option<AuthSession>, BackendError>;

    /// Create a new anonymous user and adopt its session.
    ///
    /// # Errors
    ///
    /// Returns a [`BackendError`] if the backend rejects the sign-in.
    async fn sign_in_anonymously(&self) -> Result<AuthUser, BackendError>;

    /// Terminate the current session server-side and forget it locally.
    ///
    /// # Errors
    ///
    /// Returns a [`BackendError`] if the backend call fails. The local
    /// session is dropped either way.
    async fn sign_out(&self) -> Result<(), BackendError>;
}

#[async_trait::async_trait]
pub trait DataBackend: Send + Sync {
    /// Fetch a hotel's name and language settings.
    ///
    /// # Errors
    ///
    /// Returns a [`BackendError`] if the hotel is missing or the call fails.
    async fn fetch_hotel(&self, hotel_id: &str) -> Result<HotelConfig, BackendError>;

    /// Insert a guest record and return the created row.
    ///
    /// # Errors
    ///
    /// Returns a [`BackendError`] if the insert is rejected or the call fails.
    async fn insert_guest(&self, guest: &NewGuest) -> Result<GuestRecord, BackendError>;
}

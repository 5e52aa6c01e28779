//! Supabase-compatible backend client (GoTrue auth + PostgREST data).
//!
//! Thin HTTP wrapper. Response parsing is pure (`parse_*`) for testability.
//! The auth session lives in-process and, when a jar is attached, is mirrored
//! into it so a restarted client still sees a session to terminate.

use std::sync::{Arc, RwLock};
use std::time::Duration;

use tracing::{debug, info, warn};

use super::{AuthBackend, AuthSession, AuthUser, BackendError, DataBackend, GuestRecord, NewGuest};
use crate::config::ConciergeConfig;
use crate::i18n::LanguageCode;
use crate::model::HotelConfig;
use crate::store::CookieStore;

pub const AUTH_SESSION_COOKIE: &str = "sb_auth_token";

const REQUEST_TIMEOUT_SECS: u64 = 30;
const CONNECT_TIMEOUT_SECS: u64 = 10;
const SINGLE_OBJECT: &str = "application/vnd.pgrst.object+json";
const DEFAULT_SESSION_TTL_SECS: u64 = 3600;

// =============================================================================
// CLIENT
// =============================================================================

pub struct SupabaseClient {
    http: reqwest::Client,
    base_url: String,
    anon_key: String,
    session: RwLock<Option<AuthSession>>,
    jar: Option<Arc<dyn CookieStore>>,
}

impl SupabaseClient {
    /// # Errors
    ///
    /// Returns [`BackendError::HttpClientBuild`] if the HTTP client fails to build.
    pub fn new(base_url: impl Into<String>, anon_key: impl Into<String>) -> Result<Self, BackendError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .connect_timeout(Duration::from_secs(CONNECT_TIMEOUT_SECS))
            .build()
            .map_err(|e| BackendError::HttpClientBuild(e.to_string()))?;
        Ok(Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            anon_key: anon_key.into(),
            session: RwLock::new(None),
            jar: None,
        })
    }

    /// # Errors
    ///
    /// Returns [`BackendError::HttpClientBuild`] if the HTTP client fails to build.
    pub fn from_config(config: &ConciergeConfig) -> Result<Self, BackendError> {
        Self::new(config.supabase_url.clone(), config.anon_key.clone())
    }

    /// Mirror the auth session into `jar`, restoring any session already there.
    #[must_use]
    pub fn with_session_jar(mut self, jar: Arc<dyn CookieStore>) -> Self {
        if let Some(raw) = jar.read(AUTH_SESSION_COOKIE) {
            match serde_json::from_str::<AuthSession>(&raw) {
                Ok(session) => {
                    debug!(user_id = %session.user.id, "restored auth session from jar");
                    *self
                        .session
                        .get_mut()
                        .unwrap_or_else(std::sync::PoisonError::into_inner) = Some(session);
                }
                Err(e) => debug!(error = %e, "ignoring malformed auth session cookie"),
            }
        }
        self.jar = Some(jar);
        self
    }

    fn session(&self) -> Option<AuthSession> {
        self.session
            .read()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .clone()
    }

    fn set_session(&self, session: Option<AuthSession>, ttl: Duration) {
        if let Some(jar) = &self.jar {
            let result = match &session {
                Some(s) => serde_json::to_string(s)
                    .map_err(crate::store::StoreError::from)
                    .and_then(|raw| jar.write(AUTH_SESSION_COOKIE, &raw, ttl)),
                None => jar.erase(AUTH_SESSION_COOKIE),
            };
            if let Err(e) = result {
                warn!(error = %e, "failed to mirror auth session into jar");
            }
        }
        *self
            .session
            .write()
            .unwrap_or_else(std::sync::PoisonError::into_inner) = session;
    }

    /// Bearer for data calls: the user's token when signed in, else the anon key.
    fn bearer(&self) -> String {
        self.session()
            .map_or_else(|| self.anon_key.clone(), |s| s.access_token)
    }

    async fn send(&self, request: reqwest::RequestBuilder) -> Result<String, BackendError> {
        let response = request
            .header("apikey", &self.anon_key)
            .send()
            .await
            .map_err(|e| BackendError::Request(e.to_string()))?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| BackendError::Request(e.to_string()))?;

        if !status.is_success() {
            return Err(BackendError::Response { status: status.as_u16(), body: text });
        }
        Ok(text)
    }
}

#[async_trait::async_trait]
impl AuthBackend for SupabaseClient {
    async fn current_session(&self) -> Result<Option<AuthSession>, BackendError> {
        Ok(self.session())
    }

    async fn sign_in_anonymously(&self) -> Result<AuthUser, BackendError> {
        let request = self
            .http
            .post(format!("{}/auth/v1/signup", self.base_url))
            .json(&serde_json::json!({ "data": {} }));
        let text = self.send(request).await?;
        let (session, ttl) = parse_auth_response(&text)?;
        info!(user_id = %session.user.id, "anonymous sign-in complete");
        let user = session.user.clone();
        self.set_session(Some(session), ttl);
        Ok(user)
    }

    async fn sign_out(&self) -> Result<(), BackendError> {
        let Some(session) = self.session() else {
            return Ok(());
        };
        self.set_session(None, Duration::ZERO);

        let request = self
            .http
            .post(format!("{}/auth/v1/logout", self.base_url))
            .query(&[("scope", "global")])
            .bearer_auth(&session.access_token);
        match self.send(request).await {
            Ok(_) => {
                info!(user_id = %session.user.id, "signed out");
                Ok(())
            }
            // Token already revoked or expired: nothing left to terminate.
            Err(BackendError::Response { status: 401 | 403 | 404, .. }) => Ok(()),
            Err(e) => Err(e),
        }
    }
}

#[async_trait::async_trait]
impl DataBackend for SupabaseClient {
    async fn fetch_hotel(&self, hotel_id: &str) -> Result<HotelConfig, BackendError> {
        let request = self
            .http
            .get(format!("{}/rest/v1/hotels", self.base_url))
            .query(&[("id", format!("eq.{hotel_id}").as_str()), ("select", "name,languages,default_language")])
            .header("Accept", SINGLE_OBJECT)
            .bearer_auth(self.bearer());
        let text = self.send(request).await?;
        parse_hotel(&text)
    }

    async fn insert_guest(&self, guest: &NewGuest) -> Result<GuestRecord, BackendError> {
        let request = self
            .http
            .post(format!("{}/rest/v1/guests", self.base_url))
            .query(&[("select", "*")])
            .header("Accept", SINGLE_OBJECT)
            .header("Prefer", "return=representation")
            .bearer_auth(self.bearer())
            .json(guest);
        let text = self.send(request).await?;
        parse_guest_record(&text)
    }
}

// =============================================================================
// WIRE TYPES
// =============================================================================

#[derive(serde::Deserialize)]
struct TokenResponse {
    access_token: String,
    #[serde(default)]
    expires_in: Option<u64>,
    user: UserResponse,
}

#[derive(serde::Deserialize)]
struct UserResponse {
    id: String,
}

#[derive(serde::Deserialize)]
struct HotelRow {
    name: String,
    #[serde(default)]
    languages: Option<Vec<String>>,
    #[serde(default)]
    default_language: Option<String>,
}

// =============================================================================
// PARSING
// =============================================================================

fn parse_auth_response(json: &str) -> Result<(AuthSession, Duration), BackendError> {
    let token: TokenResponse = serde_json::from_str(json).map_err(|e| BackendError::Parse(e.to_string()))?;
    if token.access_token.is_empty() {
        return Err(BackendError::Parse("empty access_token".into()));
    }
    let ttl = Duration::from_secs(token.expires_in.unwrap_or(DEFAULT_SESSION_TTL_SECS));
    Ok((AuthSession { access_token: token.access_token, user: AuthUser { id: token.user.id } }, ttl))
}

fn parse_hotel(json: &str) -> Result<HotelConfig, BackendError> {
    let row: HotelRow = serde_json::from_str(json).map_err(|e| BackendError::Parse(e.to_string()))?;
    Ok(HotelConfig {
        name: row.name,
        supported_languages: row.languages.unwrap_or_default(),
        default_language: row
            .default_language
            .as_deref()
            .map_or(LanguageCode::DEFAULT, LanguageCode::parse_or_default),
    })
}

fn parse_guest_record(json: &str) -> Result<GuestRecord, BackendError> {
    serde_json::from_str(json).map_err(|e| BackendError::Parse(e.to_string()))
}

#[cfg(test)]
#[path = "supabase_test.rs"]
mod tests;

//! Hotel concierge guest client.
//!
//! Establishes who the guest is (signup or a restored session), keeps that
//! identity across restarts when cookies are allowed, and drives a
//! one-request-per-message chat with the hotel's remote concierge handler.

pub mod app;
pub mod backend;
pub mod chat;
pub mod config;
pub mod i18n;
pub mod model;
pub mod session;
pub mod signup;
pub mod store;

#[cfg(test)]
pub(crate) mod test_helpers;

pub use app::{AppError, ConciergeApp};
pub use config::ConciergeConfig;
pub use i18n::LanguageCode;
pub use model::GuestIdentity;

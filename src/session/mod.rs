//! Who the current guest is, and how that is re-established on start.
//!
//! ARCHITECTURE
//! ============
//! `SessionContext` is the single holder of the signed-in guest. It is
//! created empty, filled by bootstrap or signup, mutated only through
//! `update_language`, and emptied on sign-out. Chat and signup receive it
//! explicitly instead of reaching for global state.

pub mod bootstrap;
pub mod context;

pub use bootstrap::bootstrap;
pub use context::SessionContext;

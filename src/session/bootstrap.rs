use tracing::{debug, info, warn};

use crate::backend::AuthBackend;
use crate::model::GuestIdentity;
use crate::store::GuestPersistence;

/// Re-establish the guest on start.
///
/// A persisted guest record wins. Without one, any auth session still held
/// is stale (its guest record is gone), so it is terminated server-side.
/// Auth failures are logged and swallowed; bootstrap never fails.
pub async fn bootstrap(persistence: &GuestPersistence, auth: &dyn AuthBackend) -> Option<GuestIdentity> {
    if let Some(guest) = persistence.load_guest() {
        info!(guest_id = %guest.id, "restored guest from persisted session");
        return Some(guest);
    }

    match auth.current_session().await {
        Ok(Some(session)) => {
            info!(user_id = %session.user.id, "terminating stale auth session");
            if let Err(e) = auth.sign_out().await {
                warn!(error = %e, "failed to terminate stale auth session");
            }
        }
        Ok(None) => debug!("no persisted guest and no auth session"),
        Err(e) => warn!(error = %e, "could not read auth session during bootstrap"),
    }
    None
}

#[cfg(test)]
#[path = "bootstrap_test.rs"]
mod tests;

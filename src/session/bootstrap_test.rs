use super::*;
use crate::store::persistence::{GUEST_COOKIE, GUEST_TTL};
use crate::test_helpers::{MockAuth, maria, memory_persistence};

#[tokio::test]
async fn persisted_guest_is_adopted() {
    let persistence = memory_persistence(true);
    persistence.save_guest(&maria()).unwrap();
    let auth = MockAuth::signed_in("user-1");

    let guest = bootstrap(&persistence, &auth).await;

    assert_eq!(guest, Some(maria()));
    assert_eq!(auth.sign_out_count(), 0);
    assert!(auth.has_session());
}

#[tokio::test]
async fn stale_auth_session_is_terminated() {
    let persistence = memory_persistence(true);
    let auth = MockAuth::signed_in("user-1");

    assert_eq!(bootstrap(&persistence, &auth).await, None);
    assert_eq!(auth.sign_out_count(), 1);
    assert!(!auth.has_session());
}

#[tokio::test]
async fn malformed_cookie_is_treated_as_absent() {
    let persistence = memory_persistence(true);
    persistence.jar().write(GUEST_COOKIE, "{not json", GUEST_TTL).unwrap();
    let auth = MockAuth::signed_in("user-1");

    assert_eq!(bootstrap(&persistence, &auth).await, None);
    assert_eq!(auth.sign_out_count(), 1);
}

#[tokio::test]
async fn nothing_to_restore_and_no_session() {
    let persistence = memory_persistence(false);
    let auth = MockAuth::new();

    assert_eq!(bootstrap(&persistence, &auth).await, None);
    assert_eq!(auth.sign_out_count(), 0);
}

#[tokio::test]
async fn auth_errors_are_swallowed() {
    let persistence = memory_persistence(false);
    let auth = MockAuth { fail_current: true, ..MockAuth::default() };
    assert_eq!(bootstrap(&persistence, &auth).await, None);

    let auth = MockAuth { fail_sign_out: true, ..MockAuth::signed_in("user-1") };
    assert_eq!(bootstrap(&persistence, &auth).await, None);
    assert_eq!(auth.sign_out_count(), 1);
}

#[tokio::test]
async fn persist_then_bootstrap_round_trips_identity() {
    let persistence = memory_persistence(true);
    let mut guest = maria();
    guest.hotel_languages = vec!["es".into(), "en".into(), "fr".into()];
    assert!(persistence.save_guest(&guest).unwrap());

    let restored = bootstrap(&persistence, &MockAuth::new()).await;
    assert_eq!(restored, Some(guest));
}

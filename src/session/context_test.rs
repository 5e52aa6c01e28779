use super::*;
use crate::test_helpers::maria;

#[test]
fn new_context_is_signed_out() {
    let ctx = SessionContext::new();
    assert!(!ctx.is_signed_in());
    assert!(ctx.guest().is_none());
}

#[test]
fn sign_in_replaces_guest() {
    let mut ctx = SessionContext::new();
    ctx.sign_in(maria());
    let mut other = maria();
    other.name = "Ana".into();
    ctx.sign_in(other);
    assert_eq!(ctx.guest().unwrap().name, "Ana");
}

#[test]
fn update_language_changes_only_language() {
    let mut ctx = SessionContext::new();
    ctx.sign_in(maria());
    assert!(ctx.update_language(LanguageCode::It));
    let guest = ctx.guest().unwrap();
    assert_eq!(guest.language, LanguageCode::It);
    assert_eq!(guest.room_number, "204");
}

#[test]
fn update_language_signed_out_is_false() {
    let mut ctx = SessionContext::new();
    assert!(!ctx.update_language(LanguageCode::It));
    assert!(!ctx.is_signed_in());
}

#[test]
fn sign_out_returns_guest_and_clears() {
    let mut ctx = SessionContext::new();
    ctx.sign_in(maria());
    assert_eq!(ctx.sign_out(), Some(maria()));
    assert!(!ctx.is_signed_in());
}

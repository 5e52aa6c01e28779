use super::*;
use crate::store::MemoryCookieJar;
use crate::test_helpers::spawn_server;
use axum::Json;
use axum::extract::{Query, RawQuery};
use axum::http::{HeaderMap, StatusCode};
use axum::response::IntoResponse;
use axum::routing::{get, post};
use serde_json::{Value, json};
use std::collections::HashMap;

fn header(headers: &HeaderMap, name: &str) -> String {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_string()
}

// =============================================================================
// parse_auth_response
// =============================================================================

#[test]
fn parse_auth_response_reads_token_and_user() {
    let (session, ttl) =
        parse_auth_response(r#"{"access_token":"tok","expires_in":600,"user":{"id":"u-1","is_anonymous":true}}"#)
            .unwrap();
    assert_eq!(session.access_token, "tok");
    assert_eq!(session.user.id, "u-1");
    assert_eq!(ttl, Duration::from_secs(600));
}

#[test]
fn parse_auth_response_defaults_ttl() {
    let (_, ttl) = parse_auth_response(r#"{"access_token":"tok","user":{"id":"u-1"}}"#).unwrap();
    assert_eq!(ttl, Duration::from_secs(DEFAULT_SESSION_TTL_SECS));
}

#[test]
fn parse_auth_response_rejects_empty_token() {
    let err = parse_auth_response(r#"{"access_token":"","user":{"id":"u-1"}}"#).unwrap_err();
    assert!(matches!(err, BackendError::Parse(_)));
}

#[test]
fn parse_auth_response_rejects_missing_user() {
    assert!(matches!(parse_auth_response(r#"{"access_token":"tok"}"#), Err(BackendError::Parse(_))));
}

// =============================================================================
// parse_hotel
// =============================================================================

#[test]
fn parse_hotel_maps_row() {
    let hotel = parse_hotel(r#"{"name":"Hotel Sol","languages":["en","es"],"default_language":"es"}"#).unwrap();
    assert_eq!(hotel.name, "Hotel Sol");
    assert_eq!(hotel.supported_languages, vec!["en".to_string(), "es".to_string()]);
    assert_eq!(hotel.default_language, LanguageCode::Es);
}

#[test]
fn parse_hotel_tolerates_nulls_and_unknown_default() {
    let hotel = parse_hotel(r#"{"name":"Hotel Sol","languages":null,"default_language":"xx"}"#).unwrap();
    assert!(hotel.supported_languages.is_empty());
    assert_eq!(hotel.default_language, LanguageCode::En);

    let hotel = parse_hotel(r#"{"name":"Hotel Sol"}"#).unwrap();
    assert_eq!(hotel.default_language, LanguageCode::En);
}

#[test]
fn parse_hotel_rejects_missing_name() {
    assert!(matches!(parse_hotel(r#"{"languages":[]}"#), Err(BackendError::Parse(_))));
}

#[test]
fn parse_guest_record_reads_id() {
    let record = parse_guest_record(r#"{"id":"g-1","user_id":"u-1","hotel_id":"h-1","room_number":"204"}"#).unwrap();
    assert_eq!(record, GuestRecord { id: "g-1".into() });
}

// =============================================================================
// HTTP round trips
// =============================================================================

fn gotrue_router() -> axum::Router {
    axum::Router::new()
        .route(
            "/auth/v1/signup",
            post(|headers: HeaderMap, Json(body): Json<Value>| async move {
                assert_eq!(header(&headers, "apikey"), "anon");
                assert_eq!(body, json!({ "data": {} }));
                Json(json!({
                    "access_token": "tok-1",
                    "expires_in": 3600,
                    "user": { "id": "user-1" }
                }))
            }),
        )
        .route(
            "/auth/v1/logout",
            post(|headers: HeaderMap, RawQuery(query): RawQuery| async move {
                assert_eq!(query.as_deref(), Some("scope=global"));
                if header(&headers, "authorization") == "Bearer tok-1" {
                    StatusCode::NO_CONTENT
                } else {
                    StatusCode::UNAUTHORIZED
                }
            }),
        )
}

#[tokio::test]
async fn sign_in_then_sign_out_round_trip() {
    let base = spawn_server(gotrue_router()).await;
    let client = SupabaseClient::new(format!("{base}/"), "anon").unwrap();

    assert_eq!(client.current_session().await.unwrap(), None);

    let user = client.sign_in_anonymously().await.unwrap();
    assert_eq!(user.id, "user-1");
    let session = client.current_session().await.unwrap().unwrap();
    assert_eq!(session.access_token, "tok-1");

    client.sign_out().await.unwrap();
    assert_eq!(client.current_session().await.unwrap(), None);
}

#[tokio::test]
async fn sign_out_without_session_is_noop() {
    let client = SupabaseClient::new("http://127.0.0.1:1", "anon").unwrap();
    client.sign_out().await.unwrap();
}

#[tokio::test]
async fn sign_out_with_revoked_token_succeeds() {
    let base = spawn_server(gotrue_router()).await;
    let jar: Arc<dyn CookieStore> = Arc::new(MemoryCookieJar::new());
    let stale = AuthSession { access_token: "revoked".into(), user: AuthUser { id: "user-0".into() } };
    jar.write(AUTH_SESSION_COOKIE, &serde_json::to_string(&stale).unwrap(), Duration::from_secs(60))
        .unwrap();
    let client = SupabaseClient::new(&base, "anon").unwrap().with_session_jar(Arc::clone(&jar));

    client.sign_out().await.unwrap();
    assert_eq!(client.current_session().await.unwrap(), None);
    assert!(jar.read(AUTH_SESSION_COOKIE).is_none());
}

#[tokio::test]
async fn sign_in_failure_surfaces_status() {
    let router = axum::Router::new().route(
        "/auth/v1/signup",
        post(|| async { (StatusCode::UNPROCESSABLE_ENTITY, "Anonymous sign-ins are disabled") }),
    );
    let base = spawn_server(router).await;
    let client = SupabaseClient::new(&base, "anon").unwrap();

    let err = client.sign_in_anonymously().await.unwrap_err();
    assert!(matches!(err, BackendError::Response { status: 422, .. }));
    assert_eq!(client.current_session().await.unwrap(), None);
}

#[tokio::test]
async fn session_is_mirrored_into_jar_and_restored() {
    let base = spawn_server(gotrue_router()).await;
    let jar: Arc<dyn CookieStore> = Arc::new(MemoryCookieJar::new());

    let client = SupabaseClient::new(&base, "anon").unwrap().with_session_jar(Arc::clone(&jar));
    client.sign_in_anonymously().await.unwrap();
    assert!(jar.read(AUTH_SESSION_COOKIE).is_some());

    let restarted = SupabaseClient::new(&base, "anon").unwrap().with_session_jar(Arc::clone(&jar));
    let session = restarted.current_session().await.unwrap().unwrap();
    assert_eq!(session.user.id, "user-1");
}

#[tokio::test]
async fn malformed_jar_session_is_ignored() {
    let jar: Arc<dyn CookieStore> = Arc::new(MemoryCookieJar::new());
    jar.write(AUTH_SESSION_COOKIE, "garbage", Duration::from_secs(60)).unwrap();
    let client = SupabaseClient::new("http://127.0.0.1:1", "anon").unwrap().with_session_jar(jar);
    assert_eq!(client.current_session().await.unwrap(), None);
}

#[tokio::test]
async fn fetch_hotel_queries_single_object() {
    let router = axum::Router::new().route(
        "/rest/v1/hotels",
        get(|headers: HeaderMap, Query(params): Query<HashMap<String, String>>| async move {
            assert_eq!(params.get("id").map(String::as_str), Some("eq.hotel-1"));
            assert_eq!(params.get("select").map(String::as_str), Some("name,languages,default_language"));
            assert_eq!(header(&headers, "accept"), SINGLE_OBJECT);
            assert_eq!(header(&headers, "authorization"), "Bearer anon");
            Json(json!({ "name": "Hotel Sol", "languages": ["en", "es"], "default_language": "es" }))
        }),
    );
    let base = spawn_server(router).await;
    let client = SupabaseClient::new(&base, "anon").unwrap();

    let hotel = client.fetch_hotel("hotel-1").await.unwrap();
    assert_eq!(hotel.name, "Hotel Sol");
    assert_eq!(hotel.default_language, LanguageCode::Es);
}

#[tokio::test]
async fn fetch_hotel_missing_row_is_error() {
    let router = axum::Router::new().route(
        "/rest/v1/hotels",
        get(|| async { (StatusCode::NOT_ACCEPTABLE, r#"{"code":"PGRST116"}"#) }),
    );
    let base = spawn_server(router).await;
    let client = SupabaseClient::new(&base, "anon").unwrap();

    let err = client.fetch_hotel("missing").await.unwrap_err();
    assert!(matches!(err, BackendError::Response { status: 406, .. }));
}

#[tokio::test]
async fn insert_guest_uses_user_token_and_returns_row() {
    let router = gotrue_router().route(
        "/rest/v1/guests",
        post(|headers: HeaderMap, Json(body): Json<Value>| async move {
            assert_eq!(header(&headers, "prefer"), "return=representation");
            assert_eq!(header(&headers, "authorization"), "Bearer tok-1");
            assert_eq!(body["user_id"], "user-1");
            assert_eq!(body["last_name"], "Maria");
            let mut row = body.clone();
            row["id"] = json!("guest-9");
            (StatusCode::CREATED, Json(row)).into_response()
        }),
    );
    let base = spawn_server(router).await;
    let client = SupabaseClient::new(&base, "anon").unwrap();
    let user = client.sign_in_anonymously().await.unwrap();

    let record = client
        .insert_guest(&NewGuest {
            user_id: user.id,
            hotel_id: "hotel-1".into(),
            last_name: "Maria".into(),
            room_number: "204".into(),
            language: "es".into(),
        })
        .await
        .unwrap();
    assert_eq!(record.id, "guest-9");
}

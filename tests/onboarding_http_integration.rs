//! Integration tests for the onboarding HTTP surface.
//!
//! These tests drive the full router through `tower::ServiceExt::oneshot`:
//! 1. The onboard → refresh → return journey against the mock platform
//! 2. Webhook intake with real HMAC verification by the Stripe adapter
//! 3. Session binding behaviour under concurrent onboarding

use std::sync::Arc;

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::Router;
use hmac::{Hmac, Mac};
use sha2::Sha256;
use tower::ServiceExt;

use partner_onboarding::adapters::http::{onboarding_app, OnboardingAppState};
use partner_onboarding::adapters::stripe::hex_encode;
use partner_onboarding::adapters::{
    InMemorySessionStore, MockConnectPlatform, StripeConfig, StripeConnectAdapter,
};
use partner_onboarding::config::PartnerConfig;
use partner_onboarding::domain::onboarding::{Requirements, SessionId};
use partner_onboarding::ports::SessionStore;

// =============================================================================
// Test Infrastructure
// =============================================================================

const WEBHOOK_SECRET: &str = "whsec_integration";

fn mock_app(mock: &MockConnectPlatform, sessions: &InMemorySessionStore) -> Router {
    onboarding_app(OnboardingAppState::new(
        Arc::new(mock.clone()),
        Arc::new(sessions.clone()),
        PartnerConfig::default(),
    ))
}

fn stripe_app() -> Router {
    // Base URL points nowhere; webhook verification never leaves the process.
    let config = StripeConfig::new("sk_test_integration", WEBHOOK_SECRET)
        .with_base_url("http://127.0.0.1:9");
    let adapter = StripeConnectAdapter::new(config).unwrap();
    onboarding_app(OnboardingAppState::new(
        Arc::new(adapter),
        Arc::new(InMemorySessionStore::new()),
        PartnerConfig::default(),
    ))
}

fn sign(secret: &str, timestamp: i64, payload: &str) -> String {
    let mut mac = Hmac::<Sha256>::new_from_slice(secret.as_bytes()).unwrap();
    mac.update(format!("{}.{}", timestamp, payload).as_bytes());
    format!(
        "t={},v1={}",
        timestamp,
        hex_encode(&mac.finalize().into_bytes())
    )
}

fn webhook_request(payload: &str, signature: Option<String>) -> Request<Body> {
    let mut builder = Request::builder()
        .method("POST")
        .uri("/stripe/webhook")
        .header(header::CONTENT_TYPE, "application/json");
    if let Some(signature) = signature {
        builder = builder.header("Stripe-Signature", signature);
    }
    builder.body(Body::from(payload.to_string())).unwrap()
}

async fn body_string(response: axum::response::Response) -> String {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}

fn session_from_set_cookie(response: &axum::response::Response) -> SessionId {
    response
        .headers()
        .get(header::SET_COOKIE)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("partner_session="))
        .and_then(|v| v.split(';').next())
        .unwrap()
        .parse()
        .unwrap()
}

fn onboard_request(session: Option<SessionId>) -> Request<Body> {
    let mut builder = Request::builder().method("POST").uri("/stripe/onboard");
    if let Some(session) = session {
        builder = builder.header(header::COOKIE, format!("partner_session={}", session));
    }
    builder.body(Body::empty()).unwrap()
}

fn with_session(uri: &str, session: SessionId) -> Request<Body> {
    Request::builder()
        .uri(uri)
        .header(header::COOKIE, format!("partner_session={}", session))
        .body(Body::empty())
        .unwrap()
}

const ACCOUNT_UPDATED: &str = r#"{"id":"evt_int","type":"account.updated","created":1704067200,"livemode":false,"data":{"object":{"id":"acct_123","requirements":{"currently_due":[],"eventually_due":[]}}}}"#;

// =============================================================================
// Onboarding Journey
// =============================================================================

#[tokio::test]
async fn onboard_refresh_return_journey_uses_session_binding() {
    let mock = MockConnectPlatform::new();
    mock.set_next_account_id("acct_123");
    mock.set_initial_requirements(Requirements {
        currently_due: vec!["individual.id_number".to_string()],
        eventually_due: vec![],
    });
    let sessions = InMemorySessionStore::new();

    // 1. Start onboarding
    let started = mock_app(&mock, &sessions)
        .oneshot(onboard_request(None))
        .await
        .unwrap();
    assert_eq!(started.status(), StatusCode::FOUND);
    let session = session_from_set_cookie(&started);
    let first_link = started.headers()[header::LOCATION].to_str().unwrap().to_string();

    // 2. Link expired: refresh via the session alone
    let refreshed = mock_app(&mock, &sessions)
        .oneshot(with_session("/stripe/refresh", session))
        .await
        .unwrap();
    assert_eq!(refreshed.status(), StatusCode::FOUND);
    let second_link = refreshed.headers()[header::LOCATION].to_str().unwrap().to_string();
    assert_ne!(first_link, second_link);

    // 3. Return while requirements are outstanding
    let pending = mock_app(&mock, &sessions)
        .oneshot(with_session("/stripe/return", session))
        .await
        .unwrap();
    assert_eq!(pending.status(), StatusCode::OK);
    assert!(body_string(pending).await.contains("Onboarding In Progress"));

    // 4. Platform clears requirements; return now reports completion
    mock.set_requirements("acct_123", Requirements::default());
    let done = mock_app(&mock, &sessions)
        .oneshot(with_session("/stripe/return", session))
        .await
        .unwrap();
    let body = body_string(done).await;
    assert!(body.contains("Onboarding Complete!"));
    assert!(body.contains("acct_123"));
}

#[tokio::test]
async fn query_parameter_wins_over_session_binding() {
    let mock = MockConnectPlatform::with_account("acct_query", vec![], vec![]);
    mock.add_account_with_requirements("acct_session", vec!["x".to_string()], vec![]);
    let sessions = InMemorySessionStore::new();
    let session = SessionId::new();
    sessions
        .bind(
            session,
            partner_onboarding::domain::onboarding::AccountId::new("acct_session").unwrap(),
        )
        .await
        .unwrap();

    let response = mock_app(&mock, &sessions)
        .oneshot(with_session("/stripe/return?account_id=acct_query", session))
        .await
        .unwrap();

    let body = body_string(response).await;
    assert!(body.contains("acct_query"));
    assert!(body.contains("Onboarding Complete!"));
}

#[tokio::test]
async fn concurrent_onboarding_on_one_session_keeps_last_binding() {
    let mock = MockConnectPlatform::new();
    let sessions = InMemorySessionStore::new();
    let session = SessionId::new();

    let mut handles = Vec::new();
    for _ in 0..8 {
        let app = mock_app(&mock, &sessions);
        handles.push(tokio::spawn(async move {
            app.oneshot(onboard_request(Some(session))).await.unwrap().status()
        }));
    }
    for handle in handles {
        assert_eq!(handle.await.unwrap(), StatusCode::FOUND);
    }

    assert_eq!(mock.call_count("create_account"), 8);
    assert_eq!(sessions.binding_count().await, 1);
    assert!(sessions.lookup(session).await.unwrap().is_some());
}

// =============================================================================
// Webhook Verification (real HMAC)
// =============================================================================

#[tokio::test]
async fn signed_webhook_is_acknowledged() {
    let signature = sign(WEBHOOK_SECRET, chrono::Utc::now().timestamp(), ACCOUNT_UPDATED);

    let response = stripe_app()
        .oneshot(webhook_request(ACCOUNT_UPDATED, Some(signature)))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_string(response).await, r#"{"received":true}"#);
}

#[tokio::test]
async fn webhook_signed_with_wrong_secret_is_rejected() {
    let signature = sign("whsec_wrong", chrono::Utc::now().timestamp(), ACCOUNT_UPDATED);

    let response = stripe_app()
        .oneshot(webhook_request(ACCOUNT_UPDATED, Some(signature)))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_string(response).await, "Webhook Error: invalid signature");
}

#[tokio::test]
async fn tampered_webhook_body_is_rejected() {
    let signature = sign(WEBHOOK_SECRET, chrono::Utc::now().timestamp(), ACCOUNT_UPDATED);
    let tampered = ACCOUNT_UPDATED.replace("acct_123", "acct_666");

    let response = stripe_app()
        .oneshot(webhook_request(&tampered, Some(signature)))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn replayed_webhook_is_rejected() {
    let stale = chrono::Utc::now().timestamp() - 3600;
    let signature = sign(WEBHOOK_SECRET, stale, ACCOUNT_UPDATED);

    let response = stripe_app()
        .oneshot(webhook_request(ACCOUNT_UPDATED, Some(signature)))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn webhook_without_signature_header_is_rejected() {
    let response = stripe_app()
        .oneshot(webhook_request(ACCOUNT_UPDATED, None))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn signed_unknown_event_is_acknowledged() {
    let payload = r#"{"id":"evt_payout","type":"payout.paid","created":1704067200,"data":{"object":{}}}"#;
    let signature = sign(WEBHOOK_SECRET, chrono::Utc::now().timestamp(), payload);

    let response = stripe_app()
        .oneshot(webhook_request(payload, Some(signature)))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
}

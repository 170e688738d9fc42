// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Trigger-endpoint tests (offline).
//!
//! Verification-token gating, acknowledgment semantics, and the
//! claims-sync decision on admin-record writes.

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
};
use minwon_relay::models::AdminRole;
use tower::ServiceExt;

mod common;

fn post_event(uri: &str, token: Option<&str>, body: &str) -> Request<Body> {
    let mut builder = Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json");

    if let Some(token) = token {
        builder = builder.header("x-events-token", token);
    }

    builder.body(Body::from(body.to_string())).unwrap()
}

#[tokio::test]
async fn trigger_endpoints_require_verification_token() {
    let (app, _) = common::create_test_app();

    let response = app
        .oneshot(post_event(
            "/events/complaint-status",
            None,
            r#"{"before":{},"after":{},"params":{}}"#,
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn trigger_endpoints_reject_wrong_token() {
    let (app, _) = common::create_test_app();

    let response = app
        .oneshot(post_event(
            "/events/admin-written",
            Some("wrong"),
            r#"{"after":{"uid":"u2","role":"admin"},"params":{"uid":"u2"}}"#,
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn unchanged_status_acknowledges_without_dispatch() {
    let (app, state) = common::create_test_app();

    let body = r#"{
        "before": {"ownerUid": "u1", "title": "소음", "status": "pending"},
        "after": {"ownerUid": "u1", "title": "소음", "status": "pending"},
        "params": {"id": "c1"}
    }"#;

    let response = app
        .oneshot(post_event(
            "/events/complaint-status",
            Some(state.config.events_verify_token.as_str()),
            body,
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert!(state.fcm.mock_sent().is_empty());
}

#[tokio::test]
async fn citizen_reply_acknowledges_without_dispatch() {
    let (app, state) = common::create_test_app();

    let body = r#"{
        "after": {"senderRole": "citizen", "message": "추가 문의입니다."},
        "params": {"complaintId": "c1", "replyId": "r1"}
    }"#;

    let response = app
        .oneshot(post_event(
            "/events/reply-added",
            Some(state.config.events_verify_token.as_str()),
            body,
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert!(state.fcm.mock_sent().is_empty());
}

#[tokio::test]
async fn admin_record_creation_syncs_claims() {
    let (app, state) = common::create_test_app();

    let body = r#"{
        "after": {"uid": "u2", "role": "admin"},
        "params": {"uid": "u2"}
    }"#;

    let response = app
        .oneshot(post_event(
            "/events/admin-written",
            Some(state.config.events_verify_token.as_str()),
            body,
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let recorded = state.claims.mock_recorded();
    assert_eq!(recorded.len(), 1);
    assert_eq!(recorded[0].0, "u2");
    assert_eq!(recorded[0].1.role, Some(AdminRole::Admin));
}

#[tokio::test]
async fn admin_record_role_revocation_clears_claims() {
    let (app, state) = common::create_test_app();

    let body = r#"{
        "before": {"uid": "u2", "role": "admin"},
        "after": {"uid": "u2", "role": "pending"},
        "params": {"uid": "u2"}
    }"#;

    let response = app
        .oneshot(post_event(
            "/events/admin-written",
            Some(state.config.events_verify_token.as_str()),
            body,
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let recorded = state.claims.mock_recorded();
    assert_eq!(recorded.len(), 1);
    assert_eq!(recorded[0].0, "u2");
    assert_eq!(recorded[0].1.role, None);
}

#[tokio::test]
async fn unchanged_role_skips_claims_sync() {
    let (app, state) = common::create_test_app();

    let body = r#"{
        "before": {"uid": "u2", "role": "admin", "name": "old"},
        "after": {"uid": "u2", "role": "admin", "name": "new"},
        "params": {"uid": "u2"}
    }"#;

    let response = app
        .oneshot(post_event(
            "/events/admin-written",
            Some(state.config.events_verify_token.as_str()),
            body,
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert!(state.claims.mock_recorded().is_empty());
}

#[tokio::test]
async fn legacy_role_value_revokes_claims() {
    let (app, state) = common::create_test_app();

    // Unknown role strings parse as pending and map to empty claims.
    let body = r#"{
        "before": {"uid": "u2", "role": "superAdmin"},
        "after": {"uid": "u2", "role": "moderator"},
        "params": {"uid": "u2"}
    }"#;

    let response = app
        .oneshot(post_event(
            "/events/admin-written",
            Some(state.config.events_verify_token.as_str()),
            body,
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let recorded = state.claims.mock_recorded();
    assert_eq!(recorded.len(), 1);
    assert_eq!(recorded[0].1.role, None);
}

// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Caller-identity and guard tests for the privileged-operation surface.
//!
//! These run fully offline: the guards reject before the (mock) store is
//! ever touched.

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
};
use minwon_relay::middleware::auth::create_jwt;
use tower::ServiceExt;

mod common;

fn post_json(uri: &str, token: Option<&str>, body: &str) -> Request<Body> {
    let mut builder = Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json");

    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
    }

    builder.body(Body::from(body.to_string())).unwrap()
}

#[tokio::test]
async fn admin_routes_reject_missing_token() {
    let (app, _) = common::create_test_app();

    let response = app
        .oneshot(post_json("/admin/approve", None, r#"{"targetUid":"u2"}"#))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn admin_routes_reject_garbage_token() {
    let (app, _) = common::create_test_app();

    let response = app
        .oneshot(post_json(
            "/admin/approve",
            Some("not.a.jwt"),
            r#"{"targetUid":"u2"}"#,
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn admin_routes_reject_token_signed_with_wrong_key() {
    let (app, _) = common::create_test_app();

    let token = create_jwt("u1", None, Some("superAdmin"), b"wrong_key_wrong_key_wrong!!!")
        .expect("jwt");

    let response = app
        .oneshot(post_json(
            "/admin/approve",
            Some(&token),
            r#"{"targetUid":"u2"}"#,
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn approve_without_super_admin_claim_is_forbidden() {
    let (app, state) = common::create_test_app();

    let token = create_jwt(
        "u1",
        Some("user@example.com"),
        Some("admin"),
        &state.config.jwt_signing_key,
    )
    .expect("jwt");

    let response = app
        .oneshot(post_json(
            "/admin/approve",
            Some(&token),
            r#"{"targetUid":"u2"}"#,
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn approve_without_target_is_bad_request() {
    let (app, state) = common::create_test_app();

    let token = create_jwt(
        "boss",
        Some("boss@example.com"),
        Some("superAdmin"),
        &state.config.jwt_signing_key,
    )
    .expect("jwt");

    let response = app
        .oneshot(post_json("/admin/approve", Some(&token), "{}"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn reject_without_super_admin_claim_is_forbidden() {
    let (app, state) = common::create_test_app();

    // No role claim at all parses as pending.
    let token = create_jwt("u1", None, None, &state.config.jwt_signing_key).expect("jwt");

    let response = app
        .oneshot(post_json(
            "/admin/reject",
            Some(&token),
            r#"{"targetUid":"u2"}"#,
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn health_is_public() {
    let (app, _) = common::create_test_app();

    let response = app
        .oneshot(
            Request::builder()
                .method("GET")
                .uri("/health")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
}

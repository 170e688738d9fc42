// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Trigger endpoints for document-change events.
//!
//! Called by the external event framework, not directly by users. A
//! handler failure is logged and still acknowledged with 200: the
//! originating document mutation must never fail (or be retried) because
//! a downstream notification failed.

use crate::models::{AdminRecord, ChangeEvent, Complaint, Reply};
use crate::services::claims::claims_sync_needed;
use crate::services::{ComplaintWatcher, NotificationDispatcher, TokenStore};
use crate::AppState;
use axum::{
    extract::{Json, State},
    http::{HeaderMap, StatusCode},
    routing::post,
    Router,
};
use std::sync::Arc;

/// Trigger routes (called by the event framework).
pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/events/complaint-status", post(complaint_status))
        .route("/events/reply-added", post(reply_added))
        .route("/events/admin-written", post(admin_written))
}

/// Build the watcher from app state.
fn create_watcher(state: &AppState) -> ComplaintWatcher {
    let dispatcher =
        NotificationDispatcher::new(TokenStore::new(state.db.clone()), state.fcm.clone());
    ComplaintWatcher::new(state.db.clone(), dispatcher)
}

/// Verify the shared delivery token the event framework presents.
fn verify_events_token(state: &AppState, headers: &HeaderMap) -> bool {
    let presented = headers
        .get("x-events-token")
        .and_then(|h| h.to_str().ok())
        .unwrap_or("");

    if presented == state.config.events_verify_token {
        true
    } else {
        tracing::warn!("Security Alert: trigger delivery with bad verification token");
        false
    }
}

/// Complaint document updated.
async fn complaint_status(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Json(event): Json<ChangeEvent<Complaint>>,
) -> StatusCode {
    if !verify_events_token(&state, &headers) {
        return StatusCode::UNAUTHORIZED;
    }

    create_watcher(&state).on_status_changed(&event).await;
    StatusCode::OK
}

/// Reply document created under a complaint.
async fn reply_added(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Json(event): Json<ChangeEvent<Reply>>,
) -> StatusCode {
    if !verify_events_token(&state, &headers) {
        return StatusCode::UNAUTHORIZED;
    }

    create_watcher(&state).on_reply_added(&event).await;
    StatusCode::OK
}

/// Admin record created or updated.
async fn admin_written(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Json(event): Json<ChangeEvent<AdminRecord>>,
) -> StatusCode {
    if !verify_events_token(&state, &headers) {
        return StatusCode::UNAUTHORIZED;
    }

    let Some((uid, role)) = claims_sync_needed(&event) else {
        return StatusCode::OK;
    };

    // Claims are re-derivable from the record, so a failed sync is only
    // logged; the next record write converges the claims again.
    if let Err(e) = state.claims.sync_role(&uid, role).await {
        tracing::error!(uid = %uid, error = %e, "Claims synchronization failed");
    }

    StatusCode::OK
}

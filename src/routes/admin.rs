// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Privileged-operation surface (remote-callable API).
//!
//! All routes sit behind the caller-identity middleware; the role and
//! target guards live in `AdminService`.

use crate::error::AppError;
use crate::services::{AdminService, CallerIdentity};
use crate::AppState;
use axum::{
    extract::{Extension, Json, State},
    routing::post,
    Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Privileged admin routes (auth required).
pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/admin/bootstrap-super-admin", post(bootstrap_super_admin))
        .route("/admin/approve", post(approve_admin))
        .route("/admin/reject", post(reject_admin))
}

#[derive(Debug, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
struct TargetRequest {
    #[serde(default)]
    target_uid: Option<String>,
}

#[derive(Serialize)]
struct OkResponse {
    ok: bool,
}

async fn bootstrap_super_admin(
    State(state): State<Arc<AppState>>,
    Extension(caller): Extension<CallerIdentity>,
) -> Result<Json<OkResponse>, AppError> {
    AdminService::new(state.db.clone())
        .bootstrap_super_admin(&caller)
        .await?;
    Ok(Json(OkResponse { ok: true }))
}

async fn approve_admin(
    State(state): State<Arc<AppState>>,
    Extension(caller): Extension<CallerIdentity>,
    Json(req): Json<TargetRequest>,
) -> Result<Json<OkResponse>, AppError> {
    AdminService::new(state.db.clone())
        .approve_admin(&caller, req.target_uid.as_deref())
        .await?;
    Ok(Json(OkResponse { ok: true }))
}

async fn reject_admin(
    State(state): State<Arc<AppState>>,
    Extension(caller): Extension<CallerIdentity>,
    Json(req): Json<TargetRequest>,
) -> Result<Json<OkResponse>, AppError> {
    AdminService::new(state.db.clone())
        .reject_admin(&caller, req.target_uid.as_deref())
        .await?;
    Ok(Json(OkResponse { ok: true }))
}

// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Authorization-claims synchronizer.
//!
//! Projects the current admin role into the user's session-credential
//! claims via the Identity Toolkit accounts endpoint. Claims are always
//! recomputed from the latest record and fully replace the previous value.

use crate::error::AppError;
use crate::models::{AdminRecord, AdminRole, AuthorizationClaims, ChangeEvent};
use crate::services::gauth::GoogleAuthenticator;
use std::sync::{Arc, Mutex};

const IDENTITY_TOOLKIT_BASE_URL: &str = "https://identitytoolkit.googleapis.com";
pub const IDENTITY_TOOLKIT_SCOPE: &str = "https://www.googleapis.com/auth/identitytoolkit";

/// Claims writer over the authorization credential service.
#[derive(Clone)]
pub struct ClaimsService {
    http: reqwest::Client,
    base_url: String,
    project_id: String,
    auth: GoogleAuthenticator,
    mock: Option<Arc<Mutex<Vec<(String, AuthorizationClaims)>>>>,
}

impl ClaimsService {
    pub fn new(project_id: &str, auth: GoogleAuthenticator) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: IDENTITY_TOOLKIT_BASE_URL.to_string(),
            project_id: project_id.to_string(),
            auth,
            mock: None,
        }
    }

    /// Create a mock service that records claim writes instead of
    /// performing them.
    pub fn new_mock() -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: IDENTITY_TOOLKIT_BASE_URL.to_string(),
            project_id: "test-project".to_string(),
            auth: GoogleAuthenticator::new_mock(),
            mock: Some(Arc::new(Mutex::new(Vec::new()))),
        }
    }

    /// Claim writes recorded so far (mock only).
    pub fn mock_recorded(&self) -> Vec<(String, AuthorizationClaims)> {
        self.mock
            .as_ref()
            .map(|m| m.lock().unwrap().clone())
            .unwrap_or_default()
    }

    /// Project a role into claims and write them for the user.
    pub async fn sync_role(&self, uid: &str, role: AdminRole) -> Result<(), AppError> {
        let claims = role.claims();
        tracing::info!(uid, role = role.as_str(), "Synchronizing authorization claims");
        self.set_claims(uid, &claims).await
    }

    /// Fully replace the user's custom claims.
    pub async fn set_claims(&self, uid: &str, claims: &AuthorizationClaims) -> Result<(), AppError> {
        if let Some(mock) = &self.mock {
            mock.lock().unwrap().push((uid.to_string(), claims.clone()));
            return Ok(());
        }

        let access_token = self
            .auth
            .access_token()
            .await
            .map_err(|e| AppError::Claims(format!("Auth failed: {}", e)))?;

        let custom_attributes = serde_json::to_string(claims)
            .map_err(|e| AppError::Claims(format!("Claims serialization failed: {}", e)))?;

        let url = format!(
            "{}/v1/projects/{}/accounts:update",
            self.base_url, self.project_id
        );

        let response = self
            .http
            .post(&url)
            .bearer_auth(access_token)
            .json(&serde_json::json!({
                "localId": uid,
                "customAttributes": custom_attributes,
            }))
            .send()
            .await
            .map_err(|e| AppError::Claims(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::Claims(format!("HTTP {}: {}", status, body)));
        }

        Ok(())
    }
}

/// Decide whether an admin-record write needs a claims sync.
///
/// Returns the uid and new role to project, or `None` when the role is
/// unchanged on update (or no usable snapshot/uid exists). Creation always
/// syncs.
pub fn claims_sync_needed(event: &ChangeEvent<AdminRecord>) -> Option<(String, AdminRole)> {
    let after = event.after.as_ref()?;

    let uid = event
        .params
        .get("uid")
        .cloned()
        .filter(|u| !u.is_empty())
        .or_else(|| Some(after.uid.clone()).filter(|u| !u.is_empty()))?;

    if let Some(before) = &event.before {
        if before.role == after.role {
            return None;
        }
    }

    Some((uid, after.role))
}

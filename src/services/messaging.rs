// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! FCM HTTP v1 delivery client.
//!
//! Implements the multicast contract: one `messages:send` per token, fanned
//! out with bounded concurrency, returning a per-token outcome with the
//! backend's error code preserved. Only a total outage (no OAuth token)
//! fails the call itself.

use crate::error::AppError;
use crate::services::gauth::GoogleAuthenticator;
use futures_util::{stream, StreamExt};
use serde::Deserialize;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

const FCM_BASE_URL: &str = "https://fcm.googleapis.com";
pub const FCM_SCOPE: &str = "https://www.googleapis.com/auth/firebase.messaging";
const MAX_CONCURRENT_SENDS: usize = 50;

/// Per-token delivery result.
#[derive(Debug, Clone)]
pub struct DeliveryOutcome {
    pub token: String,
    pub success: bool,
    /// FCM error code ("UNREGISTERED", "INVALID_ARGUMENT", ...) on failure
    pub error_code: Option<String>,
}

/// One message as handed to the backend (recorded by the mock).
#[derive(Debug, Clone)]
pub struct SentMessage {
    pub token: String,
    pub title: String,
    pub body: String,
    pub data: HashMap<String, String>,
}

#[derive(Default)]
struct MockState {
    /// token -> error code to report for it
    failures: Mutex<HashMap<String, String>>,
    sent: Mutex<Vec<SentMessage>>,
}

/// FCM client wrapper.
#[derive(Clone)]
pub struct FcmClient {
    http: reqwest::Client,
    base_url: String,
    project_id: String,
    auth: GoogleAuthenticator,
    mock: Option<Arc<MockState>>,
}

impl FcmClient {
    pub fn new(project_id: &str, auth: GoogleAuthenticator) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: FCM_BASE_URL.to_string(),
            project_id: project_id.to_string(),
            auth,
            mock: None,
        }
    }

    /// Create a mock client that records messages instead of sending them.
    ///
    /// Every token succeeds unless scripted otherwise via
    /// [`FcmClient::mock_fail_token`].
    pub fn new_mock() -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: FCM_BASE_URL.to_string(),
            project_id: "test-project".to_string(),
            auth: GoogleAuthenticator::new_mock(),
            mock: Some(Arc::new(MockState::default())),
        }
    }

    /// Script a delivery failure for a token (mock only).
    pub fn mock_fail_token(&self, token: &str, error_code: &str) {
        if let Some(mock) = &self.mock {
            mock.failures
                .lock()
                .unwrap()
                .insert(token.to_string(), error_code.to_string());
        }
    }

    /// Messages handed to the backend so far (mock only).
    pub fn mock_sent(&self) -> Vec<SentMessage> {
        self.mock
            .as_ref()
            .map(|m| m.sent.lock().unwrap().clone())
            .unwrap_or_default()
    }

    /// Send one notification to every token, collecting per-token outcomes.
    ///
    /// Returns `Err` only when no access token can be obtained (total
    /// backend outage); individual delivery failures are reported in the
    /// outcomes.
    pub async fn send_each_for_multicast(
        &self,
        tokens: &[String],
        title: &str,
        body: &str,
        data: &HashMap<String, String>,
    ) -> Result<Vec<DeliveryOutcome>, AppError> {
        if let Some(mock) = &self.mock {
            return Ok(self.send_mock(mock, tokens, title, body, data));
        }

        let access_token = self
            .auth
            .access_token()
            .await
            .map_err(|e| AppError::Messaging(format!("FCM auth failed: {}", e)))?;

        let outcomes = stream::iter(tokens.to_vec())
            .map(|token| {
                let access_token = access_token.clone();
                async move {
                    self.send_one(&access_token, &token, title, body, data)
                        .await
                }
            })
            .buffer_unordered(MAX_CONCURRENT_SENDS)
            .collect::<Vec<DeliveryOutcome>>()
            .await;

        Ok(outcomes)
    }

    fn send_mock(
        &self,
        mock: &MockState,
        tokens: &[String],
        title: &str,
        body: &str,
        data: &HashMap<String, String>,
    ) -> Vec<DeliveryOutcome> {
        let failures = mock.failures.lock().unwrap();
        let mut sent = mock.sent.lock().unwrap();

        tokens
            .iter()
            .map(|token| {
                sent.push(SentMessage {
                    token: token.clone(),
                    title: title.to_string(),
                    body: body.to_string(),
                    data: data.clone(),
                });
                match failures.get(token) {
                    Some(code) => DeliveryOutcome {
                        token: token.clone(),
                        success: false,
                        error_code: Some(code.clone()),
                    },
                    None => DeliveryOutcome {
                        token: token.clone(),
                        success: true,
                        error_code: None,
                    },
                }
            })
            .collect()
    }

    async fn send_one(
        &self,
        access_token: &str,
        token: &str,
        title: &str,
        body: &str,
        data: &HashMap<String, String>,
    ) -> DeliveryOutcome {
        let url = format!(
            "{}/v1/projects/{}/messages:send",
            self.base_url, self.project_id
        );

        let payload = serde_json::json!({
            "message": {
                "token": token,
                "notification": { "title": title, "body": body },
                "data": data,
            }
        });

        let response = match self
            .http
            .post(&url)
            .bearer_auth(access_token)
            .json(&payload)
            .send()
            .await
        {
            Ok(r) => r,
            Err(e) => {
                tracing::warn!(error = %e, "FCM send transport error");
                return DeliveryOutcome {
                    token: token.to_string(),
                    success: false,
                    error_code: Some("UNAVAILABLE".to_string()),
                };
            }
        };

        if response.status().is_success() {
            return DeliveryOutcome {
                token: token.to_string(),
                success: true,
                error_code: None,
            };
        }

        let status = response.status();
        let raw = response.text().await.unwrap_or_default();
        DeliveryOutcome {
            token: token.to_string(),
            success: false,
            error_code: Some(extract_error_code(status, &raw)),
        }
    }
}

/// Pull the FCM error code out of a v1 error response.
///
/// The v1 API reports the interesting code ("UNREGISTERED", ...) inside
/// `error.details` with the FcmError type; `error.status` is the generic
/// gRPC status and is used as the fallback.
fn extract_error_code(status: reqwest::StatusCode, raw_body: &str) -> String {
    #[derive(Deserialize)]
    struct ErrorBody {
        error: ErrorInner,
    }
    #[derive(Deserialize)]
    struct ErrorInner {
        #[serde(default)]
        status: String,
        #[serde(default)]
        details: Vec<ErrorDetail>,
    }
    #[derive(Deserialize)]
    struct ErrorDetail {
        #[serde(rename = "errorCode", default)]
        error_code: Option<String>,
    }

    if let Ok(parsed) = serde_json::from_str::<ErrorBody>(raw_body) {
        if let Some(code) = parsed
            .error
            .details
            .iter()
            .find_map(|d| d.error_code.clone())
        {
            return code;
        }
        if !parsed.error.status.is_empty() {
            return parsed.error.status;
        }
    }
    format!("HTTP_{}", status.as_u16())
}

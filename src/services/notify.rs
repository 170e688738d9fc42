// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Notification fan-out with device-token hygiene.
//!
//! One multicast call per notification; per-token failures with a
//! permanently-dead token code are pruned in a single batched call.
//! Transient and rate-limit failures are left alone; retry, if any,
//! belongs to the invoking event framework.

use crate::error::AppError;
use crate::models::NotificationEvent;
use crate::services::messaging::{DeliveryOutcome, FcmClient};
use crate::services::tokens::TokenStore;

/// Raw delivery counts for one dispatch.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DeliverySummary {
    pub success_count: u32,
    pub failure_count: u32,
}

/// Fans a notification out to all of a user's registered endpoints.
#[derive(Clone)]
pub struct NotificationDispatcher {
    tokens: TokenStore,
    fcm: FcmClient,
}

impl NotificationDispatcher {
    pub fn new(tokens: TokenStore, fcm: FcmClient) -> Self {
        Self { tokens, fcm }
    }

    /// Deliver the event to every registered endpoint of its recipient.
    ///
    /// An empty token set short-circuits with a zero summary and no
    /// backend call. Only a total backend outage returns `Err`; partial
    /// failure is reported in the summary.
    pub async fn dispatch(&self, event: &NotificationEvent) -> Result<DeliverySummary, AppError> {
        let tokens = self.tokens.list(&event.recipient_uid).await;
        if tokens.is_empty() {
            return Ok(DeliverySummary::default());
        }

        let outcomes = self
            .fcm
            .send_each_for_multicast(&tokens, &event.title, &event.body, &event.data)
            .await?;

        let summary = summarize(&outcomes);
        let invalid = invalid_tokens(&outcomes);
        if !invalid.is_empty() {
            self.tokens.prune(&event.recipient_uid, &invalid).await;
        }

        tracing::info!(
            recipient = %event.recipient_uid,
            success = summary.success_count,
            failure = summary.failure_count,
            "FCM multicast complete"
        );

        Ok(summary)
    }
}

fn summarize(outcomes: &[DeliveryOutcome]) -> DeliverySummary {
    let success_count = outcomes.iter().filter(|o| o.success).count() as u32;
    DeliverySummary {
        success_count,
        failure_count: outcomes.len() as u32 - success_count,
    }
}

/// Tokens whose failure indicates the endpoint is permanently gone.
fn invalid_tokens(outcomes: &[DeliveryOutcome]) -> Vec<String> {
    outcomes
        .iter()
        .filter(|o| !o.success)
        .filter(|o| {
            o.error_code
                .as_deref()
                .is_some_and(is_invalid_token_code)
        })
        .map(|o| o.token.clone())
        .collect()
}

/// Error codes that mean the device token itself is dead.
///
/// Covers the HTTP v1 codes and the legacy `messaging/...` codes still
/// seen from older admin-SDK-shaped responses.
fn is_invalid_token_code(code: &str) -> bool {
    code == "UNREGISTERED"
        || code == "INVALID_ARGUMENT"
        || code.ends_with("registration-token-not-registered")
        || code.ends_with("invalid-registration-token")
}

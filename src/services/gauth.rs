// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Service-account OAuth2 for Google REST APIs.
//!
//! Mints a signed JWT grant from the service-account key, exchanges it at
//! the token endpoint, and caches the access token in memory until shortly
//! before expiry.

use crate::error::AppError;
use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::Mutex;

const JWT_GRANT_TYPE: &str = "urn:ietf:params:oauth:grant-type:jwt-bearer";
// Refresh a minute early so in-flight requests never carry a stale token.
const EXPIRY_LEEWAY_SECS: i64 = 60;

/// Service-account key fields needed for the OAuth2 JWT grant.
#[derive(Debug, Clone, Deserialize)]
pub struct ServiceAccountKey {
    pub private_key: String,
    pub client_email: String,
    pub token_uri: String,
}

#[derive(Serialize)]
struct GrantClaims<'a> {
    iss: &'a str,
    scope: &'a str,
    aud: &'a str,
    iat: i64,
    exp: i64,
}

#[derive(Deserialize)]
struct TokenResponse {
    access_token: String,
    expires_in: i64,
}

struct CachedToken {
    access_token: String,
    expires_at: chrono::DateTime<chrono::Utc>,
}

/// OAuth2 token source for a single scope set.
#[derive(Clone)]
pub struct GoogleAuthenticator {
    http: reqwest::Client,
    key: Option<ServiceAccountKey>,
    scope: String,
    cache: Arc<Mutex<Option<CachedToken>>>,
}

impl GoogleAuthenticator {
    pub fn new(key: ServiceAccountKey, scope: &str) -> Self {
        Self {
            http: reqwest::Client::new(),
            key: Some(key),
            scope: scope.to_string(),
            cache: Arc::new(Mutex::new(None)),
        }
    }

    /// Load the service-account key from a JSON key file.
    pub fn from_file(path: &str, scope: &str) -> Result<Self, AppError> {
        let raw = std::fs::read_to_string(path).map_err(|e| {
            AppError::Internal(anyhow::anyhow!("Failed to read service account key: {}", e))
        })?;
        let key: ServiceAccountKey = serde_json::from_str(&raw).map_err(|e| {
            AppError::Internal(anyhow::anyhow!("Invalid service account key: {}", e))
        })?;
        Ok(Self::new(key, scope))
    }

    /// Create a mock authenticator that always returns a fixed token.
    pub fn new_mock() -> Self {
        Self {
            http: reqwest::Client::new(),
            key: None,
            scope: String::new(),
            cache: Arc::new(Mutex::new(None)),
        }
    }

    /// Get a valid access token, refreshing if the cached one is stale.
    pub async fn access_token(&self) -> Result<String, AppError> {
        let Some(key) = &self.key else {
            return Ok("mock-access-token".to_string());
        };

        let mut cache = self.cache.lock().await;
        if let Some(cached) = cache.as_ref() {
            if cached.expires_at > chrono::Utc::now() {
                return Ok(cached.access_token.clone());
            }
        }

        let now = chrono::Utc::now();
        let claims = GrantClaims {
            iss: &key.client_email,
            scope: &self.scope,
            aud: &key.token_uri,
            iat: now.timestamp(),
            exp: now.timestamp() + 3600,
        };

        let encoding_key = EncodingKey::from_rsa_pem(key.private_key.as_bytes())
            .map_err(|e| AppError::Internal(anyhow::anyhow!("Invalid private key: {}", e)))?;
        let assertion = encode(&Header::new(Algorithm::RS256), &claims, &encoding_key)
            .map_err(|e| AppError::Internal(anyhow::anyhow!("JWT grant signing failed: {}", e)))?;

        let response = self
            .http
            .post(&key.token_uri)
            .form(&[
                ("grant_type", JWT_GRANT_TYPE),
                ("assertion", assertion.as_str()),
            ])
            .send()
            .await
            .map_err(|e| AppError::Internal(anyhow::anyhow!("Token request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::Internal(anyhow::anyhow!(
                "Token endpoint returned HTTP {}: {}",
                status,
                body
            )));
        }

        let token: TokenResponse = response
            .json()
            .await
            .map_err(|e| AppError::Internal(anyhow::anyhow!("Invalid token response: {}", e)))?;

        let expires_at =
            now + chrono::Duration::seconds((token.expires_in - EXPIRY_LEEWAY_SECS).max(0));
        *cache = Some(CachedToken {
            access_token: token.access_token.clone(),
            expires_at,
        });

        tracing::debug!(scope = %self.scope, "Service-account access token refreshed");
        Ok(token.access_token)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn mock_authenticator_returns_fixed_token() {
        let auth = GoogleAuthenticator::new_mock();
        let token = auth.access_token().await.unwrap();
        assert_eq!(token, "mock-access-token");
    }
}

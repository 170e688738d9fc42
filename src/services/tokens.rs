// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Device-token store over the user records.
//!
//! Reads never fail the caller: a missing user, a missing field or a store
//! error all read as "no tokens". Pruning is best-effort cleanup, not a
//! correctness requirement.

use crate::db::FirestoreDb;
use std::collections::HashSet;

/// Read/prune access to a user's registered device tokens.
#[derive(Clone)]
pub struct TokenStore {
    db: FirestoreDb,
}

impl TokenStore {
    pub fn new(db: FirestoreDb) -> Self {
        Self { db }
    }

    /// List the user's device tokens, deduplicated and filtered to
    /// non-empty strings. Absent user/field or store errors log a warning
    /// and return an empty list.
    pub async fn list(&self, uid: &str) -> Vec<String> {
        if uid.is_empty() {
            return Vec::new();
        }

        let user = match self.db.get_user(uid).await {
            Ok(Some(user)) => user,
            Ok(None) => return Vec::new(),
            Err(e) => {
                tracing::warn!(uid, error = %e, "Failed to read device tokens");
                return Vec::new();
            }
        };

        let mut seen = HashSet::new();
        user.fcm_tokens
            .into_iter()
            .filter(|t| !t.is_empty() && seen.insert(t.clone()))
            .collect()
    }

    /// Remove exactly the given tokens from the user's set.
    ///
    /// Tolerates a missing user document or field; removing tokens that
    /// are already absent is a no-op. Errors are logged and swallowed.
    pub async fn prune(&self, uid: &str, tokens: &[String]) {
        if uid.is_empty() || tokens.is_empty() {
            return;
        }

        match self.db.remove_user_tokens(uid, tokens).await {
            Ok(()) => {
                tracing::info!(uid, pruned = tokens.len(), "Pruned invalid device tokens");
            }
            Err(e) => {
                tracing::warn!(uid, error = %e, "Token pruning failed");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn list_returns_empty_when_store_unavailable() {
        let store = TokenStore::new(FirestoreDb::new_mock());
        assert!(store.list("u1").await.is_empty());
    }

    #[tokio::test]
    async fn list_returns_empty_for_missing_uid() {
        let store = TokenStore::new(FirestoreDb::new_mock());
        assert!(store.list("").await.is_empty());
    }

    #[tokio::test]
    async fn prune_swallows_store_errors() {
        let store = TokenStore::new(FirestoreDb::new_mock());
        // Offline mock errors internally; prune must not panic or surface it.
        store.prune("u1", &["tok".to_string()]).await;
    }

    #[tokio::test]
    async fn prune_is_noop_for_empty_set() {
        let store = TokenStore::new(FirestoreDb::new_mock());
        store.prune("u1", &[]).await;
    }
}

// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Firestore client wrapper with typed operations.
//!
//! Provides high-level operations for:
//! - Users (device-token reads and pruning)
//! - Complaints (single-document reads for reply notifications)
//! - Admins (role records and the superAdmin uniqueness query)

use crate::db::collections;
use crate::error::AppError;
use crate::models::{AdminRecord, AdminRole, Complaint, User};

/// Firestore database client.
#[derive(Clone)]
pub struct FirestoreDb {
    client: Option<firestore::FirestoreDb>,
}

impl FirestoreDb {
    /// Create a new Firestore client.
    ///
    /// For local development with emulator, set FIRESTORE_EMULATOR_HOST.
    pub async fn new(project_id: &str) -> Result<Self, AppError> {
        // If the emulator environment variable is set, use unauthenticated connection
        // to avoid local credential warnings and leakage.
        if std::env::var("FIRESTORE_EMULATOR_HOST").is_ok() {
            return Self::create_emulator_client(project_id).await;
        }

        let client = firestore::FirestoreDb::new(project_id)
            .await
            .map_err(|e| AppError::Database(format!("Failed to connect to Firestore: {}", e)))?;

        tracing::info!(project = project_id, "Connected to Firestore");

        Ok(Self {
            client: Some(client),
        })
    }

    /// Create a Firestore client for the emulator with unauthenticated access.
    async fn create_emulator_client(project_id: &str) -> Result<Self, AppError> {
        tracing::info!("Using unauthenticated connection for Firestore Emulator");

        // Use ExternalJwtFunctionSource to provide a dummy token without needing async-trait
        // or a custom TokenSource implementation struct.
        let token_source = gcloud_sdk::ExternalJwtFunctionSource::new(|| async {
            Ok(gcloud_sdk::Token {
                token_type: "Bearer".to_string(),
                token: gcloud_sdk::SecretValue::new(
                    "eyJhbGciOiJub25lIn0.eyJ1aWQiOiJ0ZXN0In0."
                        .to_string()
                        .into(),
                ),
                expiry: chrono::Utc::now() + chrono::Duration::hours(1),
            })
        });

        let options = firestore::FirestoreDbOptions::new(project_id.to_string());

        let client = firestore::FirestoreDb::with_options_token_source(
            options,
            gcloud_sdk::GCP_DEFAULT_SCOPES.clone(),
            gcloud_sdk::TokenSourceType::ExternalSource(Box::new(token_source)),
        )
        .await
        .map_err(|e| {
            AppError::Database(format!("Failed to connect to Firestore Emulator: {}", e))
        })?;

        tracing::info!(
            project = project_id,
            "Connected to Firestore (Emulator/Unauthenticated)"
        );

        Ok(Self {
            client: Some(client),
        })
    }

    /// Create a mock Firestore client for testing (offline mode).
    ///
    /// All database operations will return an error if called.
    pub fn new_mock() -> Self {
        Self { client: None }
    }

    /// Helper to get the client or return an error if offline.
    fn get_client(&self) -> Result<&firestore::FirestoreDb, AppError> {
        self.client
            .as_ref()
            .ok_or_else(|| AppError::Database("Database not connected (offline mode)".to_string()))
    }

    // ─── User Operations ─────────────────────────────────────────

    /// Get a user by uid.
    pub async fn get_user(&self, uid: &str) -> Result<Option<User>, AppError> {
        self.get_client()?
            .fluent()
            .select()
            .by_id_in(collections::USERS)
            .obj()
            .one(uid)
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Create or update a user.
    pub async fn upsert_user(&self, uid: &str, user: &User) -> Result<(), AppError> {
        let _: () = self
            .get_client()?
            .fluent()
            .update()
            .in_col(collections::USERS)
            .document_id(uid)
            .object(user)
            .execute()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }

    /// Remove specific device tokens from a user record.
    ///
    /// Uses a field-level array-remove transform so concurrent deliveries
    /// to the same user converge without lost updates. Removing a token
    /// that is already absent is a no-op.
    pub async fn remove_user_tokens(&self, uid: &str, tokens: &[String]) -> Result<(), AppError> {
        let tokens = tokens.to_vec();
        let _: () = self
            .get_client()?
            .fluent()
            .update()
            .in_col(collections::USERS)
            .document_id(uid)
            .transforms(|t| t.fields([t.field("fcmTokens").remove_all_from_array(tokens.clone())]))
            .only_transform()
            .execute()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }

    // ─── Complaint Operations ────────────────────────────────────

    /// Create or update a complaint.
    ///
    /// The complaint documents are owned by the app; this writer exists for
    /// test seeding and emulator tooling.
    pub async fn upsert_complaint(
        &self,
        complaint_id: &str,
        complaint: &Complaint,
    ) -> Result<(), AppError> {
        let _: () = self
            .get_client()?
            .fluent()
            .update()
            .in_col(collections::COMPLAINTS)
            .document_id(complaint_id)
            .object(complaint)
            .execute()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }

    /// Get a complaint by document ID.
    pub async fn get_complaint(&self, complaint_id: &str) -> Result<Option<Complaint>, AppError> {
        self.get_client()?
            .fluent()
            .select()
            .by_id_in(collections::COMPLAINTS)
            .obj()
            .one(complaint_id)
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    // ─── Admin Record Operations ─────────────────────────────────

    /// Get an admin role record by uid.
    pub async fn get_admin(&self, uid: &str) -> Result<Option<AdminRecord>, AppError> {
        self.get_client()?
            .fluent()
            .select()
            .by_id_in(collections::ADMINS)
            .obj()
            .one(uid)
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Create or fully replace an admin role record (bootstrap path).
    pub async fn upsert_admin(&self, record: &AdminRecord) -> Result<(), AppError> {
        let _: () = self
            .get_client()?
            .fluent()
            .update()
            .in_col(collections::ADMINS)
            .document_id(&record.uid)
            .object(record)
            .execute()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }

    /// Merge-update only the role transition fields of an admin record.
    ///
    /// Writes `role`, `approvedBy` and `updatedAt` and leaves everything
    /// else (email, name, createdAt) untouched, so approve/reject work on
    /// records created by the sign-in flow.
    pub async fn set_admin_role(
        &self,
        uid: &str,
        role: AdminRole,
        approved_by: Option<&str>,
        updated_at: &str,
    ) -> Result<(), AppError> {
        let update = AdminRoleUpdate {
            role,
            approved_by: approved_by.map(|s| s.to_string()),
            updated_at: updated_at.to_string(),
        };

        let _: () = self
            .get_client()?
            .fluent()
            .update()
            .fields([
                "role".to_string(),
                "approvedBy".to_string(),
                "updatedAt".to_string(),
            ])
            .in_col(collections::ADMINS)
            .document_id(uid)
            .object(&update)
            .execute()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }

    /// Check whether any admin record already holds the superAdmin role.
    ///
    /// Limit-1 query; used as the bootstrap precondition.
    pub async fn super_admin_exists(&self) -> Result<bool, AppError> {
        let existing: Vec<AdminRecord> = self
            .get_client()?
            .fluent()
            .select()
            .from(collections::ADMINS)
            .filter(|q| q.for_all([q.field("role").eq("superAdmin")]))
            .limit(1)
            .obj()
            .query()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(!existing.is_empty())
    }
}

/// Partial admin record used for field-limited role updates.
#[derive(serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
struct AdminRoleUpdate {
    role: AdminRole,
    approved_by: Option<String>,
    updated_at: String,
}

// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Admin role state machine.
//!
//! Pending → {Admin, SuperAdmin}; Admin ⇄ Pending; SuperAdmin is terminal
//! for these operations. All guards run before any mutation, so a rejected
//! call never partially applies. The claims projection itself happens
//! downstream, when the record write reaches the synchronizer.

use crate::db::FirestoreDb;
use crate::error::AppError;
use crate::models::{AdminRecord, AdminRole};

/// Authenticated caller of a privileged operation.
///
/// `role` is parsed from the caller's current session-credential claims.
#[derive(Debug, Clone)]
pub struct CallerIdentity {
    pub uid: String,
    pub email: Option<String>,
    pub role: AdminRole,
}

/// Privileged role-transition operations.
pub struct AdminService {
    db: FirestoreDb,
}

impl AdminService {
    pub fn new(db: FirestoreDb) -> Self {
        Self { db }
    }

    /// Create the first superAdmin record for the caller.
    ///
    /// Fails with FailedPrecondition if any superAdmin already exists;
    /// a second bootstrap attempt always fails rather than no-oping.
    pub async fn bootstrap_super_admin(&self, caller: &CallerIdentity) -> Result<(), AppError> {
        if self.db.super_admin_exists().await? {
            return Err(AppError::FailedPrecondition(
                "이미 슈퍼관리자가 존재합니다.".to_string(),
            ));
        }

        let email = caller.email.clone().unwrap_or_default();
        let name = if email.is_empty() {
            "superadmin".to_string()
        } else {
            email.split('@').next().unwrap_or("superadmin").to_string()
        };
        let now = chrono::Utc::now().to_rfc3339();

        let record = AdminRecord {
            uid: caller.uid.clone(),
            email,
            name,
            role: AdminRole::SuperAdmin,
            approved_by: Some(caller.uid.clone()),
            created_at: now.clone(),
            updated_at: now,
        };

        self.db.upsert_admin(&record).await?;
        tracing::info!(uid = %caller.uid, "SuperAdmin bootstrapped");
        Ok(())
    }

    /// Promote the target record to Admin.
    pub async fn approve_admin(
        &self,
        caller: &CallerIdentity,
        target_uid: Option<&str>,
    ) -> Result<(), AppError> {
        self.require_super_admin(caller, "슈퍼관리자만 승인할 수 있습니다.")?;
        let target = required_target(target_uid)?;

        let now = chrono::Utc::now().to_rfc3339();
        self.db
            .set_admin_role(target, AdminRole::Admin, Some(&caller.uid), &now)
            .await?;

        tracing::info!(target, approved_by = %caller.uid, "Admin approved");
        Ok(())
    }

    /// Demote the target record back to Pending and clear its approver.
    pub async fn reject_admin(
        &self,
        caller: &CallerIdentity,
        target_uid: Option<&str>,
    ) -> Result<(), AppError> {
        self.require_super_admin(caller, "총 관리자만 가능합니다.")?;
        let target = required_target(target_uid)?;

        let now = chrono::Utc::now().to_rfc3339();
        self.db
            .set_admin_role(target, AdminRole::Pending, None, &now)
            .await?;

        tracing::info!(target, rejected_by = %caller.uid, "Admin rejected");
        Ok(())
    }

    fn require_super_admin(
        &self,
        caller: &CallerIdentity,
        message: &str,
    ) -> Result<(), AppError> {
        if caller.role != AdminRole::SuperAdmin {
            return Err(AppError::PermissionDenied(message.to_string()));
        }
        Ok(())
    }
}

fn required_target(target_uid: Option<&str>) -> Result<&str, AppError> {
    target_uid
        .filter(|t| !t.is_empty())
        .ok_or_else(|| AppError::InvalidArgument("targetUid가 필요합니다.".to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn caller(role: AdminRole) -> CallerIdentity {
        CallerIdentity {
            uid: "caller".to_string(),
            email: Some("boss@example.com".to_string()),
            role,
        }
    }

    // The offline mock errors on any store access, so these tests also
    // prove the guards reject before touching the database.

    #[tokio::test]
    async fn approve_requires_super_admin() {
        let service = AdminService::new(FirestoreDb::new_mock());

        let err = service
            .approve_admin(&caller(AdminRole::Admin), Some("u2"))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::PermissionDenied(_)));

        let err = service
            .approve_admin(&caller(AdminRole::Pending), Some("u2"))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::PermissionDenied(_)));
    }

    #[tokio::test]
    async fn approve_requires_target_uid() {
        let service = AdminService::new(FirestoreDb::new_mock());

        let err = service
            .approve_admin(&caller(AdminRole::SuperAdmin), None)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::InvalidArgument(_)));

        let err = service
            .approve_admin(&caller(AdminRole::SuperAdmin), Some(""))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::InvalidArgument(_)));
    }

    #[tokio::test]
    async fn reject_has_the_same_guards() {
        let service = AdminService::new(FirestoreDb::new_mock());

        let err = service
            .reject_admin(&caller(AdminRole::Admin), Some("u2"))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::PermissionDenied(_)));

        let err = service
            .reject_admin(&caller(AdminRole::SuperAdmin), None)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::InvalidArgument(_)));
    }

    #[tokio::test]
    async fn guarded_call_reaches_store_only_after_checks() {
        let service = AdminService::new(FirestoreDb::new_mock());

        // Guards passed; the offline store is the first thing to fail.
        let err = service
            .approve_admin(&caller(AdminRole::SuperAdmin), Some("u2"))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Database(_)));
    }
}

// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Admin role records and the claims they project to.

use serde::{Deserialize, Serialize};

/// Administrator role held in `admins/{uid}`.
///
/// Stored as a string; unknown or legacy values deserialize to `Pending`
/// so they carry no elevated access.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum AdminRole {
    #[serde(rename = "admin")]
    Admin,
    #[serde(rename = "superAdmin")]
    SuperAdmin,
    #[default]
    #[serde(rename = "pending", other)]
    Pending,
}

impl AdminRole {
    /// Parse a role string from a claims map, defaulting to `Pending`.
    pub fn parse(raw: &str) -> Self {
        match raw {
            "admin" => AdminRole::Admin,
            "superAdmin" => AdminRole::SuperAdmin,
            _ => AdminRole::Pending,
        }
    }

    /// Stored string form of the role.
    pub fn as_str(&self) -> &'static str {
        match self {
            AdminRole::Admin => "admin",
            AdminRole::SuperAdmin => "superAdmin",
            AdminRole::Pending => "pending",
        }
    }

    /// Project this role into authorization claims.
    ///
    /// `Admin` and `SuperAdmin` map to a role claim; everything else maps
    /// to empty claims, revoking elevated access. Total and never merged
    /// with prior claims state.
    pub fn claims(&self) -> AuthorizationClaims {
        match self {
            AdminRole::Admin => AuthorizationClaims {
                role: Some(AdminRole::Admin),
            },
            AdminRole::SuperAdmin => AuthorizationClaims {
                role: Some(AdminRole::SuperAdmin),
            },
            AdminRole::Pending => AuthorizationClaims::default(),
        }
    }
}

/// Admin role record stored in Firestore (`admins/{uid}`).
///
/// Never hard-deleted by this core; rejection sets the role back to
/// `Pending` instead of removing the record.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminRecord {
    #[serde(default)]
    pub uid: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub role: AdminRole,
    /// Uid of the superAdmin who approved this record (self for bootstrap)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub approved_by: Option<String>,
    #[serde(default)]
    pub created_at: String,
    #[serde(default)]
    pub updated_at: String,
}

/// Externally-visible authorization claims attached to a session credential.
///
/// Serializes to `{}`, `{"role":"admin"}` or `{"role":"superAdmin"}`.
/// Wholly owned by the claims synchronizer.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthorizationClaims {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<AdminRole>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn role_parses_known_values() {
        assert_eq!(AdminRole::parse("admin"), AdminRole::Admin);
        assert_eq!(AdminRole::parse("superAdmin"), AdminRole::SuperAdmin);
        assert_eq!(AdminRole::parse("pending"), AdminRole::Pending);
    }

    #[test]
    fn role_parse_falls_back_to_pending() {
        assert_eq!(AdminRole::parse(""), AdminRole::Pending);
        assert_eq!(AdminRole::parse("superadmin"), AdminRole::Pending);
        assert_eq!(AdminRole::parse("owner"), AdminRole::Pending);
    }

    #[test]
    fn role_deserializes_legacy_values_as_pending() {
        let role: AdminRole = serde_json::from_str("\"moderator\"").unwrap();
        assert_eq!(role, AdminRole::Pending);

        let record: AdminRecord = serde_json::from_str(r#"{"uid":"u1"}"#).unwrap();
        assert_eq!(record.role, AdminRole::Pending);
    }

    #[test]
    fn claims_projection_is_total() {
        assert_eq!(
            AdminRole::Admin.claims(),
            AuthorizationClaims {
                role: Some(AdminRole::Admin)
            }
        );
        assert_eq!(
            AdminRole::SuperAdmin.claims(),
            AuthorizationClaims {
                role: Some(AdminRole::SuperAdmin)
            }
        );
        assert_eq!(AdminRole::Pending.claims(), AuthorizationClaims::default());
    }

    #[test]
    fn claims_serialize_to_expected_shapes() {
        assert_eq!(
            serde_json::to_string(&AdminRole::Admin.claims()).unwrap(),
            r#"{"role":"admin"}"#
        );
        assert_eq!(
            serde_json::to_string(&AdminRole::SuperAdmin.claims()).unwrap(),
            r#"{"role":"superAdmin"}"#
        );
        assert_eq!(
            serde_json::to_string(&AdminRole::Pending.claims()).unwrap(),
            "{}"
        );
    }
}

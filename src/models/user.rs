//! User model for storage.

use serde::{Deserialize, Serialize};

/// User profile stored in Firestore, keyed by uid.
///
/// The app writes many more fields; only what this core touches is
/// modeled, and all of it is optional so partial documents deserialize.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    /// Email address (may be absent)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    /// Display name shown in the app
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    /// Registered FCM device tokens
    #[serde(default)]
    pub fcm_tokens: Vec<String>,
}

//! Complaint and reply documents.

use serde::{Deserialize, Serialize};

/// Complaint document (`complaints/{id}`).
///
/// The app owns this schema; everything the watcher reads is optional
/// so it tolerates partial or legacy documents.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Complaint {
    /// Uid of the citizen who filed the complaint
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub owner_uid: Option<String>,
    /// Complaint title
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// Raw status value ("pending", "processing", "done", ...)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
}

/// Reply document (`complaints/{complaintId}/replies/{replyId}`).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Reply {
    /// "admin" for administrator replies; anything else is a citizen message
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sender_role: Option<String>,
    /// Reply body
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

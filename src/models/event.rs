//! Typed trigger envelopes and notification values.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Document change event delivered by the external event framework.
///
/// `before` is absent on creation, `after` on deletion. `params` carries
/// the path parameters of the triggering document (e.g. `complaintId`).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChangeEvent<T> {
    #[serde(default)]
    pub before: Option<T>,
    #[serde(default)]
    pub after: Option<T>,
    #[serde(default)]
    pub params: HashMap<String, String>,
}

/// What triggered a notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationKind {
    StatusChanged,
    ReplyAdded,
}

impl NotificationKind {
    /// Value of the `type` key in the structured data payload.
    pub fn data_type(&self) -> &'static str {
        match self {
            NotificationKind::StatusChanged => "status",
            NotificationKind::ReplyAdded => "reply",
        }
    }
}

/// Transient notification value, created per trigger firing and consumed
/// once by the dispatcher. Never persisted.
#[derive(Debug, Clone)]
pub struct NotificationEvent {
    pub kind: NotificationKind,
    pub recipient_uid: String,
    pub title: String,
    pub body: String,
    pub data: HashMap<String, String>,
}

// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Complaint trigger handlers.
//!
//! Derives notification content from before/after document snapshots and
//! hands it to the dispatcher. Dispatch failures are logged and swallowed:
//! a notification failure must never fail the triggering mutation.

use crate::db::FirestoreDb;
use crate::models::{ChangeEvent, Complaint, NotificationEvent, NotificationKind, Reply};
use crate::services::notify::NotificationDispatcher;
use std::collections::HashMap;

/// Reply bodies longer than this are cut to 117 chars plus an ellipsis.
const MAX_REPLY_BODY_CHARS: usize = 120;
const TRUNCATED_HEAD_CHARS: usize = 117;

/// Watches complaint documents and their reply subcollection.
pub struct ComplaintWatcher {
    db: FirestoreDb,
    dispatcher: NotificationDispatcher,
}

impl ComplaintWatcher {
    pub fn new(db: FirestoreDb, dispatcher: NotificationDispatcher) -> Self {
        Self { db, dispatcher }
    }

    /// Complaint status changed: notify the owner.
    pub async fn on_status_changed(&self, event: &ChangeEvent<Complaint>) {
        let Some(notification) = status_change_notification(event) else {
            return;
        };

        if let Err(e) = self.dispatcher.dispatch(&notification).await {
            tracing::error!(
                recipient = %notification.recipient_uid,
                error = %e,
                "Status-change notification failed"
            );
        }
    }

    /// Reply created under a complaint: notify the owner for admin replies.
    pub async fn on_reply_added(&self, event: &ChangeEvent<Reply>) {
        let Some(reply) = &event.after else { return };
        if reply.sender_role.as_deref() != Some("admin") {
            return;
        }

        let Some(complaint_id) = event.params.get("complaintId") else {
            tracing::warn!("Reply event without complaintId param");
            return;
        };

        let complaint = match self.db.get_complaint(complaint_id).await {
            Ok(Some(c)) => c,
            Ok(None) => return,
            Err(e) => {
                tracing::warn!(complaint_id = %complaint_id, error = %e, "Failed to load parent complaint");
                return;
            }
        };

        let Some(notification) = reply_notification(reply, &complaint, event) else {
            return;
        };

        if let Err(e) = self.dispatcher.dispatch(&notification).await {
            tracing::error!(
                recipient = %notification.recipient_uid,
                error = %e,
                "Reply notification failed"
            );
        }
    }
}

/// Build a status-change notification, or `None` when nothing should go out
/// (status unchanged, or no owner to deliver to).
fn status_change_notification(event: &ChangeEvent<Complaint>) -> Option<NotificationEvent> {
    let before = event.before.as_ref()?;
    let after = event.after.as_ref()?;

    let old_status = before.status.as_deref().unwrap_or("");
    let new_status = after.status.as_deref().unwrap_or("");
    if old_status == new_status {
        return None;
    }

    let owner_uid = after.owner_uid.clone().filter(|u| !u.is_empty())?;
    let complaint_id = event.params.get("id").cloned().unwrap_or_default();
    let title = after.title.as_deref().unwrap_or("민원");

    let body = format!(
        "‘{}’ 상태가 ‘{}’로 변경되었습니다.",
        title,
        status_label(new_status)
    );

    let data = HashMap::from([
        (
            "type".to_string(),
            NotificationKind::StatusChanged.data_type().to_string(),
        ),
        ("complaintId".to_string(), complaint_id),
        ("ownerUid".to_string(), owner_uid.clone()),
        ("status".to_string(), new_status.to_string()),
    ]);

    Some(NotificationEvent {
        kind: NotificationKind::StatusChanged,
        recipient_uid: owner_uid,
        title: "민원 상태 변경".to_string(),
        body,
        data,
    })
}

/// Build an admin-reply notification, or `None` when the complaint has no
/// owner to deliver to.
fn reply_notification(
    reply: &Reply,
    complaint: &Complaint,
    event: &ChangeEvent<Reply>,
) -> Option<NotificationEvent> {
    let owner_uid = complaint.owner_uid.clone().filter(|u| !u.is_empty())?;
    let complaint_id = event.params.get("complaintId").cloned().unwrap_or_default();
    let reply_id = event.params.get("replyId").cloned().unwrap_or_default();

    let message = reply
        .message
        .as_deref()
        .unwrap_or("관리자가 답변을 추가했습니다.");

    let data = HashMap::from([
        (
            "type".to_string(),
            NotificationKind::ReplyAdded.data_type().to_string(),
        ),
        ("complaintId".to_string(), complaint_id),
        ("ownerUid".to_string(), owner_uid.clone()),
        ("replyId".to_string(), reply_id),
    ]);

    Some(NotificationEvent {
        kind: NotificationKind::ReplyAdded,
        recipient_uid: owner_uid,
        title: "민원 답변 등록".to_string(),
        body: truncate_body(message),
        data,
    })
}

/// Human label for a raw status value; unknown values pass through.
fn status_label(raw: &str) -> &str {
    match raw {
        "received" | "pending" => "접수",
        "processing" | "inProgress" => "처리중",
        "done" => "완료",
        other => other,
    }
}

/// Cap a reply body at 120 display characters (117 plus an ellipsis).
fn truncate_body(message: &str) -> String {
    if message.chars().count() > MAX_REPLY_BODY_CHARS {
        let head: String = message.chars().take(TRUNCATED_HEAD_CHARS).collect();
        format!("{}…", head)
    } else {
        message.to_string()
    }
}

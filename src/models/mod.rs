// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Data models for the application.
//!
//! Document models use camelCase field names because the stored schema
//! is owned by the complaint-tracker app itself.

pub mod admin;
pub mod complaint;
pub mod event;
pub mod user;

pub use admin::{AdminRecord, AdminRole, AuthorizationClaims};
pub use complaint::{Complaint, Reply};
pub use event::{ChangeEvent, NotificationEvent, NotificationKind};
pub use user::User;

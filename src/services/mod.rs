// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Services module - business logic layer.

pub mod admin;
pub mod claims;
pub mod gauth;
pub mod messaging;
pub mod notify;
pub mod tokens;
pub mod watcher;

pub use admin::{AdminService, CallerIdentity};
pub use claims::ClaimsService;
pub use gauth::GoogleAuthenticator;
pub use messaging::{DeliveryOutcome, FcmClient};
pub use notify::{DeliverySummary, NotificationDispatcher};
pub use tokens::TokenStore;
pub use watcher::ComplaintWatcher;

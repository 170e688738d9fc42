// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Minwon-Relay: reactive backend for the citizen-complaint tracker
//!
//! This crate reacts to document changes in the complaint store: it pushes
//! notifications to complaint owners on status changes and admin replies,
//! and keeps administrator authorization claims in sync with the admin
//! role records.

pub mod config;
pub mod db;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;

use config::Config;
use db::FirestoreDb;
use services::{ClaimsService, FcmClient};

/// Shared application state.
pub struct AppState {
    pub config: Config,
    pub db: FirestoreDb,
    pub fcm: FcmClient,
    pub claims: ClaimsService,
}

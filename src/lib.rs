// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Coach-Sync: session and schedule synchronization core for the coaching
//! client.
//!
//! This crate keeps the access credential and device id consistent across
//! restarts, silent re-authentication and logout, and keeps a local copy of
//! the training schedules in step with the server using conditional (ETag)
//! requests.

pub mod config;
pub mod db;
pub mod error;
pub mod models;
pub mod services;

use config::Config;
use db::CredentialStore;
use error::Result;
use services::{AuthSession, HttpApi, IdentityApi, ScheduleApi, ScheduleSynchronizer, SyncCache};
use std::sync::Arc;

/// Wired-up client core: one store, one transport, the session and the
/// schedule synchronizer sharing them.
#[derive(Clone)]
pub struct CoachClient {
    pub store: CredentialStore,
    pub auth: AuthSession,
    pub schedules: ScheduleSynchronizer,
}

impl CoachClient {
    /// Build a client over an HTTP transport and a file-backed store.
    pub fn from_config(config: &Config) -> Result<Self> {
        let store = CredentialStore::open(&config.store_path)?;
        let api = Arc::new(HttpApi::new(config)?);
        Ok(Self::with_api(store, api.clone(), api))
    }

    /// Build a client over any transport and store.
    pub fn with_api(
        store: CredentialStore,
        identity_api: Arc<dyn IdentityApi>,
        schedule_api: Arc<dyn ScheduleApi>,
    ) -> Self {
        let auth = AuthSession::new(identity_api, store.clone());
        let cache = SyncCache::new(store.clone());
        let schedules = ScheduleSynchronizer::new(schedule_api, auth.clone(), cache);
        Self {
            store,
            auth,
            schedules,
        }
    }
}

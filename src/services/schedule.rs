// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Training schedule synchronization.

use crate::error::{AppError, Result};
use crate::models::{ScheduleRecord, SyncRequestKey, Synced, TrainDetail};
use crate::services::api::{RegenerateOutcome, ScheduleApi};
use crate::services::auth::AuthSession;
use crate::services::sync_cache::SyncCache;
use std::sync::Arc;

/// Keeps the cached schedule collection consistent with the server.
#[derive(Clone)]
pub struct ScheduleSynchronizer {
    api: Arc<dyn ScheduleApi>,
    auth: AuthSession,
    cache: SyncCache,
}

impl ScheduleSynchronizer {
    pub fn new(api: Arc<dyn ScheduleApi>, auth: AuthSession, cache: SyncCache) -> Self {
        Self { api, auth, cache }
    }

    /// Current schedule collection.
    pub async fn load(&self) -> Result<Vec<ScheduleRecord>> {
        Ok(self.sync(&SyncRequestKey::schedules()).await?.value)
    }

    /// Schedule collection starting at `since` (unix seconds).
    pub async fn load_since(&self, since: i64) -> Result<Vec<ScheduleRecord>> {
        Ok(self.sync(&SyncRequestKey::schedules_since(since)).await?.value)
    }

    /// Conditional sync of one listing, reporting whether the server sent
    /// new content.
    pub async fn sync(&self, key: &SyncRequestKey) -> Result<Synced<Vec<ScheduleRecord>>> {
        let token = self.auth.bearer()?;
        let synced = self
            .cache
            .sync(key, |tag| async move {
                self.api
                    .list_schedules(&token, key.since, tag.as_deref())
                    .await
            })
            .await?;

        tracing::debug!(
            resource = %key,
            fresh = synced.fresh,
            count = synced.value.len(),
            "Schedules loaded"
        );
        Ok(synced)
    }

    /// Ask the server to regenerate schedules from the linked provider, then
    /// reload from scratch.
    pub async fn regenerate_and_reload(&self) -> Result<Vec<ScheduleRecord>> {
        self.regenerate(&SyncRequestKey::schedules()).await
    }

    /// `regenerate_and_reload` for the listing starting at `since`.
    pub async fn regenerate_since(&self, since: i64) -> Result<Vec<ScheduleRecord>> {
        self.regenerate(&SyncRequestKey::schedules_since(since)).await
    }

    /// The regenerate reply body is never used as data: on success the
    /// cache entry is dropped and the listing is fetched unconditionally.
    async fn regenerate(&self, key: &SyncRequestKey) -> Result<Vec<ScheduleRecord>> {
        let token = self.auth.bearer()?;

        match self.api.regenerate_schedules(&token, key.since).await? {
            RegenerateOutcome::NoUpstreamSource => {
                tracing::info!(resource = %key, "Regenerate refused, no linked provider");
                return Err(AppError::NoUpstreamSource);
            }
            RegenerateOutcome::Ack => {
                tracing::info!(resource = %key, "Schedules regenerated");
            }
        }

        self.cache.invalidate(key)?;
        Ok(self.sync(key).await?.value)
    }

    /// Laps and streams of one session (not cached).
    pub async fn detail(&self, session_id: &str) -> Result<TrainDetail> {
        let token = self.auth.bearer()?;
        self.api.schedule_detail(&token, session_id).await
    }
}

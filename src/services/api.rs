// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Remote endpoints consumed by the core.
//!
//! `HttpApi` implements these over HTTP; tests substitute a scripted fake.
//! Rejections are ordinary outcomes, not errors, so the session logic can
//! decide what a rejection means at each step. `Err` is reserved for
//! transport and decoding failures.

use crate::error::Result;
use crate::models::{FetchOutcome, Identity, Issued, Renewed, ScheduleRecord, TrainDetail};
use async_trait::async_trait;

/// Identity service reply to an authentication exchange.
#[derive(Debug, Clone)]
pub enum AuthReply<T> {
    Accepted(T),
    Rejected,
}

/// Reply to a schedule regeneration request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegenerateOutcome {
    /// Regenerated, or nothing new upstream.
    Ack,
    /// No third-party data source is linked to the account.
    NoUpstreamSource,
}

#[async_trait]
pub trait IdentityApi: Send + Sync {
    /// Exchange identifier and secret for a fresh credential.
    async fn login(&self, identifier: &str, secret: &str) -> Result<AuthReply<Issued>>;

    /// Create an account. Returns whether the server created it.
    async fn signup(&self, identifier: &str, secret: &str, name: &str) -> Result<bool>;

    /// Check an access token and resolve its identity.
    async fn validate_token(&self, access_token: &str) -> Result<AuthReply<Identity>>;

    /// Issue a new access token for a device. The renewal secret travels
    /// with the transport (cookie) and is never seen by the caller.
    async fn refresh_token(&self, device_id: &str) -> Result<AuthReply<Renewed>>;

    /// Ask the server to forget the device's renewal secret.
    async fn logout(&self, device_id: &str, access_token: &str) -> Result<()>;
}

#[async_trait]
pub trait ScheduleApi: Send + Sync {
    /// Conditional listing of training schedules.
    async fn list_schedules(
        &self,
        access_token: &str,
        since: Option<i64>,
        validation_tag: Option<&str>,
    ) -> Result<FetchOutcome<Vec<ScheduleRecord>>>;

    /// Pull new sessions from the linked provider into the server's store.
    async fn regenerate_schedules(
        &self,
        access_token: &str,
        since: Option<i64>,
    ) -> Result<RegenerateOutcome>;

    /// Laps and streams of one session.
    async fn schedule_detail(&self, access_token: &str, session_id: &str) -> Result<TrainDetail>;
}

// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Services module - session and synchronization logic.

pub mod api;
pub mod auth;
pub mod http;
pub mod schedule;
pub mod sync_cache;

pub use api::{AuthReply, IdentityApi, RegenerateOutcome, ScheduleApi};
pub use auth::{AuthSession, RestoreState};
pub use http::HttpApi;
pub use schedule::ScheduleSynchronizer;
pub use sync_cache::SyncCache;

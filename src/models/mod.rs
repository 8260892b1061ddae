// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Data models for the session and synchronization core.

pub mod cache;
pub mod schedule;
pub mod session;

pub use cache::{CacheEntry, FetchOutcome, SyncRequestKey, Synced, SCHEDULE_RESOURCE};
pub use schedule::{LapData, ScheduleRecord, StreamData, TrainDetail};
pub use session::{Account, Credential, Identity, Issued, Renewed, Session, UserInfo};

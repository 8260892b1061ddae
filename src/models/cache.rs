// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Conditional-fetch cache models.

use crate::db::keys;
use std::fmt;

/// Resource name of the training schedule listing.
pub const SCHEDULE_RESOURCE: &str = "schedule";

/// Identifies one cacheable resource: a name plus an optional date filter.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SyncRequestKey {
    pub resource: String,
    /// Unix timestamp (seconds) lower bound, if the listing is filtered
    pub since: Option<i64>,
}

impl SyncRequestKey {
    pub fn new(resource: impl Into<String>, since: Option<i64>) -> Self {
        Self {
            resource: resource.into(),
            since,
        }
    }

    /// The unfiltered schedule listing.
    pub fn schedules() -> Self {
        Self::new(SCHEDULE_RESOURCE, None)
    }

    /// The schedule listing starting at `since`.
    pub fn schedules_since(since: i64) -> Self {
        Self::new(SCHEDULE_RESOURCE, Some(since))
    }

    /// Store slot holding the validation tag.
    pub fn tag_key(&self) -> String {
        format!("{}{}", self, keys::ETAG_SUFFIX)
    }

    /// Store slot holding the cached value.
    pub fn value_key(&self) -> String {
        format!("{}{}", self, keys::CACHE_SUFFIX)
    }
}

impl fmt::Display for SyncRequestKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.since {
            Some(since) => write!(f, "{}@{}", self.resource, since),
            None => f.write_str(&self.resource),
        }
    }
}

/// A cached value and the tag the server attached to it.
///
/// A tag without a value is meaningless; `from_parts` turns that into a miss.
#[derive(Debug, Clone, PartialEq)]
pub struct CacheEntry<T> {
    pub tag: Option<String>,
    pub value: Option<T>,
}

impl<T> CacheEntry<T> {
    pub fn empty() -> Self {
        Self {
            tag: None,
            value: None,
        }
    }

    pub fn from_parts(tag: Option<String>, value: Option<T>) -> Self {
        match value {
            Some(value) => Self {
                tag,
                value: Some(value),
            },
            None => Self::empty(),
        }
    }

    /// Tag to send as the conditional-request validator.
    pub fn validator(&self) -> Option<&str> {
        self.tag.as_deref()
    }
}

/// What a conditional fetcher reports back.
#[derive(Debug, Clone, PartialEq)]
pub enum FetchOutcome<T> {
    /// The server confirmed the prior tag still matches.
    NotModified,
    /// New content, with the server's new tag (if it sent one).
    Fresh { value: T, tag: Option<String> },
}

/// Value returned by a sync, and whether the server just sent it.
#[derive(Debug, Clone, PartialEq)]
pub struct Synced<T> {
    pub fresh: bool,
    pub value: T,
}

// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Generic conditional-fetch cache over the credential store.
//!
//! A cached value is only ever replaced by content the server sent as fresh;
//! a `NotModified` reply serves the stored value unchanged.

use crate::db::CredentialStore;
use crate::error::{AppError, Result};
use crate::models::{CacheEntry, FetchOutcome, SyncRequestKey, Synced};
use serde::{de::DeserializeOwned, Serialize};
use std::future::Future;

/// Conditional synchronization of named resources.
#[derive(Clone)]
pub struct SyncCache {
    store: CredentialStore,
}

impl SyncCache {
    pub fn new(store: CredentialStore) -> Self {
        Self { store }
    }

    /// Read the cache entry for `key`.
    ///
    /// A tag without a value, or a value that no longer decodes, is a miss.
    pub fn entry<T: DeserializeOwned>(&self, key: &SyncRequestKey) -> CacheEntry<T> {
        let tag = self.store.get(&key.tag_key());
        let value = self.store.get(&key.value_key()).and_then(|raw| {
            serde_json::from_str(&raw)
                .map_err(|e| {
                    tracing::warn!(
                        resource = %key,
                        error = %e,
                        "Discarding undecodable cache entry"
                    );
                })
                .ok()
        });
        CacheEntry::from_parts(tag, value)
    }

    /// Synchronize `key` through `fetcher`, which receives the prior tag.
    ///
    /// Errors from the fetcher propagate and leave the entry untouched.
    pub async fn sync<T, F, Fut>(&self, key: &SyncRequestKey, fetcher: F) -> Result<Synced<T>>
    where
        T: Serialize + DeserializeOwned,
        F: FnOnce(Option<String>) -> Fut,
        Fut: Future<Output = Result<FetchOutcome<T>>>,
    {
        let entry = self.entry::<T>(key);
        let validator = entry.validator().map(String::from);
        tracing::debug!(resource = %key, conditional = validator.is_some(), "Syncing resource");

        match fetcher(validator).await? {
            FetchOutcome::NotModified => {
                let value = entry.value.ok_or_else(|| {
                    tracing::error!(resource = %key, "Not modified reported with nothing cached");
                    AppError::CacheInvariantViolation(format!(
                        "{} reported not modified but nothing is cached",
                        key
                    ))
                })?;
                tracing::debug!(resource = %key, "Cache hit (not modified)");
                Ok(Synced {
                    fresh: false,
                    value,
                })
            }
            FetchOutcome::Fresh { value, tag } => {
                self.store_entry(key, &value, tag.as_deref())?;
                tracing::info!(resource = %key, tag = ?tag, "Cache updated with fresh content");
                Ok(Synced { fresh: true, value })
            }
        }
    }

    /// Drop the entry; the next sync is unconditional.
    pub fn invalidate(&self, key: &SyncRequestKey) -> Result<()> {
        self.store.clear(&key.tag_key())?;
        self.store.clear(&key.value_key())?;
        tracing::info!(resource = %key, "Cache invalidated");
        Ok(())
    }

    /// Persist a fresh value and its tag.
    ///
    /// The old tag is cleared before the value is replaced, so an interrupted
    /// write leaves at worst a value with no tag, which only costs one
    /// unconditional fetch.
    fn store_entry<T: Serialize>(
        &self,
        key: &SyncRequestKey,
        value: &T,
        tag: Option<&str>,
    ) -> Result<()> {
        let raw = serde_json::to_string(value)
            .map_err(|e| AppError::Internal(anyhow::anyhow!("Failed to encode {}: {}", key, e)))?;

        self.store.clear(&key.tag_key())?;
        self.store.set(&key.value_key(), &raw)?;
        if let Some(tag) = tag {
            self.store.set(&key.tag_key(), tag)?;
        }
        Ok(())
    }
}

// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Durable key/value store for the session credential and synchronized
//! resource caches.
//!
//! Provides:
//! - Raw `get` / `set` / `clear` over opaque string values
//! - Typed access to the `Credential` pair
//! - `clear_all` for logout
//!
//! The file backend rewrites the whole map through a temp file and a rename,
//! so every write is a single atomic replacement on disk.

use crate::db::keys;
use crate::error::AppError;
use crate::models::Credential;
use dashmap::DashMap;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

/// Process-wide key/value store. Clones share the same state.
#[derive(Clone)]
pub struct CredentialStore {
    entries: Arc<DashMap<String, String>>,
    /// Backing file; `None` for the in-memory store.
    path: Option<Arc<PathBuf>>,
    /// Serializes snapshot-and-rewrite of the backing file.
    write_lock: Arc<Mutex<()>>,
}

impl CredentialStore {
    /// Open (or create on first write) a file-backed store.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, AppError> {
        let path = path.as_ref().to_path_buf();

        let entries = DashMap::new();
        if path.exists() {
            let raw = std::fs::read(&path).map_err(|e| {
                AppError::Storage(format!("Failed to read {}: {}", path.display(), e))
            })?;
            if !raw.is_empty() {
                let map: BTreeMap<String, String> = serde_json::from_slice(&raw).map_err(|e| {
                    AppError::Storage(format!("Corrupt store {}: {}", path.display(), e))
                })?;
                for (k, v) in map {
                    entries.insert(k, v);
                }
            }
        }

        tracing::debug!(path = %path.display(), keys = entries.len(), "Credential store opened");

        Ok(Self {
            entries: Arc::new(entries),
            path: Some(Arc::new(path)),
            write_lock: Arc::new(Mutex::new(())),
        })
    }

    /// Create an isolated in-memory store (nothing survives the process).
    pub fn in_memory() -> Self {
        Self {
            entries: Arc::new(DashMap::new()),
            path: None,
            write_lock: Arc::new(Mutex::new(())),
        }
    }

    // ─── Raw Contract ────────────────────────────────────────────

    /// Read a value.
    pub fn get(&self, key: &str) -> Option<String> {
        self.entries.get(key).map(|v| v.value().clone())
    }

    /// Assign a value. On failure the previous contents are untouched.
    pub fn set(&self, key: &str, value: &str) -> Result<(), AppError> {
        self.write(Write::Set(key, value))
    }

    /// Remove a value. Clearing an absent key is a no-op.
    pub fn clear(&self, key: &str) -> Result<(), AppError> {
        if !self.entries.contains_key(key) {
            return Ok(());
        }
        self.write(Write::Clear(key))
    }

    /// Remove every key: credential and all cached resources.
    pub fn clear_all(&self) -> Result<(), AppError> {
        self.write(Write::ClearAll)
    }

    /// All keys currently held, sorted.
    pub fn keys(&self) -> Vec<String> {
        let mut keys: Vec<String> = self.entries.iter().map(|e| e.key().clone()).collect();
        keys.sort();
        keys
    }

    // ─── Credential ──────────────────────────────────────────────

    /// The stored credential, only if both halves are present.
    pub fn credential(&self) -> Option<Credential> {
        let access_token = self.get(keys::ACCESS_TOKEN)?;
        let device_id = self.get(keys::DEVICE_ID)?;
        Some(Credential {
            access_token,
            device_id,
        })
    }

    pub fn access_token(&self) -> Option<String> {
        self.get(keys::ACCESS_TOKEN)
    }

    pub fn device_id(&self) -> Option<String> {
        self.get(keys::DEVICE_ID)
    }

    /// Persist a full credential.
    ///
    /// The device id is written first: a crash between the two writes leaves
    /// no access token, which readers treat as "no session".
    pub fn set_credential(&self, credential: &Credential) -> Result<(), AppError> {
        self.set(keys::DEVICE_ID, &credential.device_id)?;
        self.set(keys::ACCESS_TOKEN, &credential.access_token)
    }

    /// Replace only the access token (after a refresh).
    pub fn set_access_token(&self, access_token: &str) -> Result<(), AppError> {
        self.set(keys::ACCESS_TOKEN, access_token)
    }

    pub fn clear_credential(&self) -> Result<(), AppError> {
        self.clear(keys::ACCESS_TOKEN)?;
        self.clear(keys::DEVICE_ID)
    }

    /// Replace the whole store with a fresh credential in one write.
    ///
    /// Every other key (cached resources of a previous account) is dropped.
    /// On failure the previous contents are untouched.
    pub fn replace_with_credential(&self, credential: &Credential) -> Result<(), AppError> {
        self.write(Write::Replace(&[
            (keys::DEVICE_ID, credential.device_id.as_str()),
            (keys::ACCESS_TOKEN, credential.access_token.as_str()),
        ]))
    }

    // ─── Persistence ─────────────────────────────────────────────

    /// Apply one write: rewrite the backing file first, then the map.
    ///
    /// `ClearAll` never leaves data behind: if the rewrite fails the backing
    /// file is removed instead, and the map is emptied either way.
    fn write(&self, op: Write<'_>) -> Result<(), AppError> {
        let _guard = self
            .write_lock
            .lock()
            .map_err(|_| AppError::Storage("Store lock poisoned".to_string()))?;

        if let Some(path) = &self.path {
            let mut snapshot: BTreeMap<String, String> = self
                .entries
                .iter()
                .map(|e| (e.key().clone(), e.value().clone()))
                .collect();
            op.apply(&mut snapshot);

            if let Err(e) = persist(path, &snapshot) {
                if !matches!(op, Write::ClearAll) {
                    return Err(e);
                }
                self.entries.clear();
                tracing::warn!(error = %e, "Store rewrite failed, removing backing file");
                return discard(path).map_err(|_| e);
            }
        }

        match op {
            Write::Set(k, v) => {
                self.entries.insert(k.to_string(), v.to_string());
            }
            Write::Clear(k) => {
                self.entries.remove(k);
            }
            Write::ClearAll => self.entries.clear(),
            Write::Replace(pairs) => {
                self.entries
                    .retain(|k, _| pairs.iter().any(|(key, _)| *key == k.as_str()));
                for (k, v) in pairs {
                    self.entries.insert(k.to_string(), v.to_string());
                }
            }
        }
        Ok(())
    }
}

#[derive(Clone, Copy)]
enum Write<'a> {
    Set(&'a str, &'a str),
    Clear(&'a str),
    ClearAll,
    Replace(&'a [(&'a str, &'a str)]),
}

impl Write<'_> {
    fn apply(self, snapshot: &mut BTreeMap<String, String>) {
        match self {
            Write::Set(k, v) => {
                snapshot.insert(k.to_string(), v.to_string());
            }
            Write::Clear(k) => {
                snapshot.remove(k);
            }
            Write::ClearAll => snapshot.clear(),
            Write::Replace(pairs) => {
                snapshot.clear();
                for (k, v) in pairs {
                    snapshot.insert(k.to_string(), v.to_string());
                }
            }
        }
    }
}

/// Remove the backing file (and any stale temp file). A missing file is fine.
fn discard(path: &Path) -> Result<(), AppError> {
    let _ = std::fs::remove_file(path.with_extension("tmp"));
    match std::fs::remove_file(path) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(AppError::Storage(format!(
            "Failed to remove {}: {}",
            path.display(),
            e
        ))),
    }
}

/// Replace `path` with `snapshot` through a temp file and a rename.
fn persist(path: &Path, snapshot: &BTreeMap<String, String>) -> Result<(), AppError> {
    let bytes = serde_json::to_vec_pretty(snapshot)
        .map_err(|e| AppError::Storage(format!("Failed to serialize store: {}", e)))?;

    let tmp = path.with_extension("tmp");
    std::fs::write(&tmp, bytes)
        .map_err(|e| AppError::Storage(format!("Failed to write {}: {}", tmp.display(), e)))?;
    std::fs::rename(&tmp, path)
        .map_err(|e| AppError::Storage(format!("Failed to replace {}: {}", path.display(), e)))
}

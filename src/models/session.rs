// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Session credential and identity models.

use serde::{Deserialize, Serialize};
use std::fmt;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

/// Access token plus device identifier.
///
/// Either both halves are stored or the session is absent.
#[derive(Clone, PartialEq, Eq)]
pub struct Credential {
    /// Short-lived bearer token
    pub access_token: String,
    /// Long-lived installation id, paired server-side with the renewal secret
    pub device_id: String,
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credential")
            .field("access_token", &"<redacted>")
            .field("device_id", &self.device_id)
            .finish()
    }
}

/// Account profile resolved by the identity service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct Account {
    pub id: String,
    pub email: String,
    #[serde(default)]
    pub name: Option<String>,
    /// How the account signs in ("local", "google", ...)
    pub provider: String,
    #[serde(default)]
    pub info: Option<UserInfo>,
}

/// Optional body metrics and goals attached to an account.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct UserInfo {
    pub height: Option<f64>,
    pub weight: Option<f64>,
    pub age: Option<u32>,
    pub sex: Option<String>,
    pub train_goal: Option<String>,
}

/// Resolved identity plus the third-party providers linked to it.
#[derive(Debug, Clone, PartialEq)]
pub struct Identity {
    pub account: Account,
    pub connected: Vec<String>,
}

/// Successful login exchange.
#[derive(Debug, Clone)]
pub struct Issued {
    pub credential: Credential,
    pub identity: Identity,
}

/// Successful refresh exchange.
#[derive(Debug, Clone)]
pub struct Renewed {
    pub access_token: String,
    pub identity: Identity,
}

/// Result of establishing or restoring a session.
#[derive(Debug, Clone)]
pub struct Session {
    /// Newly issued credential; `None` when the stored one was still valid.
    pub credential: Option<Credential>,
    pub account: Account,
    pub connected: Vec<String>,
}

impl Session {
    pub(crate) fn new(credential: Option<Credential>, identity: Identity) -> Self {
        Self {
            credential,
            account: identity.account,
            connected: identity.connected,
        }
    }

    /// Whether a third-party provider (e.g. "strava") is linked.
    pub fn is_connected(&self, provider: &str) -> bool {
        self.connected.iter().any(|p| p.eq_ignore_ascii_case(provider))
    }
}

// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Session lifecycle: login, silent restore, logout.
//!
//! Restoring a stored session is a two-exchange protocol:
//! 1. Present the stored access token for validation
//! 2. If rejected, ask for a new access token keyed by the device id
//! 3. If that is rejected too, the session is expired
//!
//! `advance` is the whole state machine. A refresh reply always ends the
//! protocol, so there is never a second refresh attempt.

use crate::db::CredentialStore;
use crate::error::{AppError, Result};
use crate::models::{Credential, Identity, Renewed, Session};
use crate::services::api::{AuthReply, IdentityApi};
use std::sync::Arc;

/// Final state of a restore attempt.
#[derive(Debug, Clone)]
pub enum RestoreState {
    /// The stored access token was accepted as is.
    Valid(Identity),
    /// The stored token was rejected and a new one was issued.
    Refreshed(Renewed),
    /// Both exchanges were rejected.
    Expired,
}

/// A reply received during restore, tagged by the exchange that produced it.
#[derive(Debug, Clone)]
pub enum Exchange {
    Validated(AuthReply<Identity>),
    Refreshed(AuthReply<Renewed>),
}

/// What to do after an exchange.
#[derive(Debug, Clone)]
pub enum Step {
    /// Run the refresh exchange.
    Refresh,
    Done(RestoreState),
}

/// Restore state transition.
pub fn advance(exchange: Exchange) -> Step {
    match exchange {
        Exchange::Validated(AuthReply::Accepted(identity)) => {
            Step::Done(RestoreState::Valid(identity))
        }
        Exchange::Validated(AuthReply::Rejected) => Step::Refresh,
        Exchange::Refreshed(AuthReply::Accepted(renewed)) => {
            Step::Done(RestoreState::Refreshed(renewed))
        }
        Exchange::Refreshed(AuthReply::Rejected) => Step::Done(RestoreState::Expired),
    }
}

/// Authenticated identity of this client installation.
#[derive(Clone)]
pub struct AuthSession {
    api: Arc<dyn IdentityApi>,
    store: CredentialStore,
}

impl AuthSession {
    pub fn new(api: Arc<dyn IdentityApi>, store: CredentialStore) -> Self {
        Self { api, store }
    }

    /// Log in with identifier and secret.
    ///
    /// On success the store is replaced by the new credential in a single
    /// write, so another account's cached data never survives a login and a
    /// failed write keeps the previous session.
    pub async fn login(&self, identifier: &str, secret: &str) -> Result<Session> {
        let issued = match self.api.login(identifier, secret).await? {
            AuthReply::Accepted(issued) => issued,
            AuthReply::Rejected => {
                tracing::info!("Login rejected");
                return Err(AppError::InvalidCredentials);
            }
        };

        self.store.replace_with_credential(&issued.credential)?;

        tracing::info!(
            device_id = %issued.credential.device_id,
            connected = issued.identity.connected.len(),
            "Logged in"
        );
        Ok(Session::new(Some(issued.credential), issued.identity))
    }

    /// Silently restore the stored session.
    ///
    /// Fails with `NoSession` without any network call when nothing is
    /// stored, and with `SessionExpired` when validation and refresh are both
    /// rejected. The stored credential is only changed by a successful
    /// refresh.
    pub async fn login_with_token(&self) -> Result<Session> {
        let credential = self.store.credential().ok_or(AppError::NoSession)?;

        match self.restore(&credential).await? {
            RestoreState::Valid(identity) => {
                tracing::info!("Stored access token still valid");
                Ok(Session::new(None, identity))
            }
            RestoreState::Refreshed(renewed) => {
                self.store.set_access_token(&renewed.access_token)?;
                tracing::info!(device_id = %credential.device_id, "Access token refreshed");
                let credential = Credential {
                    access_token: renewed.access_token,
                    device_id: credential.device_id,
                };
                Ok(Session::new(Some(credential), renewed.identity))
            }
            RestoreState::Expired => {
                tracing::info!(device_id = %credential.device_id, "Session expired");
                Err(AppError::SessionExpired)
            }
        }
    }

    /// Drive `advance` from the validation exchange to a final state.
    async fn restore(&self, credential: &Credential) -> Result<RestoreState> {
        let mut exchange =
            Exchange::Validated(self.api.validate_token(&credential.access_token).await?);

        loop {
            match advance(exchange) {
                Step::Done(state) => return Ok(state),
                Step::Refresh => {
                    tracing::debug!("Access token rejected, trying refresh");
                    exchange =
                        Exchange::Refreshed(self.api.refresh_token(&credential.device_id).await?);
                }
            }
        }
    }

    /// Log out: best-effort server revocation, then unconditional local wipe.
    pub async fn logout(&self) -> Result<()> {
        if let (Some(device_id), Some(access_token)) =
            (self.store.device_id(), self.store.access_token())
        {
            if let Err(e) = self.api.logout(&device_id, &access_token).await {
                tracing::warn!(error = %e, "Server logout failed, clearing local session anyway");
            }
        }

        self.store.clear_all()?;
        tracing::info!("Logged out");
        Ok(())
    }

    /// Create an account. Does not log in.
    pub async fn signup(&self, identifier: &str, secret: &str, name: &str) -> Result<bool> {
        let created = self.api.signup(identifier, secret, name).await?;
        tracing::info!(created, "Signup finished");
        Ok(created)
    }

    /// Current access token for authorizing data requests.
    pub fn bearer(&self) -> Result<String> {
        self.store.access_token().ok_or(AppError::NoSession)
    }
}

// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Error types for the session and synchronization core.

/// Error type returned by every operation of the core.
///
/// The core never swallows or retries these; messaging and retry decisions
/// belong to the caller.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Invalid login credentials")]
    InvalidCredentials,

    #[error("No stored session")]
    NoSession,

    #[error("Session expired, please log in again")]
    SessionExpired,

    #[error("No linked training data provider")]
    NoUpstreamSource,

    #[error("Cache invariant violated: {0}")]
    CacheInvariantViolation(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Server returned HTTP {status}: {message}")]
    Api { status: u16, message: String },

    #[error("Credential store error: {0}")]
    Storage(String),

    #[error("Malformed response: {0}")]
    Decode(String),

    #[error("Internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    /// Whether the calling layer should show this error to the user.
    ///
    /// `NoSession` is silent (nothing to restore); invariant violations and
    /// storage failures are bugs or environment problems, not user input.
    pub fn is_user_facing(&self) -> bool {
        matches!(
            self,
            AppError::InvalidCredentials
                | AppError::SessionExpired
                | AppError::NoUpstreamSource
                | AppError::Network(_)
        )
    }

    /// Whether the caller must route the user to the login screen.
    pub fn requires_login(&self) -> bool {
        matches!(self, AppError::SessionExpired | AppError::NoSession)
    }
}

impl From<reqwest::Error> for AppError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            AppError::Decode(err.to_string())
        } else {
            AppError::Network(err.to_string())
        }
    }
}

/// Result type alias for core operations.
pub type Result<T> = std::result::Result<T, AppError>;


// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

use coach_sync::error::AppError;

#[test]
fn test_user_facing_errors() {
    assert!(AppError::InvalidCredentials.is_user_facing());
    assert!(AppError::SessionExpired.is_user_facing());
    assert!(AppError::NoUpstreamSource.is_user_facing());
    assert!(AppError::Network("connection reset".to_string()).is_user_facing());
}

#[test]
fn test_silent_errors() {
    assert!(!AppError::NoSession.is_user_facing());
    assert!(!AppError::CacheInvariantViolation("schedule".to_string()).is_user_facing());
    assert!(!AppError::Storage("disk full".to_string()).is_user_facing());
}

#[test]
fn test_requires_login() {
    assert!(AppError::SessionExpired.requires_login());
    assert!(AppError::NoSession.requires_login());

    assert!(!AppError::InvalidCredentials.requires_login());
    assert!(!AppError::NoUpstreamSource.requires_login());
    assert!(!AppError::Api {
        status: 500,
        message: "Internal Server Error".to_string()
    }
    .requires_login());
}

// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Session lifecycle tests: login, silent restore and logout.

use coach_sync::db::keys;
use coach_sync::error::AppError;

mod common;
use common::{fresh, logged_in_client, record, test_client};

#[tokio::test]
async fn test_login_persists_credential() {
    let (client, api) = test_client();

    let session = client
        .auth
        .login("runner@example.com", "hunter2")
        .await
        .unwrap();

    assert!(session.is_connected("strava"));
    let cred = session.credential.expect("login issues a credential");
    assert_eq!(cred.access_token, "access-1");
    assert_eq!(cred.device_id, "device-1");
    assert_eq!(client.store.credential(), Some(cred));
    assert_eq!(api.calls(), vec!["login"]);
}

#[tokio::test]
async fn test_login_rejected_is_invalid_credentials() {
    let (client, _api) = logged_in_client();

    let err = client
        .auth
        .login("runner@example.com", "wrong")
        .await
        .unwrap_err();

    assert!(matches!(err, AppError::InvalidCredentials));
    // Prior session untouched
    assert_eq!(client.store.access_token().as_deref(), Some("access-1"));
}

#[tokio::test]
async fn test_login_drops_previous_cache() {
    let (client, _api) = logged_in_client();
    client.store.set("schedule_etag", "old").unwrap();
    client.store.set("schedule_cache", "[]").unwrap();

    client
        .auth
        .login("runner@example.com", "hunter2")
        .await
        .unwrap();

    assert_eq!(client.store.get("schedule_etag"), None);
    assert_eq!(client.store.get("schedule_cache"), None);
}

#[tokio::test]
async fn test_restore_without_token_makes_no_network_call() {
    let (client, api) = test_client();

    let err = client.auth.login_with_token().await.unwrap_err();

    assert!(matches!(err, AppError::NoSession));
    assert!(api.calls().is_empty());
}

#[tokio::test]
async fn test_restore_with_partial_credential_is_no_session() {
    let (client, api) = test_client();
    client.store.set(keys::ACCESS_TOKEN, "access-1").unwrap();

    let err = client.auth.login_with_token().await.unwrap_err();

    assert!(matches!(err, AppError::NoSession));
    assert!(api.calls().is_empty());
}

#[tokio::test]
async fn test_restore_valid_token_keeps_credential() {
    let (client, api) = logged_in_client();

    let session = client.auth.login_with_token().await.unwrap();

    assert!(session.credential.is_none());
    assert_eq!(session.account.email, "runner@example.com");
    assert_eq!(client.store.access_token().as_deref(), Some("access-1"));
    assert_eq!(api.calls(), vec!["validate_token"]);
}

#[tokio::test]
async fn test_restore_refreshes_rejected_token() {
    let (client, api) = logged_in_client();
    *api.valid_token.lock().unwrap() = "access-2".to_string();
    *api.refresh_issues.lock().unwrap() = Some("access-2".to_string());

    let session = client.auth.login_with_token().await.unwrap();

    let cred = session.credential.expect("refresh issues a credential");
    assert_eq!(cred.access_token, "access-2");
    assert_eq!(cred.device_id, "device-1");
    assert_eq!(client.store.access_token().as_deref(), Some("access-2"));
    assert_eq!(client.store.device_id().as_deref(), Some("device-1"));
    assert_eq!(api.calls(), vec!["validate_token", "refresh_token"]);
}

#[tokio::test]
async fn test_restore_expires_after_single_refresh() {
    let (client, api) = logged_in_client();
    *api.valid_token.lock().unwrap() = "something-else".to_string();

    let err = client.auth.login_with_token().await.unwrap_err();

    assert!(matches!(err, AppError::SessionExpired));
    assert!(err.requires_login());
    // Exactly one refresh attempt, never retried
    assert_eq!(api.calls(), vec!["validate_token", "refresh_token"]);
    // Failed restore leaves the store as it was
    assert_eq!(client.store.access_token().as_deref(), Some("access-1"));
}

#[tokio::test]
async fn test_restore_network_failure_does_not_refresh() {
    let (client, api) = logged_in_client();
    *api.network_down.lock().unwrap() = true;

    let err = client.auth.login_with_token().await.unwrap_err();

    assert!(matches!(err, AppError::Network(_)));
    assert_eq!(api.calls(), vec!["validate_token"]);
    assert_eq!(client.store.access_token().as_deref(), Some("access-1"));
}

#[tokio::test]
async fn test_logout_clears_everything_when_server_unreachable() {
    let (client, api) = logged_in_client();
    api.push_listing(fresh(vec![record("a", 1)], "v1"));
    client.schedules.load().await.unwrap();
    assert!(client.store.get("schedule_etag").is_some());

    *api.logout_fails.lock().unwrap() = true;
    client.auth.logout().await.unwrap();

    for key in [
        keys::ACCESS_TOKEN,
        keys::DEVICE_ID,
        "schedule_etag",
        "schedule_cache",
    ] {
        assert_eq!(client.store.get(key), None, "{key} should be cleared");
    }
    assert!(api.calls().contains(&"logout"));
}

#[tokio::test]
async fn test_logout_without_session_skips_server() {
    let (client, api) = test_client();

    client.auth.logout().await.unwrap();

    assert!(api.calls().is_empty());
    assert!(client.store.keys().is_empty());
}

#[tokio::test]
async fn test_signup_does_not_log_in() {
    let (client, api) = test_client();

    let created = client
        .auth
        .signup("new@example.com", "pw", "New Runner")
        .await
        .unwrap();

    assert!(created);
    assert!(client.store.credential().is_none());
    assert_eq!(api.calls(), vec!["signup"]);
}

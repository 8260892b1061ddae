// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

use async_trait::async_trait;
use chrono::{TimeZone, Utc};
use coach_sync::db::CredentialStore;
use coach_sync::error::{AppError, Result};
use coach_sync::models::{
    Account, Credential, FetchOutcome, Identity, Issued, Renewed, ScheduleRecord, TrainDetail,
};
use coach_sync::services::{AuthReply, IdentityApi, RegenerateOutcome, ScheduleApi};
use coach_sync::CoachClient;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

/// Scripted stand-in for the coaching backend.
///
/// Every call is recorded by name so tests can assert which exchanges
/// happened and in what order.
pub struct FakeApi {
    pub calls: Mutex<Vec<&'static str>>,
    pub password: String,
    /// Access token the validation endpoint accepts.
    pub valid_token: Mutex<String>,
    /// Token issued by the next successful refresh; `None` rejects refresh.
    pub refresh_issues: Mutex<Option<String>>,
    /// Makes every call fail with a network error.
    pub network_down: Mutex<bool>,
    /// Makes only the logout call fail with a network error.
    pub logout_fails: Mutex<bool>,
    /// Replies for successive schedule listings.
    pub listings: Mutex<VecDeque<FetchOutcome<Vec<ScheduleRecord>>>>,
    /// Validation tags presented to the listing endpoint, in order.
    pub seen_tags: Mutex<Vec<Option<String>>>,
    pub regenerate: Mutex<RegenerateOutcome>,
}

impl Default for FakeApi {
    fn default() -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
            password: "hunter2".to_string(),
            valid_token: Mutex::new("access-1".to_string()),
            refresh_issues: Mutex::new(None),
            network_down: Mutex::new(false),
            logout_fails: Mutex::new(false),
            listings: Mutex::new(VecDeque::new()),
            seen_tags: Mutex::new(Vec::new()),
            regenerate: Mutex::new(RegenerateOutcome::Ack),
        }
    }
}

#[allow(dead_code)]
impl FakeApi {
    pub fn calls(&self) -> Vec<&'static str> {
        self.calls.lock().unwrap().clone()
    }

    pub fn seen_tags(&self) -> Vec<Option<String>> {
        self.seen_tags.lock().unwrap().clone()
    }

    pub fn push_listing(&self, outcome: FetchOutcome<Vec<ScheduleRecord>>) {
        self.listings.lock().unwrap().push_back(outcome);
    }

    fn record(&self, name: &'static str) -> Result<()> {
        self.calls.lock().unwrap().push(name);
        if *self.network_down.lock().unwrap() {
            return Err(AppError::Network("connection refused".to_string()));
        }
        Ok(())
    }
}

#[async_trait]
impl IdentityApi for FakeApi {
    async fn login(&self, identifier: &str, secret: &str) -> Result<AuthReply<Issued>> {
        self.record("login")?;
        if secret != self.password {
            return Ok(AuthReply::Rejected);
        }
        Ok(AuthReply::Accepted(Issued {
            credential: Credential {
                access_token: self.valid_token.lock().unwrap().clone(),
                device_id: "device-1".to_string(),
            },
            identity: identity(identifier),
        }))
    }

    async fn signup(&self, _identifier: &str, _secret: &str, _name: &str) -> Result<bool> {
        self.record("signup")?;
        Ok(true)
    }

    async fn validate_token(&self, access_token: &str) -> Result<AuthReply<Identity>> {
        self.record("validate_token")?;
        if access_token == *self.valid_token.lock().unwrap() {
            Ok(AuthReply::Accepted(identity("runner@example.com")))
        } else {
            Ok(AuthReply::Rejected)
        }
    }

    async fn refresh_token(&self, device_id: &str) -> Result<AuthReply<Renewed>> {
        self.record("refresh_token")?;
        match self.refresh_issues.lock().unwrap().clone() {
            Some(token) if device_id == "device-1" => Ok(AuthReply::Accepted(Renewed {
                access_token: token,
                identity: identity("runner@example.com"),
            })),
            _ => Ok(AuthReply::Rejected),
        }
    }

    async fn logout(&self, _device_id: &str, _access_token: &str) -> Result<()> {
        self.record("logout")?;
        if *self.logout_fails.lock().unwrap() {
            return Err(AppError::Network("connection reset".to_string()));
        }
        Ok(())
    }
}

#[async_trait]
impl ScheduleApi for FakeApi {
    async fn list_schedules(
        &self,
        _access_token: &str,
        _since: Option<i64>,
        validation_tag: Option<&str>,
    ) -> Result<FetchOutcome<Vec<ScheduleRecord>>> {
        self.record("list_schedules")?;
        self.seen_tags
            .lock()
            .unwrap()
            .push(validation_tag.map(String::from));
        self.listings
            .lock()
            .unwrap()
            .pop_front()
            .ok_or_else(|| AppError::Internal(anyhow::anyhow!("no scripted listing left")))
    }

    async fn regenerate_schedules(
        &self,
        _access_token: &str,
        _since: Option<i64>,
    ) -> Result<RegenerateOutcome> {
        self.record("regenerate_schedules")?;
        Ok(*self.regenerate.lock().unwrap())
    }

    async fn schedule_detail(&self, _access_token: &str, _session_id: &str) -> Result<TrainDetail> {
        self.record("schedule_detail")?;
        Ok(TrainDetail::default())
    }
}

pub fn identity(email: &str) -> Identity {
    Identity {
        account: Account {
            id: "user-1".to_string(),
            email: email.to_string(),
            name: Some("Runner".to_string()),
            provider: "local".to_string(),
            info: None,
        },
        connected: vec!["strava".to_string()],
    }
}

/// A schedule record dated `day` days into March 2025.
#[allow(dead_code)]
pub fn record(id: &str, day: u32) -> ScheduleRecord {
    ScheduleRecord {
        id: id.to_string(),
        train_date: Utc.with_ymd_and_hms(2025, 3, day, 7, 0, 0).unwrap(),
        distance: Some(5_000.0),
        avg_speed: Some(3.0),
        total_time: Some(1_650.0),
        title: Some(format!("Run {}", id)),
        analysis_note: None,
    }
}

#[allow(dead_code)]
pub fn fresh(records: Vec<ScheduleRecord>, tag: &str) -> FetchOutcome<Vec<ScheduleRecord>> {
    FetchOutcome::Fresh {
        value: records,
        tag: Some(tag.to_string()),
    }
}

/// Client over an isolated in-memory store and a fresh fake backend.
#[allow(dead_code)]
pub fn test_client() -> (CoachClient, Arc<FakeApi>) {
    test_client_with_store(CredentialStore::in_memory())
}

#[allow(dead_code)]
pub fn test_client_with_store(store: CredentialStore) -> (CoachClient, Arc<FakeApi>) {
    let api = Arc::new(FakeApi::default());
    let client = CoachClient::with_api(store, api.clone(), api.clone());
    (client, api)
}

/// Client with a credential already stored (no calls recorded).
#[allow(dead_code)]
pub fn logged_in_client() -> (CoachClient, Arc<FakeApi>) {
    let (client, api) = test_client();
    client
        .store
        .set_credential(&Credential {
            access_token: "access-1".to_string(),
            device_id: "device-1".to_string(),
        })
        .unwrap();
    (client, api)
}

// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! HTTP client for the coaching backend.
//!
//! Handles:
//! - Login, signup, token validation and refresh, logout
//! - Conditional schedule listing (`If-None-Match` / `304`)
//! - Schedule regeneration and session detail
//!
//! The client keeps a cookie store, so the renewal cookie set by the server
//! at login is replayed on refresh without this code ever reading it.

use crate::config::Config;
use crate::error::{AppError, Result};
use crate::models::{
    Account, Credential, FetchOutcome, Identity, Issued, Renewed, ScheduleRecord, TrainDetail,
};
use crate::services::api::{AuthReply, IdentityApi, RegenerateOutcome, ScheduleApi};
use async_trait::async_trait;
use reqwest::header::{ETAG, IF_NONE_MATCH};
use reqwest::StatusCode;
use serde::Deserialize;

/// Coaching backend client.
#[derive(Clone)]
pub struct HttpApi {
    http: reqwest::Client,
    base_url: String,
}

impl HttpApi {
    pub fn new(config: &Config) -> Result<Self> {
        let http = reqwest::Client::builder()
            .cookie_store(true)
            .timeout(config.http_timeout)
            .build()
            .map_err(|e| {
                AppError::Internal(anyhow::anyhow!("Failed to build HTTP client: {}", e))
            })?;

        Ok(Self {
            http,
            base_url: config.api_base_url.trim_end_matches('/').to_string(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Status codes the identity service uses to refuse an exchange.
    fn is_rejection(status: StatusCode) -> bool {
        matches!(
            status,
            StatusCode::BAD_REQUEST
                | StatusCode::UNAUTHORIZED
                | StatusCode::FORBIDDEN
                | StatusCode::NOT_FOUND
                | StatusCode::UNPROCESSABLE_ENTITY
        )
    }

    /// Turn a non-success response into an error.
    async fn error_for(response: reqwest::Response) -> AppError {
        let status = response.status();

        // Data endpoints: the access token is no longer accepted
        if status == StatusCode::UNAUTHORIZED {
            return AppError::SessionExpired;
        }

        let body = response.text().await.unwrap_or_default();
        tracing::warn!(status = status.as_u16(), "Coaching backend request failed");
        AppError::Api {
            status: status.as_u16(),
            message: body,
        }
    }

    /// Check response and parse JSON body.
    async fn check_response_json<T: for<'de> Deserialize<'de>>(
        response: reqwest::Response,
    ) -> Result<T> {
        if !response.status().is_success() {
            return Err(Self::error_for(response).await);
        }

        response
            .json()
            .await
            .map_err(|e| AppError::Decode(format!("JSON parse error: {}", e)))
    }

    /// Parse an authentication reply, mapping refusals to `Rejected`.
    async fn auth_reply(response: reqwest::Response) -> Result<AuthReply<LoginResponse>> {
        let status = response.status();
        if Self::is_rejection(status) {
            tracing::debug!(status = status.as_u16(), "Identity service rejected exchange");
            return Ok(AuthReply::Rejected);
        }
        Self::check_response_json(response)
            .await
            .map(AuthReply::Accepted)
    }
}

#[async_trait]
impl IdentityApi for HttpApi {
    async fn login(&self, identifier: &str, secret: &str) -> Result<AuthReply<Issued>> {
        let response = self
            .http
            .post(self.url("/auth/login"))
            .json(&serde_json::json!({ "email": identifier, "pwd": secret }))
            .send()
            .await?;

        match Self::auth_reply(response).await? {
            AuthReply::Accepted(body) => {
                let access_token = body.access_token()?;
                let device_id = body
                    .device_id
                    .clone()
                    .ok_or_else(|| AppError::Decode("Login response missing device_id".into()))?;
                Ok(AuthReply::Accepted(Issued {
                    credential: Credential {
                        access_token,
                        device_id,
                    },
                    identity: body.into_identity(),
                }))
            }
            AuthReply::Rejected => Ok(AuthReply::Rejected),
        }
    }

    async fn signup(&self, identifier: &str, secret: &str, name: &str) -> Result<bool> {
        let response = self
            .http
            .post(self.url("/auth/signup"))
            .json(&serde_json::json!({ "email": identifier, "pwd": secret, "name": name }))
            .send()
            .await?;

        if response.status().is_client_error() {
            tracing::info!(status = response.status().as_u16(), "Signup refused");
            return Ok(false);
        }
        Self::check_response_json(response).await
    }

    async fn validate_token(&self, access_token: &str) -> Result<AuthReply<Identity>> {
        let response = self
            .http
            .post(self.url("/auth/token"))
            .bearer_auth(access_token)
            .send()
            .await?;

        Ok(match Self::auth_reply(response).await? {
            AuthReply::Accepted(body) => AuthReply::Accepted(body.into_identity()),
            AuthReply::Rejected => AuthReply::Rejected,
        })
    }

    async fn refresh_token(&self, device_id: &str) -> Result<AuthReply<Renewed>> {
        let response = self
            .http
            .post(self.url("/auth/refresh"))
            .bearer_auth(device_id)
            .send()
            .await?;

        match Self::auth_reply(response).await? {
            AuthReply::Accepted(body) => {
                let access_token = body.access_token()?;
                Ok(AuthReply::Accepted(Renewed {
                    access_token,
                    identity: body.into_identity(),
                }))
            }
            AuthReply::Rejected => Ok(AuthReply::Rejected),
        }
    }

    async fn logout(&self, device_id: &str, access_token: &str) -> Result<()> {
        let response = self
            .http
            .post(self.url("/auth/logout"))
            .bearer_auth(access_token)
            .json(&serde_json::json!({ "device_id": device_id }))
            .send()
            .await?;

        if response.status().is_success() {
            return Ok(());
        }
        Err(Self::error_for(response).await)
    }
}

#[async_trait]
impl ScheduleApi for HttpApi {
    async fn list_schedules(
        &self,
        access_token: &str,
        since: Option<i64>,
        validation_tag: Option<&str>,
    ) -> Result<FetchOutcome<Vec<ScheduleRecord>>> {
        let mut request = self
            .http
            .get(self.url("/trainsession/fetch-schedules"))
            .bearer_auth(access_token);
        if let Some(since) = since {
            request = request.query(&[("date", since)]);
        }
        if let Some(tag) = validation_tag {
            request = request.header(IF_NONE_MATCH, tag);
        }

        let response = request.send().await?;

        if response.status() == StatusCode::NOT_MODIFIED {
            return Ok(FetchOutcome::NotModified);
        }
        if !response.status().is_success() {
            return Err(Self::error_for(response).await);
        }

        let header_tag = response
            .headers()
            .get(ETAG)
            .and_then(|v| v.to_str().ok())
            .map(ToString::to_string);

        let body: ListingBody = response
            .json()
            .await
            .map_err(|e| AppError::Decode(format!("Schedule listing: {}", e)))?;

        let (body_tag, records) = match body {
            ListingBody::Tagged { etag, data } => (etag, data),
            ListingBody::Bare(data) => (None, data),
        };

        Ok(FetchOutcome::Fresh {
            value: records,
            tag: header_tag.or(body_tag),
        })
    }

    async fn regenerate_schedules(
        &self,
        access_token: &str,
        since: Option<i64>,
    ) -> Result<RegenerateOutcome> {
        let mut request = self
            .http
            .get(self.url("/trainsession/fetch-new-schedules"))
            .bearer_auth(access_token);
        if let Some(since) = since {
            request = request.query(&[("date", since)]);
        }

        let response = request.send().await?;
        let status = response.status();

        if status.is_success() {
            return Ok(RegenerateOutcome::Ack);
        }
        // The backend answers 404 when no provider token is linked
        if status == StatusCode::NOT_FOUND {
            return Ok(RegenerateOutcome::NoUpstreamSource);
        }
        Err(Self::error_for(response).await)
    }

    async fn schedule_detail(&self, access_token: &str, session_id: &str) -> Result<TrainDetail> {
        let response = self
            .http
            .get(self.url(&format!("/trainsession/{}", session_id)))
            .bearer_auth(access_token)
            .send()
            .await?;

        Self::check_response_json(response).await
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Wire formats
// ─────────────────────────────────────────────────────────────────────────────

/// Reply body shared by login, token validation and refresh.
#[derive(Debug, Deserialize)]
struct LoginResponse {
    #[serde(default)]
    token: Option<TokenResponse>,
    user: Account,
    #[serde(default)]
    device_id: Option<String>,
    #[serde(default)]
    connected: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    #[serde(default)]
    access_token: Option<String>,
}

impl LoginResponse {
    fn access_token(&self) -> Result<String> {
        self.token
            .as_ref()
            .and_then(|t| t.access_token.clone())
            .ok_or_else(|| AppError::Decode("Response missing access_token".to_string()))
    }

    fn into_identity(self) -> Identity {
        Identity {
            account: self.user,
            connected: self.connected,
        }
    }
}

/// Schedule listing body: `{etag, data}` or a bare array.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ListingBody {
    Tagged {
        #[serde(default)]
        etag: Option<String>,
        data: Vec<ScheduleRecord>,
    },
    Bare(Vec<ScheduleRecord>),
}

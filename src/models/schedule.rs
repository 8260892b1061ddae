// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Training schedule models.
//!
//! Field names on the wire follow the coaching backend (`session_id`,
//! `activity_title`, `analysis_result`); the cached copy uses the same names
//! so a cached collection decodes exactly like a fresh one.

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

/// One training session in the schedule collection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct ScheduleRecord {
    /// Session id (collection key)
    #[serde(rename = "session_id")]
    pub id: String,
    /// When the session took place
    #[serde(deserialize_with = "deserialize_train_date")]
    pub train_date: DateTime<Utc>,
    /// Distance in meters
    #[serde(default)]
    pub distance: Option<f64>,
    /// Average speed in m/s
    #[serde(default)]
    pub avg_speed: Option<f64>,
    /// Total time in seconds
    #[serde(default)]
    pub total_time: Option<f64>,
    #[serde(default, rename = "activity_title")]
    pub title: Option<String>,
    #[serde(default, rename = "analysis_result")]
    pub analysis_note: Option<String>,
}

impl ScheduleRecord {
    /// Pace as `m:ss` per kilometer, if distance and time are both known.
    pub fn pace(&self) -> Option<String> {
        let distance = self.distance.filter(|d| *d > 0.0)?;
        let total_time = self.total_time.filter(|t| *t > 0.0)?;

        let secs_per_km = total_time / (distance / 1000.0);
        let mut min = (secs_per_km / 60.0).floor() as u64;
        let mut sec = (secs_per_km % 60.0).round() as u64;
        if sec == 60 {
            min += 1;
            sec = 0;
        }
        Some(format!("{}:{:02}", min, sec))
    }
}

/// Accepts RFC 3339 timestamps and offset-less ISO 8601 (read as UTC).
fn deserialize_train_date<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    if let Ok(dt) = DateTime::parse_from_rfc3339(&raw) {
        return Ok(dt.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(&raw, "%Y-%m-%dT%H:%M:%S%.f")
        .map(|naive| naive.and_utc())
        .map_err(|e| serde::de::Error::custom(format!("invalid train_date {:?}: {}", raw, e)))
}

/// Per-lap summary of a training session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct LapData {
    pub lap_index: u32,
    pub distance: f64,
    pub elapsed_time: u64,
    pub average_speed: f64,
    pub max_speed: f64,
    #[serde(default)]
    pub average_heartrate: Option<f64>,
    #[serde(default)]
    pub max_heartrate: Option<f64>,
    #[serde(default)]
    pub average_cadence: Option<f64>,
    #[serde(default)]
    pub elevation_gain: Option<f64>,
}

/// Sampled sensor streams of a training session.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct StreamData {
    pub heartrate: Option<Vec<f64>>,
    pub cadence: Option<Vec<f64>>,
    pub distance: Option<Vec<f64>>,
    pub velocity: Option<Vec<f64>>,
    pub altitude: Option<Vec<f64>>,
    pub time: Option<Vec<f64>>,
}

/// Laps and streams of one session.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct TrainDetail {
    #[serde(default)]
    pub laps: Option<Vec<LapData>>,
    #[serde(default)]
    pub stream: Option<StreamData>,
}

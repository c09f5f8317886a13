//! Wire DTOs for the Ludiks API.
//!
//! # Design
//! Field names follow the camelCase schema revision (`fullName`, not
//! `full_name`). Optional request fields are omitted from the JSON when
//! `None` so the server applies its own defaults. Response types are decoded
//! as-is; the client never interprets progression or reward data. Point and
//! streak counts are kept as `serde_json::Number` so integer and fractional
//! values both survive decoding unchanged.
//!
//! The mock-server crate defines its own copies of these shapes; the
//! end-to-end test catches drift between the two.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Number;

/// Open string-keyed map attached to a user.
pub type Metadata = HashMap<String, serde_json::Value>;

/// End-user identity sent on registration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    pub full_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub picture: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Metadata>,
}

impl User {
    pub fn new(id: impl Into<String>, full_name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            full_name: full_name.into(),
            email: None,
            picture: None,
            metadata: None,
        }
    }

    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }

    pub fn with_picture(mut self, picture: impl Into<String>) -> Self {
        self.picture = Some(picture.into());
        self
    }

    pub fn with_metadata(mut self, key: impl Into<String>, value: serde_json::Value) -> Self {
        self.metadata
            .get_or_insert_with(Metadata::new)
            .insert(key.into(), value);
        self
    }
}

/// Body of `POST /api/tracking`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TrackEvent {
    pub user_id: String,
    pub event_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<f64>,
    /// Server assigns the current time when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<DateTime<Utc>>,
}

impl TrackEvent {
    pub fn new(user_id: impl Into<String>, event_name: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            event_name: event_name.into(),
            value: None,
            timestamp: None,
        }
    }

    pub fn with_value(mut self, value: f64) -> Self {
        self.value = Some(value);
        self
    }

    pub fn with_timestamp(mut self, timestamp: DateTime<Utc>) -> Self {
        self.timestamp = Some(timestamp);
        self
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RewardName {
    pub name: String,
}

/// Result of a tracking call.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct TrackEventResponse {
    pub success: bool,
    pub updated: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    pub step_completed: bool,
    pub circuit_completed: bool,
    pub already_completed: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub points: Option<Number>,
    pub rewards: Vec<RewardName>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum CircuitStatus {
    NotStarted,
    InProgress,
    Completed,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct StepProgression {
    pub id: String,
    pub name: String,
    pub points: Number,
    pub status: String,
    pub completed_at: Option<String>,
    pub completion_threshold: Number,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct CircuitProgression {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub circuit_type: String,
    pub points: Number,
    pub status: CircuitStatus,
    pub start_date: Option<String>,
    pub completed_at: Option<String>,
    pub step_progressions: Vec<StepProgression>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct UserReward {
    pub id: String,
    pub name: String,
    pub description: String,
    pub obtained_at: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub step_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub step_name: Option<String>,
    pub circuit_id: String,
    pub circuit_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unlock_on_circuit_completion: Option<bool>,
}

/// A user's progress profile as returned by `GET /api/end-user/{id}`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct LudiksProfile {
    pub id: String,
    pub full_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub picture: Option<String>,
    #[serde(default)]
    pub metadata: Metadata,
    pub progressions: Vec<CircuitProgression>,
    pub rewards: Vec<UserReward>,
    pub current_streak: Number,
    pub longest_streak: Number,
    pub created_at: String,
    pub last_login: String,
}

//! Stateless HTTP request builder and response parser for the Ludiks API.
//!
//! # Design
//! `LudiksClient` holds a resolved base URL and API key and nothing else.
//! Each operation is split into a `build_*` method that produces an
//! `HttpRequest` and a `parse_*` method that consumes an `HttpResponse`. The
//! caller executes the round-trip in between, keeping this layer
//! deterministic and free of I/O.

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use tracing::warn;

use crate::config::Config;
use crate::error::LudiksError;
use crate::http::{HttpMethod, HttpRequest, HttpResponse};
use crate::types::{LudiksProfile, TrackEvent, TrackEventResponse, User};

pub const END_USER_PATH: &str = "/api/end-user";
pub const TRACKING_PATH: &str = "/api/tracking";

/// Request builder bound to one API key and base URL.
#[derive(Debug, Clone)]
pub struct LudiksClient {
    base_url: String,
    api_key: String,
}

impl LudiksClient {
    pub fn new(base_url: &str, api_key: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(&config.base_url, &config.api_key)
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// A request to `path` carrying the JSON content type and bearer token.
    pub fn request(&self, method: HttpMethod, path: &str, body: Option<String>) -> HttpRequest {
        HttpRequest {
            method,
            url: format!("{}{path}", self.base_url),
            headers: vec![
                ("content-type".to_string(), "application/json".to_string()),
                ("authorization".to_string(), format!("Bearer {}", self.api_key)),
            ],
            body,
        }
    }

    /// Like `request`, serializing `body` to JSON when present.
    pub fn build_json<T: Serialize + ?Sized>(
        &self,
        method: HttpMethod,
        path: &str,
        body: Option<&T>,
    ) -> Result<HttpRequest, LudiksError> {
        let body = body.map(encode).transpose()?;
        Ok(self.request(method, path, body))
    }

    pub fn build_init_user(&self, user: &User) -> Result<HttpRequest, LudiksError> {
        self.build_json(HttpMethod::Post, END_USER_PATH, Some(user))
    }

    pub fn build_track_event(&self, event: &TrackEvent) -> Result<HttpRequest, LudiksError> {
        self.build_json(HttpMethod::Post, TRACKING_PATH, Some(event))
    }

    pub fn build_get_profile(&self, user_id: &str) -> HttpRequest {
        let path = format!("{END_USER_PATH}/{}", urlencoding::encode(user_id));
        self.request(HttpMethod::Get, &path, None)
    }

    /// Registration has no meaningful success body; only the status matters.
    pub fn parse_init_user(&self, response: HttpResponse) -> Result<(), LudiksError> {
        check_status(&response)
    }

    pub fn parse_track_event(
        &self,
        response: HttpResponse,
    ) -> Result<TrackEventResponse, LudiksError> {
        parse_json(response)
    }

    pub fn parse_get_profile(&self, response: HttpResponse) -> Result<LudiksProfile, LudiksError> {
        parse_json(response)
    }
}

fn encode<T: Serialize + ?Sized>(body: &T) -> Result<String, LudiksError> {
    serde_json::to_string(body).map_err(|e| LudiksError::Encode(e.to_string()))
}

/// Check the status, then decode the body. An empty body decodes as `null`.
pub fn parse_json<T: DeserializeOwned>(response: HttpResponse) -> Result<T, LudiksError> {
    check_status(&response)?;
    let body = if response.body.trim().is_empty() {
        "null"
    } else {
        response.body.as_str()
    };
    serde_json::from_str(body).map_err(|e| LudiksError::Decode(e.to_string()))
}

/// Map a non-2xx response to `LudiksError::Request`.
pub fn check_status(response: &HttpResponse) -> Result<(), LudiksError> {
    if response.is_success() {
        return Ok(());
    }
    let message = match error_message(&response.body) {
        Some(message) => message,
        None => {
            warn!(status = response.status, "error body carried no message");
            format!("request failed with status {}", response.status)
        }
    };
    Err(LudiksError::Request {
        status: response.status,
        message,
    })
}

/// The `message` field of a JSON error body, if there is one.
///
/// Validation errors carry a list of strings; those are joined with `", "`.
pub fn error_message(body: &str) -> Option<String> {
    #[derive(serde::Deserialize)]
    struct ErrorBody {
        message: Option<Value>,
    }
    let message = match serde_json::from_str::<ErrorBody>(body).ok()?.message? {
        Value::String(message) => message,
        Value::Array(items) => items
            .iter()
            .filter_map(Value::as_str)
            .collect::<Vec<_>>()
            .join(", "),
        _ => return None,
    };
    Some(message).filter(|m| !m.is_empty())
}

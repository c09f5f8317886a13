//! The `Ludiks` facade: register users, track events, read profiles.
//!
//! # Design
//! Each call resolves an `Auth` into one key and base URL, builds a request
//! with `LudiksClient`, sends it once, and parses the answer. Nothing is
//! retried or cached. The `*_with` methods take the explicit option records
//! and never consult the global configuration.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use ludiks_core::{
    Auth, Credentials, LudiksClient, LudiksError, LudiksProfile, TrackEvent, TrackEventResponse,
    User,
};
use tracing::error;

use crate::transport::{send, HttpTransport, ReqwestTransport};

/// Explicit-form arguments for `init_user_with`.
#[derive(Debug, Clone)]
pub struct InitUserOptions {
    pub api_key: String,
    pub user: User,
    pub base_url: Option<String>,
}

/// Explicit-form arguments for `track_event_with`.
#[derive(Debug, Clone)]
pub struct TrackEventOptions {
    pub api_key: String,
    pub user_id: String,
    pub event_name: String,
    pub value: Option<f64>,
    pub timestamp: Option<DateTime<Utc>>,
    pub base_url: Option<String>,
}

/// Explicit-form arguments for `get_profile_with`.
#[derive(Debug, Clone)]
pub struct GetProfileOptions {
    pub api_key: String,
    pub user_id: String,
    pub base_url: Option<String>,
}

fn explicit(api_key: &str, base_url: &Option<String>) -> Auth {
    Auth::Explicit(Credentials {
        api_key: api_key.to_string(),
        base_url: base_url.clone(),
    })
}

/// Async Ludiks client over a pluggable transport.
#[derive(Clone)]
pub struct Ludiks {
    transport: Arc<dyn HttpTransport>,
}

impl Default for Ludiks {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for Ludiks {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Ludiks").finish_non_exhaustive()
    }
}

impl Ludiks {
    pub fn new() -> Self {
        Self::with_transport(ReqwestTransport::new())
    }

    pub fn with_transport(transport: impl HttpTransport + 'static) -> Self {
        Self {
            transport: Arc::new(transport),
        }
    }

    pub fn with_shared_transport(transport: Arc<dyn HttpTransport>) -> Self {
        Self { transport }
    }

    /// `POST /api/end-user`. Succeeds with no value on any 2xx status.
    pub async fn init_user(&self, user: &User, auth: &Auth) -> Result<(), LudiksError> {
        let client = LudiksClient::from_config(&auth.resolve()?);
        let request = client.build_init_user(user)?;
        let response = send(self.transport.as_ref(), request).await?;
        client.parse_init_user(response)
    }

    /// `POST /api/tracking`.
    ///
    /// Failures after credentials resolve are logged at `error` level and
    /// then returned unchanged.
    pub async fn track_event(
        &self,
        event: &TrackEvent,
        auth: &Auth,
    ) -> Result<TrackEventResponse, LudiksError> {
        let client = LudiksClient::from_config(&auth.resolve()?);
        let result = async {
            let request = client.build_track_event(event)?;
            let response = send(self.transport.as_ref(), request).await?;
            client.parse_track_event(response)
        }
        .await;

        if let Err(err) = &result {
            error!(
                user_id = %event.user_id,
                event_name = %event.event_name,
                error = %err,
                "Ludiks trackEvent error"
            );
        }
        result
    }

    /// `GET /api/end-user/{userId}`.
    pub async fn get_profile(
        &self,
        user_id: &str,
        auth: &Auth,
    ) -> Result<LudiksProfile, LudiksError> {
        let client = LudiksClient::from_config(&auth.resolve()?);
        let request = client.build_get_profile(user_id);
        let response = send(self.transport.as_ref(), request).await?;
        client.parse_get_profile(response)
    }

    pub async fn init_user_with(&self, options: &InitUserOptions) -> Result<(), LudiksError> {
        let auth = explicit(&options.api_key, &options.base_url);
        self.init_user(&options.user, &auth).await
    }

    pub async fn track_event_with(
        &self,
        options: &TrackEventOptions,
    ) -> Result<TrackEventResponse, LudiksError> {
        let auth = explicit(&options.api_key, &options.base_url);
        let event = TrackEvent {
            user_id: options.user_id.clone(),
            event_name: options.event_name.clone(),
            value: options.value,
            timestamp: options.timestamp,
        };
        self.track_event(&event, &auth).await
    }

    pub async fn get_profile_with(
        &self,
        options: &GetProfileOptions,
    ) -> Result<LudiksProfile, LudiksError> {
        let auth = explicit(&options.api_key, &options.base_url);
        self.get_profile(&options.user_id, &auth).await
    }
}

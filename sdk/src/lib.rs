//! Async client SDK for the Ludiks gamification API.
//!
//! # Overview
//! Two calling forms share one set of operations:
//!
//! - **Global form**: call [`configure`] once, then use [`init_user`],
//!   [`track_event`] and [`get_profile`] with only the operation's own
//!   arguments.
//! - **Explicit form**: pass an options record carrying the API key (and
//!   optionally a base URL) to [`init_user_with`], [`track_event_with`] or
//!   [`get_profile_with`]. The global configuration is never read.
//!
//! Hosts that prefer dependency injection construct a [`Ludiks`] with their
//! own transport and pass an [`Auth`] to each call.
//!
//! The free functions build a fresh [`Ludiks`] per call, so they work from
//! any async runtime. Hold a [`Ludiks`] to reuse pooled connections.
//!
//! ```no_run
//! # async fn demo() -> Result<(), ludiks::LudiksError> {
//! ludiks::configure("sk_live_xxx", None);
//! ludiks::init_user(&ludiks::User::new("user-1", "Ada Lovelace")).await?;
//! let result = ludiks::track_event("user-1", "lesson_completed", None, None).await?;
//! println!("step completed: {}", result.step_completed);
//! # Ok(())
//! # }
//! ```

pub mod api;
pub mod facade;
pub mod legacy;
pub mod transport;

use chrono::{DateTime, Utc};

pub use api::ApiClient;
pub use facade::{GetProfileOptions, InitUserOptions, Ludiks, TrackEventOptions};
pub use legacy::LegacySdk;
pub use ludiks_core::{
    configure, configure_from_env, get_config, Auth, CircuitProgression, CircuitStatus, Config,
    Credentials, HttpMethod, HttpRequest, HttpResponse, LudiksError, LudiksProfile, Metadata,
    RewardName, StepProgression, TrackEvent, TrackEventResponse, User, UserReward,
    DEFAULT_BASE_URL,
};
pub use transport::{HttpTransport, ReqwestTransport};

/// Register `user` using the global configuration.
pub async fn init_user(user: &User) -> Result<(), LudiksError> {
    Ludiks::new().init_user(user, &Auth::Global).await
}

/// Track `event_name` for `user_id` using the global configuration.
pub async fn track_event(
    user_id: &str,
    event_name: &str,
    value: Option<f64>,
    timestamp: Option<DateTime<Utc>>,
) -> Result<TrackEventResponse, LudiksError> {
    let event = TrackEvent {
        user_id: user_id.to_string(),
        event_name: event_name.to_string(),
        value,
        timestamp,
    };
    Ludiks::new().track_event(&event, &Auth::Global).await
}

/// Fetch the profile of `user_id` using the global configuration.
pub async fn get_profile(user_id: &str) -> Result<LudiksProfile, LudiksError> {
    Ludiks::new().get_profile(user_id, &Auth::Global).await
}

pub async fn init_user_with(options: &InitUserOptions) -> Result<(), LudiksError> {
    Ludiks::new().init_user_with(options).await
}

pub async fn track_event_with(
    options: &TrackEventOptions,
) -> Result<TrackEventResponse, LudiksError> {
    Ludiks::new().track_event_with(options).await
}

pub async fn get_profile_with(options: &GetProfileOptions) -> Result<LudiksProfile, LudiksError> {
    Ludiks::new().get_profile_with(options).await
}

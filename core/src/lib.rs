//! I/O-free core of the Ludiks SDK.
//!
//! # Overview
//! Builds `HttpRequest` values and parses `HttpResponse` values for the Ludiks
//! gamification API without touching the network (host-does-IO pattern).
//! The async `ludiks` crate supplies the transport.
//!
//! # Design
//! - `LudiksClient` holds only a resolved base URL and API key.
//! - Each operation is split into `build_*` and `parse_*`.
//! - `config` owns credential resolution and the process-wide configuration
//!   record used by the global calling form.

pub mod client;
pub mod config;
pub mod error;
pub mod http;
pub mod types;

pub use client::LudiksClient;
pub use config::{
    configure, configure_from_env, get_config, Auth, Config, Credentials, DEFAULT_BASE_URL,
};
pub use error::LudiksError;
pub use http::{HttpMethod, HttpRequest, HttpResponse};
pub use types::{
    CircuitProgression, CircuitStatus, LudiksProfile, Metadata, RewardName, StepProgression,
    TrackEvent, TrackEventResponse, User, UserReward,
};

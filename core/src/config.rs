//! Credential resolution and the process-wide configuration record.
//!
//! # Design
//! Every call resolves to exactly one API key and one base URL. `Auth`
//! selects where they come from:
//!
//! - `Auth::Explicit` carries its own key and optional base URL, falling back
//!   to `DEFAULT_BASE_URL`. It never reads the global record.
//! - `Auth::Global` reads the record written by `configure`.
//!
//! The global record sits behind an `RwLock`. Writes are last-write-wins and
//! nothing makes a `configure`/`get_config` pair atomic; hosts that
//! reconfigure while calls are in flight may see either value.

use std::sync::{PoisonError, RwLock};

use crate::error::LudiksError;

pub const DEFAULT_BASE_URL: &str = "https://api.ludiks.io";

pub const API_KEY_ENV: &str = "LUDIKS_API_KEY";
pub const BASE_URL_ENV: &str = "LUDIKS_BASE_URL";

static GLOBAL: RwLock<Option<Config>> = RwLock::new(None);

/// Fully resolved key and base URL for one request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub api_key: String,
    pub base_url: String,
}

impl Config {
    pub fn new(api_key: impl Into<String>, base_url: Option<&str>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: base_url.unwrap_or(DEFAULT_BASE_URL).to_string(),
        }
    }

    /// Read `LUDIKS_API_KEY` and, optionally, `LUDIKS_BASE_URL`.
    pub fn from_env() -> Result<Self, LudiksError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, LudiksError> {
        let api_key = lookup(API_KEY_ENV)
            .filter(|k| !k.is_empty())
            .ok_or(LudiksError::NotConfigured)?;
        let base_url = lookup(BASE_URL_ENV).filter(|u| !u.is_empty());
        Ok(Self::new(api_key, base_url.as_deref()))
    }
}

/// Per-call credentials for the explicit calling form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credentials {
    pub api_key: String,
    pub base_url: Option<String>,
}

impl Credentials {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: None,
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }
}

/// Which calling convention a request uses.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Auth {
    Explicit(Credentials),
    Global,
}

impl Auth {
    pub fn resolve(&self) -> Result<Config, LudiksError> {
        match self {
            Auth::Explicit(creds) => Ok(Config::new(
                creds.api_key.clone(),
                creds.base_url.as_deref(),
            )),
            Auth::Global => get_config(),
        }
    }
}

impl From<Credentials> for Auth {
    fn from(creds: Credentials) -> Self {
        Auth::Explicit(creds)
    }
}

/// Store the process-wide API key and base URL. Last write wins.
pub fn configure(api_key: impl Into<String>, base_url: Option<&str>) {
    let config = Config::new(api_key, base_url);
    *GLOBAL.write().unwrap_or_else(PoisonError::into_inner) = Some(config);
}

/// Configure from `LUDIKS_API_KEY` / `LUDIKS_BASE_URL`.
pub fn configure_from_env() -> Result<(), LudiksError> {
    let config = Config::from_env()?;
    configure(config.api_key, Some(&config.base_url));
    Ok(())
}

/// The stored configuration, or `NotConfigured` if `configure` never ran.
pub fn get_config() -> Result<Config, LudiksError> {
    GLOBAL
        .read()
        .unwrap_or_else(PoisonError::into_inner)
        .clone()
        .ok_or(LudiksError::NotConfigured)
}

use std::time::Duration;

use log::info;
use serde::Deserialize;
use thiserror::Error;
use userdir_states::DEFAULT_RETENTION;

/// Base URL of the public fake user store the panel talks to by default.
pub const DEFAULT_API_BASE_URL: &str = "https://fakestoreapi.com/users";

/// Prefix of the environment variables read by [`BusinessConfig::from_env`].
pub const ENV_PREFIX: &str = "USERDIR_";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read configuration from environment: {0}")]
    Env(#[from] serde_env::Error),
    #[error("Invalid API base URL: {0:?}")]
    InvalidBaseUrl(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BusinessConfig {
    /// Root of the user service; list/create hit `{api_base_url}/`, entity
    /// routes hit `{api_base_url}/{id}`.
    pub api_base_url: String,
    /// How long an unsubscribed cache entry survives.
    pub retention: Duration,
    /// Optional static `Cookie` header sent with every request, on top of the
    /// cookies the client collects from responses.
    pub cookie: Option<String>,
}

/// Raw environment shape, e.g. `USERDIR_API_BASE_URL`.
#[derive(Debug, Default, Deserialize)]
struct RawConfig {
    api_base_url: Option<String>,
    retention_secs: Option<u64>,
    cookie: Option<String>,
}

impl BusinessConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            api_base_url: base_url.into(),
            ..Self::default()
        }
    }

    pub fn with_retention(mut self, retention: Duration) -> Self {
        self.retention = retention;
        self
    }

    pub fn with_cookie(mut self, cookie: impl Into<String>) -> Self {
        self.cookie = Some(cookie.into());
        self
    }

    /// Base URL without a trailing slash.
    pub fn api_url(&self) -> &str {
        self.api_base_url.trim_end_matches('/')
    }

    /// Build a configuration from `USERDIR_*` environment variables, falling
    /// back to defaults for anything unset.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_vars(std::env::vars())
    }

    pub fn from_vars<I, K, V>(vars: I) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<String>,
    {
        let scoped: Vec<(String, String)> = vars
            .into_iter()
            .filter_map(|(key, value)| {
                key.as_ref()
                    .strip_prefix(ENV_PREFIX)
                    .map(|name| (name.to_owned(), value.into()))
            })
            .collect();

        let raw: RawConfig = serde_env::from_iter(scoped)?;
        Self::from_raw(raw)
    }

    fn from_raw(raw: RawConfig) -> Result<Self, ConfigError> {
        let RawConfig {
            api_base_url,
            retention_secs,
            cookie,
        } = raw;

        let api_base_url = match api_base_url {
            Some(url) if url.trim().is_empty() => return Err(ConfigError::InvalidBaseUrl(url)),
            Some(url) => {
                info!("Using provided API base URL: {url}");
                url.trim().to_owned()
            }
            None => DEFAULT_API_BASE_URL.to_owned(),
        };

        if !api_base_url.starts_with("http://") && !api_base_url.starts_with("https://") {
            return Err(ConfigError::InvalidBaseUrl(api_base_url));
        }

        Ok(Self {
            api_base_url,
            retention: retention_secs.map_or(DEFAULT_RETENTION, Duration::from_secs),
            cookie: cookie.filter(|c| !c.trim().is_empty()),
        })
    }
}

impl Default for BusinessConfig {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.to_owned(),
            retention: DEFAULT_RETENTION,
            cookie: None,
        }
    }
}

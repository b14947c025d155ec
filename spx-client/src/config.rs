use std::{fmt, time::Duration};

use spx_core::env::{EnvProvider, StandardEnv};
use thiserror::Error;
use url::Url;

/// Required: the product key sent with every request.
pub const PRODUCT_KEY_VAR: &str = "SPX_PRODUCT_KEY";

/// Optional: the server base URL.
pub const API_URL_VAR: &str = "SPX_API_URL";

/// Optional: per-request timeout in seconds.
pub const REQUEST_TIMEOUT_VAR: &str = "SPX_REQUEST_TIMEOUT_SECS";

pub const DEFAULT_API_URL: &str = "http://localhost:8000";

pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Errors that can occur while loading a [`Config`].
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("environment variable SPX_PRODUCT_KEY is required")]
    MissingProductKey,

    #[error("invalid server address {value:?}")]
    InvalidAddress {
        value: String,
        #[source]
        source: url::ParseError,
    },

    #[error("server address {0:?} must be an http or https URL")]
    UnsupportedAddress(String),

    #[error("invalid SPX_REQUEST_TIMEOUT_SECS value {0:?}, expected a positive number of seconds")]
    InvalidTimeout(String),
}

/// A product key. Its value is never printed by `Debug` or `Display`.
#[derive(Clone, PartialEq, Eq)]
pub struct ProductKey(String);

impl ProductKey {
    /// Returns the key for use in a request header.
    #[must_use]
    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for ProductKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ProductKey(***)")
    }
}

impl fmt::Display for ProductKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("***")
    }
}

/// Connection settings for an SPX server.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub address: Url,
    pub product_key: ProductKey,
    pub request_timeout: Duration,
}

impl Config {
    /// Creates a config with the default request timeout.
    ///
    /// # Errors
    ///
    /// Returns an error if `address` is not an absolute http(s) URL.
    pub fn new(address: &str, product_key: impl Into<String>) -> Result<Self, ConfigError> {
        Ok(Self {
            address: parse_address(address)?,
            product_key: ProductKey(product_key.into()),
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
        })
    }

    /// Loads the config from the process environment.
    ///
    /// # Errors
    ///
    /// See [`from_provider`](Self::from_provider).
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_provider(&StandardEnv)
    }

    /// Loads the config from `env`.
    ///
    /// [`PRODUCT_KEY_VAR`] is required and has no default. [`API_URL_VAR`]
    /// defaults to [`DEFAULT_API_URL`] and [`REQUEST_TIMEOUT_VAR`] to
    /// [`DEFAULT_REQUEST_TIMEOUT`].
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingProductKey`] if the key is unset or blank,
    /// or an error describing the first unparsable optional variable.
    pub fn from_provider(env: &impl EnvProvider) -> Result<Self, ConfigError> {
        let product_key = env
            .non_empty(PRODUCT_KEY_VAR)
            .ok_or(ConfigError::MissingProductKey)?;

        let address = parse_address(&env.var_or(API_URL_VAR, DEFAULT_API_URL))?;

        let request_timeout = match env.non_empty(REQUEST_TIMEOUT_VAR) {
            Some(value) => parse_timeout(&value)?,
            None => DEFAULT_REQUEST_TIMEOUT,
        };

        log::debug!("loaded config for {address} (request timeout {request_timeout:?})");

        Ok(Self {
            address,
            product_key: ProductKey(product_key.trim().to_owned()),
            request_timeout,
        })
    }

    /// Overrides the request timeout.
    #[must_use]
    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }
}

fn parse_address(value: &str) -> Result<Url, ConfigError> {
    let address = Url::parse(value.trim()).map_err(|source| ConfigError::InvalidAddress {
        value: value.to_owned(),
        source,
    })?;

    if !matches!(address.scheme(), "http" | "https") || address.cannot_be_a_base() {
        return Err(ConfigError::UnsupportedAddress(value.to_owned()));
    }

    Ok(address)
}

fn parse_timeout(value: &str) -> Result<Duration, ConfigError> {
    value
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|secs| secs.is_finite() && *secs > 0.0)
        .map(Duration::from_secs_f64)
        .ok_or_else(|| ConfigError::InvalidTimeout(value.to_owned()))
}

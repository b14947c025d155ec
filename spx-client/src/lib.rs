//! Blocking HTTP client for SPX simulation servers.
//!
//! - [`Config`]: server address, product key, and request timeout, loaded
//!   from the environment
//! - [`HttpClient`]: a [`SimulationClient`] that talks to a server over HTTP
//! - [`health`]: a bounded health probe used before running against a server
//!
//! # Example
//!
//! ```no_run
//! use spx_client::Config;
//! use spx_core::{ModelDescriptor, SimulationClient};
//!
//! let config = Config::from_env()?;
//! let client = spx_client::init(&config)?;
//!
//! let model = ModelDescriptor::from_yaml("attributes: { temperature: 0.0 }")?;
//! client.register_model("pt_100", &model)?;
//! let instance = client.create_instance("pt100_1", "pt_100")?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! [`SimulationClient`]: spx_core::SimulationClient

pub mod health;

mod config;
mod error;
mod http;

pub use config::{
    API_URL_VAR, Config, ConfigError, DEFAULT_API_URL, DEFAULT_REQUEST_TIMEOUT, PRODUCT_KEY_VAR,
    ProductKey, REQUEST_TIMEOUT_VAR,
};
pub use error::ClientError;
pub use http::{HttpClient, PRODUCT_KEY_HEADER};

/// Connects to the server described by `config`.
///
/// No request is sent; the first server call happens on first use.
///
/// # Errors
///
/// Returns [`ClientError::Transport`] if the HTTP client cannot be built, or
/// [`ClientError::InvalidProductKey`] if the key cannot be sent as a header.
pub fn init(config: &Config) -> Result<HttpClient, ClientError> {
    HttpClient::new(config)
}

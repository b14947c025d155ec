use reqwest::{
    blocking::{Client, RequestBuilder, Response},
    header::{HeaderMap, HeaderValue},
};
use serde::Serialize;
use spx_core::{AttributeValue, ModelDescriptor, SimulationClient, validate_name};
use uom::si::{f64::Time, time::second};
use url::Url;

use crate::{ClientError, Config};

/// Header carrying the product key on every request.
pub const PRODUCT_KEY_HEADER: &str = "x-product-key";

#[derive(Serialize)]
struct InstanceBinding<'a> {
    model: &'a str,
}

#[derive(Serialize)]
struct TimerUpdate {
    time: f64,
}

/// A [`SimulationClient`] that talks to an SPX server over HTTP.
///
/// Every call is a single blocking request; nothing is retried. Names are
/// checked with [`validate_name`] and descriptors with
/// [`ModelDescriptor::validate`] before anything is sent.
#[derive(Debug, Clone)]
pub struct HttpClient {
    http: Client,
    base: Url,
}

impl HttpClient {
    /// Builds a client for the server described by `config`.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::InvalidProductKey`] if the key contains bytes
    /// not allowed in a header, or [`ClientError::Transport`] if the
    /// underlying HTTP client cannot be built.
    pub fn new(config: &Config) -> Result<Self, ClientError> {
        let mut key = HeaderValue::from_str(config.product_key.expose())
            .map_err(|_| ClientError::InvalidProductKey)?;
        key.set_sensitive(true);

        let mut headers = HeaderMap::new();
        headers.insert(PRODUCT_KEY_HEADER, key);

        let http = Client::builder()
            .default_headers(headers)
            .timeout(config.request_timeout)
            .build()?;

        log::debug!("client ready for {}", config.address);

        Ok(Self {
            http,
            base: config.address.clone(),
        })
    }

    /// The server base URL.
    #[must_use]
    pub fn address(&self) -> &Url {
        &self.base
    }

    fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.base.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    fn send(&self, request: RequestBuilder) -> Result<Response, ClientError> {
        let response = request.send()?;
        let status = response.status();

        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().unwrap_or_default();
        log::warn!("{} answered {status}: {body}", self.base);
        Err(ClientError::Status {
            status: status.as_u16(),
            body,
        })
    }
}

impl SimulationClient for HttpClient {
    type Error = ClientError;

    fn register_model(&self, name: &str, descriptor: &ModelDescriptor) -> Result<(), ClientError> {
        validate_name(name)?;
        descriptor.validate()?;

        let url = self.endpoint(&["models", name]);
        self.send(self.http.put(url).json(descriptor))?;

        log::info!(
            "registered model {name} ({} attributes, {} actions)",
            descriptor.attributes.len(),
            descriptor.actions.len()
        );
        Ok(())
    }

    fn bind_instance(&self, name: &str, model: &str) -> Result<(), ClientError> {
        validate_name(name)?;
        validate_name(model)?;

        let url = self.endpoint(&["instances", name]);
        self.send(self.http.put(url).json(&InstanceBinding { model }))?;

        log::info!("created instance {name} of model {model}");
        Ok(())
    }

    fn set_timer(&self, instance: &str, time: Time) -> Result<(), ClientError> {
        validate_name(instance)?;

        let url = self.endpoint(&["instances", instance, "timer"]);
        let update = TimerUpdate {
            time: time.get::<second>(),
        };
        self.send(self.http.put(url).json(&update))?;
        Ok(())
    }

    fn read_attribute(&self, instance: &str, attribute: &str) -> Result<AttributeValue, ClientError> {
        validate_name(instance)?;
        validate_name(attribute)?;

        let url = self.endpoint(&["instances", instance, "attributes", attribute]);
        let value = self.send(self.http.get(url))?.json()?;
        Ok(value)
    }

    fn prepare(&self) -> Result<(), ClientError> {
        self.send(self.http.post(self.endpoint(&["prepare"])))?;
        log::debug!("prepared {}", self.base);
        Ok(())
    }

    fn run(&self) -> Result<(), ClientError> {
        self.send(self.http.post(self.endpoint(&["run"])))?;
        Ok(())
    }
}

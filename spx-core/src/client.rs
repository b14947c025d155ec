use serde::{Deserialize, Serialize};
use uom::si::f64::Time;

use crate::descriptor::ModelDescriptor;

/// The two views of an attribute read back after a simulation step.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AttributeValue {
    /// The true, action-driven state.
    #[serde(rename = "internal_value")]
    pub internal: f64,

    /// The observable, possibly perturbed, presentation of the state.
    #[serde(rename = "external_value")]
    pub external: f64,
}

/// A connection to a simulation server.
///
/// The server owns all simulation state; a client only registers models,
/// binds instances to them, moves instance timers, and asks the server to
/// evaluate. Implementations block until the server answers.
///
/// Most callers work through an [`Instance`] handle obtained from
/// [`create_instance`](Self::create_instance) or [`instance`](Self::instance).
pub trait SimulationClient {
    type Error: std::error::Error + Send + Sync + 'static;

    /// Registers (or replaces) a model under `name`.
    ///
    /// # Errors
    ///
    /// Returns an error if the descriptor is rejected or the request fails.
    fn register_model(&self, name: &str, descriptor: &ModelDescriptor)
    -> Result<(), Self::Error>;

    /// Binds the instance `name` to the registered model `model`.
    ///
    /// # Errors
    ///
    /// Returns an error if the model is unknown or the request fails.
    fn bind_instance(&self, name: &str, model: &str) -> Result<(), Self::Error>;

    /// Sets the simulation time of instance `instance`.
    ///
    /// # Errors
    ///
    /// Returns an error if the instance is unknown or the request fails.
    fn set_timer(&self, instance: &str, time: Time) -> Result<(), Self::Error>;

    /// Reads both layers of `attribute` on `instance`.
    ///
    /// # Errors
    ///
    /// Returns an error if the instance or attribute is unknown or the request
    /// fails.
    fn read_attribute(&self, instance: &str, attribute: &str)
    -> Result<AttributeValue, Self::Error>;

    /// Prepares the server for stepping, resetting instances to their initial
    /// state.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    fn prepare(&self) -> Result<(), Self::Error>;

    /// Evaluates one simulation step at each instance's current timer.
    ///
    /// # Errors
    ///
    /// Returns an error if the server cannot evaluate or the request fails.
    fn run(&self) -> Result<(), Self::Error>;

    /// Binds a new instance to `model` and returns a handle to it.
    ///
    /// # Errors
    ///
    /// Returns an error if [`bind_instance`](Self::bind_instance) fails.
    fn create_instance<'a>(
        &'a self,
        name: &str,
        model: &str,
    ) -> Result<Instance<'a, Self>, Self::Error>
    where
        Self: Sized,
    {
        self.bind_instance(name, model)?;
        Ok(self.instance(name))
    }

    /// Returns a handle to an existing instance without contacting the server.
    fn instance(&self, name: &str) -> Instance<'_, Self>
    where
        Self: Sized,
    {
        Instance {
            client: self,
            name: name.to_owned(),
        }
    }
}

/// A handle to a named instance on the server.
#[derive(Debug)]
pub struct Instance<'a, C> {
    client: &'a C,
    name: String,
}

impl<C> Clone for Instance<'_, C> {
    fn clone(&self) -> Self {
        Self {
            client: self.client,
            name: self.name.clone(),
        }
    }
}

impl<'a, C: SimulationClient> Instance<'a, C> {
    /// The instance name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The client this instance is addressed through.
    #[must_use]
    pub fn client(&self) -> &'a C {
        self.client
    }

    /// Sets this instance's simulation time.
    ///
    /// # Errors
    ///
    /// Propagates the client error.
    pub fn set_timer(&self, time: Time) -> Result<(), C::Error> {
        self.client.set_timer(&self.name, time)
    }

    /// Reads both layers of `attribute`.
    ///
    /// # Errors
    ///
    /// Propagates the client error.
    pub fn attribute(&self, attribute: &str) -> Result<AttributeValue, C::Error> {
        self.client.read_attribute(&self.name, attribute)
    }
}

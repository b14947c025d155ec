use std::collections::BTreeMap;

use rand::{SeedableRng, rngs::StdRng};
use spx_core::{AttributeValue, DescriptorError, ModelDescriptor, NameError, validate_name};
use thiserror::Error;
use warp::http::StatusCode;

use crate::engine;

/// Seed for every instance's noise generator, reset on prepare.
const NOISE_SEED: u64 = 0x5bd1_e995;

/// Errors reported to clients of the development server.
#[derive(Debug, Error)]
pub enum ServerError {
    #[error("invalid name: {0}")]
    InvalidName(#[from] NameError),

    #[error("invalid model descriptor: {0}")]
    InvalidDescriptor(#[from] DescriptorError),

    #[error("unknown model `{0}`")]
    UnknownModel(String),

    #[error("unknown instance `{0}`")]
    UnknownInstance(String),

    #[error("instance `{instance}` has no attribute `{attribute}`")]
    UnknownAttribute { instance: String, attribute: String },

    #[error("time must be finite and non-negative, got {0}")]
    InvalidTime(f64),

    #[error("simulation is not prepared; call prepare before run")]
    NotPrepared,
}

impl ServerError {
    pub(crate) fn status(&self) -> StatusCode {
        match self {
            Self::InvalidName(_) | Self::InvalidTime(_) => StatusCode::BAD_REQUEST,
            Self::InvalidDescriptor(_) => StatusCode::UNPROCESSABLE_ENTITY,
            Self::UnknownModel(_) | Self::UnknownInstance(_) | Self::UnknownAttribute { .. } => {
                StatusCode::NOT_FOUND
            }
            Self::NotPrepared => StatusCode::CONFLICT,
        }
    }
}

struct InstanceState {
    descriptor: ModelDescriptor,
    time: f64,
    values: BTreeMap<String, AttributeValue>,
    rng: StdRng,
}

impl InstanceState {
    fn new(descriptor: ModelDescriptor) -> Self {
        let mut instance = Self {
            descriptor,
            time: 0.0,
            values: BTreeMap::new(),
            rng: StdRng::seed_from_u64(NOISE_SEED),
        };
        instance.reset();
        instance
    }

    fn reset(&mut self) {
        self.time = 0.0;
        self.rng = StdRng::seed_from_u64(NOISE_SEED);
        self.values = self
            .descriptor
            .attributes
            .iter()
            .map(|(name, &value)| {
                let value = AttributeValue {
                    internal: value,
                    external: value,
                };
                (name.clone(), value)
            })
            .collect();
    }
}

/// Models, instances, and stepping state held by the server.
#[derive(Default)]
pub(crate) struct State {
    models: BTreeMap<String, ModelDescriptor>,
    instances: BTreeMap<String, InstanceState>,
    prepared: bool,
}

impl State {
    pub(crate) fn register_model(
        &mut self,
        name: &str,
        descriptor: ModelDescriptor,
    ) -> Result<(), ServerError> {
        validate_name(name)?;
        descriptor.validate()?;

        log::info!("registered model {name}");
        self.models.insert(name.to_owned(), descriptor);
        Ok(())
    }

    pub(crate) fn bind_instance(&mut self, name: &str, model: &str) -> Result<(), ServerError> {
        validate_name(name)?;
        let descriptor = self
            .models
            .get(model)
            .cloned()
            .ok_or_else(|| ServerError::UnknownModel(model.to_owned()))?;

        log::info!("bound instance {name} to model {model}");
        self.instances
            .insert(name.to_owned(), InstanceState::new(descriptor));
        self.prepared = false;
        Ok(())
    }

    pub(crate) fn set_timer(&mut self, instance: &str, time: f64) -> Result<(), ServerError> {
        if !time.is_finite() || time < 0.0 {
            return Err(ServerError::InvalidTime(time));
        }
        self.instance_mut(instance)?.time = time;
        Ok(())
    }

    pub(crate) fn prepare(&mut self) {
        self.instances.values_mut().for_each(InstanceState::reset);
        self.prepared = true;
        log::debug!("prepared {} instance(s)", self.instances.len());
    }

    pub(crate) fn run(&mut self) -> Result<(), ServerError> {
        if !self.prepared {
            return Err(ServerError::NotPrepared);
        }
        for instance in self.instances.values_mut() {
            instance.values = engine::evaluate(&instance.descriptor, instance.time, &mut instance.rng);
        }
        Ok(())
    }

    pub(crate) fn attribute(
        &self,
        instance: &str,
        attribute: &str,
    ) -> Result<AttributeValue, ServerError> {
        self.instances
            .get(instance)
            .ok_or_else(|| ServerError::UnknownInstance(instance.to_owned()))?
            .values
            .get(attribute)
            .copied()
            .ok_or_else(|| ServerError::UnknownAttribute {
                instance: instance.to_owned(),
                attribute: attribute.to_owned(),
            })
    }

    fn instance_mut(&mut self, name: &str) -> Result<&mut InstanceState, ServerError> {
        self.instances
            .get_mut(name)
            .ok_or_else(|| ServerError::UnknownInstance(name.to_owned()))
    }
}

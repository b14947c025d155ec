//! Model descriptors: the documents registered with a simulation server.
//!
//! A descriptor lists each attribute's initial value and the ordered actions
//! that evolve it. Descriptors are usually written in YAML:
//!
//! ```yaml
//! attributes:
//!   temperature: 0.0
//! actions:
//!   - { ramp: $in(temperature), stop_value: 150, duration: 5, type: overshoot, overshoot: 5 }
//!   - { noise: $out(temperature), std: 0.01, mode: proportional }
//! ```
//!
//! [`ModelDescriptor::from_yaml`] parses and validates such a document;
//! descriptors built in code are checked with [`ModelDescriptor::validate`].

mod action;
mod error;

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::name::validate_name;

pub use action::{Action, AttributeRef, Layer, Noise, NoiseMode, Ramp, RampProfile};
pub use error::{DescriptorError, ParseAttributeRefError};

/// A model's attributes and the actions that drive them.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ModelDescriptor {
    /// Initial value of each attribute, keyed by attribute name.
    #[serde(default)]
    pub attributes: BTreeMap<String, f64>,

    /// Actions in evaluation order.
    #[serde(default)]
    pub actions: Vec<Action>,
}

impl ModelDescriptor {
    /// Creates an empty descriptor.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses a YAML model document and validates the result.
    ///
    /// # Errors
    ///
    /// Returns [`DescriptorError::Parse`] if the document is not valid YAML or
    /// does not match the descriptor layout, or a validation error as
    /// described in [`validate`](Self::validate).
    pub fn from_yaml(document: &str) -> Result<Self, DescriptorError> {
        let descriptor: Self = serde_yaml::from_str(document)?;
        descriptor.validate()?;
        Ok(descriptor)
    }

    /// Adds or replaces an attribute with the given initial value.
    #[must_use]
    pub fn with_attribute(mut self, name: impl Into<String>, initial: f64) -> Self {
        self.attributes.insert(name.into(), initial);
        self
    }

    /// Appends an action.
    #[must_use]
    pub fn with_action(mut self, action: impl Into<Action>) -> Self {
        self.actions.push(action.into());
        self
    }

    /// Returns the initial value of `attribute`, if it is declared.
    #[must_use]
    pub fn initial_value(&self, attribute: &str) -> Option<f64> {
        self.attributes.get(attribute).copied()
    }

    /// Checks the descriptor against the fixed schema.
    ///
    /// A valid descriptor has:
    ///
    /// - Attribute names usable in request paths and finite initial values.
    /// - Actions that only target declared attributes.
    /// - Action parameters within range (see [`Action::validate`]).
    ///
    /// # Errors
    ///
    /// Returns the first [`DescriptorError`] found.
    pub fn validate(&self) -> Result<(), DescriptorError> {
        for (name, &value) in &self.attributes {
            validate_name(name).map_err(DescriptorError::AttributeName)?;
            if !value.is_finite() {
                return Err(DescriptorError::NonFiniteInitialValue {
                    name: name.clone(),
                    value,
                });
            }
        }

        for (index, action) in self.actions.iter().enumerate() {
            let kind = action.kind();
            let attribute = &action.target().attribute;

            if !self.attributes.contains_key(attribute) {
                return Err(DescriptorError::UndeclaredAttribute {
                    index,
                    kind,
                    attribute: attribute.clone(),
                });
            }

            action
                .validate()
                .map_err(|reason| DescriptorError::InvalidAction {
                    index,
                    kind,
                    reason,
                })?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use approx::assert_relative_eq;

    const PT100: &str = "
attributes:
  temperature: 0.0
actions:
  - { ramp: $in(temperature), stop_value: 150, duration: 5, type: overshoot, overshoot: 5 }
  - { noise: $out(temperature), std: 0.01, mode: proportional }
";

    #[test]
    fn parse_pt100_document() {
        let descriptor = ModelDescriptor::from_yaml(PT100).unwrap();

        assert_relative_eq!(descriptor.initial_value("temperature").unwrap(), 0.0);
        assert_eq!(descriptor.actions.len(), 2);

        let Action::Ramp(ramp) = &descriptor.actions[0] else {
            panic!("first action should be a ramp");
        };
        assert_eq!(ramp.target, AttributeRef::internal("temperature"));
        assert_relative_eq!(ramp.stop_value, 150.0);
        assert_relative_eq!(ramp.duration, 5.0);
        assert_eq!(ramp.profile, RampProfile::Overshoot);
        assert_eq!(ramp.overshoot, Some(5.0));

        let Action::Noise(noise) = &descriptor.actions[1] else {
            panic!("second action should be noise");
        };
        assert_eq!(noise.target, AttributeRef::external("temperature"));
        assert_relative_eq!(noise.std, 0.01);
        assert_eq!(noise.mode, NoiseMode::Proportional);
    }

    #[test]
    fn sequence_indentation_does_not_matter_when_consistent() {
        let indented = PT100.replace("  - {", "    - {");
        assert_eq!(
            ModelDescriptor::from_yaml(&indented).unwrap(),
            ModelDescriptor::from_yaml(PT100).unwrap()
        );
    }

    #[test]
    fn inconsistent_indentation_is_a_parse_error() {
        let document = "
attributes:
  temperature: 0.0
actions:
    - { ramp: $in(temperature), stop_value: 150, duration: 5 }
  - { noise: $out(temperature), std: 0.01 }
";
        assert!(matches!(
            ModelDescriptor::from_yaml(document),
            Err(DescriptorError::Parse(_))
        ));
    }

    #[test]
    fn builder_matches_document() {
        let built = ModelDescriptor::new()
            .with_attribute("temperature", 0.0)
            .with_action(Ramp {
                target: AttributeRef::internal("temperature"),
                stop_value: 150.0,
                duration: 5.0,
                profile: RampProfile::Overshoot,
                overshoot: Some(5.0),
            })
            .with_action(Noise {
                target: AttributeRef::external("temperature"),
                std: 0.01,
                mode: NoiseMode::Proportional,
            });

        assert_eq!(built, ModelDescriptor::from_yaml(PT100).unwrap());
    }

    #[test]
    fn undeclared_target_is_rejected() {
        let descriptor = ModelDescriptor::new()
            .with_attribute("temperature", 0.0)
            .with_action(Noise {
                target: AttributeRef::external("pressure"),
                std: 0.1,
                mode: NoiseMode::Absolute,
            });

        assert!(matches!(
            descriptor.validate(),
            Err(DescriptorError::UndeclaredAttribute { index: 0, kind: "noise", ref attribute })
                if attribute == "pressure"
        ));
    }

    #[test]
    fn non_finite_initial_value_is_rejected() {
        let descriptor = ModelDescriptor::new().with_attribute("temperature", f64::NAN);
        assert!(matches!(
            descriptor.validate(),
            Err(DescriptorError::NonFiniteInitialValue { .. })
        ));
    }

    #[test]
    fn invalid_parameters_report_the_action_index() {
        let document = "
attributes:
  temperature: 0.0
actions:
  - { ramp: $in(temperature), stop_value: 150, duration: 5 }
  - { noise: $out(temperature), std: -1 }
";
        assert!(matches!(
            ModelDescriptor::from_yaml(document),
            Err(DescriptorError::InvalidAction { index: 1, kind: "noise", .. })
        ));
    }

    #[test]
    fn unknown_top_level_keys_are_rejected() {
        let document = "attributes: { t: 1.0 }\nevents: []\n";
        assert!(matches!(
            ModelDescriptor::from_yaml(document),
            Err(DescriptorError::Parse(_))
        ));
    }
}

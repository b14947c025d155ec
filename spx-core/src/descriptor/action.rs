use std::{fmt, str::FromStr};

use serde::{Deserialize, Deserializer, Serialize, de::Error as _};
use serde_json::{Map, Value};

use crate::name::validate_name;

use super::error::ParseAttributeRefError;

/// Which view of an attribute an action acts on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Layer {
    /// The true, action-driven state (`$in(...)`).
    Internal,

    /// The observable presentation of the state (`$out(...)`).
    External,
}

/// A reference to one layer of a model attribute, written `$in(name)` or
/// `$out(name)` in model documents.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct AttributeRef {
    pub layer: Layer,
    pub attribute: String,
}

impl AttributeRef {
    /// References the internal layer of `attribute`.
    pub fn internal(attribute: impl Into<String>) -> Self {
        Self {
            layer: Layer::Internal,
            attribute: attribute.into(),
        }
    }

    /// References the external layer of `attribute`.
    pub fn external(attribute: impl Into<String>) -> Self {
        Self {
            layer: Layer::External,
            attribute: attribute.into(),
        }
    }
}

impl FromStr for AttributeRef {
    type Err = ParseAttributeRefError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || ParseAttributeRefError(s.to_owned());
        let trimmed = s.trim();

        let (layer, rest) = if let Some(rest) = trimmed.strip_prefix("$in(") {
            (Layer::Internal, rest)
        } else if let Some(rest) = trimmed.strip_prefix("$out(") {
            (Layer::External, rest)
        } else {
            return Err(invalid());
        };

        let attribute = rest.strip_suffix(')').ok_or_else(invalid)?.trim();
        validate_name(attribute).map_err(|_| invalid())?;

        Ok(Self {
            layer,
            attribute: attribute.to_owned(),
        })
    }
}

impl TryFrom<String> for AttributeRef {
    type Error = ParseAttributeRefError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<AttributeRef> for String {
    fn from(value: AttributeRef) -> Self {
        value.to_string()
    }
}

impl fmt::Display for AttributeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.layer {
            Layer::Internal => write!(f, "$in({})", self.attribute),
            Layer::External => write!(f, "$out({})", self.attribute),
        }
    }
}

/// Shape of a ramp's trajectory.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RampProfile {
    #[default]
    Linear,
    Overshoot,
}

/// Drives an attribute towards `stop_value` over `duration` seconds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Ramp {
    #[serde(rename = "ramp")]
    pub target: AttributeRef,
    pub stop_value: f64,
    pub duration: f64,
    #[serde(rename = "type", default)]
    pub profile: RampProfile,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub overshoot: Option<f64>,
}

/// How a noise standard deviation is applied.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NoiseMode {
    /// `std` is in the attribute's own units.
    #[default]
    Absolute,

    /// `std` is a fraction of the current value.
    Proportional,
}

/// Perturbs an attribute with random noise.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Noise {
    #[serde(rename = "noise")]
    pub target: AttributeRef,
    pub std: f64,
    #[serde(default)]
    pub mode: NoiseMode,
}

/// A tagged, parameterized rule that evolves or perturbs an attribute.
///
/// In model documents each action is a single mapping whose kind key
/// (`ramp` or `noise`) holds the target reference:
///
/// ```yaml
/// - { ramp: $in(temperature), stop_value: 150, duration: 5 }
/// - { noise: $out(temperature), std: 0.01, mode: proportional }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Action {
    Ramp(Ramp),
    Noise(Noise),
}

impl Action {
    /// Kind keys recognized in model documents.
    pub const KINDS: [&'static str; 2] = ["ramp", "noise"];

    /// Returns the kind key of this action.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Ramp(_) => "ramp",
            Self::Noise(_) => "noise",
        }
    }

    /// Returns the attribute layer this action acts on.
    #[must_use]
    pub fn target(&self) -> &AttributeRef {
        match self {
            Self::Ramp(ramp) => &ramp.target,
            Self::Noise(noise) => &noise.target,
        }
    }

    /// Checks the action's parameters against the descriptor schema.
    ///
    /// # Errors
    ///
    /// Returns a description of the first invalid parameter.
    pub fn validate(&self) -> Result<(), &'static str> {
        match self {
            Self::Ramp(ramp) => {
                if !ramp.stop_value.is_finite() {
                    return Err("ramp stop_value must be finite");
                }
                if !ramp.duration.is_finite() || ramp.duration <= 0.0 {
                    return Err("ramp duration must be finite and positive");
                }
                match (ramp.profile, ramp.overshoot) {
                    (RampProfile::Linear, Some(_)) => {
                        Err("ramp overshoot is only allowed with `type: overshoot`")
                    }
                    (RampProfile::Overshoot, None) => {
                        Err("ramp with `type: overshoot` requires an overshoot amount")
                    }
                    (RampProfile::Overshoot, Some(amount))
                        if !amount.is_finite() || amount < 0.0 =>
                    {
                        Err("ramp overshoot must be finite and non-negative")
                    }
                    _ => Ok(()),
                }
            }
            Self::Noise(noise) => {
                if !noise.std.is_finite() || noise.std < 0.0 {
                    return Err("noise std must be finite and non-negative");
                }
                Ok(())
            }
        }
    }
}

impl From<Ramp> for Action {
    fn from(value: Ramp) -> Self {
        Self::Ramp(value)
    }
}

impl From<Noise> for Action {
    fn from(value: Noise) -> Self {
        Self::Noise(value)
    }
}

impl<'de> Deserialize<'de> for Action {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let fields = Map::<String, Value>::deserialize(deserializer)?;
        let kinds: Vec<&'static str> = Self::KINDS
            .iter()
            .copied()
            .filter(|kind| fields.contains_key(*kind))
            .collect();

        match kinds.as_slice() {
            ["ramp"] => serde_json::from_value(Value::Object(fields))
                .map(Self::Ramp)
                .map_err(|err| D::Error::custom(format!("invalid ramp action: {err}"))),
            ["noise"] => serde_json::from_value(Value::Object(fields))
                .map(Self::Noise)
                .map_err(|err| D::Error::custom(format!("invalid noise action: {err}"))),
            [] => Err(D::Error::custom(format!(
                "action has no kind key, expected one of: {}",
                Self::KINDS.join(", ")
            ))),
            _ => Err(D::Error::custom(format!(
                "action has more than one kind key: {}",
                kinds.join(", ")
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_attribute_refs() {
        let internal: AttributeRef = "$in(temperature)".parse().unwrap();
        assert_eq!(internal, AttributeRef::internal("temperature"));

        let external: AttributeRef = " $out( temperature ) ".parse().unwrap();
        assert_eq!(external, AttributeRef::external("temperature"));
    }

    #[test]
    fn reject_malformed_attribute_refs() {
        for input in ["temperature", "$in(temperature", "$mid(temperature)", "$in()"] {
            assert!(input.parse::<AttributeRef>().is_err(), "{input}");
        }
    }

    #[test]
    fn attribute_ref_display_round_trips() {
        let reference = AttributeRef::external("humidity");
        assert_eq!(reference.to_string(), "$out(humidity)");
    }

    #[test]
    fn ramp_serializes_with_kind_key() {
        let action = Action::from(Ramp {
            target: AttributeRef::internal("temperature"),
            stop_value: 150.0,
            duration: 5.0,
            profile: RampProfile::Overshoot,
            overshoot: Some(5.0),
        });

        let json = serde_json::to_value(&action).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "ramp": "$in(temperature)",
                "stop_value": 150.0,
                "duration": 5.0,
                "type": "overshoot",
                "overshoot": 5.0,
            })
        );
    }

    #[test]
    fn noise_defaults_to_absolute_mode() {
        let action: Action =
            serde_json::from_value(serde_json::json!({ "noise": "$out(t)", "std": 0.5 })).unwrap();

        assert_eq!(
            action,
            Action::Noise(Noise {
                target: AttributeRef::external("t"),
                std: 0.5,
                mode: NoiseMode::Absolute,
            })
        );
    }

    #[test]
    fn unknown_kind_is_rejected() {
        let err = serde_json::from_value::<Action>(serde_json::json!({ "wobble": "$in(t)" }))
            .unwrap_err();
        assert!(err.to_string().contains("no kind key"), "{err}");
    }

    #[test]
    fn ambiguous_kind_is_rejected() {
        let err = serde_json::from_value::<Action>(serde_json::json!({
            "ramp": "$in(t)",
            "noise": "$in(t)",
        }))
        .unwrap_err();
        assert!(err.to_string().contains("more than one kind"), "{err}");
    }

    #[test]
    fn unknown_parameter_is_rejected() {
        let err = serde_json::from_value::<Action>(serde_json::json!({
            "noise": "$out(t)",
            "std": 0.1,
            "seed": 4,
        }))
        .unwrap_err();
        assert!(err.to_string().contains("invalid noise action"), "{err}");
    }

    #[test]
    fn overshoot_requires_matching_profile() {
        let mut ramp = Ramp {
            target: AttributeRef::internal("t"),
            stop_value: 1.0,
            duration: 1.0,
            profile: RampProfile::Linear,
            overshoot: Some(0.5),
        };
        assert!(Action::from(ramp.clone()).validate().is_err());

        ramp.profile = RampProfile::Overshoot;
        assert_eq!(Action::from(ramp.clone()).validate(), Ok(()));

        ramp.overshoot = None;
        assert!(Action::from(ramp).validate().is_err());
    }

    #[test]
    fn ramp_duration_must_be_positive() {
        let ramp = Ramp {
            target: AttributeRef::internal("t"),
            stop_value: 1.0,
            duration: 0.0,
            profile: RampProfile::Linear,
            overshoot: None,
        };
        assert!(Action::from(ramp).validate().is_err());
    }
}

use thiserror::Error;

use crate::name::NameError;

/// Errors that can occur while parsing or validating a [`ModelDescriptor`].
///
/// [`ModelDescriptor`]: super::ModelDescriptor
#[derive(Debug, Error)]
pub enum DescriptorError {
    #[error("failed to parse model document")]
    Parse(#[from] serde_yaml::Error),

    #[error("invalid attribute name")]
    AttributeName(#[source] NameError),

    #[error("attribute `{name}` has non-finite initial value {value}")]
    NonFiniteInitialValue { name: String, value: f64 },

    #[error("action {index} ({kind}) targets undeclared attribute `{attribute}`")]
    UndeclaredAttribute {
        index: usize,
        kind: &'static str,
        attribute: String,
    },

    #[error("action {index} ({kind}) is invalid: {reason}")]
    InvalidAction {
        index: usize,
        kind: &'static str,
        reason: &'static str,
    },
}

/// Error returned when a string is not a valid `$in(name)` or `$out(name)`
/// attribute reference.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid attribute reference {0:?}, expected `$in(name)` or `$out(name)`")]
pub struct ParseAttributeRefError(pub String);

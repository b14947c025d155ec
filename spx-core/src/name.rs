use thiserror::Error;

/// Error returned when a model, instance, or attribute name is unusable.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NameError {
    #[error("name must not be empty")]
    Empty,

    #[error("name {name:?} contains invalid character {invalid:?}")]
    InvalidChar { name: String, invalid: char },
}

/// Checks that `name` can be used to address a model, instance, or attribute.
///
/// Names are embedded in request paths, so only ASCII alphanumerics, `_`,
/// `-`, and `.` are accepted.
///
/// # Errors
///
/// Returns [`NameError`] if the name is empty or contains other characters.
pub fn validate_name(name: &str) -> Result<(), NameError> {
    if name.is_empty() {
        return Err(NameError::Empty);
    }

    match name
        .chars()
        .find(|c| !(c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.')))
    {
        Some(invalid) => Err(NameError::InvalidChar {
            name: name.to_owned(),
            invalid,
        }),
        None => Ok(()),
    }
}

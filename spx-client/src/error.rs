use spx_core::{DescriptorError, NameError};
use thiserror::Error;

/// Errors returned by [`HttpClient`](crate::HttpClient).
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("server responded with {status}: {body}")]
    Status { status: u16, body: String },

    #[error("product key cannot be sent as a header")]
    InvalidProductKey,

    #[error("invalid model descriptor: {0}")]
    InvalidDescriptor(#[from] DescriptorError),

    #[error("invalid name: {0}")]
    InvalidName(#[from] NameError),
}

impl ClientError {
    /// Returns the HTTP status for server-side rejections.
    #[must_use]
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Status { status, .. } => Some(*status),
            Self::Transport(err) => err.status().map(|status| status.as_u16()),
            _ => None,
        }
    }
}

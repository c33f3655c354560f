//! Errors reported by external providers

use thiserror::Error;

pub type ProviderResult<T> = std::result::Result<T, ProviderError>;

/// Failure of an access-check or identity provider call.
///
/// Kept cloneable so the resolver can park a copy in per-relation state.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProviderError {
    /// Provider could not be reached or refused to answer
    #[error("Provider unavailable: {0}")]
    Unavailable(String),

    /// Transport-level failure (connection reset, bad status, ...)
    #[error("Transport error: {0}")]
    Transport(String),

    /// Provider answered with something that is not a valid result list
    #[error("Invalid provider response: {0}")]
    InvalidResponse(String),

    /// Provider call panicked before producing a response
    #[error("Provider call panicked: {0}")]
    Panicked(String),
}

impl ProviderError {
    /// Create an unavailable error
    pub fn unavailable<S: Into<String>>(msg: S) -> Self {
        ProviderError::Unavailable(msg.into())
    }

    /// Create a transport error
    pub fn transport<S: Into<String>>(msg: S) -> Self {
        ProviderError::Transport(msg.into())
    }

    /// Create an invalid response error
    pub fn invalid_response<S: Into<String>>(msg: S) -> Self {
        ProviderError::InvalidResponse(msg.into())
    }
}

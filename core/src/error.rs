//! Error types for the facade and the bundled transport.
//!
//! # Design
//! `RequestError` has exactly two arms. Validation failures are recoverable
//! and carry the full outcome record; transport failures are whatever the
//! transport produced, passed through without wrapping or retrying.

use thiserror::Error;

use crate::validator::ValidationFailure;

/// Errors returned by `Http::request` and the verb helpers.
#[derive(Debug, Error)]
pub enum RequestError<E> {
    /// The validation descriptor rejected the fields; nothing was sent.
    #[error("validation failed: {0}")]
    Validation(#[from] ValidationFailure),

    /// The transport failed.
    #[error("transport failed: {0}")]
    Transport(#[source] E),
}

impl<E> RequestError<E> {
    pub fn as_validation(&self) -> Option<&ValidationFailure> {
        match self {
            RequestError::Validation(failure) => Some(failure),
            RequestError::Transport(_) => None,
        }
    }

    pub fn into_transport(self) -> Option<E> {
        match self {
            RequestError::Transport(err) => Some(err),
            RequestError::Validation(_) => None,
        }
    }
}

/// Errors raised by `UreqTransport`.
#[derive(Debug, Error)]
pub enum TransportError {
    /// Network failure, or a non-2xx status when `status_as_error` is set.
    #[error(transparent)]
    Http(#[from] ureq::Error),

    /// The request body could not be serialized to JSON.
    #[error("serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),

    /// The blocking worker running the request panicked or was cancelled.
    #[error("transport worker failed: {0}")]
    Worker(#[from] tokio::task::JoinError),
}

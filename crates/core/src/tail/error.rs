//! Error types for tail sessions.

use crate::client::TransportError;
use thiserror::Error;

/// Errors that can terminate a tail session.
///
/// Transient not-ready conditions are absorbed by the engine's backoff
/// and never appear here.
#[derive(Error, Debug)]
pub enum TailError {
    /// The log does not exist at the polled URL.
    #[error("log not found at {url} ({status} {reason})")]
    LogNotFound {
        url: String,
        status: u16,
        reason: String,
    },

    /// The poll returned a status the engine cannot absorb.
    #[error("tail of {url} failed ({status} {reason})")]
    Failed {
        url: String,
        status: u16,
        reason: String,
    },

    /// A collaborator or transport call failed.
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// The output sink rejected a write.
    #[error("failed to write to log sink: {0}")]
    Sink(#[from] std::io::Error),
}

/// Type alias for Result with TailError.
pub type TailResult<T> = Result<T, TailError>;

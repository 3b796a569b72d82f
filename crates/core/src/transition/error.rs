//! Error types for transition planning and submission.

use crate::client::TransportError;
use fd_protocol::StepAction;
use thiserror::Error;

/// Errors that can occur while planning or submitting a step transition.
#[derive(Error, Debug)]
pub enum TransitionError {
    /// The execution has no unfinished step to cancel.
    #[error("cannot find a current step for pipeline {pipeline_id}")]
    CurrentStepNotFound { pipeline_id: String },

    /// The execution has no waiting step to advance.
    #[error("cannot find a waiting step for pipeline {pipeline_id}")]
    WaitingStepNotFound { pipeline_id: String },

    /// A selector resolved no step in the execution.
    #[error("no step matching {selector} in execution {execution_id}")]
    StepNotFound {
        selector: String,
        execution_id: String,
    },

    /// The selected step does not expose a link the transition needs.
    #[error("step with action {action} has no {rel} link")]
    LinkMissing { rel: &'static str, action: StepAction },

    /// The step kind cannot be advanced by this client.
    #[error("advancing a {action} step is not supported")]
    Unsupported { action: StepAction },

    /// The control-plane rejected the transition request.
    #[error("transition request to {url} failed with status {status}")]
    Failed { url: String, status: u16 },

    /// The transition payload could not be encoded.
    #[error("failed to encode transition payload: {0}")]
    Encode(#[from] serde_json::Error),

    /// A collaborator call failed.
    #[error(transparent)]
    Transport(#[from] TransportError),
}

/// Type alias for Result with TransitionError.
pub type TransitionResult<T> = Result<T, TransitionError>;

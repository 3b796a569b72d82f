//! Log source adapters.
//!
//! Each adapter resolves a starting URL and offset for the tail engine
//! and supplies the policy that bounds the session: step logs end with
//! the step, command logs with the command, and environment logs run
//! until the caller stops them.

use crate::client::TransportError;
use crate::steps::StepError;
use crate::tail::TailError;
use fd_protocol::{HalLink, StepAction, StepState};
use thiserror::Error;

mod command;
mod environment;
mod step;

pub use command::{
    tail_command_log, CommandLogRequest, COMMAND_LOG_POLL_DELAY, COMMAND_STATUS_CHECK_LIMIT,
};
pub use environment::{tail_environment_log, EnvironmentLogRequest, ENVIRONMENT_LOG_POLL_DELAY};
pub use step::{download_step_log, tail_step_log, StepLogDownload, StepLogRequest, STEP_LOG_POLL_DELAY};

/// Errors raised by the log source adapters.
#[derive(Error, Debug)]
pub enum LogError {
    /// The requested step could not be selected or is not running.
    #[error(transparent)]
    Step(#[from] StepError),

    /// The tail session failed.
    #[error(transparent)]
    Tail(#[from] TailError),

    /// A collaborator call failed while resolving the log source.
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// The selected step does not expose a link the adapter needs.
    #[error("step with action {action} has no {rel} link")]
    LinkMissing { rel: &'static str, action: StepAction },

    /// The command execution is not running, so there is nothing to tail.
    #[error("command execution {id} is not running")]
    CommandNotRunning { id: String },
}

/// Type alias for Result with LogError.
pub type LogResult<T> = Result<T, LogError>;

fn require_link<'a>(step: &'a StepState, rel: &'static str) -> LogResult<&'a HalLink> {
    step.link(rel).ok_or_else(|| LogError::LinkMissing {
        rel,
        action: step.action.clone(),
    })
}

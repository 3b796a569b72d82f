//! Command execution models.
//!
//! Long-running commands issued against an environment (e.g. maintenance
//! commands) are represented as command executions whose logs can be
//! tailed while the command runs.

use serde::{Deserialize, Serialize};

/// Lifecycle status of a command execution.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CommandStatus {
    /// Command has been accepted but not started.
    Pending,

    /// Command is actively running; its log can be tailed.
    Running,

    /// Command finished successfully.
    Completed,

    /// Command ended with an error.
    Failed,
}

impl CommandStatus {
    /// Whether the command is still producing log output.
    pub fn is_running(self) -> bool {
        self == Self::Running
    }
}

/// One command execution against an environment.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct CommandExecution {
    /// Identifier of the command execution.
    pub id: String,

    /// The command that was issued.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub command: Option<String>,

    /// Type of the command.
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub command_type: Option<String>,

    /// Current lifecycle status.
    pub status: CommandStatus,
}

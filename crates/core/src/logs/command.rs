//! Command-execution log tailing with line-oriented record extraction.
//!
//! Command logs arrive as newline-delimited JSON records whose `log`
//! field carries the actual output line. The adapter extracts that field
//! from each record and drops records that fail to parse without failing
//! the chunk.

use crate::client::{ControlApi, ExecutionSource, LogSink, RangeRead};
use crate::logs::{LogError, LogResult};
use crate::tail::{
    Clock, StopSignal, TailCursor, TailEngine, TailPolicy, TailResult, NOT_FOUND,
    RANGE_NOT_SATISFIABLE,
};
use async_trait::async_trait;
use fd_protocol::CommandStatus;
use serde_json::Value;
use std::time::Duration;
use tracing::debug;

/// Delay between polls while a command log has no new data.
pub const COMMAND_LOG_POLL_DELAY: Duration = Duration::from_secs(5);

/// Consecutive not-ready responses tolerated before the command status is
/// re-checked. Keeps the session from spinning on not-ready when the
/// command has already finished.
pub const COMMAND_STATUS_CHECK_LIMIT: u32 = 3;

/// Addresses the log of one command execution.
#[derive(Debug, Clone)]
pub struct CommandLogRequest<'a> {
    pub program_id: &'a str,
    pub environment_id: &'a str,
    pub command_execution_id: &'a str,
}

// Each non-empty line is one JSON record; keep its `log` field, drop the
// rest. Malformed lines are skipped silently.
fn extract_log_lines(chunk: &[u8]) -> Vec<u8> {
    let text = String::from_utf8_lossy(chunk);
    let mut out = Vec::new();
    for line in text.split('\n') {
        if line.is_empty() {
            continue;
        }
        let Ok(record) = serde_json::from_str::<Value>(line) else {
            continue;
        };
        if let Some(log) = record.get("log").and_then(Value::as_str) {
            out.extend_from_slice(log.as_bytes());
            out.push(b'\n');
        }
    }
    out
}

struct CommandTailPolicy<'a, S: ?Sized> {
    source: &'a S,
    request: &'a CommandLogRequest<'a>,
    status: CommandStatus,
}

#[async_trait]
impl<S> TailPolicy for CommandTailPolicy<'_, S>
where
    S: ExecutionSource + ?Sized,
{
    fn backoff(&self) -> Duration {
        COMMAND_LOG_POLL_DELAY
    }

    fn is_transient(&self, status: u16) -> bool {
        status == RANGE_NOT_SATISFIABLE || status == NOT_FOUND
    }

    fn transform(&self, chunk: &[u8]) -> Vec<u8> {
        extract_log_lines(chunk)
    }

    async fn still_active(&mut self, cursor: &mut TailCursor) -> TailResult<bool> {
        if self.status.is_running() && cursor.not_ready >= COMMAND_STATUS_CHECK_LIMIT {
            cursor.not_ready = 0;
            self.status = self
                .source
                .command_status(
                    self.request.program_id,
                    self.request.environment_id,
                    self.request.command_execution_id,
                )
                .await?;
            debug!(
                id = self.request.command_execution_id,
                status = ?self.status,
                "re-checked command status"
            );
        }
        Ok(self.status.is_running())
    }
}

/// Tail the log of a running command execution until the command leaves
/// RUNNING.
///
/// Returns the final command status observed when the tail completed.
///
/// # Errors
///
/// Fails with [`LogError::CommandNotRunning`] when the command is not
/// running at entry, and with tail errors as they occur.
pub async fn tail_command_log<S, A, R, C, W>(
    source: &S,
    api: &A,
    range: &R,
    clock: &C,
    request: &CommandLogRequest<'_>,
    sink: &mut W,
    stop: &mut StopSignal,
) -> LogResult<CommandStatus>
where
    S: ExecutionSource + ?Sized,
    A: ControlApi + ?Sized,
    R: RangeRead + ?Sized,
    C: Clock + ?Sized,
    W: LogSink,
{
    let status = source
        .command_status(
            request.program_id,
            request.environment_id,
            request.command_execution_id,
        )
        .await?;
    if !status.is_running() {
        return Err(LogError::CommandNotRunning {
            id: request.command_execution_id.to_string(),
        });
    }

    let link = source
        .command_log_link(
            request.program_id,
            request.environment_id,
            request.command_execution_id,
        )
        .await?;
    let target = api.resolve_log_url(&link).await?;
    debug!(id = request.command_execution_id, url = %target, "tailing command log");

    let mut cursor = TailCursor::new(target, 0);
    let mut policy = CommandTailPolicy {
        source,
        request,
        status,
    };
    TailEngine::new(range, clock)
        .follow(&mut cursor, &mut policy, sink, stop)
        .await?;

    Ok(policy.status)
}

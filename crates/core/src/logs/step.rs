//! Step log retrieval: bounded tail and one-shot download.

use crate::client::{ControlApi, ExecutionSource, LogSink, RangeRead};
use crate::logs::{require_link, LogError, LogResult};
use crate::steps::{find_step, StepError, StepSelector};
use crate::tail::{
    Clock, StopSignal, TailCursor, TailEngine, TailError, TailPolicy, TailResult, NOT_FOUND,
    RANGE_NOT_SATISFIABLE,
};
use async_trait::async_trait;
use fd_protocol::{rels, HalLink, StepState, StepStatus};
use std::time::Duration;
use tracing::debug;

/// Delay between polls while a step log has no new data.
pub const STEP_LOG_POLL_DELAY: Duration = Duration::from_secs(5);

/// Addresses the log of one step in a pipeline's current execution.
#[derive(Debug, Clone)]
pub struct StepLogRequest<'a> {
    pub program_id: &'a str,
    pub pipeline_id: &'a str,
    pub selector: StepSelector,
    /// Selects a non-default log file of the step.
    pub log_file: Option<&'a str>,
}

/// Addresses the log of one step in a specific execution.
#[derive(Debug, Clone)]
pub struct StepLogDownload<'a> {
    pub program_id: &'a str,
    pub pipeline_id: &'a str,
    pub execution_id: &'a str,
    pub selector: StepSelector,
    pub log_file: Option<&'a str>,
}

fn log_file_url(link: &HalLink, log_file: Option<&str>) -> String {
    match log_file {
        Some(file) => format!("{}?file={}", link.href, file),
        None => link.href.clone(),
    }
}

struct StepTailPolicy<'a, A: ControlApi + ?Sized> {
    api: &'a A,
    self_url: String,
    latest: StepState,
}

#[async_trait]
impl<A: ControlApi + ?Sized> TailPolicy for StepTailPolicy<'_, A> {
    fn backoff(&self) -> Duration {
        STEP_LOG_POLL_DELAY
    }

    // 416 means more data may yet arrive; 404 means the log is not ready.
    // Both are absorbed while the step runs.
    fn is_transient(&self, status: u16) -> bool {
        status == RANGE_NOT_SATISFIABLE || status == NOT_FOUND
    }

    async fn still_active(&mut self, _cursor: &mut TailCursor) -> TailResult<bool> {
        self.latest = self.api.refresh_step(&self.self_url).await?;
        Ok(self.latest.status == StepStatus::Running)
    }
}

/// Tail the log of a running step until the step leaves RUNNING.
///
/// Returns the final step-state snapshot observed when the tail
/// completed. A step's log segment does not roll over, so no day-boundary
/// handling applies here.
///
/// # Errors
///
/// Fails when the selector resolves no step, the step is not running,
/// a required link is absent, or the tail itself fails.
pub async fn tail_step_log<S, A, R, C, W>(
    source: &S,
    api: &A,
    range: &R,
    clock: &C,
    request: &StepLogRequest<'_>,
    sink: &mut W,
    stop: &mut StopSignal,
) -> LogResult<StepState>
where
    S: ExecutionSource + ?Sized,
    A: ControlApi + ?Sized,
    R: RangeRead + ?Sized,
    C: Clock + ?Sized,
    W: LogSink,
{
    let execution = source
        .current_execution(request.program_id, request.pipeline_id)
        .await?;
    let step = find_step(&execution, &request.selector).ok_or_else(|| StepError::NotFound {
        selector: request.selector.to_string(),
        execution_id: execution.id.clone(),
    })?;

    if step.status != StepStatus::Running {
        return Err(StepError::NotRunning {
            selector: request.selector.to_string(),
            execution_id: execution.id.clone(),
        }
        .into());
    }

    let self_url = require_link(step, rels::SELF)?.href.clone();
    let logs_url = log_file_url(require_link(step, rels::LOGS)?, request.log_file);
    let target = api.resolve_log_url(&logs_url).await?;
    debug!(selector = %request.selector, url = %target, "tailing step log");

    let mut cursor = TailCursor::new(target, 0);
    let mut policy = StepTailPolicy {
        api,
        self_url,
        latest: step.clone(),
    };
    TailEngine::new(range, clock)
        .follow(&mut cursor, &mut policy, sink, stop)
        .await?;

    Ok(policy.latest)
}

/// Download a step's log in one request and write it to the sink.
///
/// # Errors
///
/// Fails when the selector resolves no step, the step has no logs link,
/// or the download itself fails.
pub async fn download_step_log<S, A, R, W>(
    source: &S,
    api: &A,
    range: &R,
    request: &StepLogDownload<'_>,
    sink: &mut W,
) -> LogResult<()>
where
    S: ExecutionSource + ?Sized,
    A: ControlApi + ?Sized,
    R: RangeRead + ?Sized,
    W: LogSink,
{
    let execution = source
        .execution(request.program_id, request.pipeline_id, request.execution_id)
        .await?;
    let step = find_step(&execution, &request.selector).ok_or_else(|| StepError::NotFound {
        selector: request.selector.to_string(),
        execution_id: execution.id.clone(),
    })?;

    let logs_url = log_file_url(require_link(step, rels::LOGS)?, request.log_file);
    let target = api.resolve_log_url(&logs_url).await?;
    debug!(selector = %request.selector, url = %target, "downloading step log");

    let body = range.read_full(&target).await?;
    sink.write_chunk(&body)
        .await
        .map_err(|error| LogError::Tail(TailError::Sink(error)))?;
    Ok(())
}

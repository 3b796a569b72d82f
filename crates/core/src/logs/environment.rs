//! Environment log tailing: unbounded, day-rollover-aware.

use crate::client::{ExecutionSource, LogSink, RangeRead};
use crate::logs::LogResult;
use crate::tail::{
    within_utc_midnight_window, Clock, StopSignal, TailCursor, TailEngine, TailPolicy, TailResult,
    RANGE_NOT_SATISFIABLE,
};
use async_trait::async_trait;
use std::time::Duration;
use tracing::debug;

/// Delay between polls while an environment log has no new data.
pub const ENVIRONMENT_LOG_POLL_DELAY: Duration = Duration::from_secs(2);

/// Addresses one service log of an environment.
#[derive(Debug, Clone)]
pub struct EnvironmentLogRequest<'a> {
    pub program_id: &'a str,
    pub environment_id: &'a str,
    /// Service specification (e.g. "author", "publish").
    pub service: &'a str,
    /// Log name (e.g. "aemerror").
    pub name: &'a str,
}

struct EnvironmentTailPolicy<'a, S: ?Sized, R: ?Sized, C: ?Sized> {
    source: &'a S,
    range: &'a R,
    clock: &'a C,
    request: &'a EnvironmentLogRequest<'a>,
}

#[async_trait]
impl<S, R, C> TailPolicy for EnvironmentTailPolicy<'_, S, R, C>
where
    S: ExecutionSource + ?Sized,
    R: RangeRead + ?Sized,
    C: Clock + ?Sized,
{
    fn backoff(&self) -> Duration {
        ENVIRONMENT_LOG_POLL_DELAY
    }

    // Only 416 is a not-ready condition here; a missing environment log
    // is a hard failure.
    fn is_transient(&self, status: u16) -> bool {
        status == RANGE_NOT_SATISFIABLE
    }

    async fn on_backoff(&mut self, cursor: &mut TailCursor) -> TailResult<()> {
        if !within_utc_midnight_window(self.clock.now_utc()) {
            return Ok(());
        }

        // The day may have rolled over: re-resolve the active segment and
        // compare sizes. A segment smaller than the consumed offset is a
        // genuinely new file; anything else is still yesterday's segment
        // and switching would only churn.
        let url = self
            .source
            .environment_tail_url(
                self.request.program_id,
                self.request.environment_id,
                self.request.service,
                self.request.name,
            )
            .await?;
        let size = self.range.content_size(&url).await?;

        if size < cursor.offset {
            debug!(
                old = %cursor.target_url,
                new = %url,
                offset = size,
                "switching to rolled-over log segment"
            );
            cursor.roll_over(url, size);
        } else {
            self.clock.sleep(self.backoff()).await;
        }
        Ok(())
    }

    async fn still_active(&mut self, _cursor: &mut TailCursor) -> TailResult<bool> {
        // Environment logs never finish on their own; the caller's stop
        // signal ends the session.
        Ok(true)
    }
}

/// Tail an environment service log from its current end.
///
/// The session starts at the present size of today's segment, follows it
/// across UTC day rollovers, and runs until the stop signal fires or the
/// tail fails.
///
/// # Errors
///
/// Fails when the log source cannot be resolved, when the log disappears
/// (404), or on any unexpected poll response.
pub async fn tail_environment_log<S, R, C, W>(
    source: &S,
    range: &R,
    clock: &C,
    request: &EnvironmentLogRequest<'_>,
    sink: &mut W,
    stop: &mut StopSignal,
) -> LogResult<()>
where
    S: ExecutionSource + ?Sized,
    R: RangeRead + ?Sized,
    C: Clock + ?Sized,
    W: LogSink,
{
    let url = source
        .environment_tail_url(
            request.program_id,
            request.environment_id,
            request.service,
            request.name,
        )
        .await?;
    let offset = range.content_size(&url).await?;
    debug!(url = %url, offset, "tailing environment log from current end");

    let mut cursor = TailCursor::new(url, offset);
    let mut policy = EnvironmentTailPolicy {
        source,
        range,
        clock,
        request,
    };
    TailEngine::new(range, clock)
        .follow(&mut cursor, &mut policy, sink, stop)
        .await?;

    Ok(())
}

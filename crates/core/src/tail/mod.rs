//! Generic tail-follow engine.
//!
//! A tail session repeatedly issues byte-range reads against the current
//! log segment, appending delivered chunks to the caller's sink and
//! advancing the cursor. Not-ready responses are absorbed with a fixed
//! backoff; what counts as not-ready, how long to back off, whether the
//! segment can roll over at the UTC day boundary, and when the session is
//! done are all decided by a [`TailPolicy`] supplied by the log source
//! adapter.
//!
//! One request is in flight at a time and every chunk is flushed before
//! the next read, so bytes reach the sink strictly in offset order and the
//! engine never buffers more than one poll's worth of data.

use crate::client::{LogSink, RangeRead};
use async_trait::async_trait;
use std::time::Duration;
use tracing::{debug, warn};

mod clock;
mod cursor;
mod error;
mod rollover;
mod stop;

pub use clock::{Clock, SystemClock};
pub use cursor::TailCursor;
pub use error::{TailError, TailResult};
pub use rollover::within_utc_midnight_window;
pub use stop::{stop_channel, StopHandle, StopSignal};

/// Range satisfied; more data may follow.
pub const PARTIAL_CONTENT: u16 = 206;

/// The requested range starts at or past the current end of the segment.
pub const RANGE_NOT_SATISFIABLE: u16 = 416;

/// The polled resource does not exist (yet).
pub const NOT_FOUND: u16 = 404;

/// Per-adapter behavior of a tail session.
#[async_trait]
pub trait TailPolicy: Send {
    /// Fixed delay before retrying after a not-ready response.
    fn backoff(&self) -> Duration;

    /// Whether this status is a not-ready condition to absorb.
    ///
    /// A 404 that is not transient is reported as
    /// [`TailError::LogNotFound`].
    fn is_transient(&self, status: u16) -> bool;

    /// Transform a delivered chunk before it is written to the sink.
    fn transform(&self, chunk: &[u8]) -> Vec<u8> {
        chunk.to_vec()
    }

    /// Called after each backoff; may move the cursor to a rolled-over
    /// segment. Invoked at most once per backoff cycle.
    async fn on_backoff(&mut self, cursor: &mut TailCursor) -> TailResult<()> {
        let _ = cursor;
        Ok(())
    }

    /// Whether the bounded resource is still producing output.
    ///
    /// Consulted after every poll cycle; returning `false` completes the
    /// session.
    async fn still_active(&mut self, cursor: &mut TailCursor) -> TailResult<bool>;
}

/// Drives tail sessions over a range-read transport.
pub struct TailEngine<'a, R: ?Sized, C: ?Sized> {
    range: &'a R,
    clock: &'a C,
}

impl<'a, R, C> TailEngine<'a, R, C>
where
    R: RangeRead + ?Sized,
    C: Clock + ?Sized,
{
    /// Create an engine over the given transport and clock.
    pub fn new(range: &'a R, clock: &'a C) -> Self {
        Self { range, clock }
    }

    /// Follow the log at `cursor` until the policy reports the bounded
    /// resource finished, the stop signal fires, or a fatal response
    /// arrives.
    ///
    /// # Errors
    ///
    /// Returns [`TailError::LogNotFound`] for a definitive missing log,
    /// [`TailError::Failed`] for any other unexpected status (including a
    /// plain 200, which signals the segment unexpectedly stopped serving
    /// ranges), and transport/sink errors as they occur.
    pub async fn follow<P, W>(
        &self,
        cursor: &mut TailCursor,
        policy: &mut P,
        sink: &mut W,
        stop: &mut StopSignal,
    ) -> TailResult<()>
    where
        P: TailPolicy,
        W: LogSink,
    {
        loop {
            if stop.is_stopped() {
                debug!(url = %cursor.target_url, "tail stopped by caller");
                return Ok(());
            }

            let response = self.range.read_range(&cursor.target_url, cursor.offset).await?;
            cursor.polls += 1;

            match response.status {
                PARTIAL_CONTENT => {
                    let chunk = policy.transform(&response.body);
                    sink.write_chunk(&chunk).await?;
                    cursor.advance(response.content_length);
                    debug!(
                        url = %cursor.target_url,
                        offset = cursor.offset,
                        bytes = response.content_length,
                        "delivered log chunk"
                    );
                }
                status if policy.is_transient(status) => {
                    cursor.not_ready += 1;
                    debug!(
                        url = %cursor.target_url,
                        offset = cursor.offset,
                        status,
                        "log data not ready; backing off"
                    );
                    if stop.is_stopped() {
                        debug!(url = %cursor.target_url, "tail stopped by caller");
                        return Ok(());
                    }
                    self.sleep_or_stop(policy.backoff(), stop).await;
                    if stop.is_stopped() {
                        debug!(url = %cursor.target_url, "tail stopped by caller");
                        return Ok(());
                    }
                    policy.on_backoff(cursor).await?;
                }
                NOT_FOUND => {
                    return Err(TailError::LogNotFound {
                        url: cursor.target_url.clone(),
                        status: response.status,
                        reason: response.reason,
                    });
                }
                status => {
                    warn!(url = %cursor.target_url, status, "unexpected tail response");
                    return Err(TailError::Failed {
                        url: cursor.target_url.clone(),
                        status,
                        reason: response.reason,
                    });
                }
            }

            if !policy.still_active(cursor).await? {
                debug!(
                    url = %cursor.target_url,
                    polls = cursor.polls,
                    offset = cursor.offset,
                    "bounded resource finished; tail complete"
                );
                return Ok(());
            }
        }
    }

    async fn sleep_or_stop(&self, delay: Duration, stop: &mut StopSignal) {
        tokio::select! {
            () = self.clock.sleep(delay) => {}
            () = stop.stopped() => {}
        }
    }
}

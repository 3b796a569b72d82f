//! Scripted mock collaborators.
//!
//! Responses are scripted as queues; the last entry repeats once the
//! queue runs down to it, so a session can keep polling a settled
//! resource. Every call is recorded so tests can assert on exact request
//! sequences.

use async_trait::async_trait;
use fd_core::client::{
    ControlApi, ExecutionSource, LogSink, RangeRead, RangeResponse, TransportError,
};
use fd_core::tail::{Clock, StopHandle};
use chrono::{DateTime, TimeZone, Utc};
use fd_protocol::{CommandStatus, Execution, StepMetrics, StepState};
use serde_json::Value;
use std::collections::VecDeque;
use std::sync::Mutex;
use std::time::Duration;

fn pop_or_repeat<T: Clone>(queue: &mut VecDeque<T>) -> Option<T> {
    if queue.len() > 1 {
        queue.pop_front()
    } else {
        queue.front().cloned()
    }
}

/// Scripted resource discovery collaborator.
pub struct MockExecutionSource {
    pub executions: Mutex<VecDeque<Execution>>,
    pub command_statuses: Mutex<VecDeque<CommandStatus>>,
    pub command_status_calls: Mutex<u32>,
    pub command_log_link: String,
    pub tail_urls: Mutex<VecDeque<String>>,
    pub tail_url_calls: Mutex<u32>,
}

impl MockExecutionSource {
    pub fn new() -> Self {
        Self {
            executions: Mutex::new(VecDeque::new()),
            command_statuses: Mutex::new(VecDeque::new()),
            command_status_calls: Mutex::new(0),
            command_log_link: "https://api.example.com/command/log".to_string(),
            tail_urls: Mutex::new(VecDeque::new()),
            tail_url_calls: Mutex::new(0),
        }
    }

    pub fn with_execution(execution: Execution) -> Self {
        let source = Self::new();
        source
            .executions
            .lock()
            .expect("lock")
            .push_back(execution);
        source
    }

    pub fn with_command_statuses(statuses: Vec<CommandStatus>) -> Self {
        let source = Self::new();
        *source.command_statuses.lock().expect("lock") = statuses.into();
        source
    }

    pub fn with_tail_urls(urls: Vec<&str>) -> Self {
        let source = Self::new();
        *source.tail_urls.lock().expect("lock") =
            urls.into_iter().map(str::to_string).collect();
        source
    }
}

#[async_trait]
impl ExecutionSource for MockExecutionSource {
    async fn current_execution(
        &self,
        _program_id: &str,
        _pipeline_id: &str,
    ) -> Result<Execution, TransportError> {
        pop_or_repeat(&mut self.executions.lock().expect("lock")).ok_or(
            TransportError::Status {
                url: "mock://executions".to_string(),
                status: 404,
            },
        )
    }

    async fn execution(
        &self,
        program_id: &str,
        pipeline_id: &str,
        _execution_id: &str,
    ) -> Result<Execution, TransportError> {
        self.current_execution(program_id, pipeline_id).await
    }

    async fn command_status(
        &self,
        _program_id: &str,
        _environment_id: &str,
        _command_execution_id: &str,
    ) -> Result<CommandStatus, TransportError> {
        *self.command_status_calls.lock().expect("lock") += 1;
        pop_or_repeat(&mut self.command_statuses.lock().expect("lock")).ok_or(
            TransportError::Status {
                url: "mock://command".to_string(),
                status: 404,
            },
        )
    }

    async fn command_log_link(
        &self,
        _program_id: &str,
        _environment_id: &str,
        _command_execution_id: &str,
    ) -> Result<String, TransportError> {
        Ok(self.command_log_link.clone())
    }

    async fn environment_tail_url(
        &self,
        _program_id: &str,
        _environment_id: &str,
        _service: &str,
        _name: &str,
    ) -> Result<String, TransportError> {
        *self.tail_url_calls.lock().expect("lock") += 1;
        pop_or_repeat(&mut self.tail_urls.lock().expect("lock")).ok_or(
            TransportError::Status {
                url: "mock://logs".to_string(),
                status: 404,
            },
        )
    }
}

/// Scripted control-plane API.
pub struct MockControlApi {
    pub step_states: Mutex<VecDeque<StepState>>,
    pub refresh_calls: Mutex<u32>,
    pub metrics: Mutex<Option<StepMetrics>>,
    pub submissions: Mutex<Vec<(String, Value)>>,
    pub resolved_urls: Mutex<Vec<String>>,
    /// When set, `submit_transition` answers with this status code.
    pub fail_submit: Option<u16>,
}

impl MockControlApi {
    pub fn new() -> Self {
        Self {
            step_states: Mutex::new(VecDeque::new()),
            refresh_calls: Mutex::new(0),
            metrics: Mutex::new(None),
            submissions: Mutex::new(Vec::new()),
            resolved_urls: Mutex::new(Vec::new()),
            fail_submit: None,
        }
    }

    pub fn with_step_states(states: Vec<StepState>) -> Self {
        let api = Self::new();
        *api.step_states.lock().expect("lock") = states.into();
        api
    }

    pub fn with_metrics(metrics: StepMetrics) -> Self {
        let api = Self::new();
        *api.metrics.lock().expect("lock") = Some(metrics);
        api
    }
}

#[async_trait]
impl ControlApi for MockControlApi {
    async fn refresh_step(&self, _url: &str) -> Result<StepState, TransportError> {
        *self.refresh_calls.lock().expect("lock") += 1;
        pop_or_repeat(&mut self.step_states.lock().expect("lock")).ok_or(
            TransportError::Status {
                url: "mock://step".to_string(),
                status: 404,
            },
        )
    }

    async fn step_metrics(&self, url: &str) -> Result<StepMetrics, TransportError> {
        self.metrics
            .lock()
            .expect("lock")
            .clone()
            .ok_or(TransportError::Status {
                url: url.to_string(),
                status: 404,
            })
    }

    async fn submit_transition(&self, url: &str, body: &Value) -> Result<(), TransportError> {
        if let Some(status) = self.fail_submit {
            return Err(TransportError::Status {
                url: url.to_string(),
                status,
            });
        }
        self.submissions
            .lock()
            .expect("lock")
            .push((url.to_string(), body.clone()));
        Ok(())
    }

    /// Resolves a log link to `<url>/content`, mirroring the redirect
    /// indirection of the real control-plane.
    async fn resolve_log_url(&self, url: &str) -> Result<String, TransportError> {
        self.resolved_urls.lock().expect("lock").push(url.to_string());
        Ok(format!("{}/content", url))
    }
}

/// Scripted byte-range transport.
pub struct MockRangeRead {
    pub responses: Mutex<VecDeque<RangeResponse>>,
    /// Every `(url, offset)` pair passed to `read_range`, in order.
    pub reads: Mutex<Vec<(String, u64)>>,
    pub head_sizes: Mutex<VecDeque<u64>>,
    pub head_calls: Mutex<u32>,
    pub full_body: Mutex<Option<Vec<u8>>>,
    /// Fires the stop handle once this many reads have been issued.
    pub stop_after: Mutex<Option<(u32, StopHandle)>>,
}

impl MockRangeRead {
    pub fn new(responses: Vec<RangeResponse>) -> Self {
        Self {
            responses: Mutex::new(responses.into()),
            reads: Mutex::new(Vec::new()),
            head_sizes: Mutex::new(VecDeque::new()),
            head_calls: Mutex::new(0),
            full_body: Mutex::new(None),
            stop_after: Mutex::new(None),
        }
    }

    pub fn with_head_sizes(self, sizes: Vec<u64>) -> Self {
        *self.head_sizes.lock().expect("lock") = sizes.into();
        self
    }

    pub fn stop_after_reads(self, count: u32, handle: StopHandle) -> Self {
        *self.stop_after.lock().expect("lock") = Some((count, handle));
        self
    }

    pub fn read_count(&self) -> u32 {
        self.reads.lock().expect("lock").len() as u32
    }
}

#[async_trait]
impl RangeRead for MockRangeRead {
    async fn read_range(&self, url: &str, offset: u64) -> Result<RangeResponse, TransportError> {
        self.reads
            .lock()
            .expect("lock")
            .push((url.to_string(), offset));

        let response = self
            .responses
            .lock()
            .expect("lock")
            .pop_front()
            .expect("range read script exhausted");

        if let Some((count, handle)) = self.stop_after.lock().expect("lock").as_ref() {
            if self.read_count() >= *count {
                handle.stop();
            }
        }

        Ok(response)
    }

    async fn content_size(&self, url: &str) -> Result<u64, TransportError> {
        *self.head_calls.lock().expect("lock") += 1;
        self.head_sizes
            .lock()
            .expect("lock")
            .pop_front()
            .ok_or(TransportError::MissingContentLength {
                url: url.to_string(),
            })
    }

    async fn read_full(&self, url: &str) -> Result<Vec<u8>, TransportError> {
        self.full_body
            .lock()
            .expect("lock")
            .clone()
            .ok_or(TransportError::Status {
                url: url.to_string(),
                status: 404,
            })
    }
}

/// Manual clock: fixed wall-clock time, recorded sleeps, no real delay.
pub struct TestClock {
    pub now: Mutex<DateTime<Utc>>,
    pub sleeps: Mutex<Vec<Duration>>,
}

impl TestClock {
    pub fn at_noon() -> Self {
        Self::at(12, 0, 0)
    }

    pub fn at(hour: u32, minute: u32, second: u32) -> Self {
        Self {
            now: Mutex::new(
                Utc.with_ymd_and_hms(2024, 3, 1, hour, minute, second)
                    .single()
                    .expect("valid time"),
            ),
            sleeps: Mutex::new(Vec::new()),
        }
    }

    pub fn sleep_count(&self) -> usize {
        self.sleeps.lock().expect("lock").len()
    }
}

#[async_trait]
impl Clock for TestClock {
    fn now_utc(&self) -> DateTime<Utc> {
        *self.now.lock().expect("lock")
    }

    async fn sleep(&self, duration: Duration) {
        self.sleeps.lock().expect("lock").push(duration);
    }
}

/// In-memory sink recording bytes and write count.
#[derive(Default)]
pub struct MemorySink {
    pub bytes: Vec<u8>,
    pub writes: u32,
}

#[async_trait]
impl LogSink for MemorySink {
    async fn write_chunk(&mut self, bytes: &[u8]) -> std::io::Result<()> {
        self.bytes.extend_from_slice(bytes);
        self.writes += 1;
        Ok(())
    }
}

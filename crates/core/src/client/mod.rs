//! Collaborator traits and the HTTP transport.
//!
//! The engines in this crate talk to the outside world through three
//! seams: [`ExecutionSource`] (resource discovery, implemented by the
//! surrounding SDK layer), [`ControlApi`] (pointwise control-plane calls),
//! and [`RangeRead`] (byte-range reads against log endpoints).
//! [`HttpTransport`] is the reqwest-backed implementation of the latter
//! two; tests substitute scripted mocks.

use async_trait::async_trait;
use fd_protocol::{CommandStatus, Execution, StepMetrics, StepState};
use serde_json::Value;

mod error;
mod http;
mod sink;

pub use error::TransportError;
pub use http::HttpTransport;
pub use sink::{LogSink, WriterSink};

/// One response to a byte-range read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RangeResponse {
    /// HTTP status code.
    pub status: u16,

    /// Reason phrase associated with the status.
    pub reason: String,

    /// Body bytes; empty unless the read returned partial content.
    pub body: Vec<u8>,

    /// Reported content length of the returned range.
    pub content_length: u64,
}

/// Resolves symbolic identifiers to control-plane resources.
///
/// Resource discovery walks hypermedia links from the API root and is
/// owned by the surrounding SDK layer; the engines here only consume the
/// resolved snapshots and URLs.
#[async_trait]
pub trait ExecutionSource: Send + Sync {
    /// The execution currently in progress for a pipeline.
    async fn current_execution(
        &self,
        program_id: &str,
        pipeline_id: &str,
    ) -> Result<Execution, TransportError>;

    /// A specific execution of a pipeline.
    async fn execution(
        &self,
        program_id: &str,
        pipeline_id: &str,
        execution_id: &str,
    ) -> Result<Execution, TransportError>;

    /// Current status of a command execution.
    async fn command_status(
        &self,
        program_id: &str,
        environment_id: &str,
        command_execution_id: &str,
    ) -> Result<CommandStatus, TransportError>;

    /// The log link for a command execution, prior to redirect
    /// resolution.
    async fn command_log_link(
        &self,
        program_id: &str,
        environment_id: &str,
        command_execution_id: &str,
    ) -> Result<String, TransportError>;

    /// The readable URL of the current (today's) segment of an
    /// environment log. Re-invoked by the tail engine around the UTC day
    /// boundary to pick up the rolled-over segment.
    async fn environment_tail_url(
        &self,
        program_id: &str,
        environment_id: &str,
        service: &str,
        name: &str,
    ) -> Result<String, TransportError>;
}

/// Pointwise control-plane calls made while driving a step.
#[async_trait]
pub trait ControlApi: Send + Sync {
    /// Re-fetch a step state through its self link.
    async fn refresh_step(&self, url: &str) -> Result<StepState, TransportError>;

    /// Fetch quality-gate results through a step's metrics link.
    async fn step_metrics(&self, url: &str) -> Result<StepMetrics, TransportError>;

    /// Submit a transition payload via PUT.
    ///
    /// A non-success response is reported as [`TransportError::Status`]
    /// carrying the URL and status code.
    async fn submit_transition(&self, url: &str, body: &Value) -> Result<(), TransportError>;

    /// Resolve a log link to its readable URL.
    ///
    /// The control-plane answers log links with a small JSON document
    /// whose `redirect` field carries a pre-signed read URL.
    async fn resolve_log_url(&self, url: &str) -> Result<String, TransportError>;
}

/// Byte-range reads against a log endpoint.
///
/// Log read URLs are pre-signed; requests through this trait carry no
/// control-plane credentials.
#[async_trait]
pub trait RangeRead: Send + Sync {
    /// Read from `offset` to the current end of the resource.
    async fn read_range(&self, url: &str, offset: u64) -> Result<RangeResponse, TransportError>;

    /// Current total size of the resource, from a HEAD probe.
    async fn content_size(&self, url: &str) -> Result<u64, TransportError>;

    /// Read the entire resource in one request.
    async fn read_full(&self, url: &str) -> Result<Vec<u8>, TransportError>;
}

//! Pipeline execution snapshot models.
//!
//! An execution is an ordered collection of step states produced by one
//! pipeline run. The control-plane owns these resources; the client only
//! holds transient, read-only snapshots of them.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// A HAL-style hyperlink carried in a resource's `_links` map.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct HalLink {
    /// Target URL of the link.
    pub href: String,

    /// Whether the href is a URI template.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub templated: Option<bool>,
}

impl HalLink {
    /// Create a non-templated link.
    pub fn new(href: impl Into<String>) -> Self {
        Self {
            href: href.into(),
            templated: None,
        }
    }
}

/// The `_links` map of a HAL resource, keyed by relation name.
///
/// Relation names the SDK consumes are listed in [`crate::rels`].
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, Default)]
#[serde(transparent)]
pub struct Links(pub HashMap<String, HalLink>);

impl Links {
    /// Look up a link by relation name.
    pub fn get(&self, rel: &str) -> Option<&HalLink> {
        self.0.get(rel)
    }

    /// Insert a link under the given relation name.
    pub fn insert(&mut self, rel: impl Into<String>, link: HalLink) {
        self.0.insert(rel.into(), link);
    }
}

/// Status of a pipeline execution step.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum StepStatus {
    /// Step has not begun yet.
    NotStarted,

    /// Step is actively executing.
    Running,

    /// Step finished successfully.
    Finished,

    /// Step ended with an error.
    Error,

    /// A rollback of this step is in progress.
    RollingBack,

    /// This step has been rolled back.
    RolledBack,

    /// Step is waiting for an external decision (approval, gate override,
    /// deploy resume).
    Waiting,

    /// Step was cancelled.
    Cancelled,

    /// Step failed.
    Failed,
}

/// Status of a pipeline execution as a whole.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ExecutionStatus {
    NotStarted,
    Running,
    Cancelling,
    Cancelled,
    Finished,
    Error,
    Failed,
}

/// Symbolic name of the action a step performs.
///
/// The control-plane introduces new action names over time, so unknown
/// names round-trip through [`StepAction::Other`] instead of failing to
/// deserialize.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, Hash)]
#[serde(from = "String", into = "String")]
pub enum StepAction {
    Build,
    CodeQuality,
    SecurityTest,
    LoadTest,
    AssetsTest,
    ReportPerformanceTest,
    Approval,
    Managed,
    Deploy,
    Schedule,
    /// Any action name this client does not model explicitly.
    Other(String),
}

impl StepAction {
    /// The action name as it appears on the wire.
    pub fn as_str(&self) -> &str {
        match self {
            Self::Build => "build",
            Self::CodeQuality => "codeQuality",
            Self::SecurityTest => "securityTest",
            Self::LoadTest => "loadTest",
            Self::AssetsTest => "assetsTest",
            Self::ReportPerformanceTest => "reportPerformanceTest",
            Self::Approval => "approval",
            Self::Managed => "managed",
            Self::Deploy => "deploy",
            Self::Schedule => "schedule",
            Self::Other(name) => name,
        }
    }
}

impl From<&str> for StepAction {
    fn from(value: &str) -> Self {
        match value {
            "build" => Self::Build,
            "codeQuality" => Self::CodeQuality,
            "securityTest" => Self::SecurityTest,
            "loadTest" => Self::LoadTest,
            "assetsTest" => Self::AssetsTest,
            "reportPerformanceTest" => Self::ReportPerformanceTest,
            "approval" => Self::Approval,
            "managed" => Self::Managed,
            "deploy" => Self::Deploy,
            "schedule" => Self::Schedule,
            other => Self::Other(other.to_string()),
        }
    }
}

impl From<String> for StepAction {
    fn from(value: String) -> Self {
        Self::from(value.as_str())
    }
}

impl From<StepAction> for String {
    fn from(value: StepAction) -> Self {
        value.as_str().to_string()
    }
}

impl fmt::Display for StepAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One unit of work within a pipeline execution.
///
/// Step states are created server-side as the execution progresses. The
/// client reads them and requests transitions through their links; it never
/// mutates a step locally except by re-fetching a fresh snapshot.
///
/// Under normal operation at most one step in an execution is RUNNING or
/// WAITING at a time. The client assumes this; it does not enforce it.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct StepState {
    /// Identifier of the step state.
    pub id: String,

    /// Symbolic name of the action this step performs.
    pub action: StepAction,

    /// Target environment type for deploy steps (e.g. "dev", "stage",
    /// "prod").
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub environment_type: Option<String>,

    /// Current status of the step.
    pub status: StepStatus,

    /// Timestamp at which the step started.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub started_at: Option<DateTime<Utc>>,

    /// Timestamp at which the step finished.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub finished_at: Option<DateTime<Utc>>,

    /// Hyperlinks exposed by the step (self, cancel, advance, logs,
    /// metrics). Any subset may be absent depending on the step's state.
    #[serde(rename = "_links", default, skip_serializing_if = "links_empty")]
    pub links: Links,
}

fn links_empty(links: &Links) -> bool {
    links.0.is_empty()
}

impl StepState {
    /// Look up one of the step's links by relation name.
    pub fn link(&self, rel: &str) -> Option<&HalLink> {
        self.links.get(rel)
    }
}

/// Embedded collections of an execution resource.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, Default)]
pub struct ExecutionEmbedded {
    /// The execution's step states, in pipeline order.
    #[serde(rename = "stepStates", default)]
    pub step_states: Vec<StepState>,
}

/// A snapshot of one pipeline run.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Execution {
    /// Identifier of the execution.
    pub id: String,

    /// Overall status of the execution.
    pub status: ExecutionStatus,

    /// Timestamp at which the execution was created.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,

    /// Timestamp at which the status last changed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,

    /// Embedded step states.
    #[serde(rename = "_embedded", default)]
    pub embedded: ExecutionEmbedded,

    /// Hyperlinks exposed by the execution.
    #[serde(rename = "_links", default, skip_serializing_if = "links_empty")]
    pub links: Links,
}

impl Execution {
    /// The execution's step states, in pipeline order.
    pub fn step_states(&self) -> &[StepState] {
        &self.embedded.step_states
    }
}

//! Step classification over pipeline execution snapshots.
//!
//! Callers address steps by symbolic selector: by status ("current",
//! "waiting") or by gate name ("security", "performance", the per-
//! environment deploy gates, or any action name verbatim). The classifier
//! resolves a selector against an execution's ordered step list; absence
//! is a normal, reportable outcome.

use fd_protocol::{Execution, StepAction, StepState, StepStatus};
use std::fmt;
use thiserror::Error;

/// Errors raised when a selector does not resolve to a usable step.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StepError {
    /// No step in the execution matches the selector.
    #[error("no step matching {selector} in execution {execution_id}")]
    NotFound {
        selector: String,
        execution_id: String,
    },

    /// The selected step exists but is not running.
    #[error("step {selector} in execution {execution_id} is not running")]
    NotRunning {
        selector: String,
        execution_id: String,
    },
}

/// Addresses one step within an execution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StepSelector {
    /// First step that has not finished.
    Current,

    /// First step waiting for an external decision.
    Waiting,

    /// The security test step.
    Security,

    /// The last performance-related step (load test, assets test, or
    /// performance report), in list order.
    Performance,

    /// The deploy step targeting the dev environment.
    DevDeploy,

    /// The deploy step targeting the stage environment.
    StageDeploy,

    /// The deploy step targeting the prod environment.
    ProdDeploy,

    /// First step whose action matches verbatim.
    Action(StepAction),
}

impl StepSelector {
    /// Parse a caller-facing selector string.
    ///
    /// Unknown names select by action verbatim, so this never fails.
    pub fn parse(value: &str) -> Self {
        match value {
            "current" => Self::Current,
            "waiting" => Self::Waiting,
            "security" => Self::Security,
            "performance" => Self::Performance,
            "devDeploy" => Self::DevDeploy,
            "stageDeploy" => Self::StageDeploy,
            "prodDeploy" => Self::ProdDeploy,
            other => Self::Action(StepAction::from(other)),
        }
    }
}

impl fmt::Display for StepSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Current => f.write_str("current"),
            Self::Waiting => f.write_str("waiting"),
            Self::Security => f.write_str("security"),
            Self::Performance => f.write_str("performance"),
            Self::DevDeploy => f.write_str("devDeploy"),
            Self::StageDeploy => f.write_str("stageDeploy"),
            Self::ProdDeploy => f.write_str("prodDeploy"),
            Self::Action(action) => f.write_str(action.as_str()),
        }
    }
}

/// First step in list order whose status is not FINISHED.
pub fn current_step(execution: &Execution) -> Option<&StepState> {
    execution
        .step_states()
        .iter()
        .find(|step| step.status != StepStatus::Finished)
}

/// First step in list order whose status is WAITING.
pub fn waiting_step(execution: &Execution) -> Option<&StepState> {
    execution
        .step_states()
        .iter()
        .find(|step| step.status == StepStatus::Waiting)
}

/// Resolve a selector against an execution.
///
/// Returns `None` when no step matches; callers report this as a
/// [`StepError::NotFound`].
pub fn find_step<'a>(execution: &'a Execution, selector: &StepSelector) -> Option<&'a StepState> {
    let steps = execution.step_states();
    match selector {
        StepSelector::Current => current_step(execution),
        StepSelector::Waiting => waiting_step(execution),
        StepSelector::Security => steps
            .iter()
            .find(|step| step.action == StepAction::SecurityTest),
        // Several actions report performance results; the last one in
        // pipeline order carries the authoritative metrics.
        StepSelector::Performance => steps
            .iter()
            .filter(|step| {
                matches!(
                    step.action,
                    StepAction::LoadTest | StepAction::AssetsTest | StepAction::ReportPerformanceTest
                )
            })
            .last(),
        StepSelector::DevDeploy => deploy_step(steps, "dev"),
        StepSelector::StageDeploy => deploy_step(steps, "stage"),
        StepSelector::ProdDeploy => deploy_step(steps, "prod"),
        StepSelector::Action(action) => steps.iter().find(|step| step.action == *action),
    }
}

fn deploy_step<'a>(steps: &'a [StepState], environment_type: &str) -> Option<&'a StepState> {
    steps.iter().find(|step| {
        step.action == StepAction::Deploy
            && step.environment_type.as_deref() == Some(environment_type)
    })
}

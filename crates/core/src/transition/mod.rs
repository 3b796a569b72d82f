//! Transition planning for pipeline execution steps.
//!
//! Given a selected step, the engine decides the target link (cancel vs.
//! advance) and the request payload from a per-action rule table, then
//! submits the payload via PUT. Step kinds terminate differently: approval
//! gates answer with an approval flag, managed steps with a start flag,
//! waiting deploys are halted through their advance endpoint, and quality
//! gates advance by overriding their failing important metrics.

use crate::client::{ControlApi, ExecutionSource, TransportError};
use crate::steps::{current_step, find_step, waiting_step, StepSelector};
use fd_protocol::{rels, HalLink, Severity, StepAction, StepMetrics, StepState, StepStatus};
use serde_json::{json, Value};
use tracing::debug;

mod error;

pub use error::{TransitionError, TransitionResult};

/// A planned transition: the link to PUT to and the payload to send.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransitionPlan {
    /// Target URL of the request.
    pub url: String,

    /// JSON payload.
    pub body: Value,
}

fn require_link<'a>(step: &'a StepState, rel: &'static str) -> TransitionResult<&'a HalLink> {
    step.link(rel).ok_or_else(|| TransitionError::LinkMissing {
        rel,
        action: step.action.clone(),
    })
}

/// Plan the cancellation of a step.
///
/// # Errors
///
/// Fails with [`TransitionError::LinkMissing`] when the step does not
/// expose the link the matching rule requires.
pub fn plan_cancel(step: &StepState) -> TransitionResult<TransitionPlan> {
    let (rel, body) = match (&step.action, step.status) {
        (StepAction::Approval, _) => (rels::CANCEL, json!({ "approved": false })),
        (StepAction::Managed, _) => (rels::CANCEL, json!({ "start": false })),
        // A waiting deploy can only be halted through its advance
        // endpoint.
        (StepAction::Deploy, StepStatus::Waiting) => (rels::ADVANCE, json!({ "resume": false })),
        (action, StepStatus::Waiting) if *action != StepAction::Schedule => {
            (rels::CANCEL, json!({ "override": false }))
        }
        _ => (rels::CANCEL, json!({ "cancel": true })),
    };

    let link = require_link(step, rel)?;
    Ok(TransitionPlan {
        url: link.href.clone(),
        body,
    })
}

/// Plan the advancement of a step out of its waiting state.
///
/// Quality-gate style steps advance by overriding their failing important
/// metrics, which requires a metrics fetch through `api`.
///
/// # Errors
///
/// Fails with [`TransitionError::Unsupported`] for schedule steps and
/// [`TransitionError::LinkMissing`] when a required link is absent.
pub async fn plan_advance<A>(api: &A, step: &StepState) -> TransitionResult<TransitionPlan>
where
    A: ControlApi + ?Sized,
{
    let link = require_link(step, rels::ADVANCE)?;

    let body = match &step.action {
        StepAction::Approval => json!({ "approved": true }),
        StepAction::Managed => json!({ "start": true }),
        StepAction::Schedule => {
            return Err(TransitionError::Unsupported {
                action: step.action.clone(),
            })
        }
        StepAction::Deploy => json!({ "resume": true }),
        _ => {
            let metrics_link = require_link(step, rels::METRICS)?;
            let results = api.step_metrics(&metrics_link.href).await?;
            override_body(&results)?
        }
    };

    Ok(TransitionPlan {
        url: link.href.clone(),
        body,
    })
}

// A gate advances by overriding every important metric that failed; a
// gate with nothing to override still submits an empty list.
fn override_body(results: &StepMetrics) -> Result<Value, serde_json::Error> {
    let mut overrides = Vec::new();
    for metric in &results.metrics {
        if metric.severity != Severity::Important || metric.passed {
            continue;
        }
        let mut value = serde_json::to_value(metric)?;
        if let Value::Object(ref mut fields) = value {
            fields.insert("override".to_string(), Value::Bool(true));
        }
        overrides.push(value);
    }
    Ok(json!({ "metrics": overrides }))
}

/// Submit a planned transition.
///
/// # Errors
///
/// A non-success response is surfaced as [`TransitionError::Failed`]
/// carrying the URL and status.
pub async fn submit<A>(api: &A, plan: &TransitionPlan) -> TransitionResult<()>
where
    A: ControlApi + ?Sized,
{
    debug!(url = %plan.url, "submitting step transition");
    match api.submit_transition(&plan.url, &plan.body).await {
        Ok(()) => Ok(()),
        Err(TransportError::Status { url, status }) => Err(TransitionError::Failed { url, status }),
        Err(other) => Err(other.into()),
    }
}

/// Cancel the step currently in progress for a pipeline.
///
/// # Errors
///
/// Fails when the pipeline has no unfinished step, when the step lacks
/// the required link, or when the control-plane rejects the request.
pub async fn cancel_current_execution<S, A>(
    source: &S,
    api: &A,
    program_id: &str,
    pipeline_id: &str,
) -> TransitionResult<()>
where
    S: ExecutionSource + ?Sized,
    A: ControlApi + ?Sized,
{
    let execution = source.current_execution(program_id, pipeline_id).await?;
    let step = current_step(&execution).ok_or_else(|| TransitionError::CurrentStepNotFound {
        pipeline_id: pipeline_id.to_string(),
    })?;

    debug!(action = %step.action, status = ?step.status, "cancelling current step");
    let plan = plan_cancel(step)?;
    submit(api, &plan).await
}

/// Advance the waiting step of a pipeline.
///
/// # Errors
///
/// Fails when the pipeline has no waiting step, for schedule steps, when
/// a required link is absent, or when the control-plane rejects the
/// request.
pub async fn advance_current_execution<S, A>(
    source: &S,
    api: &A,
    program_id: &str,
    pipeline_id: &str,
) -> TransitionResult<()>
where
    S: ExecutionSource + ?Sized,
    A: ControlApi + ?Sized,
{
    let execution = source.current_execution(program_id, pipeline_id).await?;
    let step = waiting_step(&execution).ok_or_else(|| TransitionError::WaitingStepNotFound {
        pipeline_id: pipeline_id.to_string(),
    })?;

    debug!(action = %step.action, "advancing waiting step");
    let plan = plan_advance(api, step).await?;
    submit(api, &plan).await
}

/// Fetch the quality-gate results for a step addressed by selector.
///
/// # Errors
///
/// Fails when the selector resolves no step or the step has no metrics
/// link.
pub async fn quality_gate_results<S, A>(
    source: &S,
    api: &A,
    program_id: &str,
    pipeline_id: &str,
    execution_id: &str,
    selector: &StepSelector,
) -> TransitionResult<StepMetrics>
where
    S: ExecutionSource + ?Sized,
    A: ControlApi + ?Sized,
{
    let execution = source
        .execution(program_id, pipeline_id, execution_id)
        .await?;
    let step = find_step(&execution, selector).ok_or_else(|| TransitionError::StepNotFound {
        selector: selector.to_string(),
        execution_id: execution.id.clone(),
    })?;

    let metrics_link = require_link(step, rels::METRICS)?;
    Ok(api.step_metrics(&metrics_link.href).await?)
}

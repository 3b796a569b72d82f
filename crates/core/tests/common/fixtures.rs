//! Fixtures for building executions, steps, and scripted responses.

use fd_core::client::RangeResponse;
use fd_protocol::{
    rels, Execution, ExecutionEmbedded, ExecutionStatus, HalLink, Links, Metric, Severity,
    StepAction, StepState, StepStatus,
};

/// A step state with no links.
pub fn bare_step(id: &str, action: &str, status: StepStatus) -> StepState {
    StepState {
        id: id.to_string(),
        action: StepAction::from(action),
        environment_type: None,
        status,
        started_at: None,
        finished_at: None,
        links: Links::default(),
    }
}

/// A step state exposing self, cancel, advance, logs, and metrics links
/// rooted at `https://api.example.com/step/<id>`.
pub fn linked_step(id: &str, action: &str, status: StepStatus) -> StepState {
    let base = format!("https://api.example.com/step/{}", id);
    let mut step = bare_step(id, action, status);
    step.links.insert(rels::SELF, HalLink::new(base.clone()));
    step.links
        .insert(rels::CANCEL, HalLink::new(format!("{}/cancel", base)));
    step.links
        .insert(rels::ADVANCE, HalLink::new(format!("{}/advance", base)));
    step.links
        .insert(rels::LOGS, HalLink::new(format!("{}/logs", base)));
    step.links
        .insert(rels::METRICS, HalLink::new(format!("{}/metrics", base)));
    step
}

/// An execution snapshot holding the given steps.
pub fn execution(id: &str, steps: Vec<StepState>) -> Execution {
    Execution {
        id: id.to_string(),
        status: ExecutionStatus::Running,
        created_at: None,
        updated_at: None,
        embedded: ExecutionEmbedded { step_states: steps },
        links: Links::default(),
    }
}

/// A quality-gate metric.
pub fn metric(severity: Severity, passed: bool, kpi: &str) -> Metric {
    Metric {
        id: None,
        severity,
        passed,
        actual_value: None,
        expected_value: None,
        comparator: None,
        kpi: Some(kpi.to_string()),
        override_flag: None,
    }
}

/// A 206 response delivering `body` with the given reported length.
pub fn partial(body: &[u8], content_length: u64) -> RangeResponse {
    RangeResponse {
        status: 206,
        reason: "Partial Content".to_string(),
        body: body.to_vec(),
        content_length,
    }
}

/// An empty response with the given status code.
pub fn status_only(status: u16) -> RangeResponse {
    let reason = match status {
        404 => "Not Found",
        416 => "Range Not Satisfiable",
        200 => "OK",
        500 => "Internal Server Error",
        _ => "",
    };
    RangeResponse {
        status,
        reason: reason.to_string(),
        body: Vec::new(),
        content_length: 0,
    }
}

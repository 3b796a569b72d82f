use fd_protocol::*;

#[test]
fn test_execution_deserialization_from_hal_json() {
    // Sample payload shaped like the control-plane's execution resource
    let json_str = r#"
{
  "id": "1000",
  "status": "RUNNING",
  "createdAt": "2024-03-01T10:00:00Z",
  "updatedAt": "2024-03-01T10:05:00Z",
  "_embedded": {
    "stepStates": [
      {
        "id": "1",
        "action": "build",
        "status": "FINISHED",
        "_links": {
          "self": { "href": "https://api.example.com/step/1" }
        }
      },
      {
        "id": "2",
        "action": "codeQuality",
        "status": "RUNNING",
        "_links": {
          "self": { "href": "https://api.example.com/step/2" },
          "cancel": { "href": "https://api.example.com/step/2/cancel" },
          "metrics": { "href": "https://api.example.com/step/2/metrics" }
        }
      },
      {
        "id": "3",
        "action": "deploy",
        "environmentType": "dev",
        "status": "NOT_STARTED"
      }
    ]
  }
}
"#;

    let execution: Execution =
        serde_json::from_str(json_str).expect("Failed to deserialize Execution");

    assert_eq!(execution.id, "1000");
    assert_eq!(execution.status, ExecutionStatus::Running);
    assert_eq!(execution.step_states().len(), 3);

    let build = &execution.step_states()[0];
    assert_eq!(build.action, StepAction::Build);
    assert_eq!(build.status, StepStatus::Finished);

    let quality = &execution.step_states()[1];
    assert_eq!(quality.action, StepAction::CodeQuality);
    assert_eq!(
        quality.link(rels::CANCEL).map(|l| l.href.as_str()),
        Some("https://api.example.com/step/2/cancel")
    );

    let deploy = &execution.step_states()[2];
    assert_eq!(deploy.action, StepAction::Deploy);
    assert_eq!(deploy.environment_type.as_deref(), Some("dev"));
    assert!(deploy.link(rels::SELF).is_none());
}

#[test]
fn test_step_state_round_trip() {
    let mut links = Links::default();
    links.insert(rels::SELF, HalLink::new("https://api.example.com/step/9"));
    links.insert(
        rels::ADVANCE,
        HalLink::new("https://api.example.com/step/9/advance"),
    );

    let step = StepState {
        id: "9".to_string(),
        action: StepAction::Approval,
        environment_type: None,
        status: StepStatus::Waiting,
        started_at: None,
        finished_at: None,
        links,
    };

    let json = serde_json::to_string(&step).expect("Failed to serialize StepState");
    let deserialized: StepState =
        serde_json::from_str(&json).expect("Failed to deserialize StepState");

    assert_eq!(deserialized, step);
}

#[test]
fn test_unknown_action_round_trip() {
    let json_str = r#"{ "id": "4", "action": "contentAudit", "status": "WAITING" }"#;
    let step: StepState = serde_json::from_str(json_str).expect("Failed to deserialize StepState");

    assert_eq!(step.action, StepAction::Other("contentAudit".to_string()));

    let json = serde_json::to_value(&step).expect("Failed to serialize StepState");
    assert_eq!(json["action"], "contentAudit");
}

#[test]
fn test_step_metrics_deserialization() {
    let json_str = r#"
{
  "metrics": [
    {
      "id": "18",
      "severity": "important",
      "passed": false,
      "actualValue": "4",
      "expectedValue": "3",
      "comparator": "GT",
      "kpi": "sqale_rating"
    },
    {
      "id": "19",
      "severity": "informational",
      "passed": true,
      "kpi": "coverage"
    }
  ]
}
"#;

    let metrics: StepMetrics =
        serde_json::from_str(json_str).expect("Failed to deserialize StepMetrics");

    assert_eq!(metrics.metrics.len(), 2);
    assert_eq!(metrics.metrics[0].severity, Severity::Important);
    assert!(!metrics.metrics[0].passed);
    assert_eq!(metrics.metrics[0].override_flag, None);
    assert_eq!(metrics.metrics[1].kpi.as_deref(), Some("coverage"));
}

#[test]
fn test_command_execution_deserialization() {
    let json_str = r#"
{
  "id": "5000",
  "command": "indexer:reindex",
  "type": "cli",
  "status": "RUNNING"
}
"#;

    let execution: CommandExecution =
        serde_json::from_str(json_str).expect("Failed to deserialize CommandExecution");

    assert_eq!(execution.id, "5000");
    assert!(execution.status.is_running());
}

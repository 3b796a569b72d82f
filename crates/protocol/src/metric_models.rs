//! Quality-gate metric models.
//!
//! Quality-gate style steps (code quality, security test, load test)
//! expose their results through a metrics endpoint. The transition engine
//! reads these to build gate-override payloads.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Severity of a quality-gate metric.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(from = "String", into = "String")]
pub enum Severity {
    Informational,
    Important,
    Critical,
    /// Any severity this client does not model explicitly.
    Other(String),
}

impl Severity {
    /// The severity as it appears on the wire.
    pub fn as_str(&self) -> &str {
        match self {
            Self::Informational => "informational",
            Self::Important => "important",
            Self::Critical => "critical",
            Self::Other(name) => name,
        }
    }
}

impl From<&str> for Severity {
    fn from(value: &str) -> Self {
        match value {
            "informational" => Self::Informational,
            "important" => Self::Important,
            "critical" => Self::Critical,
            other => Self::Other(other.to_string()),
        }
    }
}

impl From<String> for Severity {
    fn from(value: String) -> Self {
        Self::from(value.as_str())
    }
}

impl From<Severity> for String {
    fn from(value: Severity) -> Self {
        value.as_str().to_string()
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One quality-gate metric result.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Metric {
    /// Identifier of the metric.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    /// Severity of the metric.
    pub severity: Severity,

    /// Whether the gate condition passed.
    pub passed: bool,

    /// Measured value.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub actual_value: Option<String>,

    /// Threshold the measured value was compared against.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expected_value: Option<String>,

    /// Comparator used for the metric (e.g. "GT", "LT").
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comparator: Option<String>,

    /// KPI identifier (e.g. "sqale_rating").
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kpi: Option<String>,

    /// Whether a failing metric has been overridden by a caller.
    #[serde(rename = "override", default, skip_serializing_if = "Option::is_none")]
    pub override_flag: Option<bool>,
}

/// Quality-gate results for one pipeline step.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, Default)]
pub struct StepMetrics {
    /// The individual metric results.
    #[serde(default)]
    pub metrics: Vec<Metric>,
}

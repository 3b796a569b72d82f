//! Link relation names the SDK consumes.
//!
//! Resources expose hyperlinks in a HAL `_links` map keyed by these names.

/// The resource itself; used to re-fetch a fresh snapshot.
pub const SELF: &str = "self";

/// Request cancellation of a step.
pub const CANCEL: &str = "cancel";

/// Advance a step out of its waiting state.
pub const ADVANCE: &str = "advance";

/// Resolve the step's log read endpoint.
pub const LOGS: &str = "logs";

/// Quality-gate metric results for a step.
pub const METRICS: &str = "metrics";

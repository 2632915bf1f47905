//! Telemetry metric name constants.
//!
//! Consumers install their own `metrics` recorder; without one, all metric
//! calls are no-ops.
//!
//! All metrics are prefixed with `huginn_`. Counters end in `_total`,
//! histograms use meaningful units (e.g. `_seconds`).

/// Inference requests sent upstream.
///
/// Labels: `provider`, `status` ("ok" | "error").
pub const REQUESTS_TOTAL: &str = "huginn_requests_total";

/// Failed inference requests by error kind.
///
/// Labels: `provider`, `kind` (see `HuginnError::kind`, e.g. "http" | "api" |
/// "model_loading").
pub const REQUEST_ERRORS_TOTAL: &str = "huginn_request_errors_total";

/// Inference request duration in seconds.
///
/// Labels: `provider`.
pub const REQUEST_DURATION_SECONDS: &str = "huginn_request_duration_seconds";

/// Completed classifications.
///
/// Labels: `sentiment` ("positive" | "negative" | "neutral").
pub const CLASSIFICATIONS_TOTAL: &str = "huginn_classifications_total";

/// Triggers dropped because a request was already in flight.
pub const IGNORED_TRIGGERS_TOTAL: &str = "huginn_ignored_triggers_total";

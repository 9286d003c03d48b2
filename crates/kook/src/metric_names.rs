//! Metric names recorded when the `metrics` feature is enabled.

/// Upload attempts, labelled by `source`.
pub const UPLOADS_TOTAL: &str = "server_temp_uploads_total";
/// Failed uploads, labelled by error `kind`.
pub const UPLOAD_FAILURES_TOTAL: &str = "server_temp_upload_failures_total";
/// Wall time from classification to parsed response.
pub const UPLOAD_DURATION_SECONDS: &str = "server_temp_upload_duration_seconds";

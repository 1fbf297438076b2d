use castor_diff::{DiffPolicy, DiffReport};
use tracing::debug;

/// Logs `report` as pretty JSON at debug level with every secret redacted.
/// Nothing is rendered unless debug logging is on.
pub(crate) fn debug_diff_report(client: &str, report: &DiffReport, policy: &DiffPolicy) {
    if !tracing::enabled!(tracing::Level::DEBUG) {
        return;
    }

    let pretty_json = serde_json::to_string_pretty(&report.redacted(policy))
        .unwrap_or_else(|error| format!("<pretty serialize failed: {error}>"));
    debug!(client, "Snapshot diff:\n{pretty_json}");
}

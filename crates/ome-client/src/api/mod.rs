//! Per-service OME operations
//!
//! Each module adds inherent methods to `OmeClient` for one OME service.

mod accounts;
mod baselines;
mod certificates;
mod deployment;
mod devices;
mod discovery;
mod groups;
mod jobs;
mod network;
mod templates;
mod updates;

/// Extract a job id from an action response
///
/// Depending on the OME version, actions answer with a bare integer,
/// `{"JobId": n}` or `{"Id": n}`.
pub(crate) fn job_id_from(value: &serde_json::Value) -> Option<i64> {
    value
        .as_i64()
        .or_else(|| value.get("JobId").and_then(|v| v.as_i64()))
        .or_else(|| value.get("Id").and_then(|v| v.as_i64()))
}

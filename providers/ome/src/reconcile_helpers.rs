//! Helper functions for common reconciliation patterns
//!
//! Drift detection on read, job tracking and member list diffs shared by the
//! reconcilers.

use crate::error::{ProviderError, ResultExt};
use crate::resource::Context;
use ome_client::{JobOutcome, JobTracker, OmeError, Template};
use std::collections::BTreeSet;
use std::future::Future;
use tracing::{debug, error, info};

/// Simple drift detection
///
/// Returns:
/// - `Ok(Some(entity))` if the entity exists
/// - `Ok(None)` if it was deleted outside the provider (drift detected, a warning is attached)
/// - `Err(e)` for any other failure; the entity is not assumed gone
pub async fn read_or_gone<F, T>(
    ctx: &Context<'_>,
    get_fn: F,
    resource_name: &str,
    id: impl std::fmt::Display,
    summary: &str,
) -> Result<Option<T>, ProviderError>
where
    F: Future<Output = Result<T, OmeError>> + Send,
{
    match get_fn.await {
        Ok(existing) => {
            debug!("{} (ID: {}) exists in OME", resource_name, id);
            Ok(Some(existing))
        }
        Err(OmeError::NotFound(_)) => {
            ctx.warn(
                format!("{} not found", resource_name),
                format!(
                    "{} (ID: {}) was deleted outside the provider and is removed from state",
                    resource_name, id
                ),
            );
            Ok(None)
        }
        Err(OmeError::Cancelled) => Err(ProviderError::Cancelled),
        Err(e) => {
            error!("Failed to verify {} (ID: {}) exists: {}", resource_name, id, e);
            Err(ProviderError::failed(summary, e.detail()))
        }
    }
}

/// Track an OME job until it finishes
///
/// A job that finishes with warnings passes and attaches a warning; any other
/// unsuccessful end (failed, aborted, timed out) fails with `summary`.
pub async fn track_job(
    ctx: &Context<'_>,
    job_id: i64,
    retries: u32,
    interval_secs: i64,
    summary: &str,
) -> Result<JobOutcome, ProviderError> {
    let tracker = JobTracker::from_secs(i64::from(retries), interval_secs);
    info!("Tracking job {} ({} checks, {}s apart)", job_id, retries, interval_secs);
    let outcome = tracker.track(ctx.client, job_id, ctx.cancel).await.map_err(|e| match e {
        OmeError::Cancelled => ProviderError::Cancelled,
        other => ProviderError::failed(summary, other.detail()),
    })?;

    if outcome.is_warning() {
        ctx.warn(
            format!("Job {} completed with warnings", job_id),
            outcome.message.clone(),
        );
        return Ok(outcome);
    }
    if !outcome.is_success() {
        return Err(ProviderError::failed(
            summary,
            format!("job {} ended {}: {}", job_id, outcome.status, outcome.message),
        ));
    }
    Ok(outcome)
}

/// Template by ID, or by name when no ID is set. `None` when OME does not know it.
pub async fn find_template(ctx: &Context<'_>, template_id: i64, template_name: &str) -> Result<Option<Template>, OmeError> {
    if template_id != 0 {
        return match ctx.client.get_template(template_id).await {
            Ok(template) => Ok(Some(template)),
            Err(e) if e.is_not_found() => Ok(None),
            Err(e) => Err(e),
        };
    }
    ctx.client.get_template_by_name(template_name).await
}

/// [`find_template`], failing with `summary` when the template does not exist
pub async fn resolve_template(
    ctx: &Context<'_>,
    template_id: i64,
    template_name: &str,
    summary: &str,
) -> Result<Template, ProviderError> {
    find_template(ctx, template_id, template_name)
        .await
        .or_fail(summary)?
        .ok_or_else(|| {
            let label = if template_id != 0 {
                template_id.to_string()
            } else {
                template_name.to_string()
            };
            ProviderError::failed(summary, format!("template {} not found", label))
        })
}

/// Retry count and interval from optional user settings
pub fn job_settings(retry_count: Option<i64>, sleep_interval: Option<i64>, defaults: (i64, i64)) -> (u32, i64) {
    let retries = retry_count.unwrap_or(defaults.0).max(1);
    let interval = sleep_interval.unwrap_or(defaults.1).max(0);
    (u32::try_from(retries).unwrap_or(u32::MAX), interval)
}

/// IDs to add and to remove to turn `current` into `desired`, both sorted
pub fn set_diff(current: &[i64], desired: &[i64]) -> (Vec<i64>, Vec<i64>) {
    let current: BTreeSet<i64> = current.iter().copied().collect();
    let desired: BTreeSet<i64> = desired.iter().copied().collect();
    let add = desired.difference(&current).copied().collect();
    let remove = current.difference(&desired).copied().collect();
    (add, remove)
}

/// `observed` laid out in the order of `prior`; entries `prior` lacks are appended
pub fn keep_order<T: Clone>(prior: &[T], observed: &[T], same: impl Fn(&T, &T) -> bool) -> Vec<T> {
    let mut ordered: Vec<T> = prior
        .iter()
        .filter(|p| observed.iter().any(|o| same(p, o)))
        .cloned()
        .collect();
    for item in observed {
        if !ordered.iter().any(|o| same(o, item)) {
            ordered.push(item.clone());
        }
    }
    ordered
}

#[path = "reconcile_helpers_test.rs"]
mod reconcile_helpers_test;

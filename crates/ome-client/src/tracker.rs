//! # OME job tracker
//!
//! Polls `JobService/Jobs({id})` until the job reaches a terminal state, the retry
//! budget is used up, or the caller's cancellation token fires.
//!
//! ## Semantics
//!
//! - Each poll consumes one retry, including polls whose fetch failed.
//! - The tracker sleeps `interval` between polls and never after the last one.
//! - Cancellation aborts the wait and returns `OmeError::Cancelled`. The job keeps
//!   running on OME.
//! - For a terminal state other than Completed, the message is built from the
//!   details of the job's most recent execution.

use crate::error::OmeError;
use crate::models::JobStatus;
use crate::ome_trait::OmeApi;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// Result of tracking one job
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobOutcome {
    pub job_id: i64,
    /// Terminal status, or `TimedOut` when retries ran out first
    pub status: JobStatus,
    pub message: String,
}

impl JobOutcome {
    /// True only for `Completed`
    pub fn is_success(&self) -> bool {
        self.status == JobStatus::Completed
    }

    /// True for `Warning` (completed with errors)
    pub fn is_warning(&self) -> bool {
        self.status == JobStatus::Warning
    }
}

/// Bounded poller for OME jobs
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct JobTracker {
    /// Number of polls before giving up
    pub max_retries: u32,
    /// Sleep between two polls
    pub interval: Duration,
}

impl JobTracker {
    pub fn new(max_retries: u32, interval: Duration) -> Self {
        Self {
            max_retries: max_retries.max(1),
            interval,
        }
    }

    /// Tracker from a retry count and a sleep interval in seconds
    pub fn from_secs(max_retries: i64, sleep_interval: i64) -> Self {
        Self::new(
            u32::try_from(max_retries).unwrap_or(1),
            Duration::from_secs(u64::try_from(sleep_interval).unwrap_or(0)),
        )
    }

    /// Wait for a job to finish
    ///
    /// # Arguments
    /// * `api` - Session to poll with
    /// * `job_id` - Job to wait for
    /// * `cancel` - Caller's cancellation signal
    ///
    /// # Returns
    /// * `Ok(JobOutcome)` - Terminal observation, or `TimedOut`
    /// * `Err(OmeError::Cancelled)` - If `cancel` fired while waiting
    pub async fn track(
        &self,
        api: &dyn OmeApi,
        job_id: i64,
        cancel: &CancellationToken,
    ) -> Result<JobOutcome, OmeError> {
        let mut last_status = JobStatus::Unknown;
        let mut last_error: Option<OmeError> = None;

        for attempt in 1..=self.max_retries {
            if cancel.is_cancelled() {
                return Err(OmeError::Cancelled);
            }

            let poll = tokio::select! {
                _ = cancel.cancelled() => return Err(OmeError::Cancelled),
                result = api.get_job(job_id) => result,
            };

            match poll {
                Ok(job) => {
                    last_status = job.status();
                    debug!(
                        "Job {} poll {}/{}: {}",
                        job_id, attempt, self.max_retries, last_status
                    );
                    if last_status.is_terminal() {
                        return Ok(self.finish(api, job_id, last_status).await);
                    }
                }
                Err(e) => {
                    warn!(
                        "Failed to fetch job {} (poll {}/{}): {}",
                        job_id, attempt, self.max_retries, e
                    );
                    last_error = Some(e);
                }
            }

            if attempt < self.max_retries {
                tokio::select! {
                    _ = cancel.cancelled() => return Err(OmeError::Cancelled),
                    _ = tokio::time::sleep(self.interval) => {}
                }
            }
        }

        let message = match last_error {
            Some(e) if last_status == JobStatus::Unknown => format!(
                "job {} could not be tracked: {}",
                job_id,
                e.detail()
            ),
            _ => format!(
                "job {} did not finish after {} checks, last status {}",
                job_id, self.max_retries, last_status
            ),
        };
        warn!("{}", message);
        Ok(JobOutcome {
            job_id,
            status: JobStatus::TimedOut,
            message,
        })
    }

    async fn finish(&self, api: &dyn OmeApi, job_id: i64, status: JobStatus) -> JobOutcome {
        if status == JobStatus::Completed {
            info!("Job {} completed", job_id);
            return JobOutcome {
                job_id,
                status,
                message: format!("job {} completed", job_id),
            };
        }

        let details = execution_messages(api, job_id).await;
        let message = if details.is_empty() {
            format!("job {} finished with status {}", job_id, status)
        } else {
            format!("job {} finished with status {}: {}", job_id, status, details.join("; "))
        };
        warn!("{}", message);
        JobOutcome {
            job_id,
            status,
            message,
        }
    }
}

/// Messages of the most recent execution of a job; empty if none could be read
async fn execution_messages(api: &dyn OmeApi, job_id: i64) -> Vec<String> {
    let histories = match api.get_job_execution_histories(job_id).await {
        Ok(h) => h,
        Err(e) => {
            debug!("No execution history for job {}: {}", job_id, e);
            return Vec::new();
        }
    };
    let Some(latest) = histories.iter().max_by_key(|h| (h.started_at(), h.id)) else {
        return Vec::new();
    };
    if let Some(took) = latest.duration() {
        debug!("Job {} run {} took {}s", job_id, latest.id, took.num_seconds());
    }
    match api.get_job_execution_details(job_id, latest.id).await {
        Ok(details) => details
            .into_iter()
            .filter(|d| !d.value.trim().is_empty())
            .map(|d| {
                if d.key.is_empty() {
                    d.value.trim().to_string()
                } else {
                    format!("{}: {}", d.key, d.value.trim())
                }
            })
            .collect(),
        Err(e) => {
            debug!("No execution details for job {}: {}", job_id, e);
            Vec::new()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::MockOmeClient;

    fn fast(retries: u32) -> JobTracker {
        JobTracker::new(retries, Duration::ZERO)
    }

    #[tokio::test]
    async fn test_track_until_completed() {
        let mock = MockOmeClient::new("https://ome");
        mock.set_job_statuses(
            7,
            vec![JobStatus::Scheduled, JobStatus::Running, JobStatus::Completed],
        );
        let outcome = fast(10).track(&mock, 7, &CancellationToken::new()).await.unwrap();
        assert!(outcome.is_success());
        assert_eq!(mock.job_polls(7), 3);
    }

    #[tokio::test]
    async fn test_failed_job_reports_execution_details() {
        let mock = MockOmeClient::new("https://ome");
        mock.set_job_statuses(8, vec![JobStatus::Running, JobStatus::Failed]);
        mock.set_job_messages(8, vec!["Unable to deploy: target unreachable".to_string()]);
        let outcome = fast(5).track(&mock, 8, &CancellationToken::new()).await.unwrap();
        assert_eq!(outcome.status, JobStatus::Failed);
        assert!(!outcome.is_success());
        assert!(outcome.message.contains("target unreachable"));
    }

    #[tokio::test]
    async fn test_warning_is_terminal_but_not_success() {
        let mock = MockOmeClient::new("https://ome");
        mock.set_job_statuses(9, vec![JobStatus::Warning]);
        let outcome = fast(5).track(&mock, 9, &CancellationToken::new()).await.unwrap();
        assert!(outcome.is_warning());
        assert!(!outcome.is_success());
    }

    #[tokio::test]
    async fn test_retries_exhausted_times_out() {
        let mock = MockOmeClient::new("https://ome");
        mock.set_job_statuses(10, vec![JobStatus::Running]);
        let outcome = fast(4).track(&mock, 10, &CancellationToken::new()).await.unwrap();
        assert_eq!(outcome.status, JobStatus::TimedOut);
        assert_eq!(mock.job_polls(10), 4);
    }

    #[tokio::test]
    async fn test_fetch_errors_consume_retries() {
        let mock = MockOmeClient::new("https://ome");
        let outcome = fast(3).track(&mock, 404, &CancellationToken::new()).await.unwrap();
        assert_eq!(outcome.status, JobStatus::TimedOut);
        assert!(outcome.message.contains("could not be tracked"));
    }

    #[tokio::test]
    async fn test_cancel_aborts_wait() {
        let mock = MockOmeClient::new("https://ome");
        mock.set_job_statuses(11, vec![JobStatus::Running]);
        let cancel = CancellationToken::new();
        let tracker = JobTracker::new(100, Duration::from_secs(3600));
        let trigger = cancel.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(20)).await;
            trigger.cancel();
        });
        let result = tracker.track(&mock, 11, &cancel).await;
        assert!(matches!(result, Err(OmeError::Cancelled)));
    }
}

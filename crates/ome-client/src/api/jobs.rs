//! JobService operations

use crate::client::OmeClient;
use crate::error::OmeError;
use crate::models::*;
use tracing::debug;

impl OmeClient {
    /// Get a job by ID
    ///
    /// # Arguments
    /// * `id` - Job ID
    ///
    /// # Returns
    /// * `Ok(Job)` - The job, including the status of its last run
    /// * `Err(OmeError::NotFound)` - If the job does not exist
    pub async fn get_job(&self, id: i64) -> Result<Job, OmeError> {
        debug!("Fetching job {}", id);
        self.http.get(&format!("/api/JobService/Jobs({})", id)).await
    }

    /// List the runs of a job
    pub async fn get_job_execution_histories(&self, job_id: i64) -> Result<Vec<JobExecutionHistory>, OmeError> {
        self.http
            .get_collection(&format!("/api/JobService/Jobs({})/ExecutionHistories", job_id))
            .await
    }

    /// List the per-target details of one run of a job
    pub async fn get_job_execution_details(
        &self,
        job_id: i64,
        history_id: i64,
    ) -> Result<Vec<JobExecutionDetail>, OmeError> {
        self.http
            .get_collection(&format!(
                "/api/JobService/Jobs({})/ExecutionHistories({})/ExecutionHistoryDetails",
                job_id, history_id
            ))
            .await
    }

    /// Delete a job
    pub async fn delete_job(&self, id: i64) -> Result<(), OmeError> {
        debug!("Deleting job {}", id);
        self.http.delete(&format!("/api/JobService/Jobs({})", id)).await
    }
}

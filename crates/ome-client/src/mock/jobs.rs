//! Job operations for MockOmeClient
//!
//! A job is a queue of statuses: each `get_job` pops the front until one status is
//! left, which is then returned forever. Jobs started by mock operations complete
//! immediately unless a sequence was queued with `script_next_job`.

use super::{MockOmeClient, not_found};
use crate::error::OmeError;
use crate::models::*;
use std::collections::VecDeque;

impl MockOmeClient {
    /// Set the status sequence of a known job
    pub fn set_job_statuses(&self, job_id: i64, statuses: Vec<JobStatus>) {
        self.jobs
            .lock()
            .unwrap()
            .insert(job_id, statuses.into_iter().collect());
    }

    /// Status sequence for the next job any mock operation starts
    pub fn script_next_job(&self, statuses: Vec<JobStatus>) {
        self.scripted_jobs.lock().unwrap().push_back(statuses);
    }

    /// Execution detail messages reported for a job
    pub fn set_job_messages(&self, job_id: i64, messages: Vec<String>) {
        self.job_messages.lock().unwrap().insert(job_id, messages);
    }

    /// Number of times a job was polled
    pub fn job_polls(&self, job_id: i64) -> usize {
        self.job_polls
            .lock()
            .unwrap()
            .get(&job_id)
            .copied()
            .unwrap_or_default()
    }

    /// Start a job and return its id
    pub(crate) fn start_job(&self) -> i64 {
        let id = self.next_id();
        let statuses = self
            .scripted_jobs
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| vec![JobStatus::Completed]);
        self.jobs
            .lock()
            .unwrap()
            .insert(id, statuses.into_iter().collect::<VecDeque<_>>());
        id
    }
}

pub async fn get_job(client: &MockOmeClient, id: i64) -> Result<Job, OmeError> {
    client.enter("get_job")?;
    *client.job_polls.lock().unwrap().entry(id).or_default() += 1;
    let mut jobs = client.jobs.lock().unwrap();
    let queue = jobs.get_mut(&id).ok_or_else(|| not_found("Job", id))?;
    let status = if queue.len() > 1 {
        queue.pop_front().unwrap_or(JobStatus::Unknown)
    } else {
        queue.front().copied().unwrap_or(JobStatus::Unknown)
    };
    Ok(Job {
        id,
        job_name: format!("Job {}", id),
        last_run_status: IdName {
            id: status.id(),
            name: status.to_string(),
        },
        ..Default::default()
    })
}

pub async fn get_job_execution_histories(
    client: &MockOmeClient,
    job_id: i64,
) -> Result<Vec<JobExecutionHistory>, OmeError> {
    client.enter("get_job_execution_histories")?;
    if !client.jobs.lock().unwrap().contains_key(&job_id) {
        return Err(not_found("Job", job_id));
    }
    Ok(vec![JobExecutionHistory {
        id: job_id * 10,
        job_name: format!("Job {}", job_id),
        ..Default::default()
    }])
}

pub async fn get_job_execution_details(
    client: &MockOmeClient,
    job_id: i64,
    _history_id: i64,
) -> Result<Vec<JobExecutionDetail>, OmeError> {
    client.enter("get_job_execution_details")?;
    let messages = client
        .job_messages
        .lock()
        .unwrap()
        .get(&job_id)
        .cloned()
        .unwrap_or_default();
    Ok(messages
        .into_iter()
        .enumerate()
        .map(|(i, value)| JobExecutionDetail {
            id: i as i64 + 1,
            value,
            ..Default::default()
        })
        .collect())
}

pub async fn delete_job(client: &MockOmeClient, id: i64) -> Result<(), OmeError> {
    client.enter("delete_job")?;
    client
        .jobs
        .lock()
        .unwrap()
        .remove(&id)
        .map(|_| ())
        .ok_or_else(|| not_found("Job", id))
}

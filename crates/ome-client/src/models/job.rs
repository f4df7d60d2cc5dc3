//! Job models (JobService)

use super::parse_timestamp;
use chrono::{NaiveDateTime, TimeDelta};
use serde::{Deserialize, Serialize};

/// Lifecycle state of an OME job, decoded from `LastRunStatus.Id`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum JobStatus {
    Scheduled,
    Queued,
    Starting,
    Running,
    Completed,
    Failed,
    New,
    Warning,
    Aborted,
    Paused,
    Stopped,
    Cancelled,
    /// Retries were exhausted before the job reached a terminal state
    TimedOut,
    Unknown,
}

impl JobStatus {
    /// Decode an OME status id
    pub fn from_id(id: i64) -> Self {
        match id {
            2020 => JobStatus::Scheduled,
            2030 => JobStatus::Queued,
            2040 => JobStatus::Starting,
            2050 => JobStatus::Running,
            2060 => JobStatus::Completed,
            2070 => JobStatus::Failed,
            2080 => JobStatus::New,
            2090 => JobStatus::Warning,
            2100 => JobStatus::Aborted,
            2101 => JobStatus::Paused,
            2102 => JobStatus::Stopped,
            2103 => JobStatus::Cancelled,
            _ => JobStatus::Unknown,
        }
    }

    /// OME status id for this state
    pub fn id(&self) -> i64 {
        match self {
            JobStatus::Scheduled => 2020,
            JobStatus::Queued => 2030,
            JobStatus::Starting => 2040,
            JobStatus::Running => 2050,
            JobStatus::Completed => 2060,
            JobStatus::Failed => 2070,
            JobStatus::New => 2080,
            JobStatus::Warning => 2090,
            JobStatus::Aborted => 2100,
            JobStatus::Paused => 2101,
            JobStatus::Stopped => 2102,
            JobStatus::Cancelled => 2103,
            JobStatus::TimedOut | JobStatus::Unknown => 0,
        }
    }

    /// Terminal states never change again
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            JobStatus::Completed
                | JobStatus::Failed
                | JobStatus::Warning
                | JobStatus::Aborted
                | JobStatus::Stopped
                | JobStatus::Cancelled
        )
    }
}

impl std::fmt::Display for JobStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            JobStatus::Scheduled => "Scheduled",
            JobStatus::Queued => "Queued",
            JobStatus::Starting => "Starting",
            JobStatus::Running => "Running",
            JobStatus::Completed => "Completed",
            JobStatus::Failed => "Failed",
            JobStatus::New => "New",
            JobStatus::Warning => "Warning",
            JobStatus::Aborted => "Aborted",
            JobStatus::Paused => "Paused",
            JobStatus::Stopped => "Stopped",
            JobStatus::Cancelled => "Cancelled",
            JobStatus::TimedOut => "TimedOut",
            JobStatus::Unknown => "Unknown",
        };
        f.write_str(name)
    }
}

/// Id/name pair OME uses for job status and type
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct IdName {
    pub id: i64,
    #[serde(default)]
    pub name: String,
}

/// Job model (`/api/JobService/Jobs({id})`)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct Job {
    pub id: i64,
    pub job_name: String,
    pub job_description: String,
    pub last_run: Option<String>,
    pub last_run_status: IdName,
    pub job_status: Option<IdName>,
    pub job_type: Option<IdName>,
}

impl Job {
    /// Decoded status of the most recent run
    pub fn status(&self) -> JobStatus {
        JobStatus::from_id(self.last_run_status.id)
    }
}

/// One run of a job (`/ExecutionHistories`)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct JobExecutionHistory {
    pub id: i64,
    pub job_name: String,
    pub progress: String,
    pub start_time: Option<String>,
    pub end_time: Option<String>,
    pub job_status: IdName,
}

impl JobExecutionHistory {
    /// When the run started, if OME reported a readable time
    pub fn started_at(&self) -> Option<NaiveDateTime> {
        self.start_time.as_deref().and_then(parse_timestamp)
    }

    /// Wall time of a finished run
    pub fn duration(&self) -> Option<TimeDelta> {
        let end = self.end_time.as_deref().and_then(parse_timestamp)?;
        Some(end - self.started_at()?)
    }
}

/// Per-target detail of a job run (`/ExecutionHistoryDetails`)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct JobExecutionDetail {
    pub id: i64,
    pub progress: String,
    pub key: String,
    pub value: String,
    pub job_status: IdName,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_round_trip_ids() {
        for id in [2020, 2030, 2040, 2050, 2060, 2070, 2080, 2090, 2100, 2101, 2102, 2103] {
            assert_eq!(JobStatus::from_id(id).id(), id);
        }
        assert_eq!(JobStatus::from_id(42), JobStatus::Unknown);
    }

    #[test]
    fn test_terminal_states() {
        assert!(JobStatus::Completed.is_terminal());
        assert!(JobStatus::Warning.is_terminal());
        assert!(JobStatus::Cancelled.is_terminal());
        assert!(!JobStatus::Running.is_terminal());
        assert!(!JobStatus::Scheduled.is_terminal());
        assert!(!JobStatus::TimedOut.is_terminal());
    }

    #[test]
    fn test_job_decodes_last_run_status() {
        let job: Job = serde_json::from_str(
            r#"{"Id": 10123, "JobName": "Template Creation", "LastRunStatus": {"Id": 2060, "Name": "Completed"}}"#,
        )
        .unwrap();
        assert_eq!(job.status(), JobStatus::Completed);
    }

    #[test]
    fn test_execution_history_duration() {
        let run = JobExecutionHistory {
            start_time: Some("2026-03-01 10:00:00.000".to_string()),
            end_time: Some("2026-03-01 10:02:30.500".to_string()),
            ..Default::default()
        };
        assert_eq!(run.duration(), Some(TimeDelta::milliseconds(150_500)));

        let running = JobExecutionHistory {
            start_time: Some("2026-03-01T10:00:00".to_string()),
            end_time: None,
            ..Default::default()
        };
        assert!(running.started_at().is_some());
        assert_eq!(running.duration(), None);

        let garbled = JobExecutionHistory {
            start_time: Some("yesterday".to_string()),
            ..Default::default()
        };
        assert_eq!(garbled.started_at(), None);
    }
}

use serde::{Deserialize, Serialize};

/// Status tokens the provider reports for a successful job. Some job types
/// report numeric statuses, hence the "1".
const SUCCESS_TOKENS: [&str; 4] = ["COMPLETED", "SUCCEEDED", "SUCCESS", "1"];

/// Status tokens the provider reports for a failed job.
const FAILURE_TOKENS: [&str; 3] = ["FAILED", "FAILURE", "-1"];

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum JobStatus {
    Pending,
    Succeeded,
    Failed,
    TimedOut,
}

impl JobStatus {
    /// Classify a normalized (uppercased) provider status token. Unknown
    /// tokens count as pending so the poll loop keeps waiting.
    pub fn from_token(token: &str) -> Self {
        if SUCCESS_TOKENS.contains(&token) {
            JobStatus::Succeeded
        } else if FAILURE_TOKENS.contains(&token) {
            JobStatus::Failed
        } else {
            JobStatus::Pending
        }
    }

    pub fn is_terminal(&self) -> bool {
        !matches!(self, JobStatus::Pending)
    }
}

/// One server-side generation job, tracked for the duration of a single
/// `generate` call. Transitions are driven exclusively by poll responses.
#[derive(Debug, Clone)]
pub struct Job {
    pub id: String,
    pub status: JobStatus,
    pub result_url: Option<String>,
    pub error_message: Option<String>,
}

impl Job {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            status: JobStatus::Pending,
            result_url: None,
            error_message: None,
        }
    }

    pub fn succeed(&mut self, result_url: String) {
        self.status = JobStatus::Succeeded;
        self.result_url = Some(result_url);
    }

    pub fn fail(&mut self, message: String) {
        self.status = JobStatus::Failed;
        self.error_message = Some(message);
    }

    pub fn time_out(&mut self) {
        self.status = JobStatus::TimedOut;
    }
}

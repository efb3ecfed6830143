use thiserror::Error;

#[derive(Debug, Error)]
pub enum GenError {
    #[error("Configuration error: {0}")]
    Config(String),
    #[error("Validation error: {0}")]
    Validation(String),
    #[error("Upload error: {0}")]
    Upload(String),
    #[error("Submission error: {0}")]
    Submission(String),
    #[error("Job failed: {0}")]
    Job(String),
    #[error("Extraction error: {0}")]
    Extraction(String),
    #[error("Timed out: {0}")]
    Timeout(String),
    #[error("Request error: {0}")]
    Request(String),
}

pub type Result<T> = std::result::Result<T, GenError>;

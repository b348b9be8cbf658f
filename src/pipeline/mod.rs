pub(crate) mod document;
pub(crate) mod poller;
pub(crate) mod scoring;
pub(crate) mod video_aggregate;
pub(crate) mod video_submit;

use thiserror::Error;

/// Failure taxonomy of the analysis pipeline. Timeout and job failure are
/// distinct: a failed job is a legitimate terminal outcome, an exhausted poll
/// budget may be worth a re-delivery.
#[derive(Debug, Error)]
pub(crate) enum PipelineError {
    #[error("correlation id metadata missing from storage object")]
    MissingCorrelationId,
    #[error("{service} request failed: {source}")]
    ExternalService {
        service: &'static str,
        #[source]
        source: anyhow::Error,
    },
    #[error("job {job_id} did not reach a terminal status after {attempts} checks")]
    JobTimeout { job_id: String, attempts: u32 },
    #[error("job {job_id} reported terminal status {status}")]
    JobFailed { job_id: String, status: String },
    #[error("failed to persist analysis record")]
    Persistence(#[from] sqlx::Error),
}

impl PipelineError {
    pub(crate) fn external(service: &'static str, source: impl Into<anyhow::Error>) -> Self {
        Self::ExternalService { service, source: source.into() }
    }
}

impl From<poller::PollError> for PipelineError {
    fn from(err: poller::PollError) -> Self {
        match err {
            poller::PollError::Timeout { job_id, attempts } => {
                Self::JobTimeout { job_id, attempts }
            }
            poller::PollError::JobFailed { job_id, status } => Self::JobFailed { job_id, status },
            poller::PollError::Status(source) => Self::ExternalService { service: "job status", source },
        }
    }
}

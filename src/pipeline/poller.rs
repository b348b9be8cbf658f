use std::future::Future;
use std::time::Duration;

use thiserror::Error;

#[derive(Debug, Error)]
pub(crate) enum PollError {
    #[error("job {job_id} did not reach a terminal status after {attempts} checks")]
    Timeout { job_id: String, attempts: u32 },
    #[error("job {job_id} reported terminal status {status}")]
    JobFailed { job_id: String, status: String },
    #[error("failed to fetch job status: {0}")]
    Status(#[source] anyhow::Error),
}

/// Poll a long-running external job until it reaches a terminal status.
///
/// Checks once per `interval`, at most `max_attempts` times, blocking only the
/// calling task. A status in `failure_statuses` surfaces as `JobFailed`; one
/// in `success_statuses` is returned as-is; exhausting the budget surfaces as
/// `Timeout`.
pub(crate) async fn poll_until_terminal<F, Fut>(
    job_id: &str,
    mut fetch_status: F,
    success_statuses: &[&str],
    failure_statuses: &[&str],
    interval: Duration,
    max_attempts: u32,
) -> Result<String, PollError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = anyhow::Result<String>>,
{
    for attempt in 1..=max_attempts {
        let status = fetch_status().await.map_err(PollError::Status)?;

        if failure_statuses.iter().any(|candidate| status.eq_ignore_ascii_case(candidate)) {
            return Err(PollError::JobFailed { job_id: job_id.to_string(), status });
        }
        if success_statuses.iter().any(|candidate| status.eq_ignore_ascii_case(candidate)) {
            return Ok(status);
        }

        if attempt < max_attempts {
            tokio::time::sleep(interval).await;
        }
    }

    Err(PollError::Timeout { job_id: job_id.to_string(), attempts: max_attempts })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};

    async fn run_poll(
        sequence: &'static [&'static str],
        max_attempts: u32,
    ) -> (Result<String, PollError>, u32) {
        let calls = AtomicU32::new(0);
        let result = poll_until_terminal(
            "job-1",
            || {
                let attempt = calls.fetch_add(1, Ordering::SeqCst) as usize;
                let status =
                    sequence.get(attempt).copied().unwrap_or("IN_PROGRESS").to_string();
                async move { Ok(status) }
            },
            &["SUCCEEDED", "COMPLETED"],
            &["FAILED"],
            Duration::from_secs(5),
            max_attempts,
        )
        .await;

        (result, calls.load(Ordering::SeqCst))
    }

    #[tokio::test(start_paused = true)]
    async fn returns_after_third_check_when_terminal() {
        let (result, calls) = run_poll(&["IN_PROGRESS", "IN_PROGRESS", "SUCCEEDED"], 10).await;
        assert_eq!(result.expect("terminal status"), "SUCCEEDED");
        assert_eq!(calls, 3);
    }

    #[tokio::test(start_paused = true)]
    async fn times_out_when_never_terminal() {
        let (result, calls) = run_poll(&["IN_PROGRESS"], 5).await;
        match result {
            Err(PollError::Timeout { attempts, .. }) => assert_eq!(attempts, 5),
            other => panic!("expected timeout, got {other:?}"),
        }
        assert_eq!(calls, 5);
    }

    #[tokio::test(start_paused = true)]
    async fn distinguishes_job_failure_from_timeout() {
        let (result, calls) = run_poll(&["IN_PROGRESS", "FAILED"], 10).await;
        match result {
            Err(PollError::JobFailed { status, .. }) => assert_eq!(status, "FAILED"),
            other => panic!("expected job failure, got {other:?}"),
        }
        assert_eq!(calls, 2);
    }

    #[tokio::test(start_paused = true)]
    async fn matches_statuses_case_insensitively() {
        let (result, _) = run_poll(&["completed"], 3).await;
        assert_eq!(result.expect("terminal status"), "completed");
    }
}

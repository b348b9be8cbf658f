use std::time::Duration;

use crate::core::state::AppState;
use crate::core::time::primitive_now_utc;
use crate::pipeline::{poller, scoring, PipelineError};
use crate::repositories;
use crate::schemas::events::StorageEventPayload;
use crate::services::storage::{StorageService, CORRELATION_METADATA_KEY};

const OCR_SUCCESS_STATUSES: &[&str] = &["SUCCEEDED", "COMPLETED"];
const OCR_FAILURE_STATUSES: &[&str] = &["FAILED", "ERROR"];

/// Document pipeline: recover the correlation id from object metadata, extract
/// text, score it, and persist one completed record. Text extraction is
/// best-effort; a missing correlation id is the only fatal input error.
pub(crate) async fn process_document_event(
    state: &AppState,
    storage: &StorageService,
    event: &StorageEventPayload,
) -> Result<String, PipelineError> {
    let metadata = storage
        .object_metadata(&event.bucket, &event.key)
        .await
        .map_err(|err| PipelineError::external("object storage", err))?;

    let correlation_id = metadata
        .get(CORRELATION_METADATA_KEY)
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
        .ok_or(PipelineError::MissingCorrelationId)?;

    tracing::info!(correlation_id, bucket = %event.bucket, key = %event.key, "Processing document");

    let text = extract_document_text(state, event).await;
    if text.is_empty() {
        tracing::warn!(correlation_id, "No text extracted; scoring document as empty");
    }

    let skills = scoring::extract_skills(&text);
    let skill_count = skills.len();
    let outcome = scoring::score_document(&skills, &text);

    let source_uri = format!("s3://{}/{}", event.bucket, event.key);
    let details = serde_json::json!({
        "project_detected": outcome.has_project,
        "internship_detected": outcome.has_internship,
        "internship_kind": outcome.internship_kind.map(scoring::InternshipKind::as_str),
        "certifications_count": outcome.cert_count,
    });

    repositories::analysis_records::upsert_document_completed(
        state.db(),
        repositories::analysis_records::DocumentCompletion {
            correlation_id: &correlation_id,
            source_uri: &source_uri,
            score: f64::from(outcome.score),
            skills,
            details,
            now: primitive_now_utc(),
        },
    )
    .await?;

    metrics::counter!("document_analyses_total", "status" => "completed").increment(1);
    tracing::info!(correlation_id, score = outcome.score, skill_count, "Document analysis saved");

    Ok(correlation_id)
}

/// Extraction failures (submit error, job failure, poll timeout) all degrade
/// to an empty string; the document still gets scored and persisted.
async fn extract_document_text(state: &AppState, event: &StorageEventPayload) -> String {
    match try_extract_text(state, event).await {
        Ok(text) => text,
        Err(err) => {
            tracing::warn!(
                bucket = %event.bucket,
                key = %event.key,
                error = %err,
                "Text extraction failed; continuing with empty text"
            );
            String::new()
        }
    }
}

async fn try_extract_text(
    state: &AppState,
    event: &StorageEventPayload,
) -> Result<String, PipelineError> {
    let ocr = state.ocr();
    let job_id = ocr
        .start_text_detection(&event.bucket, &event.key)
        .await
        .map_err(|err| PipelineError::external("document OCR", err))?;

    let interval = Duration::from_secs(state.settings().ocr().poll_interval_seconds);
    let max_attempts = state.settings().ocr().max_poll_attempts;

    let job_ref = job_id.as_str();
    poller::poll_until_terminal(
        job_ref,
        move || async move { ocr.job_status(job_ref).await },
        OCR_SUCCESS_STATUSES,
        OCR_FAILURE_STATUSES,
        interval,
        max_attempts,
    )
    .await?;

    let lines = ocr
        .collect_lines(&job_id)
        .await
        .map_err(|err| PipelineError::external("document OCR", err))?;

    Ok(lines.join("\n"))
}

use std::time::{Duration, Instant};

use crate::core::state::AppState;
use crate::core::time::primitive_now_utc;
use crate::pipeline::poller::PollError;
use crate::pipeline::{poller, scoring, PipelineError};
use crate::repositories;
use crate::schemas::events::FaceDetectionNotification;

const TRANSCRIPTION_SUCCESS_STATUSES: &[&str] = &["COMPLETED"];
const TRANSCRIPTION_FAILURE_STATUSES: &[&str] = &["FAILED"];

/// Sentiment input when the transcript came back empty.
const EMPTY_TRANSCRIPT_SENTIMENT_INPUT: &str = "neutral";

/// Video aggregation: join the face-detection results carried by the
/// notification with the sibling transcription job (named by the same
/// correlation id), score everything, and upsert the final record. Duplicate
/// notifications recompute the same payload; the upsert is last-write-wins.
pub(crate) async fn process_face_detection_completed(
    state: &AppState,
    notification: &FaceDetectionNotification,
) -> Result<String, PipelineError> {
    let correlation_id = notification.job_tag.trim();
    if correlation_id.is_empty() {
        return Err(PipelineError::MissingCorrelationId);
    }

    let started = Instant::now();
    tracing::info!(
        correlation_id,
        job_id = %notification.job_id,
        "Aggregating video analysis results"
    );

    let faces = state
        .face_detection()
        .face_detections(&notification.job_id)
        .await
        .map_err(|err| PipelineError::external("face detection", err))?;

    let facial = scoring::facial_expression_score(&faces);
    let gesture = scoring::smile_gesture_score(&faces);

    let transcription = state.transcription();
    let interval = Duration::from_secs(state.settings().transcription().poll_interval_seconds);
    let max_attempts = state.settings().transcription().max_poll_attempts;

    if let Err(err) = poller::poll_until_terminal(
        correlation_id,
        move || async move {
            transcription.job_state(correlation_id).await.map(|job| job.status)
        },
        TRANSCRIPTION_SUCCESS_STATUSES,
        TRANSCRIPTION_FAILURE_STATUSES,
        interval,
        max_attempts,
    )
    .await
    {
        metrics::counter!("video_aggregations_total", "status" => poll_error_label(&err))
            .increment(1);
        return Err(err.into());
    }

    let job = transcription
        .job_state(correlation_id)
        .await
        .map_err(|err| PipelineError::external("transcription", err))?;
    let transcript_uri = job.transcript_uri.ok_or_else(|| {
        PipelineError::external(
            "transcription",
            anyhow::anyhow!("completed job is missing a transcript location"),
        )
    })?;
    let transcript = transcription
        .fetch_transcript(&transcript_uri)
        .await
        .map_err(|err| PipelineError::external("transcription", err))?;

    let sentiment_input = if transcript.is_empty() {
        EMPTY_TRANSCRIPT_SENTIMENT_INPUT
    } else {
        transcript.as_str()
    };
    let sentiment = state
        .sentiment()
        .detect_sentiment(sentiment_input)
        .await
        .map_err(|err| PipelineError::external("sentiment", err))?;

    let word_count = transcript.split_whitespace().count();
    let sub_scores = scoring::VideoSubScores {
        facial,
        gesture,
        grammar: scoring::grammar_score(word_count),
        content: scoring::content_score(word_count, scoring::content_keyword_hits(&transcript)),
        communication: scoring::communication_score(sentiment),
        project: scoring::mention_score(&transcript, "project"),
        internship: scoring::mention_score(&transcript, "internship"),
        certification: scoring::certification_mention_score(&transcript),
    };
    let breakdown = scoring::VideoScoreBreakdown::from_sub_scores(&sub_scores);
    let total_score = breakdown.total_score;
    let details = serde_json::to_value(&breakdown)
        .map_err(|err| PipelineError::external("score serialization", anyhow::Error::new(err)))?;

    let source_uri = format!(
        "s3://{}/{}",
        notification.video.s3_bucket, notification.video.s3_object_name
    );
    repositories::analysis_records::upsert_video_completed(
        state.db(),
        repositories::analysis_records::VideoCompletion {
            correlation_id,
            source_uri: &source_uri,
            score: total_score,
            details,
            transcript: &transcript,
            now: primitive_now_utc(),
        },
    )
    .await?;

    metrics::counter!("video_aggregations_total", "status" => "completed").increment(1);
    metrics::histogram!("video_aggregation_duration_seconds")
        .record(started.elapsed().as_secs_f64());
    tracing::info!(
        correlation_id,
        total_score,
        sentiment = sentiment.as_str(),
        word_count,
        "Video analysis saved"
    );

    Ok(correlation_id.to_string())
}

fn poll_error_label(err: &PollError) -> &'static str {
    match err {
        PollError::Timeout { .. } => "timeout",
        PollError::JobFailed { .. } => "job_failed",
        PollError::Status(_) => "status_error",
    }
}

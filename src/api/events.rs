use axum::{extract::State, Json};

use crate::api::errors::ApiError;
use crate::core::state::AppState;
use crate::pipeline;
use crate::schemas::events::{FaceDetectionNotification, StorageEventPayload};

/// Storage-event webhook for the document bucket. The invoking event system
/// re-delivers on a non-2xx response, so pipeline failures surface as errors.
pub(crate) async fn document_uploaded(
    State(state): State<AppState>,
    Json(event): Json<StorageEventPayload>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let storage = state.storage().ok_or_else(|| {
        ApiError::ServiceUnavailable("Object storage is not configured".to_string())
    })?;

    let correlation_id =
        pipeline::document::process_document_event(&state, storage, &event).await?;

    Ok(Json(serde_json::json!({
        "message": "Document analyzed",
        "correlation_id": correlation_id
    })))
}

/// Storage-event webhook for the video bucket; fire-and-forget job submission.
pub(crate) async fn video_uploaded(
    State(state): State<AppState>,
    Json(event): Json<StorageEventPayload>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let correlation_id = pipeline::video_submit::process_video_event(&state, &event).await?;

    Ok(Json(serde_json::json!({
        "message": "Analysis jobs started",
        "correlation_id": correlation_id,
        "bucket": event.bucket,
        "key": event.key
    })))
}

/// Completion-notification webhook from the face-detection service.
pub(crate) async fn face_detection_completed(
    State(state): State<AppState>,
    Json(notification): Json<FaceDetectionNotification>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let correlation_id =
        pipeline::video_aggregate::process_face_detection_completed(&state, &notification).await?;

    Ok(Json(serde_json::json!({
        "message": "Analysis saved",
        "correlation_id": correlation_id
    })))
}

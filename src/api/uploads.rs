use axum::{
    extract::{Multipart, State},
    Json,
};
use uuid::Uuid;
use validator::Validate;

use crate::api::errors::ApiError;
use crate::api::validation::{sanitized_filename, validate_document_upload, validate_video_upload};
use crate::core::state::AppState;
use crate::core::time::primitive_now_utc;
use crate::db::types::{AnalysisKind, AnalysisStatus};
use crate::repositories;
use crate::schemas::upload::PresignDocumentRequest;

/// Issue a presigned PUT for a document upload. The correlation id minted here
/// travels as object metadata and becomes the analysis record key once the
/// storage event fires.
pub(crate) async fn presign_document_upload(
    State(state): State<AppState>,
    Json(payload): Json<PresignDocumentRequest>,
) -> Result<Json<serde_json::Value>, ApiError> {
    payload.validate().map_err(|err| ApiError::BadRequest(err.to_string()))?;
    validate_document_upload(
        &payload.filename,
        &payload.filetype,
        &state.settings().upload().allowed_document_extensions,
    )?;

    let storage = state.storage().ok_or_else(|| {
        ApiError::ServiceUnavailable("Object storage is not configured".to_string())
    })?;

    let correlation_id = Uuid::new_v4().to_string();
    let key = format!("{}_{}", correlation_id, sanitized_filename(&payload.filename));
    let expires = std::time::Duration::from_secs(
        state.settings().upload().presigned_url_expire_minutes * 60,
    );

    let upload_url = storage
        .presign_document_put(&key, &payload.filetype, &correlation_id, expires)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to generate upload URL"))?;

    Ok(Json(serde_json::json!({
        "upload_url": upload_url,
        "key": key,
        "correlation_id": correlation_id,
        "method": "PUT",
        "headers": {"Content-Type": payload.filetype}
    })))
}

/// Accept an interview video, store it, and write the PROCESSING placeholder
/// record that the query endpoints can serve while analysis is in flight.
pub(crate) async fn upload_video(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<serde_json::Value>, ApiError> {
    let storage = state.storage().ok_or_else(|| {
        ApiError::ServiceUnavailable("Object storage is not configured".to_string())
    })?;

    let mut file_bytes: Option<Vec<u8>> = None;
    let mut filename: Option<String> = None;
    let mut content_type: Option<String> = None;
    let max_bytes = state.settings().upload().max_upload_size_mb * 1024 * 1024;

    while let Some(mut field) = multipart
        .next_field()
        .await
        .map_err(|_| ApiError::BadRequest("Invalid multipart data".to_string()))?
    {
        let name = field.name().unwrap_or("").to_string();
        if name == "video" {
            filename = field.file_name().map(|s| s.to_string());
            content_type = field.content_type().map(|s| s.to_string());
            let mut bytes = Vec::new();
            while let Some(chunk) = field
                .chunk()
                .await
                .map_err(|_| ApiError::BadRequest("Failed to read video file".to_string()))?
            {
                let next_size = bytes.len() as u64 + chunk.len() as u64;
                if next_size > max_bytes {
                    return Err(ApiError::BadRequest(format!(
                        "File size exceeds {}MB limit",
                        state.settings().upload().max_upload_size_mb
                    )));
                }
                bytes.extend_from_slice(&chunk);
            }
            file_bytes = Some(bytes);
        }
    }

    let file_bytes =
        file_bytes.ok_or_else(|| ApiError::BadRequest("Video file is required".to_string()))?;
    if file_bytes.is_empty() {
        return Err(ApiError::BadRequest("Video file is empty".to_string()));
    }
    let filename = filename.ok_or_else(|| ApiError::BadRequest("Filename is required".to_string()))?;
    let content_type = content_type.unwrap_or_else(|| "application/octet-stream".to_string());

    validate_video_upload(
        &filename,
        &content_type,
        &state.settings().upload().allowed_video_extensions,
    )?;

    let correlation_id = Uuid::new_v4().to_string();
    let key = format!("videos/{}_{}", correlation_id, sanitized_filename(&filename));

    let (size_bytes, _hash) = storage
        .upload_video_bytes(&key, &content_type, file_bytes)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to upload video to storage"))?;

    let source_uri = format!("s3://{}/{}", storage.video_bucket(), key);
    repositories::analysis_records::create_processing(
        state.db(),
        &correlation_id,
        AnalysisKind::Video,
        &source_uri,
        primitive_now_utc(),
    )
    .await
    .map_err(|e| ApiError::internal(e, "Failed to create analysis record"))?;

    metrics::counter!("video_uploads_total").increment(1);
    tracing::info!(correlation_id, key, size_bytes, "Video uploaded");

    Ok(Json(serde_json::json!({
        "correlation_id": correlation_id,
        "status": AnalysisStatus::Processing,
        "key": key,
        "size_bytes": size_bytes
    })))
}

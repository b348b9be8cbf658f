use axum::extract::{Query, State};
use axum::Json;
use serde::Deserialize;

use crate::api::errors::ApiError;
use crate::core::state::AppState;
use crate::db::types::AnalysisKind;
use crate::repositories;
use crate::schemas::analysis::{DocumentResultResponse, VideoResultResponse};

#[derive(Debug, Deserialize)]
pub(crate) struct ResultQuery {
    pub(crate) correlation_id: Option<String>,
}

pub(crate) async fn document_result(
    State(state): State<AppState>,
    Query(query): Query<ResultQuery>,
) -> Result<Json<DocumentResultResponse>, ApiError> {
    let record = fetch_record(&state, query, AnalysisKind::Document).await?;
    Ok(Json(DocumentResultResponse::from_record(record)))
}

pub(crate) async fn video_result(
    State(state): State<AppState>,
    Query(query): Query<ResultQuery>,
) -> Result<Json<VideoResultResponse>, ApiError> {
    let record = fetch_record(&state, query, AnalysisKind::Video).await?;
    Ok(Json(VideoResultResponse::from_record(record)))
}

async fn fetch_record(
    state: &AppState,
    query: ResultQuery,
    kind: AnalysisKind,
) -> Result<crate::db::models::AnalysisRecord, ApiError> {
    let correlation_id = query
        .correlation_id
        .filter(|id| !id.trim().is_empty())
        .ok_or_else(|| ApiError::BadRequest("Missing correlation_id".to_string()))?;

    repositories::analysis_records::find_by_correlation_id(state.db(), &correlation_id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to fetch analysis record"))?
        .filter(|record| record.kind == kind)
        .ok_or_else(|| ApiError::NotFound("Analysis not found".to_string()))
}

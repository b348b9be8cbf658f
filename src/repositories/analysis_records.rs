use sqlx::types::Json;
use sqlx::PgPool;
use time::PrimitiveDateTime;

use crate::db::models::AnalysisRecord;
use crate::db::types::{AnalysisKind, AnalysisStatus};

pub(crate) const COLUMNS: &str = "\
    correlation_id, kind, source_uri, status, score, skills, details, transcript, \
    created_at, updated_at";

pub(crate) async fn find_by_correlation_id(
    pool: &PgPool,
    correlation_id: &str,
) -> Result<Option<AnalysisRecord>, sqlx::Error> {
    sqlx::query_as::<_, AnalysisRecord>(&format!(
        "SELECT {COLUMNS}
         FROM analysis_records
         WHERE correlation_id = $1"
    ))
    .bind(correlation_id)
    .fetch_optional(pool)
    .await
}

/// Placeholder written by the upload-acknowledgment path. A duplicate write for
/// the same correlation id is a no-op, so re-delivered uploads are safe.
pub(crate) async fn create_processing(
    pool: &PgPool,
    correlation_id: &str,
    kind: AnalysisKind,
    source_uri: &str,
    now: PrimitiveDateTime,
) -> Result<(), sqlx::Error> {
    sqlx::query(
        "INSERT INTO analysis_records (correlation_id, kind, source_uri, status, created_at, updated_at)
         VALUES ($1, $2, $3, $4, $5, $5)
         ON CONFLICT (correlation_id) DO NOTHING",
    )
    .bind(correlation_id)
    .bind(kind)
    .bind(source_uri)
    .bind(AnalysisStatus::Processing)
    .bind(now)
    .execute(pool)
    .await?;

    Ok(())
}

pub(crate) struct DocumentCompletion<'a> {
    pub(crate) correlation_id: &'a str,
    pub(crate) source_uri: &'a str,
    pub(crate) score: f64,
    pub(crate) skills: Vec<String>,
    pub(crate) details: serde_json::Value,
    pub(crate) now: PrimitiveDateTime,
}

/// Idempotent upsert: re-processing the same document overwrites the payload
/// (last write wins) and preserves `created_at`.
pub(crate) async fn upsert_document_completed(
    pool: &PgPool,
    params: DocumentCompletion<'_>,
) -> Result<(), sqlx::Error> {
    sqlx::query(
        "INSERT INTO analysis_records
             (correlation_id, kind, source_uri, status, score, skills, details, created_at, updated_at)
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $8)
         ON CONFLICT (correlation_id) DO UPDATE
         SET source_uri = EXCLUDED.source_uri,
             status = EXCLUDED.status,
             score = EXCLUDED.score,
             skills = EXCLUDED.skills,
             details = EXCLUDED.details,
             updated_at = EXCLUDED.updated_at",
    )
    .bind(params.correlation_id)
    .bind(AnalysisKind::Document)
    .bind(params.source_uri)
    .bind(AnalysisStatus::Completed)
    .bind(params.score)
    .bind(Json(params.skills))
    .bind(Json(params.details))
    .bind(params.now)
    .execute(pool)
    .await?;

    Ok(())
}

pub(crate) struct VideoCompletion<'a> {
    pub(crate) correlation_id: &'a str,
    pub(crate) source_uri: &'a str,
    pub(crate) score: f64,
    pub(crate) details: serde_json::Value,
    pub(crate) transcript: &'a str,
    pub(crate) now: PrimitiveDateTime,
}

pub(crate) async fn upsert_video_completed(
    pool: &PgPool,
    params: VideoCompletion<'_>,
) -> Result<(), sqlx::Error> {
    sqlx::query(
        "INSERT INTO analysis_records
             (correlation_id, kind, source_uri, status, score, details, transcript, created_at, updated_at)
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $8)
         ON CONFLICT (correlation_id) DO UPDATE
         SET source_uri = EXCLUDED.source_uri,
             status = EXCLUDED.status,
             score = EXCLUDED.score,
             details = EXCLUDED.details,
             transcript = EXCLUDED.transcript,
             updated_at = EXCLUDED.updated_at",
    )
    .bind(params.correlation_id)
    .bind(AnalysisKind::Video)
    .bind(params.source_uri)
    .bind(AnalysisStatus::Completed)
    .bind(params.score)
    .bind(Json(params.details))
    .bind(params.transcript)
    .bind(params.now)
    .execute(pool)
    .await?;

    Ok(())
}

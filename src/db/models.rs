use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use sqlx::FromRow;
use time::PrimitiveDateTime;

use crate::db::types::{AnalysisKind, AnalysisStatus};

/// One row per analyzed artifact, keyed by the correlation id that threads the
/// pipeline stages together. The row is created once and mutated in place.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub(crate) struct AnalysisRecord {
    pub(crate) correlation_id: String,
    pub(crate) kind: AnalysisKind,
    pub(crate) source_uri: String,
    pub(crate) status: AnalysisStatus,
    pub(crate) score: Option<f64>,
    pub(crate) skills: Json<Vec<String>>,
    pub(crate) details: Json<serde_json::Value>,
    pub(crate) transcript: Option<String>,
    pub(crate) created_at: PrimitiveDateTime,
    pub(crate) updated_at: PrimitiveDateTime,
}

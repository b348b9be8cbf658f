use serde::Serialize;
use serde_json::Value;

use crate::core::time::format_primitive;
use crate::db::models::AnalysisRecord;
use crate::db::types::AnalysisStatus;

#[derive(Debug, Serialize)]
pub(crate) struct DocumentResultResponse {
    pub(crate) correlation_id: String,
    pub(crate) source_uri: String,
    pub(crate) status: AnalysisStatus,
    pub(crate) score: i64,
    pub(crate) skills: Vec<String>,
    pub(crate) project_detected: bool,
    pub(crate) internship_detected: bool,
    pub(crate) internship_kind: Option<String>,
    pub(crate) certifications_count: i64,
    pub(crate) created_at: String,
}

impl DocumentResultResponse {
    pub(crate) fn from_record(record: AnalysisRecord) -> Self {
        let details = &record.details.0;

        Self {
            score: record.score.unwrap_or_default() as i64,
            skills: record.skills.0.clone(),
            project_detected: bool_field(details, "project_detected"),
            internship_detected: bool_field(details, "internship_detected"),
            internship_kind: details
                .get("internship_kind")
                .and_then(Value::as_str)
                .map(ToString::to_string),
            certifications_count: details
                .get("certifications_count")
                .and_then(Value::as_i64)
                .unwrap_or_default(),
            created_at: format_primitive(record.created_at),
            status: record.status,
            correlation_id: record.correlation_id,
            source_uri: record.source_uri,
        }
    }
}

/// Video result as stored, with numeric score fields carried as floating
/// point for transport.
#[derive(Debug, Serialize)]
pub(crate) struct VideoResultResponse {
    pub(crate) correlation_id: String,
    pub(crate) source_uri: String,
    pub(crate) status: AnalysisStatus,
    pub(crate) total_score: Option<f64>,
    pub(crate) scores: Value,
    pub(crate) transcript: Option<String>,
    pub(crate) created_at: String,
    pub(crate) updated_at: String,
}

impl VideoResultResponse {
    pub(crate) fn from_record(record: AnalysisRecord) -> Self {
        Self {
            total_score: record.score,
            scores: record.details.0.clone(),
            created_at: format_primitive(record.created_at),
            updated_at: format_primitive(record.updated_at),
            status: record.status,
            correlation_id: record.correlation_id,
            source_uri: record.source_uri,
            transcript: record.transcript,
        }
    }
}

fn bool_field(details: &Value, field: &str) -> bool {
    details.get(field).and_then(Value::as_bool).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::types::AnalysisKind;
    use sqlx::types::Json;
    use time::macros::datetime;

    fn record(kind: AnalysisKind, details: Value) -> AnalysisRecord {
        AnalysisRecord {
            correlation_id: "corr-1".to_string(),
            kind,
            source_uri: "s3://bucket/key".to_string(),
            status: AnalysisStatus::Completed,
            score: Some(39.0),
            skills: Json(vec!["AWS".to_string(), "Python".to_string()]),
            details: Json(details),
            transcript: Some("hello".to_string()),
            created_at: datetime!(2025-01-02 10:20:30),
            updated_at: datetime!(2025-01-02 10:25:00),
        }
    }

    #[test]
    fn document_response_coerces_score_to_integer() {
        let details = serde_json::json!({
            "project_detected": true,
            "internship_detected": false,
            "internship_kind": null,
            "certifications_count": 2,
        });
        let response = DocumentResultResponse::from_record(record(AnalysisKind::Document, details));

        assert_eq!(response.score, 39);
        assert_eq!(response.skills, vec!["AWS".to_string(), "Python".to_string()]);
        assert!(response.project_detected);
        assert!(!response.internship_detected);
        assert_eq!(response.internship_kind, None);
        assert_eq!(response.certifications_count, 2);
        assert_eq!(response.created_at, "2025-01-02T10:20:30Z");
    }

    #[test]
    fn document_response_tolerates_missing_details() {
        let response = DocumentResultResponse::from_record(record(
            AnalysisKind::Document,
            serde_json::json!({}),
        ));
        assert!(!response.project_detected);
        assert_eq!(response.certifications_count, 0);
    }

    #[test]
    fn video_response_keeps_scores_as_floats() {
        let details = serde_json::json!({"facial_expressions": 50.0, "total_score": 47.19});
        let response = VideoResultResponse::from_record(record(AnalysisKind::Video, details));

        assert_eq!(response.total_score, Some(39.0));
        assert_eq!(response.scores["total_score"], 47.19);
        assert_eq!(response.transcript.as_deref(), Some("hello"));
        assert_eq!(response.updated_at, "2025-01-02T10:25:00Z");
    }
}

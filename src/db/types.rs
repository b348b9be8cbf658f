use serde::{Deserialize, Serialize};
use sqlx::Type;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(type_name = "analysiskind", rename_all = "lowercase")]
pub(crate) enum AnalysisKind {
    Document,
    Video,
}

/// Records surface their status to clients in the upper-case wire form
/// (`PROCESSING` / `COMPLETED` / `FAILED`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Type)]
#[serde(rename_all = "UPPERCASE")]
#[sqlx(type_name = "analysisstatus", rename_all = "lowercase")]
pub(crate) enum AnalysisStatus {
    Processing,
    Completed,
    Failed,
}

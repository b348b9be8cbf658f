pub(crate) mod api;
pub(crate) mod core;
pub(crate) mod db;
pub(crate) mod pipeline;
pub(crate) mod repositories;
pub(crate) mod schemas;
pub(crate) mod services;

#[cfg(test)]
mod test_support;

use crate::core::state::{AnalyzerClients, AppState};
use crate::core::{config::Settings, telemetry};
use crate::services::document_ocr::DocumentOcrService;
use crate::services::face_detection::FaceDetectionService;
use crate::services::sentiment::SentimentService;
use crate::services::storage::StorageService;
use crate::services::transcription::TranscriptionService;

pub async fn run() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let settings = Settings::load()?;
    telemetry::init_tracing(&settings)?;
    core::metrics::init(&settings)?;

    let db_pool = db::init_pool(&settings).await?;
    db::run_migrations(&db_pool).await?;

    let storage = StorageService::from_settings(&settings).await?;
    if storage.is_none() {
        tracing::warn!("Object storage credentials missing; upload and event endpoints disabled");
    }

    let analyzers = AnalyzerClients {
        ocr: DocumentOcrService::from_settings(&settings)?,
        face_detection: FaceDetectionService::from_settings(&settings)?,
        transcription: TranscriptionService::from_settings(&settings)?,
        sentiment: SentimentService::from_settings(&settings)?,
    };

    let state = AppState::new(settings, db_pool, storage, analyzers);

    let app = api::router::router(state.clone());
    let listener = tokio::net::TcpListener::bind(state.settings().server_addr()).await?;

    tracing::info!(
        host = %state.settings().server_host(),
        port = state.settings().server_port(),
        environment = %state.settings().runtime().environment.as_str(),
        "Hirelens API listening"
    );

    axum::serve(listener, app).with_graceful_shutdown(core::shutdown::shutdown_signal()).await?;

    Ok(())
}

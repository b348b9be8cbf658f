use std::sync::Arc;

use sqlx::PgPool;

use crate::core::config::Settings;
use crate::services::document_ocr::DocumentOcrService;
use crate::services::face_detection::FaceDetectionService;
use crate::services::sentiment::SentimentService;
use crate::services::storage::StorageService;
use crate::services::transcription::TranscriptionService;

/// Vendor analysis clients, constructed once at startup and shared by reference.
pub(crate) struct AnalyzerClients {
    pub(crate) ocr: DocumentOcrService,
    pub(crate) face_detection: FaceDetectionService,
    pub(crate) transcription: TranscriptionService,
    pub(crate) sentiment: SentimentService,
}

#[derive(Clone)]
pub(crate) struct AppState {
    inner: Arc<InnerState>,
}

struct InnerState {
    settings: Settings,
    db: PgPool,
    storage: Option<StorageService>,
    analyzers: AnalyzerClients,
}

impl AppState {
    pub(crate) fn new(
        settings: Settings,
        db: PgPool,
        storage: Option<StorageService>,
        analyzers: AnalyzerClients,
    ) -> Self {
        Self { inner: Arc::new(InnerState { settings, db, storage, analyzers }) }
    }

    pub(crate) fn settings(&self) -> &Settings {
        &self.inner.settings
    }

    pub(crate) fn db(&self) -> &PgPool {
        &self.inner.db
    }

    pub(crate) fn storage(&self) -> Option<&StorageService> {
        self.inner.storage.as_ref()
    }

    pub(crate) fn ocr(&self) -> &DocumentOcrService {
        &self.inner.analyzers.ocr
    }

    pub(crate) fn face_detection(&self) -> &FaceDetectionService {
        &self.inner.analyzers.face_detection
    }

    pub(crate) fn transcription(&self) -> &TranscriptionService {
        &self.inner.analyzers.transcription
    }

    pub(crate) fn sentiment(&self) -> &SentimentService {
        &self.inner.analyzers.sentiment
    }
}

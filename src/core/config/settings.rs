use super::parsing::{
    env_optional, env_or_default, is_supported_document_extension, is_supported_video_extension,
    parse_bool, parse_cors_origins, parse_environment, parse_string_list, parse_u16, parse_u32,
    parse_u64,
};
use super::types::{
    ApiSettings, ConfigError, CorsSettings, DatabaseSettings, FaceDetectionSettings, OcrSettings,
    RuntimeSettings, S3Settings, SentimentSettings, ServerHost, ServerPort, ServerSettings,
    Settings, TelemetrySettings, TranscriptionSettings, UploadSettings,
};

impl Settings {
    pub(crate) fn load() -> Result<Self, ConfigError> {
        let host = env_or_default("HIRELENS_HOST", "0.0.0.0");
        let port = env_or_default("HIRELENS_PORT", "8000");

        let environment =
            parse_environment(env_optional("HIRELENS_ENV").or_else(|| env_optional("ENVIRONMENT")));
        let strict_config =
            env_optional("HIRELENS_STRICT_CONFIG").map(|value| parse_bool(&value)).unwrap_or(false)
                || environment.is_production();

        let project_name = env_or_default("PROJECT_NAME", "Hirelens API");
        let version = env_or_default("VERSION", env!("CARGO_PKG_VERSION"));
        let api_v1_str = env_or_default("API_V1_STR", "/api/v1");

        let cors_origins = parse_cors_origins(env_optional("BACKEND_CORS_ORIGINS"))?;

        let postgres_server = env_or_default("POSTGRES_SERVER", "localhost");
        let postgres_port = parse_u16("POSTGRES_PORT", env_or_default("POSTGRES_PORT", "5432"))?;
        let postgres_user = env_or_default("POSTGRES_USER", "hirelens");
        let postgres_password = env_or_default("POSTGRES_PASSWORD", "");
        let postgres_db = env_or_default("POSTGRES_DB", "hirelens_db");
        let database_url = env_optional("DATABASE_URL");

        let s3_endpoint = env_or_default("S3_ENDPOINT", "https://s3.amazonaws.com");
        let s3_access_key = env_or_default("S3_ACCESS_KEY", "");
        let s3_secret_key = env_or_default("S3_SECRET_KEY", "");
        let s3_document_bucket = env_or_default("S3_DOCUMENT_BUCKET", "hirelens-documents");
        let s3_video_bucket = env_or_default("S3_VIDEO_BUCKET", "hirelens-interview-videos");
        let s3_region = env_or_default("S3_REGION", "us-east-1");

        let max_upload_size_mb =
            parse_u64("MAX_UPLOAD_SIZE_MB", env_or_default("MAX_UPLOAD_SIZE_MB", "200"))?;
        let allowed_document_extensions = parse_string_list(
            env_optional("ALLOWED_DOCUMENT_EXTENSIONS"),
            &["pdf", "doc", "docx"],
        );
        let allowed_video_extensions =
            parse_string_list(env_optional("ALLOWED_VIDEO_EXTENSIONS"), &["mp4", "mov", "webm"]);
        let presigned_url_expire_minutes = parse_u64(
            "PRESIGNED_URL_EXPIRE_MINUTES",
            env_or_default("PRESIGNED_URL_EXPIRE_MINUTES", "60"),
        )?;

        let ocr_api_key = env_or_default("OCR_API_KEY", "");
        let ocr_base_url = env_or_default("OCR_BASE_URL", "");
        let ocr_timeout_seconds =
            parse_u64("OCR_TIMEOUT_SECONDS", env_or_default("OCR_TIMEOUT_SECONDS", "120"))?;
        let ocr_poll_interval_seconds = parse_u64(
            "OCR_POLL_INTERVAL_SECONDS",
            env_or_default("OCR_POLL_INTERVAL_SECONDS", "2"),
        )?;
        let ocr_max_poll_attempts =
            parse_u32("OCR_MAX_POLL_ATTEMPTS", env_or_default("OCR_MAX_POLL_ATTEMPTS", "120"))?;
        let ocr_max_submit_retries =
            parse_u32("OCR_MAX_SUBMIT_RETRIES", env_or_default("OCR_MAX_SUBMIT_RETRIES", "3"))?;

        let face_api_key = env_or_default("FACE_DETECTION_API_KEY", "");
        let face_base_url = env_or_default("FACE_DETECTION_BASE_URL", "");
        let face_timeout_seconds = parse_u64(
            "FACE_DETECTION_TIMEOUT_SECONDS",
            env_or_default("FACE_DETECTION_TIMEOUT_SECONDS", "60"),
        )?;
        let face_callback_url = env_or_default("FACE_DETECTION_CALLBACK_URL", "");

        let transcription_api_key = env_or_default("TRANSCRIPTION_API_KEY", "");
        let transcription_base_url = env_or_default("TRANSCRIPTION_BASE_URL", "");
        let transcription_timeout_seconds = parse_u64(
            "TRANSCRIPTION_TIMEOUT_SECONDS",
            env_or_default("TRANSCRIPTION_TIMEOUT_SECONDS", "60"),
        )?;
        let transcription_poll_interval_seconds = parse_u64(
            "TRANSCRIPTION_POLL_INTERVAL_SECONDS",
            env_or_default("TRANSCRIPTION_POLL_INTERVAL_SECONDS", "5"),
        )?;
        let transcription_max_poll_attempts = parse_u32(
            "TRANSCRIPTION_MAX_POLL_ATTEMPTS",
            env_or_default("TRANSCRIPTION_MAX_POLL_ATTEMPTS", "60"),
        )?;
        let transcription_language_code =
            env_or_default("TRANSCRIPTION_LANGUAGE_CODE", "en-US");

        let sentiment_api_key = env_or_default("SENTIMENT_API_KEY", "");
        let sentiment_base_url = env_or_default("SENTIMENT_BASE_URL", "");
        let sentiment_timeout_seconds = parse_u64(
            "SENTIMENT_TIMEOUT_SECONDS",
            env_or_default("SENTIMENT_TIMEOUT_SECONDS", "30"),
        )?;

        let log_level = env_or_default("HIRELENS_LOG_LEVEL", "info");
        let json = env_optional("HIRELENS_LOG_JSON").map(|value| parse_bool(&value)).unwrap_or(false);
        let prometheus_enabled =
            env_optional("PROMETHEUS_ENABLED").map(|value| parse_bool(&value)).unwrap_or(false);

        let settings = Self {
            server: ServerSettings {
                host: ServerHost::parse(host)?,
                port: ServerPort::parse(port)?,
            },
            runtime: RuntimeSettings { environment, strict_config },
            api: ApiSettings { project_name, version, api_v1_str },
            cors: CorsSettings { origins: cors_origins },
            database: DatabaseSettings {
                postgres_server,
                postgres_port,
                postgres_user,
                postgres_password,
                postgres_db,
                database_url,
            },
            s3: S3Settings {
                endpoint: s3_endpoint,
                access_key: s3_access_key,
                secret_key: s3_secret_key,
                document_bucket: s3_document_bucket,
                video_bucket: s3_video_bucket,
                region: s3_region,
            },
            upload: UploadSettings {
                max_upload_size_mb,
                allowed_document_extensions,
                allowed_video_extensions,
                presigned_url_expire_minutes,
            },
            ocr: OcrSettings {
                api_key: ocr_api_key,
                base_url: ocr_base_url,
                timeout_seconds: ocr_timeout_seconds,
                poll_interval_seconds: ocr_poll_interval_seconds,
                max_poll_attempts: ocr_max_poll_attempts,
                max_submit_retries: ocr_max_submit_retries,
            },
            face_detection: FaceDetectionSettings {
                api_key: face_api_key,
                base_url: face_base_url,
                timeout_seconds: face_timeout_seconds,
                callback_url: face_callback_url,
            },
            transcription: TranscriptionSettings {
                api_key: transcription_api_key,
                base_url: transcription_base_url,
                timeout_seconds: transcription_timeout_seconds,
                poll_interval_seconds: transcription_poll_interval_seconds,
                max_poll_attempts: transcription_max_poll_attempts,
                language_code: transcription_language_code,
            },
            sentiment: SentimentSettings {
                api_key: sentiment_api_key,
                base_url: sentiment_base_url,
                timeout_seconds: sentiment_timeout_seconds,
            },
            telemetry: TelemetrySettings { log_level, json, prometheus_enabled },
        };

        settings.validate()?;
        Ok(settings)
    }

    pub(crate) fn server_addr(&self) -> String {
        format!("{}:{}", self.server.host.0, self.server.port.0)
    }

    pub(crate) fn server_host(&self) -> &str {
        &self.server.host.0
    }

    pub(crate) fn server_port(&self) -> u16 {
        self.server.port.0
    }

    pub(crate) fn api(&self) -> &ApiSettings {
        &self.api
    }

    pub(crate) fn cors(&self) -> &CorsSettings {
        &self.cors
    }

    pub(crate) fn database(&self) -> &DatabaseSettings {
        &self.database
    }

    pub(crate) fn s3(&self) -> &S3Settings {
        &self.s3
    }

    pub(crate) fn upload(&self) -> &UploadSettings {
        &self.upload
    }

    pub(crate) fn ocr(&self) -> &OcrSettings {
        &self.ocr
    }

    pub(crate) fn face_detection(&self) -> &FaceDetectionSettings {
        &self.face_detection
    }

    pub(crate) fn transcription(&self) -> &TranscriptionSettings {
        &self.transcription
    }

    pub(crate) fn sentiment(&self) -> &SentimentSettings {
        &self.sentiment
    }

    pub(crate) fn telemetry(&self) -> &TelemetrySettings {
        &self.telemetry
    }

    pub(crate) fn runtime(&self) -> &RuntimeSettings {
        &self.runtime
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.upload.allowed_document_extensions.is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "ALLOWED_DOCUMENT_EXTENSIONS",
                value: String::from("<empty>"),
            });
        }
        for extension in &self.upload.allowed_document_extensions {
            if !is_supported_document_extension(extension) {
                return Err(ConfigError::InvalidValue {
                    field: "ALLOWED_DOCUMENT_EXTENSIONS",
                    value: extension.clone(),
                });
            }
        }

        if self.upload.allowed_video_extensions.is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "ALLOWED_VIDEO_EXTENSIONS",
                value: String::from("<empty>"),
            });
        }
        for extension in &self.upload.allowed_video_extensions {
            if !is_supported_video_extension(extension) {
                return Err(ConfigError::InvalidValue {
                    field: "ALLOWED_VIDEO_EXTENSIONS",
                    value: extension.clone(),
                });
            }
        }

        if self.ocr.poll_interval_seconds == 0 {
            return Err(ConfigError::InvalidValue {
                field: "OCR_POLL_INTERVAL_SECONDS",
                value: "0".to_string(),
            });
        }
        if self.ocr.max_poll_attempts == 0 {
            return Err(ConfigError::InvalidValue {
                field: "OCR_MAX_POLL_ATTEMPTS",
                value: "0".to_string(),
            });
        }
        if self.transcription.poll_interval_seconds == 0 {
            return Err(ConfigError::InvalidValue {
                field: "TRANSCRIPTION_POLL_INTERVAL_SECONDS",
                value: "0".to_string(),
            });
        }
        if self.transcription.max_poll_attempts == 0 {
            return Err(ConfigError::InvalidValue {
                field: "TRANSCRIPTION_MAX_POLL_ATTEMPTS",
                value: "0".to_string(),
            });
        }

        if !(self.runtime.strict_config || self.runtime.environment.is_production()) {
            return Ok(());
        }

        if self.database.database_url.is_none() && self.database.postgres_password.is_empty() {
            return Err(ConfigError::MissingSecret("POSTGRES_PASSWORD"));
        }
        if self.s3.access_key.is_empty() || self.s3.secret_key.is_empty() {
            return Err(ConfigError::MissingSecret("S3_ACCESS_KEY/S3_SECRET_KEY"));
        }
        if self.ocr.api_key.is_empty() {
            return Err(ConfigError::MissingSecret("OCR_API_KEY"));
        }
        if self.ocr.base_url.is_empty() {
            return Err(ConfigError::MissingSecret("OCR_BASE_URL"));
        }
        if self.face_detection.api_key.is_empty() {
            return Err(ConfigError::MissingSecret("FACE_DETECTION_API_KEY"));
        }
        if self.face_detection.base_url.is_empty() {
            return Err(ConfigError::MissingSecret("FACE_DETECTION_BASE_URL"));
        }
        if self.face_detection.callback_url.is_empty() {
            return Err(ConfigError::MissingSecret("FACE_DETECTION_CALLBACK_URL"));
        }
        if self.transcription.api_key.is_empty() {
            return Err(ConfigError::MissingSecret("TRANSCRIPTION_API_KEY"));
        }
        if self.transcription.base_url.is_empty() {
            return Err(ConfigError::MissingSecret("TRANSCRIPTION_BASE_URL"));
        }
        if self.sentiment.api_key.is_empty() {
            return Err(ConfigError::MissingSecret("SENTIMENT_API_KEY"));
        }
        if self.sentiment.base_url.is_empty() {
            return Err(ConfigError::MissingSecret("SENTIMENT_BASE_URL"));
        }

        Ok(())
    }
}

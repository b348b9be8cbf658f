use anyhow::{Context, Result};
use reqwest::Client;
use serde_json::Value;
use std::time::Duration;

use crate::core::config::Settings;
use crate::services::vendor::{extract_error_message, json_body};

/// Client for the asynchronous speech transcription service. Jobs are named by
/// the caller (the pipeline names them after the correlation id) and polled by
/// that name; a completed job points at a transcript document to download.
#[derive(Debug, Clone)]
pub(crate) struct TranscriptionService {
    client: Client,
    api_key: String,
    base_url: String,
    language_code: String,
}

#[derive(Debug, Clone)]
pub(crate) struct TranscriptionJobState {
    pub(crate) status: String,
    pub(crate) transcript_uri: Option<String>,
}

impl TranscriptionService {
    pub(crate) fn from_settings(settings: &Settings) -> Result<Self> {
        let client = Client::builder()
            .connect_timeout(Duration::from_secs(20))
            .timeout(Duration::from_secs(settings.transcription().timeout_seconds))
            .build()
            .context("Failed to build transcription HTTP client")?;

        Ok(Self {
            client,
            api_key: settings.transcription().api_key.clone(),
            base_url: settings.transcription().base_url.trim_end_matches('/').to_string(),
            language_code: settings.transcription().language_code.clone(),
        })
    }

    pub(crate) async fn start_transcription(
        &self,
        job_name: &str,
        media_uri: &str,
        media_format: &str,
    ) -> Result<()> {
        let endpoint = format!("{}/transcriptions", self.base_url);

        let response = self
            .client
            .post(&endpoint)
            .header("X-Api-Key", &self.api_key)
            .json(&serde_json::json!({
                "job_name": job_name,
                "media_uri": media_uri,
                "media_format": media_format,
                "language_code": self.language_code,
            }))
            .send()
            .await
            .context("Failed to call transcription API")?;

        let (status, parsed) = json_body(response, "Transcription submit").await?;

        if !status.is_success() {
            return Err(anyhow::anyhow!(
                "Transcription submit failed (status {}): {}",
                status,
                extract_error_message(&parsed)
            ));
        }

        Ok(())
    }

    pub(crate) async fn job_state(&self, job_name: &str) -> Result<TranscriptionJobState> {
        let response = self
            .client
            .get(format!("{}/transcriptions/{}", self.base_url, job_name))
            .header("X-Api-Key", &self.api_key)
            .send()
            .await
            .context("Failed to call transcription status endpoint")?;

        let (status, parsed) = json_body(response, "Transcription status").await?;

        if !status.is_success() {
            return Err(anyhow::anyhow!(
                "Transcription status fetch failed (status {}): {}",
                status,
                extract_error_message(&parsed)
            ));
        }

        Ok(extract_job_state(&parsed))
    }

    /// The transcript location is a presigned/result URL, fetched without the
    /// API key.
    pub(crate) async fn fetch_transcript(&self, transcript_uri: &str) -> Result<String> {
        let response = self
            .client
            .get(transcript_uri)
            .send()
            .await
            .context("Failed to download transcript document")?;

        let (status, parsed) = json_body(response, "Transcript download").await?;

        if !status.is_success() {
            return Err(anyhow::anyhow!(
                "Transcript download failed (status {}): {}",
                status,
                extract_error_message(&parsed)
            ));
        }

        Ok(extract_first_transcript(&parsed))
    }
}

fn extract_job_state(payload: &Value) -> TranscriptionJobState {
    let status = payload
        .get("status")
        .and_then(Value::as_str)
        .map(|value| value.to_ascii_uppercase())
        .unwrap_or_else(|| "UNKNOWN".to_string());

    let transcript_uri =
        payload.get("transcript_uri").and_then(Value::as_str).map(ToString::to_string);

    TranscriptionJobState { status, transcript_uri }
}

fn extract_first_transcript(payload: &Value) -> String {
    payload
        .get("results")
        .and_then(|results| results.get("transcripts"))
        .and_then(Value::as_array)
        .and_then(|transcripts| transcripts.first())
        .and_then(|first| first.get("transcript"))
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string()
}

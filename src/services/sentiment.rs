use anyhow::{Context, Result};
use reqwest::Client;
use serde_json::Value;
use std::time::Duration;

use crate::core::config::Settings;
use crate::services::vendor::{extract_error_message, json_body};

/// Client for the synchronous text sentiment classification service.
#[derive(Debug, Clone)]
pub(crate) struct SentimentService {
    client: Client,
    api_key: String,
    base_url: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum SentimentLabel {
    Positive,
    Negative,
    Neutral,
    Mixed,
}

impl SentimentLabel {
    pub(crate) fn parse(raw: &str) -> Self {
        match raw.to_ascii_uppercase().as_str() {
            "POSITIVE" => Self::Positive,
            "NEGATIVE" => Self::Negative,
            "NEUTRAL" => Self::Neutral,
            _ => Self::Mixed,
        }
    }

    pub(crate) fn as_str(self) -> &'static str {
        match self {
            Self::Positive => "POSITIVE",
            Self::Negative => "NEGATIVE",
            Self::Neutral => "NEUTRAL",
            Self::Mixed => "MIXED",
        }
    }
}

impl SentimentService {
    pub(crate) fn from_settings(settings: &Settings) -> Result<Self> {
        let client = Client::builder()
            .connect_timeout(Duration::from_secs(20))
            .timeout(Duration::from_secs(settings.sentiment().timeout_seconds))
            .build()
            .context("Failed to build sentiment HTTP client")?;

        Ok(Self {
            client,
            api_key: settings.sentiment().api_key.clone(),
            base_url: settings.sentiment().base_url.trim_end_matches('/').to_string(),
        })
    }

    pub(crate) async fn detect_sentiment(&self, text: &str) -> Result<SentimentLabel> {
        let endpoint = format!("{}/sentiment", self.base_url);

        let response = self
            .client
            .post(&endpoint)
            .header("X-Api-Key", &self.api_key)
            .json(&serde_json::json!({"text": text, "language_code": "en"}))
            .send()
            .await
            .context("Failed to call sentiment API")?;

        let (status, parsed) = json_body(response, "Sentiment detect").await?;

        if !status.is_success() {
            return Err(anyhow::anyhow!(
                "Sentiment detect failed (status {}): {}",
                status,
                extract_error_message(&parsed)
            ));
        }

        let label = parsed
            .get("sentiment")
            .and_then(Value::as_str)
            .ok_or_else(|| anyhow::anyhow!("Sentiment response missing sentiment field"))?;

        Ok(SentimentLabel::parse(label))
    }
}

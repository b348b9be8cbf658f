use anyhow::{Context, Result};
use reqwest::Client;
use serde_json::Value;
use std::time::Duration;

use crate::core::config::Settings;
use crate::services::vendor::{extract_error_message, json_body};

/// Client for the asynchronous document text-detection service. Jobs are
/// submitted against an object already in storage and polled by job id; the
/// result is a list of extracted lines in reading order, possibly paginated.
#[derive(Debug, Clone)]
pub(crate) struct DocumentOcrService {
    client: Client,
    api_key: String,
    base_url: String,
    max_submit_retries: u32,
}

impl DocumentOcrService {
    pub(crate) fn from_settings(settings: &Settings) -> Result<Self> {
        let client = Client::builder()
            .connect_timeout(Duration::from_secs(20))
            .timeout(Duration::from_secs(settings.ocr().timeout_seconds))
            .build()
            .context("Failed to build OCR HTTP client")?;

        Ok(Self {
            client,
            api_key: settings.ocr().api_key.clone(),
            base_url: settings.ocr().base_url.trim_end_matches('/').to_string(),
            max_submit_retries: settings.ocr().max_submit_retries,
        })
    }

    pub(crate) async fn start_text_detection(&self, bucket: &str, key: &str) -> Result<String> {
        let endpoint = format!("{}/text-detection", self.base_url);

        let mut last_error = None;

        for attempt in 0..=self.max_submit_retries {
            let response = self
                .client
                .post(&endpoint)
                .header("X-Api-Key", &self.api_key)
                .json(&serde_json::json!({
                    "document": {"bucket": bucket, "key": key}
                }))
                .send()
                .await;

            match response {
                Ok(resp) => {
                    let (status, parsed) = json_body(resp, "Text-detection submit").await?;

                    if !status.is_success() {
                        last_error = Some(anyhow::anyhow!(
                            "Text-detection submit failed (status {}): {}",
                            status,
                            extract_error_message(&parsed)
                        ));
                    } else if let Some(job_id) = parsed.get("job_id").and_then(Value::as_str) {
                        return Ok(job_id.to_string());
                    } else {
                        last_error =
                            Some(anyhow::anyhow!("Text-detection submit response missing job_id"));
                    }
                }
                Err(err) => {
                    last_error =
                        Some(anyhow::anyhow!(err).context("Failed to call text-detection API"));
                }
            }

            if attempt < self.max_submit_retries {
                let backoff = Duration::from_secs(2_u64.pow(attempt));
                tokio::time::sleep(backoff).await;
            }
        }

        Err(last_error.unwrap_or_else(|| anyhow::anyhow!("Unknown text-detection submit error")))
    }

    pub(crate) async fn job_status(&self, job_id: &str) -> Result<String> {
        let page = self.fetch_page(job_id, None).await?;
        Ok(extract_job_status(&page))
    }

    /// Collect extracted lines across all result pages, preserving order.
    pub(crate) async fn collect_lines(&self, job_id: &str) -> Result<Vec<String>> {
        let mut lines = Vec::new();
        let mut next_token: Option<String> = None;

        loop {
            let page = self.fetch_page(job_id, next_token.as_deref()).await?;
            lines.extend(extract_lines(&page));

            next_token =
                page.get("next_token").and_then(Value::as_str).map(ToString::to_string);
            if next_token.is_none() {
                break;
            }
        }

        Ok(lines)
    }

    async fn fetch_page(&self, job_id: &str, next_token: Option<&str>) -> Result<Value> {
        let mut request = self
            .client
            .get(format!("{}/text-detection/{}", self.base_url, job_id))
            .header("X-Api-Key", &self.api_key);

        if let Some(token) = next_token {
            request = request.query(&[("next_token", token)]);
        }

        let response =
            request.send().await.context("Failed to call text-detection result endpoint")?;
        let (status, parsed) = json_body(response, "Text-detection poll").await?;

        if !status.is_success() {
            return Err(anyhow::anyhow!(
                "Text-detection poll failed (status {}): {}",
                status,
                extract_error_message(&parsed)
            ));
        }

        Ok(parsed)
    }
}

fn extract_job_status(payload: &Value) -> String {
    payload
        .get("status")
        .and_then(Value::as_str)
        .map(|value| value.to_ascii_uppercase())
        .unwrap_or_else(|| "UNKNOWN".to_string())
}

fn extract_lines(payload: &Value) -> Vec<String> {
    payload
        .get("lines")
        .and_then(Value::as_array)
        .map(|items| items.iter().filter_map(Value::as_str).map(ToString::to_string).collect())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::{extract_job_status, extract_lines};
    use serde_json::json;

    #[test]
    fn extract_job_status_normalizes_case() {
        assert_eq!(extract_job_status(&json!({"status": "succeeded"})), "SUCCEEDED");
        assert_eq!(extract_job_status(&json!({"status": "IN_PROGRESS"})), "IN_PROGRESS");
        assert_eq!(extract_job_status(&json!({})), "UNKNOWN");
    }

    #[test]
    fn extract_lines_preserves_order() {
        let payload = json!({"lines": ["first", "second", "third"]});
        assert_eq!(extract_lines(&payload), vec!["first", "second", "third"]);
    }

    #[test]
    fn extract_lines_tolerates_missing_field() {
        assert!(extract_lines(&json!({"status": "SUCCEEDED"})).is_empty());
    }
}

use anyhow::{Context, Result};
use reqwest::Client;
use serde_json::Value;
use std::time::Duration;

use crate::core::config::Settings;
use crate::services::vendor::{extract_error_message, json_body};

/// Client for the asynchronous video face/emotion detection service. Jobs are
/// started with a callback URL and a caller-supplied tag; completion arrives
/// as a notification carrying that tag back.
#[derive(Debug, Clone)]
pub(crate) struct FaceDetectionService {
    client: Client,
    api_key: String,
    base_url: String,
    callback_url: String,
}

#[derive(Debug, Clone)]
pub(crate) struct FaceObservation {
    pub(crate) emotions: Vec<EmotionReading>,
    pub(crate) smile: Option<SmileReading>,
}

#[derive(Debug, Clone)]
pub(crate) struct EmotionReading {
    pub(crate) kind: String,
    pub(crate) confidence: f64,
}

#[derive(Debug, Clone)]
pub(crate) struct SmileReading {
    pub(crate) value: bool,
    pub(crate) confidence: f64,
}

impl FaceDetectionService {
    pub(crate) fn from_settings(settings: &Settings) -> Result<Self> {
        let client = Client::builder()
            .connect_timeout(Duration::from_secs(20))
            .timeout(Duration::from_secs(settings.face_detection().timeout_seconds))
            .build()
            .context("Failed to build face-detection HTTP client")?;

        Ok(Self {
            client,
            api_key: settings.face_detection().api_key.clone(),
            base_url: settings.face_detection().base_url.trim_end_matches('/').to_string(),
            callback_url: settings.face_detection().callback_url.clone(),
        })
    }

    pub(crate) async fn start_face_detection(
        &self,
        bucket: &str,
        key: &str,
        job_tag: &str,
    ) -> Result<String> {
        let endpoint = format!("{}/face-detection", self.base_url);

        let response = self
            .client
            .post(&endpoint)
            .header("X-Api-Key", &self.api_key)
            .json(&serde_json::json!({
                "video": {"bucket": bucket, "key": key},
                "notify_url": self.callback_url,
                "job_tag": job_tag,
            }))
            .send()
            .await
            .context("Failed to call face-detection API")?;

        let (status, parsed) = json_body(response, "Face-detection submit").await?;

        if !status.is_success() {
            return Err(anyhow::anyhow!(
                "Face-detection submit failed (status {}): {}",
                status,
                extract_error_message(&parsed)
            ));
        }

        parsed
            .get("job_id")
            .and_then(Value::as_str)
            .map(ToString::to_string)
            .ok_or_else(|| anyhow::anyhow!("Face-detection submit response missing job_id"))
    }

    pub(crate) async fn face_detections(&self, job_id: &str) -> Result<Vec<FaceObservation>> {
        let response = self
            .client
            .get(format!("{}/face-detection/{}", self.base_url, job_id))
            .header("X-Api-Key", &self.api_key)
            .send()
            .await
            .context("Failed to call face-detection result endpoint")?;

        let (status, parsed) = json_body(response, "Face-detection result").await?;

        if !status.is_success() {
            return Err(anyhow::anyhow!(
                "Face-detection result fetch failed (status {}): {}",
                status,
                extract_error_message(&parsed)
            ));
        }

        Ok(extract_faces(&parsed))
    }
}

fn extract_faces(payload: &Value) -> Vec<FaceObservation> {
    payload
        .get("faces")
        .and_then(Value::as_array)
        .map(|faces| faces.iter().map(extract_face).collect())
        .unwrap_or_default()
}

fn extract_face(item: &Value) -> FaceObservation {
    // Detections may arrive nested under a "face" envelope or flat.
    let face = item.get("face").unwrap_or(item);

    let emotions = face
        .get("emotions")
        .and_then(Value::as_array)
        .map(|list| {
            list.iter()
                .filter_map(|emotion| {
                    let kind = emotion.get("type").and_then(Value::as_str)?;
                    let confidence = emotion.get("confidence").and_then(Value::as_f64)?;
                    Some(EmotionReading { kind: kind.to_ascii_uppercase(), confidence })
                })
                .collect()
        })
        .unwrap_or_default();

    let smile = face.get("smile").and_then(|smile| {
        let value = smile.get("value").and_then(Value::as_bool)?;
        let confidence = smile.get("confidence").and_then(Value::as_f64)?;
        Some(SmileReading { value, confidence })
    });

    FaceObservation { emotions, smile }
}

#[cfg(test)]
mod tests {
    use super::extract_faces;
    use serde_json::json;

    #[test]
    fn extracts_nested_face_envelopes() {
        let payload = json!({
            "faces": [
                {
                    "face": {
                        "emotions": [{"type": "happy", "confidence": 98.5}],
                        "smile": {"value": true, "confidence": 88.0}
                    }
                }
            ]
        });

        let faces = extract_faces(&payload);
        assert_eq!(faces.len(), 1);
        assert_eq!(faces[0].emotions[0].kind, "HAPPY");
        assert_eq!(faces[0].emotions[0].confidence, 98.5);
        let smile = faces[0].smile.as_ref().expect("smile");
        assert!(smile.value);
        assert_eq!(smile.confidence, 88.0);
    }

    #[test]
    fn extracts_flat_faces_and_tolerates_gaps() {
        let payload = json!({
            "faces": [
                {"emotions": [{"type": "CALM", "confidence": 70.0}]},
                {"smile": {"value": false, "confidence": 10.0}},
                {}
            ]
        });

        let faces = extract_faces(&payload);
        assert_eq!(faces.len(), 3);
        assert_eq!(faces[0].emotions.len(), 1);
        assert!(faces[0].smile.is_none());
        assert!(!faces[1].smile.as_ref().expect("smile").value);
        assert!(faces[2].emotions.is_empty());
    }

    #[test]
    fn missing_faces_field_yields_empty() {
        assert!(extract_faces(&json!({"status": "SUCCEEDED"})).is_empty());
    }
}

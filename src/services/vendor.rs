use anyhow::{Context, Result};
use reqwest::StatusCode;
use serde_json::Value;

/// Read a vendor response body as JSON, keeping the raw text in the error when
/// the body is not parseable.
pub(crate) async fn json_body(
    response: reqwest::Response,
    what: &'static str,
) -> Result<(StatusCode, Value)> {
    let status = response.status();
    let raw_body =
        response.text().await.with_context(|| format!("Failed to read {what} response"))?;

    let parsed = serde_json::from_str::<Value>(&raw_body).map_err(|err| {
        anyhow::anyhow!("{what} returned non-JSON body (status {status}): {err}: {raw_body}")
    })?;

    Ok((status, parsed))
}

pub(crate) fn extract_error_message(payload: &Value) -> String {
    if let Some(detail) = payload.get("detail") {
        if let Some(text) = detail.as_str() {
            return text.to_string();
        }
        if let Some(items) = detail.as_array() {
            let joined = items
                .iter()
                .filter_map(|item| {
                    item.get("msg")
                        .and_then(Value::as_str)
                        .or_else(|| item.get("message").and_then(Value::as_str))
                })
                .collect::<Vec<_>>()
                .join("; ");
            if !joined.is_empty() {
                return joined;
            }
        }
    }

    payload
        .get("message")
        .and_then(Value::as_str)
        .or_else(|| payload.get("error").and_then(Value::as_str))
        .unwrap_or("unknown_error")
        .to_string()
}

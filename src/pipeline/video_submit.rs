use uuid::Uuid;

use crate::core::state::AppState;
use crate::pipeline::PipelineError;
use crate::schemas::events::StorageEventPayload;

/// Video submission: mint a fresh correlation id, then start the two
/// independent analysis jobs tagged/named with it. A failed submission fails
/// the invocation; a job already started is not rolled back.
pub(crate) async fn process_video_event(
    state: &AppState,
    event: &StorageEventPayload,
) -> Result<String, PipelineError> {
    let correlation_id = Uuid::new_v4().to_string();
    let media_uri = format!("s3://{}/{}", event.bucket, event.key);
    let media_format = media_format_from_key(&event.key);

    state
        .face_detection()
        .start_face_detection(&event.bucket, &event.key, &correlation_id)
        .await
        .map_err(|err| PipelineError::external("face detection", err))?;

    state
        .transcription()
        .start_transcription(&correlation_id, &media_uri, &media_format)
        .await
        .map_err(|err| PipelineError::external("transcription", err))?;

    metrics::counter!("video_submissions_total").increment(1);
    tracing::info!(
        correlation_id,
        bucket = %event.bucket,
        key = %event.key,
        media_format,
        "Started face-detection and transcription jobs"
    );

    Ok(correlation_id)
}

fn media_format_from_key(key: &str) -> String {
    key.rsplit('.').next().unwrap_or(key).to_ascii_lowercase()
}

#[cfg(test)]
mod tests {
    use super::media_format_from_key;

    #[test]
    fn media_format_is_the_lowercased_extension() {
        assert_eq!(media_format_from_key("videos/abc_interview.MP4"), "mp4");
        assert_eq!(media_format_from_key("clip.mov"), "mov");
    }

    #[test]
    fn media_format_without_extension_is_the_whole_name() {
        assert_eq!(media_format_from_key("rawclip"), "rawclip");
    }
}

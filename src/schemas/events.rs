use serde::{Deserialize, Serialize};

/// Storage-event webhook payload naming the uploaded object.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub(crate) struct StorageEventPayload {
    pub(crate) bucket: String,
    pub(crate) key: String,
}

/// Completion notification delivered by the face-detection service. Field
/// names follow the vendor's wire format.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub(crate) struct FaceDetectionNotification {
    pub(crate) job_id: String,
    pub(crate) job_tag: String,
    pub(crate) video: NotificationVideo,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub(crate) struct NotificationVideo {
    pub(crate) s3_bucket: String,
    pub(crate) s3_object_name: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn notification_uses_vendor_field_names() {
        let raw = r#"{
            "JobId": "job-42",
            "JobTag": "corr-1",
            "Video": {"S3Bucket": "interview-videos", "S3ObjectName": "videos/corr-1_clip.mp4"}
        }"#;

        let parsed: FaceDetectionNotification = serde_json::from_str(raw).expect("notification");
        assert_eq!(parsed.job_id, "job-42");
        assert_eq!(parsed.job_tag, "corr-1");
        assert_eq!(parsed.video.s3_bucket, "interview-videos");
        assert_eq!(parsed.video.s3_object_name, "videos/corr-1_clip.mp4");

        let round_trip = serde_json::to_value(&parsed).expect("serialize");
        assert_eq!(round_trip["JobTag"], "corr-1");
        assert_eq!(round_trip["Video"]["S3Bucket"], "interview-videos");
    }

    #[test]
    fn storage_event_parses_bucket_and_key() {
        let parsed: StorageEventPayload =
            serde_json::from_str(r#"{"bucket": "docs", "key": "abc_resume.pdf"}"#).expect("event");
        assert_eq!(parsed.bucket, "docs");
        assert_eq!(parsed.key, "abc_resume.pdf");
    }
}

use aws_config::BehaviorVersion;
use aws_credential_types::Credentials;
use aws_sdk_s3::presigning::PresigningConfig;
use aws_sdk_s3::primitives::ByteStream;
use aws_sdk_s3::Client;
use sha2::{Digest, Sha256};
use std::collections::HashMap;
use std::time::Duration;

use crate::core::config::Settings;

/// User-metadata key carrying the correlation id on uploaded documents. The
/// upload path attaches it; the document pipeline reads it back via HeadObject.
pub(crate) const CORRELATION_METADATA_KEY: &str = "correlation-id";

#[derive(Debug, Clone)]
pub(crate) struct StorageService {
    client: Client,
    document_bucket: String,
    video_bucket: String,
}

impl StorageService {
    pub(crate) async fn from_settings(settings: &Settings) -> anyhow::Result<Option<Self>> {
        if settings.s3().access_key.is_empty() || settings.s3().secret_key.is_empty() {
            return Ok(None);
        }

        let creds = Credentials::new(
            settings.s3().access_key.clone(),
            settings.s3().secret_key.clone(),
            None,
            None,
            "hirelens-static",
        );

        let config = aws_config::defaults(BehaviorVersion::latest())
            .endpoint_url(settings.s3().endpoint.clone())
            .region(aws_config::Region::new(settings.s3().region.clone()))
            .credentials_provider(creds)
            .load()
            .await;

        let client = Client::new(&config);

        Ok(Some(Self {
            client,
            document_bucket: settings.s3().document_bucket.clone(),
            video_bucket: settings.s3().video_bucket.clone(),
        }))
    }

    pub(crate) fn video_bucket(&self) -> &str {
        &self.video_bucket
    }

    /// Presigned PUT for a document upload; the correlation id travels as
    /// object metadata so the storage event handler can recover it.
    pub(crate) async fn presign_document_put(
        &self,
        key: &str,
        content_type: &str,
        correlation_id: &str,
        expires_in: Duration,
    ) -> anyhow::Result<String> {
        let presigned = self
            .client
            .put_object()
            .bucket(&self.document_bucket)
            .key(key)
            .content_type(content_type)
            .metadata(CORRELATION_METADATA_KEY, correlation_id)
            .presigned(PresigningConfig::expires_in(expires_in)?)
            .await?;

        Ok(presigned.uri().to_string())
    }

    pub(crate) async fn upload_video_bytes(
        &self,
        key: &str,
        content_type: &str,
        bytes: Vec<u8>,
    ) -> anyhow::Result<(i64, String)> {
        let size = bytes.len() as i64;
        let hash = Sha256::digest(&bytes);
        let hash_hex = hex::encode(hash);

        self.client
            .put_object()
            .bucket(&self.video_bucket)
            .key(key)
            .content_type(content_type)
            .body(ByteStream::from(bytes))
            .send()
            .await?;

        Ok((size, hash_hex))
    }

    pub(crate) async fn object_metadata(
        &self,
        bucket: &str,
        key: &str,
    ) -> anyhow::Result<HashMap<String, String>> {
        let head = self.client.head_object().bucket(bucket).key(key).send().await?;
        Ok(head.metadata().cloned().unwrap_or_default())
    }
}

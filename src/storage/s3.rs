use crate::{
    config::StorageConfig,
    error::{Result, TuneGenError},
    models::storage::UploadResult,
    storage::traits::ObjectStore,
};
use async_trait::async_trait;
use aws_sdk_s3::{error::ProvideErrorMetadata, primitives::ByteStream, Client};
use std::path::Path;

#[derive(Clone)]
pub struct S3ObjectStore {
    client: Client,
    bucket: String,
}

impl S3ObjectStore {
    pub fn new(client: Client, config: &StorageConfig) -> Result<Self> {
        let bucket = config
            .bucket_name
            .clone()
            .filter(|b| !b.trim().is_empty())
            .ok_or_else(|| TuneGenError::ConfigError("S3 bucket name is required".into()))?;

        Ok(Self { client, bucket })
    }
}

#[async_trait]
impl ObjectStore for S3ObjectStore {
    async fn put_file(&self, path: &Path, key: &str, content_type: &str) -> Result<UploadResult> {
        let size_bytes = tokio::fs::metadata(path).await?.len();
        let body = ByteStream::from_path(path).await.map_err(|e| {
            TuneGenError::StorageError(format!("Failed to read {}: {}", path.display(), e))
        })?;

        log::info!(
            "📤 Uploading {} ({} bytes) to s3://{}/{}",
            path.display(),
            size_bytes,
            self.bucket,
            key
        );

        let output = self
            .client
            .put_object()
            .bucket(&self.bucket)
            .key(key)
            .content_type(content_type)
            .body(body)
            .send()
            .await
            .map_err(|e| {
                log::error!("S3 upload error details: {:?}", e);

                if let Some(service_error) = e.as_service_error() {
                    TuneGenError::AwsServiceError(format!(
                        "S3 service error: {} - {}",
                        service_error.code().unwrap_or("unknown"),
                        service_error.message().unwrap_or("no message")
                    ))
                } else {
                    TuneGenError::AwsError(format!("AWS SDK error: {}", e))
                }
            })?;

        Ok(UploadResult {
            bucket: self.bucket.clone(),
            key: key.to_string(),
            size_bytes,
            e_tag: output.e_tag().map(String::from),
        })
    }
}

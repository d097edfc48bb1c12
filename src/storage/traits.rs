use crate::{error::Result, models::storage::UploadResult};
use async_trait::async_trait;
use std::path::Path;

#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Uploads the file at `path` under `key`. No retries; failures propagate.
    async fn put_file(&self, path: &Path, key: &str, content_type: &str) -> Result<UploadResult>;
}

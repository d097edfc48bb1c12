use crate::{
    error::{Result, TuneGenError},
    models::storage::UploadResult,
    storage::traits::ObjectStore,
};
use async_trait::async_trait;
use std::path::Path;
use std::sync::Mutex;

#[derive(Debug, Clone, PartialEq)]
pub struct StoredObject {
    pub bytes: Vec<u8>,
    pub content_type: String,
}

/// Keeps uploads in process memory, in upload order. Test-only stand-in for S3.
pub struct MemoryObjectStore {
    bucket: String,
    objects: Mutex<Vec<(String, StoredObject)>>,
}

impl MemoryObjectStore {
    pub fn new(bucket: impl Into<String>) -> Self {
        Self {
            bucket: bucket.into(),
            objects: Mutex::new(Vec::new()),
        }
    }

    pub fn keys(&self) -> Vec<String> {
        self.objects
            .lock()
            .map(|objects| objects.iter().map(|(key, _)| key.clone()).collect())
            .unwrap_or_default()
    }

    pub fn get(&self, key: &str) -> Option<StoredObject> {
        self.objects.lock().ok().and_then(|objects| {
            objects
                .iter()
                .find(|(k, _)| k == key)
                .map(|(_, object)| object.clone())
        })
    }
}

#[async_trait]
impl ObjectStore for MemoryObjectStore {
    async fn put_file(&self, path: &Path, key: &str, content_type: &str) -> Result<UploadResult> {
        let bytes = tokio::fs::read(path).await?;
        let size_bytes = bytes.len() as u64;

        let mut objects = self
            .objects
            .lock()
            .map_err(|_| TuneGenError::StorageError("object map poisoned".into()))?;
        objects.retain(|(k, _)| k != key);
        objects.push((
            key.to_string(),
            StoredObject {
                bytes,
                content_type: content_type.to_string(),
            },
        ));

        Ok(UploadResult {
            bucket: self.bucket.clone(),
            key: key.to_string(),
            size_bytes,
            e_tag: None,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_put_file_stores_bytes() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("cover.png");
        std::fs::write(&path, b"\x89PNG").unwrap();

        let store = MemoryObjectStore::new("songs");
        let result = store.put_file(&path, "abc.png", "image/png").await.unwrap();

        assert_eq!(result.bucket, "songs");
        assert_eq!(result.key, "abc.png");
        assert_eq!(result.size_bytes, 4);
        assert_eq!(store.keys(), vec!["abc.png"]);

        let object = store.get("abc.png").unwrap();
        assert_eq!(object.bytes, b"\x89PNG");
        assert_eq!(object.content_type, "image/png");
    }

    #[tokio::test]
    async fn test_missing_file_fails() {
        let store = MemoryObjectStore::new("songs");
        let err = store
            .put_file(Path::new("/nonexistent/track.wav"), "k.wav", "audio/wav")
            .await
            .unwrap_err();
        assert!(matches!(err, TuneGenError::IoError(_)));
        assert!(store.keys().is_empty());
    }
}

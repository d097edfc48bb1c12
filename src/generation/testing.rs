//! In-process stand-ins for the model and storage capabilities.

use crate::{
    error::{Result, TuneGenError},
    generation::{ImageSynthesizer, MusicSynthesizer, TextGenerator},
    models::{storage::UploadResult, ImageSynthesisRequest, MusicSynthesisRequest},
    storage::ObjectStore,
};
use async_trait::async_trait;
use std::path::Path;
use std::sync::Mutex;

pub const FAKE_TAGS: &str = "pop, upbeat, summer, 120 BPM";
pub const FAKE_LYRICS: &str = "[verse]\nsunlight on the water";
pub const FAKE_WAV: &[u8] = b"RIFF----WAVEfmt ";
pub const FAKE_PNG: &[u8] = b"\x89PNG\r\n\x1a\n";

/// Answers each template with a canned reply and records every prompt it saw.
pub struct ScriptedTextGenerator {
    pub categories_reply: String,
    pub prompts: Mutex<Vec<String>>,
}

impl ScriptedTextGenerator {
    pub fn new(categories_reply: &str) -> Self {
        Self {
            categories_reply: categories_reply.to_string(),
            prompts: Mutex::new(Vec::new()),
        }
    }

    pub fn seen(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }
}

#[async_trait]
impl TextGenerator for ScriptedTextGenerator {
    async fn complete(&self, prompt: &str) -> Result<String> {
        self.prompts.lock().unwrap().push(prompt.to_string());

        let reply = if prompt.starts_with("Reformat the following song description") {
            FAKE_TAGS.to_string()
        } else if prompt.starts_with("Write song lyrics") {
            FAKE_LYRICS.to_string()
        } else {
            self.categories_reply.clone()
        };
        Ok(reply)
    }
}

#[derive(Default)]
pub struct RecordingMusicSynthesizer {
    pub requests: Mutex<Vec<MusicSynthesisRequest>>,
    pub outputs: Mutex<Vec<std::path::PathBuf>>,
}

#[async_trait]
impl MusicSynthesizer for RecordingMusicSynthesizer {
    async fn synthesize(&self, request: &MusicSynthesisRequest, output_path: &Path) -> Result<()> {
        self.requests.lock().unwrap().push(request.clone());
        self.outputs.lock().unwrap().push(output_path.to_path_buf());
        tokio::fs::write(output_path, FAKE_WAV).await?;
        Ok(())
    }
}

/// Reports success without writing anything.
pub struct SilentMusicSynthesizer;

#[async_trait]
impl MusicSynthesizer for SilentMusicSynthesizer {
    async fn synthesize(&self, _request: &MusicSynthesisRequest, _output_path: &Path) -> Result<()> {
        Ok(())
    }
}

#[derive(Default)]
pub struct RecordingImageSynthesizer {
    pub requests: Mutex<Vec<ImageSynthesisRequest>>,
}

#[async_trait]
impl ImageSynthesizer for RecordingImageSynthesizer {
    async fn synthesize(&self, request: &ImageSynthesisRequest) -> Result<Vec<u8>> {
        self.requests.lock().unwrap().push(request.clone());
        Ok(FAKE_PNG.to_vec())
    }
}

/// Rejects every upload.
pub struct FailingObjectStore;

#[async_trait]
impl ObjectStore for FailingObjectStore {
    async fn put_file(&self, path: &Path, _key: &str, _content_type: &str) -> Result<UploadResult> {
        assert!(path.exists(), "upload attempted for missing file");
        Err(TuneGenError::StorageError("bucket unavailable".into()))
    }
}

/// Uploads normally, then swaps the source file for a directory so it cannot be unlinked.
pub struct StickyScratchStore {
    pub inner: crate::storage::MemoryObjectStore,
    pub planted: Mutex<Vec<std::path::PathBuf>>,
}

impl StickyScratchStore {
    pub fn new() -> Self {
        Self {
            inner: crate::storage::MemoryObjectStore::new("songs"),
            planted: Mutex::new(Vec::new()),
        }
    }
}

#[async_trait]
impl ObjectStore for StickyScratchStore {
    async fn put_file(&self, path: &Path, key: &str, content_type: &str) -> Result<UploadResult> {
        let result = self.inner.put_file(path, key, content_type).await?;
        tokio::fs::remove_file(path).await?;
        tokio::fs::create_dir(path).await?;
        self.planted.lock().unwrap().push(path.to_path_buf());
        Ok(result)
    }
}

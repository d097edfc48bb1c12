use crate::{
    error::Result,
    models::{ImageSynthesisRequest, MusicSynthesisRequest},
};
use async_trait::async_trait;
use std::path::Path;

/// Instruction-tuned text model: one prompt in, one completion out.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    async fn complete(&self, prompt: &str) -> Result<String>;
}

/// Text-to-music model. Writes the rendered track to `output_path`.
#[async_trait]
pub trait MusicSynthesizer: Send + Sync {
    async fn synthesize(&self, request: &MusicSynthesisRequest, output_path: &Path) -> Result<()>;
}

/// Text-to-image model. Returns encoded PNG bytes.
#[async_trait]
pub trait ImageSynthesizer: Send + Sync {
    async fn synthesize(&self, request: &ImageSynthesisRequest) -> Result<Vec<u8>>;
}

use crate::{
    config::MusicServiceConfig,
    error::{Result, TuneGenError},
    generation::MusicSynthesizer,
    models::MusicSynthesisRequest,
};
use async_trait::async_trait;
use reqwest::Client;
use std::path::Path;
use tokio::{fs::File, io::AsyncWriteExt};

/// Client for a resident ACE-Step style service that renders one WAV per request.
///
/// The call blocks until the track is rendered; there is no timeout because
/// long generations routinely take minutes on a single GPU.
#[derive(Clone)]
pub struct AceStepClient {
    client: Client,
    base_url: String,
}

impl AceStepClient {
    pub fn new(config: &MusicServiceConfig) -> Result<Self> {
        let base_url = config
            .base_url
            .as_deref()
            .map(|url| url.trim().trim_end_matches('/').to_string())
            .filter(|url| !url.is_empty())
            .ok_or_else(|| TuneGenError::ConfigError("Music service URL is required".into()))?;

        Ok(Self {
            client: Client::new(),
            base_url,
        })
    }

    pub fn endpoint(&self) -> String {
        format!("{}/generate", self.base_url)
    }
}

fn body_error(e: reqwest::Error) -> TuneGenError {
    TuneGenError::ResponseError(format!("Failed to read audio body: {}", e))
}

#[async_trait]
impl MusicSynthesizer for AceStepClient {
    async fn synthesize(&self, request: &MusicSynthesisRequest, output_path: &Path) -> Result<()> {
        log::info!(
            "Synthesizing {:.0}s track ({} steps, guidance {})",
            request.audio_duration,
            request.infer_step,
            request.guidance_scale
        );

        let mut response = self
            .client
            .post(self.endpoint())
            .json(request)
            .send()
            .await
            .map_err(|e| {
                TuneGenError::RequestError(format!("Music service request failed: {}", e))
            })?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(TuneGenError::SynthesisError(format!(
                "Music service returned {}: {}",
                status, error_text
            )));
        }

        // nothing is written to disk for an empty body
        let first = response.chunk().await.map_err(body_error)?.ok_or_else(|| {
            TuneGenError::SynthesisError("Music service returned an empty body".into())
        })?;
        let mut file = File::create(output_path).await?;
        file.write_all(&first).await?;
        let mut written = first.len() as u64;

        while let Some(chunk) = response.chunk().await.map_err(body_error)? {
            file.write_all(&chunk).await?;
            written += chunk.len() as u64;
        }
        file.flush().await?;

        log::debug!("Wrote {} audio bytes to {}", written, output_path.display());
        Ok(())
    }
}

use crate::{
    bedrock::{self, BedrockClient},
    config::Config,
    error::{Result, TuneGenError},
    generation::{
        categories::parse_categories,
        prompts::{self, INSTRUMENTAL_MARKER},
        scratch::{ScratchDir, ScratchFile},
        ImageSynthesizer, MusicSynthesizer, TextGenerator,
    },
    logger,
    models::{
        GenerateFromDescriptionRequest, GenerateWithCustomLyricsRequest,
        GenerateWithDescribedLyricsRequest, GeneratedArtifactSet, GenerationParams,
        GenerationRequest, ImageSynthesisRequest, MusicSynthesisRequest, SampleAudioResponse,
    },
    music::AceStepClient,
    storage::{
        new_object_key, ObjectStore, S3ObjectStore, AUDIO_CONTENT_TYPE, IMAGE_CONTENT_TYPE,
    },
};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use std::sync::Arc;

pub const THUMBNAIL_STEPS: u32 = 2;
pub const THUMBNAIL_GUIDANCE_SCALE: f64 = 0.0;

const SAMPLE_PROMPT: &str = "pop, soul, singer-songwriter, emotional pop, dramatic";
const SAMPLE_LYRICS: &str = "[verse]
I kept the porch light burning long after you were gone
Counting every headlight that never turned for home
[chorus]
So before you go
Was there something I could say to make your heart beat better
If only I had known you had a storm to weather";
const SAMPLE_DURATION: f64 = 205.0;

/// Model handles and storage for one worker, built once at startup.
pub struct WorkerContext {
    pub text: Arc<dyn TextGenerator>,
    pub music: Arc<dyn MusicSynthesizer>,
    pub image: Arc<dyn ImageSynthesizer>,
    pub store: Arc<dyn ObjectStore>,
    pub scratch: ScratchDir,
}

impl WorkerContext {
    /// Connects the Bedrock, S3 and music service clients described by `config`.
    pub async fn from_config(config: &Config) -> Result<Self> {
        config.validate()?;

        let sdk_config = bedrock::load_sdk_config(&config.aws).await;
        let bedrock = BedrockClient::new(&sdk_config, &config.bedrock);
        let s3 = aws_sdk_s3::Client::new(&sdk_config);

        Ok(Self {
            text: Arc::new(bedrock.text().clone()),
            music: Arc::new(AceStepClient::new(&config.music)?),
            image: Arc::new(bedrock.image().clone()),
            store: Arc::new(S3ObjectStore::new(s3, &config.storage)?),
            scratch: ScratchDir::new(&config.scratch_dir),
        })
    }
}

/// Everything `synthesize_and_publish` needs once the text steps are resolved.
struct SynthesisJob<'a> {
    prompt: String,
    lyrics: String,
    params: &'a GenerationParams,
    category_source: &'a str,
}

pub struct RequestOrchestrator {
    context: WorkerContext,
}

impl RequestOrchestrator {
    pub fn new(context: WorkerContext) -> Self {
        Self { context }
    }

    pub async fn generate(&self, request: &GenerationRequest) -> Result<GeneratedArtifactSet> {
        match request {
            GenerationRequest::FromDescription(r) => self.generate_from_description(r).await,
            GenerationRequest::WithCustomLyrics(r) => self.generate_with_custom_lyrics(r).await,
            GenerationRequest::WithDescribedLyrics(r) => {
                self.generate_with_described_lyrics(r).await
            }
        }
    }

    pub async fn generate_from_description(
        &self,
        request: &GenerateFromDescriptionRequest,
    ) -> Result<GeneratedArtifactSet> {
        request.validate()?;

        let prompt = {
            let _t = logger::timer("prompt generation");
            self.context
                .text
                .complete(&prompts::music_prompt(&request.full_described_song))
                .await?
        };
        let lyrics = if request.params.instrumental {
            String::new()
        } else {
            self.generate_lyrics(&request.full_described_song).await?
        };

        self.synthesize_and_publish(SynthesisJob {
            prompt,
            lyrics,
            params: &request.params,
            category_source: &request.full_described_song,
        })
        .await
    }

    pub async fn generate_with_custom_lyrics(
        &self,
        request: &GenerateWithCustomLyricsRequest,
    ) -> Result<GeneratedArtifactSet> {
        request.validate()?;

        self.synthesize_and_publish(SynthesisJob {
            prompt: request.prompt.clone(),
            lyrics: request.lyrics.clone(),
            params: &request.params,
            category_source: &request.prompt,
        })
        .await
    }

    pub async fn generate_with_described_lyrics(
        &self,
        request: &GenerateWithDescribedLyricsRequest,
    ) -> Result<GeneratedArtifactSet> {
        request.validate()?;

        let lyrics = if request.params.instrumental {
            String::new()
        } else {
            self.generate_lyrics(&request.described_lyrics).await?
        };

        self.synthesize_and_publish(SynthesisJob {
            prompt: request.prompt.clone(),
            lyrics,
            params: &request.params,
            category_source: &request.prompt,
        })
        .await
    }

    /// Renders a fixed track and returns it inline, without touching the object store.
    pub async fn generate_sample(&self) -> Result<SampleAudioResponse> {
        let audio = self.context.scratch.reserve("wav").await?;
        let request = MusicSynthesisRequest {
            prompt: SAMPLE_PROMPT.to_string(),
            lyrics: SAMPLE_LYRICS.to_string(),
            audio_duration: SAMPLE_DURATION,
            infer_step: 60,
            guidance_scale: 15.0,
            seed: None,
        };

        {
            let _t = logger::timer("sample synthesis");
            self.context.music.synthesize(&request, audio.path()).await?;
        }

        let bytes = tokio::fs::read(audio.path()).await?;
        Ok(SampleAudioResponse {
            audio_data: STANDARD.encode(bytes),
        })
    }

    async fn generate_lyrics(&self, description: &str) -> Result<String> {
        let _t = logger::timer("lyrics generation");
        self.context
            .text
            .complete(&prompts::lyrics_prompt(description))
            .await
    }

    async fn synthesize_and_publish(&self, job: SynthesisJob<'_>) -> Result<GeneratedArtifactSet> {
        let final_lyrics = if job.params.instrumental {
            INSTRUMENTAL_MARKER.to_string()
        } else {
            job.lyrics
        };
        log::info!("Prompt: {}", job.prompt);
        log::info!("Lyrics:\n{}", final_lyrics);

        let audio = self.context.scratch.reserve("wav").await?;
        let music_request = MusicSynthesisRequest {
            prompt: job.prompt.clone(),
            lyrics: final_lyrics,
            audio_duration: job.params.audio_duration,
            infer_step: job.params.infer_step,
            guidance_scale: job.params.guidance_scale,
            seed: job.params.resolved_seed(),
        };
        {
            let _t = logger::timer("music synthesis");
            self.context
                .music
                .synthesize(&music_request, audio.path())
                .await?;
        }
        match tokio::fs::metadata(audio.path()).await {
            Ok(meta) => log::info!("🎧 Audio file size: {} bytes", meta.len()),
            Err(_) => {
                return Err(TuneGenError::SynthesisError(format!(
                    "audio file not found after synthesis: {}",
                    audio.path().display()
                )))
            }
        }
        let s3_key = self.publish(audio, "wav", AUDIO_CONTENT_TYPE).await?;

        let image_request = ImageSynthesisRequest::new(
            prompts::thumbnail_prompt(&job.prompt),
            THUMBNAIL_STEPS,
            THUMBNAIL_GUIDANCE_SCALE,
        );
        let image_bytes = {
            let _t = logger::timer("thumbnail synthesis");
            self.context.image.synthesize(&image_request).await?
        };
        let image = self.context.scratch.reserve("png").await?;
        tokio::fs::write(image.path(), &image_bytes).await?;
        let cover_image_s3_key = self.publish(image, "png", IMAGE_CONTENT_TYPE).await?;

        let categories = {
            let _t = logger::timer("category generation");
            let reply = self
                .context
                .text
                .complete(&prompts::category_prompt(job.category_source))
                .await?;
            parse_categories(&reply)
        };
        if categories.is_empty() {
            log::warn!("Category model returned no usable tags");
        }

        Ok(GeneratedArtifactSet {
            s3_key,
            cover_image_s3_key,
            categories,
        })
    }

    /// Uploads under a fresh key; the scratch file is removed whether or not the upload succeeds.
    async fn publish(&self, file: ScratchFile, extension: &str, content_type: &str) -> Result<String> {
        let key = new_object_key(extension);
        let result = self
            .context
            .store
            .put_file(file.path(), &key, content_type)
            .await?;
        log::info!("✅ Stored s3://{}/{}", result.bucket, result.key);
        drop(file);
        Ok(key)
    }
}

use crate::error::{Result, TuneGenError};
use serde::{Deserialize, Serialize};

pub const DEFAULT_AUDIO_DURATION: f64 = 180.0;
pub const DEFAULT_SEED: i64 = -1;
pub const DEFAULT_GUIDANCE_SCALE: f64 = 15.0;
pub const DEFAULT_INFER_STEP: u32 = 60;

fn default_audio_duration() -> f64 {
    DEFAULT_AUDIO_DURATION
}

fn default_seed() -> i64 {
    DEFAULT_SEED
}

fn default_guidance_scale() -> f64 {
    DEFAULT_GUIDANCE_SCALE
}

fn default_infer_step() -> u32 {
    DEFAULT_INFER_STEP
}

/// Synthesis knobs shared by every request shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationParams {
    #[serde(default = "default_audio_duration")]
    pub audio_duration: f64,
    /// Negative means "let the synthesizer pick".
    #[serde(default = "default_seed")]
    pub seed: i64,
    #[serde(default = "default_guidance_scale")]
    pub guidance_scale: f64,
    #[serde(default = "default_infer_step")]
    pub infer_step: u32,
    #[serde(default)]
    pub instrumental: bool,
}

impl Default for GenerationParams {
    fn default() -> Self {
        Self {
            audio_duration: DEFAULT_AUDIO_DURATION,
            seed: DEFAULT_SEED,
            guidance_scale: DEFAULT_GUIDANCE_SCALE,
            infer_step: DEFAULT_INFER_STEP,
            instrumental: false,
        }
    }
}

impl GenerationParams {
    pub fn with_instrumental(mut self, instrumental: bool) -> Self {
        self.instrumental = instrumental;
        self
    }

    pub fn with_seed(mut self, seed: i64) -> Self {
        self.seed = seed;
        self
    }

    pub fn resolved_seed(&self) -> Option<u64> {
        u64::try_from(self.seed).ok()
    }

    pub fn validate(&self) -> Result<()> {
        if !self.audio_duration.is_finite() || self.audio_duration <= 0.0 {
            return Err(TuneGenError::ValidationError(format!(
                "audio_duration must be a positive number of seconds, got {}",
                self.audio_duration
            )));
        }
        if self.infer_step == 0 {
            return Err(TuneGenError::ValidationError(
                "infer_step must be at least 1".into(),
            ));
        }
        if !self.guidance_scale.is_finite() || self.guidance_scale < 0.0 {
            return Err(TuneGenError::ValidationError(format!(
                "guidance_scale must be a non-negative number, got {}",
                self.guidance_scale
            )));
        }
        Ok(())
    }
}

fn require_text(field: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(TuneGenError::ValidationError(format!(
            "{} must not be empty",
            field
        )));
    }
    Ok(())
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerateFromDescriptionRequest {
    pub full_described_song: String,
    #[serde(flatten)]
    pub params: GenerationParams,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerateWithCustomLyricsRequest {
    pub prompt: String,
    pub lyrics: String,
    #[serde(flatten)]
    pub params: GenerationParams,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerateWithDescribedLyricsRequest {
    pub prompt: String,
    pub described_lyrics: String,
    #[serde(flatten)]
    pub params: GenerationParams,
}

impl GenerateFromDescriptionRequest {
    pub fn validate(&self) -> Result<()> {
        require_text("full_described_song", &self.full_described_song)?;
        self.params.validate()
    }
}

impl GenerateWithCustomLyricsRequest {
    pub fn validate(&self) -> Result<()> {
        require_text("prompt", &self.prompt)?;
        self.params.validate()
    }
}

impl GenerateWithDescribedLyricsRequest {
    pub fn validate(&self) -> Result<()> {
        require_text("prompt", &self.prompt)?;
        if !self.params.instrumental {
            require_text("described_lyrics", &self.described_lyrics)?;
        }
        self.params.validate()
    }
}

/// The three accepted request shapes; the variant decides which text-generation steps run.
#[derive(Debug, Clone)]
pub enum GenerationRequest {
    FromDescription(GenerateFromDescriptionRequest),
    WithCustomLyrics(GenerateWithCustomLyricsRequest),
    WithDescribedLyrics(GenerateWithDescribedLyricsRequest),
}

impl GenerationRequest {
    pub fn validate(&self) -> Result<()> {
        match self {
            GenerationRequest::FromDescription(r) => r.validate(),
            GenerationRequest::WithCustomLyrics(r) => r.validate(),
            GenerationRequest::WithDescribedLyrics(r) => r.validate(),
        }
    }
}

impl From<GenerateFromDescriptionRequest> for GenerationRequest {
    fn from(r: GenerateFromDescriptionRequest) -> Self {
        GenerationRequest::FromDescription(r)
    }
}

impl From<GenerateWithCustomLyricsRequest> for GenerationRequest {
    fn from(r: GenerateWithCustomLyricsRequest) -> Self {
        GenerationRequest::WithCustomLyrics(r)
    }
}

impl From<GenerateWithDescribedLyricsRequest> for GenerationRequest {
    fn from(r: GenerateWithDescribedLyricsRequest) -> Self {
        GenerationRequest::WithDescribedLyrics(r)
    }
}

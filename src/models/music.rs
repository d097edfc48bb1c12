use serde::{Deserialize, Serialize};

/// Wire payload sent to the music synthesis service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MusicSynthesisRequest {
    pub prompt: String,
    pub lyrics: String,
    pub audio_duration: f64,
    pub infer_step: u32,
    pub guidance_scale: f64,
    /// Absent means the service draws a random seed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
}

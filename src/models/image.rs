use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImageSynthesisRequest {
    pub prompt: String,
    pub steps: u32,
    pub guidance_scale: f64,
    pub width: u32,
    pub height: u32,
}

impl ImageSynthesisRequest {
    pub fn new(prompt: impl Into<String>, steps: u32, guidance_scale: f64) -> Self {
        Self {
            prompt: prompt.into(),
            steps,
            guidance_scale,
            width: 1024,
            height: 1024,
        }
    }
}

#[derive(Serialize, Deserialize)]
pub struct StabilityImageResponse {
    pub artifacts: Vec<StabilityArtifact>,
}

#[derive(Serialize, Deserialize)]
pub struct StabilityArtifact {
    pub base64: String,
    #[serde(rename = "finishReason")]
    pub finish_reason: Option<String>,
}

#[derive(Serialize, Deserialize)]
pub struct TitanImageResponse {
    pub images: Vec<String>,
}

use serde::{Deserialize, Serialize};

/// What a successful generation hands back: object keys plus genre tags.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeneratedArtifactSet {
    pub s3_key: String,
    pub cover_image_s3_key: String,
    pub categories: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SampleAudioResponse {
    pub audio_data: String, // Base64 encoded WAV
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}

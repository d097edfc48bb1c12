use crate::{
    error::{Result, TuneGenError},
    generation::ImageSynthesizer,
    models::{ImageSynthesisRequest, StabilityImageResponse, TitanImageResponse},
};
use async_trait::async_trait;
use aws_sdk_bedrockruntime::{error::ProvideErrorMetadata, primitives::Blob, Client};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use serde_json::json;

#[derive(Clone)]
pub struct ImageClient {
    client: Client,
    model_id: String,
}

impl ImageClient {
    pub fn new(client: Client, model_id: impl Into<String>) -> Self {
        Self {
            client,
            model_id: model_id.into(),
        }
    }
}

#[async_trait]
impl ImageSynthesizer for ImageClient {
    async fn synthesize(&self, request: &ImageSynthesisRequest) -> Result<Vec<u8>> {
        let request_payload = build_request_payload(&self.model_id, request)?;
        let request_json = serde_json::to_string(&request_payload)?;

        log::info!(
            "Generating image with model: {} ({} steps)",
            self.model_id,
            request.steps
        );

        let response = self
            .client
            .invoke_model()
            .model_id(&self.model_id)
            .content_type("application/json")
            .accept("application/json")
            .body(Blob::new(request_json.into_bytes()))
            .send()
            .await
            .map_err(map_invoke_error)?;

        let encoded = extract_image(&self.model_id, &response.body.into_inner())?;
        STANDARD
            .decode(encoded)
            .map_err(|e| TuneGenError::ResponseError(format!("Invalid base64 image: {}", e)))
    }
}

fn map_invoke_error<E>(e: E) -> TuneGenError
where
    E: ProvideErrorMetadata + std::fmt::Debug + std::fmt::Display,
{
    log::error!("AWS SDK Image Generation Error details: {:?}", e);

    match e.code() {
        Some(code) => TuneGenError::AwsServiceError(format!(
            "Bedrock service error: {} - {}",
            code,
            e.message().unwrap_or("no message")
        )),
        None => TuneGenError::AwsError(format!("AWS SDK error: {}", e)),
    }
}

fn build_request_payload(
    model_id: &str,
    request: &ImageSynthesisRequest,
) -> Result<serde_json::Value> {
    let payload = match model_id {
        id if id.starts_with("stability.stable-diffusion-xl") => json!({
            "text_prompts": [
                { "text": request.prompt, "weight": 1.0 }
            ],
            "cfg_scale": request.guidance_scale,
            "steps": request.steps,
            "width": request.width,
            "height": request.height,
            "samples": 1
        }),
        id if id.starts_with("amazon.titan-image-generator") => json!({
            "taskType": "TEXT_IMAGE",
            "textToImageParams": {
                "text": request.prompt
            },
            "imageGenerationConfig": {
                "numberOfImages": 1,
                "quality": "standard",
                "width": request.width,
                "height": request.height,
                // titan rejects cfgScale below 1.1
                "cfgScale": request.guidance_scale.max(1.1)
            }
        }),
        _ => {
            return Err(TuneGenError::RequestError(format!(
                "Unsupported image model: {}",
                model_id
            )))
        }
    };

    Ok(payload)
}

/// Pulls the first base64 image out of the provider response.
fn extract_image(model_id: &str, body: &[u8]) -> Result<String> {
    if model_id.starts_with("amazon.titan-image-generator") {
        let titan: TitanImageResponse = serde_json::from_slice(body)
            .map_err(|e| TuneGenError::ResponseError(e.to_string()))?;
        return titan
            .images
            .into_iter()
            .next()
            .ok_or_else(|| TuneGenError::ResponseError("No images generated".into()));
    }

    let stability: StabilityImageResponse = serde_json::from_slice(body)
        .map_err(|e| TuneGenError::ResponseError(e.to_string()))?;
    let artifact = stability
        .artifacts
        .into_iter()
        .next()
        .ok_or_else(|| TuneGenError::ResponseError("No images generated".into()))?;

    match artifact.finish_reason.as_deref() {
        None | Some("SUCCESS") => Ok(artifact.base64),
        Some(reason) => Err(TuneGenError::ResponseError(format!(
            "Image generation finished with {}",
            reason
        ))),
    }
}

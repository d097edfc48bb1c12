use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ModelProvider {
    Amazon,
    Anthropic,
    Meta,
    Mistral,
}

impl ModelProvider {
    pub fn from_model_id(model_id: &str) -> Option<Self> {
        // inference profile ARNs embed the base model id after the last '/'
        let base = model_id.rsplit('/').next().unwrap_or(model_id);
        let base = base
            .strip_prefix("us.")
            .or_else(|| base.strip_prefix("eu."))
            .unwrap_or(base);

        match base {
            id if id.starts_with("amazon.titan") => Some(ModelProvider::Amazon),
            id if id.starts_with("anthropic.") => Some(ModelProvider::Anthropic),
            id if id.starts_with("meta.llama") => Some(ModelProvider::Meta),
            id if id.starts_with("mistral.") => Some(ModelProvider::Mistral),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct TextGenerationRequest {
    pub prompt: String,
    pub max_tokens: Option<i32>,
    pub temperature: Option<f32>,
    pub model_id: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct TextGenerationResponse {
    pub text: String,
    pub model: String,
    pub tokens_generated: Option<i32>,
    pub tokens_prompt: Option<i32>,
    pub finish_reason: Option<String>,
}

#[derive(Serialize, Deserialize)]
pub struct LlamaResponse {
    pub generation: String,
    pub prompt_token_count: Option<i32>,
    pub generation_token_count: Option<i32>,
    pub stop_reason: Option<String>,
}

#[derive(Serialize, Deserialize)]
pub struct TitanTextResponse {
    #[serde(rename = "inputTextTokenCount")]
    pub input_text_token_count: Option<i32>,
    pub results: Vec<TitanTextResult>,
}

#[derive(Serialize, Deserialize)]
pub struct TitanTextResult {
    #[serde(rename = "tokenCount")]
    pub token_count: Option<i32>,
    #[serde(rename = "outputText")]
    pub output_text: String,
    #[serde(rename = "completionReason")]
    pub completion_reason: Option<String>,
}

#[derive(Serialize, Deserialize)]
pub struct AnthropicResponse {
    pub content: Vec<AnthropicContent>,
    pub stop_reason: Option<String>,
    pub usage: Option<AnthropicUsage>,
}

#[derive(Serialize, Deserialize)]
pub struct AnthropicContent {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub text: String,
}

#[derive(Serialize, Deserialize)]
pub struct AnthropicUsage {
    pub input_tokens: Option<i32>,
    pub output_tokens: Option<i32>,
}

#[derive(Serialize, Deserialize)]
pub struct MistralResponse {
    pub outputs: Vec<MistralOutput>,
}

#[derive(Serialize, Deserialize)]
pub struct MistralOutput {
    pub text: String,
    pub stop_reason: Option<String>,
}

use crate::{
    error::{Result, TuneGenError},
    generation::TextGenerator,
    models::{
        AnthropicResponse, LlamaResponse, MistralResponse, ModelProvider, TextGenerationRequest,
        TextGenerationResponse, TitanTextResponse,
    },
};
use async_trait::async_trait;
use aws_sdk_bedrockruntime::{error::ProvideErrorMetadata, primitives::Blob, Client};
use serde_json::json;

pub const MAX_NEW_TOKENS: i32 = 512;

#[derive(Clone)]
pub struct TextClient {
    client: Client,
    default_model_id: String,
}

impl TextClient {
    pub fn new(client: Client, default_model_id: impl Into<String>) -> Self {
        Self {
            client,
            default_model_id: default_model_id.into(),
        }
    }

    pub async fn generate(&self, request: TextGenerationRequest) -> Result<TextGenerationResponse> {
        let model_id = request
            .model_id
            .clone()
            .unwrap_or_else(|| self.default_model_id.clone());
        let provider = ModelProvider::from_model_id(&model_id).ok_or_else(|| {
            TuneGenError::RequestError(format!("Unsupported model ID: {}", model_id))
        })?;

        let (request_payload, sent_text) = build_request_payload(provider, &request);
        let request_json = serde_json::to_string(&request_payload)?;

        log::info!("Invoking model: {}", model_id);
        log::debug!("Text generation request payload: {}", request_json);

        let response = self
            .client
            .invoke_model()
            .model_id(&model_id)
            .content_type("application/json")
            .accept("application/json")
            .body(Blob::new(request_json.into_bytes()))
            .send()
            .await
            .map_err(|e| {
                log::error!("AWS SDK Text Generation Error details: {:?}", e);

                if let Some(service_error) = e.as_service_error() {
                    TuneGenError::AwsServiceError(format!(
                        "Bedrock service error: {} - {}",
                        service_error.code().unwrap_or("unknown"),
                        service_error.message().unwrap_or("no message")
                    ))
                } else {
                    TuneGenError::AwsError(format!("AWS SDK error: {}", e))
                }
            })?;

        let mut parsed = parse_response(provider, &model_id, &response.body.into_inner())?;
        parsed.text = strip_prompt_echo(&parsed.text, &[&sent_text, &request.prompt]);
        Ok(parsed)
    }
}

#[async_trait]
impl TextGenerator for TextClient {
    async fn complete(&self, prompt: &str) -> Result<String> {
        let request = TextGenerationRequest {
            prompt: prompt.to_string(),
            max_tokens: Some(MAX_NEW_TOKENS),
            temperature: Some(0.0),
            model_id: None,
        };

        let response = self.generate(request).await?;
        if let Some(reason) = &response.finish_reason {
            log::debug!("🏁 Finish reason: {}", reason);
        }
        Ok(response.text)
    }
}

/// Wraps the prompt as a single user turn in the provider's chat format.
///
/// Returns the payload and the exact prompt text the model will see.
fn build_request_payload(
    provider: ModelProvider,
    request: &TextGenerationRequest,
) -> (serde_json::Value, String) {
    let max_tokens = request.max_tokens.unwrap_or(MAX_NEW_TOKENS);
    let temperature = request.temperature.unwrap_or(0.0);

    match provider {
        ModelProvider::Amazon => {
            let text = format!("User: {}\nBot:", request.prompt);
            let payload = json!({
                "inputText": text,
                "textGenerationConfig": {
                    "maxTokenCount": max_tokens,
                    "temperature": temperature,
                    "topP": 1.0
                }
            });
            (payload, text)
        }
        ModelProvider::Anthropic => {
            let payload = json!({
                "messages": [
                    {
                        "role": "user",
                        "content": request.prompt
                    }
                ],
                "max_tokens": max_tokens,
                "temperature": temperature,
                "anthropic_version": "bedrock-2023-05-31"
            });
            (payload, request.prompt.clone())
        }
        ModelProvider::Meta => {
            let text = format!(
                "<|begin_of_text|><|start_header_id|>user<|end_header_id|>\n\n{}<|eot_id|><|start_header_id|>assistant<|end_header_id|>\n\n",
                request.prompt
            );
            let payload = json!({
                "prompt": text,
                "max_gen_len": max_tokens,
                "temperature": temperature,
                "top_p": 1.0
            });
            (payload, text)
        }
        ModelProvider::Mistral => {
            let text = format!("<s>[INST] {} [/INST]", request.prompt);
            let payload = json!({
                "prompt": text,
                "max_tokens": max_tokens,
                "temperature": temperature,
                "top_p": 1.0
            });
            (payload, text)
        }
    }
}

fn parse_response(
    provider: ModelProvider,
    model_id: &str,
    body: &[u8],
) -> Result<TextGenerationResponse> {
    let response_error = |e: serde_json::Error| TuneGenError::ResponseError(e.to_string());

    let response = match provider {
        ModelProvider::Amazon => {
            let titan: TitanTextResponse = serde_json::from_slice(body).map_err(response_error)?;
            let result = titan
                .results
                .into_iter()
                .next()
                .ok_or_else(|| TuneGenError::ResponseError("No text results returned".into()))?;
            TextGenerationResponse {
                text: result.output_text,
                model: model_id.to_string(),
                tokens_generated: result.token_count,
                tokens_prompt: titan.input_text_token_count,
                finish_reason: result.completion_reason,
            }
        }
        ModelProvider::Anthropic => {
            let anthropic: AnthropicResponse =
                serde_json::from_slice(body).map_err(response_error)?;
            let text = anthropic
                .content
                .iter()
                .filter(|block| block.kind == "text")
                .map(|block| block.text.as_str())
                .collect::<Vec<_>>()
                .join("");
            TextGenerationResponse {
                text,
                model: model_id.to_string(),
                tokens_generated: anthropic.usage.as_ref().and_then(|u| u.output_tokens),
                tokens_prompt: anthropic.usage.as_ref().and_then(|u| u.input_tokens),
                finish_reason: anthropic.stop_reason,
            }
        }
        ModelProvider::Meta => {
            let llama: LlamaResponse = serde_json::from_slice(body).map_err(response_error)?;
            TextGenerationResponse {
                text: llama.generation,
                model: model_id.to_string(),
                tokens_generated: llama.generation_token_count,
                tokens_prompt: llama.prompt_token_count,
                finish_reason: llama.stop_reason,
            }
        }
        ModelProvider::Mistral => {
            let mistral: MistralResponse = serde_json::from_slice(body).map_err(response_error)?;
            let output = mistral
                .outputs
                .into_iter()
                .next()
                .ok_or_else(|| TuneGenError::ResponseError("No text outputs returned".into()))?;
            TextGenerationResponse {
                text: output.text,
                model: model_id.to_string(),
                tokens_generated: None,
                tokens_prompt: None,
                finish_reason: output.stop_reason,
            }
        }
    };

    Ok(response)
}

/// Drops a leading copy of the input some models repeat before their answer.
fn strip_prompt_echo(output: &str, sent: &[&str]) -> String {
    let stripped = sent
        .iter()
        .filter(|s| !s.is_empty())
        .find_map(|s| output.strip_prefix(*s))
        .unwrap_or(output);
    stripped.trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(prompt: &str) -> TextGenerationRequest {
        TextGenerationRequest {
            prompt: prompt.to_string(),
            max_tokens: None,
            temperature: None,
            model_id: None,
        }
    }

    #[test]
    fn test_llama_payload_is_greedy_single_turn() {
        let (payload, sent) = build_request_payload(ModelProvider::Meta, &request("hi"));

        assert_eq!(payload["max_gen_len"], 512);
        assert_eq!(payload["temperature"], 0.0);
        assert_eq!(payload["prompt"], sent.as_str());
        assert!(sent.contains("<|start_header_id|>user<|end_header_id|>\n\nhi<|eot_id|>"));
        assert!(sent.ends_with("assistant<|end_header_id|>\n\n"));
    }

    #[test]
    fn test_anthropic_payload_uses_messages() {
        let (payload, sent) = build_request_payload(ModelProvider::Anthropic, &request("hi"));

        assert_eq!(payload["messages"][0]["role"], "user");
        assert_eq!(payload["messages"][0]["content"], "hi");
        assert_eq!(payload["max_tokens"], 512);
        assert_eq!(sent, "hi");
    }

    #[test]
    fn test_titan_and_mistral_payloads() {
        let (titan, _) = build_request_payload(ModelProvider::Amazon, &request("hi"));
        assert_eq!(titan["inputText"], "User: hi\nBot:");
        assert_eq!(titan["textGenerationConfig"]["maxTokenCount"], 512);

        let (mistral, _) = build_request_payload(ModelProvider::Mistral, &request("hi"));
        assert_eq!(mistral["prompt"], "<s>[INST] hi [/INST]");
    }

    #[test]
    fn test_parse_llama_response() {
        let body = br#"{"generation": "  pop, upbeat, 120 BPM\n", "prompt_token_count": 40,
                        "generation_token_count": 9, "stop_reason": "stop"}"#;
        let parsed = parse_response(ModelProvider::Meta, "meta.llama3-8b-instruct-v1:0", body)
            .unwrap();

        assert_eq!(parsed.text, "  pop, upbeat, 120 BPM\n");
        assert_eq!(parsed.tokens_generated, Some(9));
        assert_eq!(parsed.tokens_prompt, Some(40));
        assert_eq!(parsed.finish_reason.as_deref(), Some("stop"));
    }

    #[test]
    fn test_parse_anthropic_and_titan_responses() {
        let body = br#"{"content": [{"type": "text", "text": "Pop, Sad"}],
                        "stop_reason": "end_turn",
                        "usage": {"input_tokens": 12, "output_tokens": 3}}"#;
        let parsed = parse_response(ModelProvider::Anthropic, "anthropic.claude", body).unwrap();
        assert_eq!(parsed.text, "Pop, Sad");
        assert_eq!(parsed.tokens_generated, Some(3));

        let body = br#"{"inputTextTokenCount": 5,
                        "results": [{"tokenCount": 2, "outputText": "Rock", "completionReason": "FINISH"}]}"#;
        let parsed = parse_response(ModelProvider::Amazon, "amazon.titan-text-express-v1", body)
            .unwrap();
        assert_eq!(parsed.text, "Rock");
        assert_eq!(parsed.finish_reason.as_deref(), Some("FINISH"));
    }

    #[test]
    fn test_parse_rejects_empty_results() {
        let err = parse_response(ModelProvider::Mistral, "mistral.x", br#"{"outputs": []}"#)
            .unwrap_err();
        assert!(matches!(err, TuneGenError::ResponseError(_)));

        let err = parse_response(ModelProvider::Meta, "meta.llama", b"not json").unwrap_err();
        assert!(matches!(err, TuneGenError::ResponseError(_)));
    }

    #[test]
    fn test_strip_prompt_echo() {
        let sent = "<s>[INST] write tags [/INST]";
        assert_eq!(
            strip_prompt_echo("<s>[INST] write tags [/INST] lofi, chill", &[sent, "write tags"]),
            "lofi, chill"
        );
        assert_eq!(
            strip_prompt_echo("write tags\nlofi", &[sent, "write tags"]),
            "lofi"
        );
        assert_eq!(strip_prompt_echo(" lofi, chill ", &[sent, ""]), "lofi, chill");
    }
}

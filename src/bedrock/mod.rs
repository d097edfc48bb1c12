pub mod image_client;
pub mod text_client;

use crate::config::{AwsConfig, BedrockConfig};
use aws_config::SdkConfig;
use aws_sdk_bedrockruntime::Client;

pub use image_client::ImageClient;
pub use text_client::TextClient;

/// Builds the shared AWS configuration, preferring explicit credentials over the default chain.
pub async fn load_sdk_config(aws: &AwsConfig) -> SdkConfig {
    let region = aws.region.clone().unwrap_or_else(|| "us-east-1".to_string());

    if let (Some(access_key), Some(secret_key)) = (&aws.access_key, &aws.secret_key) {
        aws_config::from_env()
            .credentials_provider(aws_sdk_bedrockruntime::config::Credentials::new(
                access_key,
                secret_key,
                None,
                None,
                "tunegen",
            ))
            .region(aws_sdk_bedrockruntime::config::Region::new(region))
            .load()
            .await
    } else {
        aws_config::from_env()
            .region(aws_sdk_bedrockruntime::config::Region::new(region))
            .load()
            .await
    }
}

#[derive(Clone)]
pub struct BedrockClient {
    text_client: TextClient,
    image_client: ImageClient,
}

impl BedrockClient {
    pub fn new(sdk_config: &SdkConfig, bedrock_config: &BedrockConfig) -> Self {
        let client = Client::new(sdk_config);

        Self {
            text_client: TextClient::new(client.clone(), &bedrock_config.text_model_id),
            image_client: ImageClient::new(client, &bedrock_config.image_model_id),
        }
    }

    pub fn text(&self) -> &TextClient {
        &self.text_client
    }

    pub fn image(&self) -> &ImageClient {
        &self.image_client
    }
}

use crate::error::{Result, TuneGenError};
use std::env;
use std::path::PathBuf;

pub const DEFAULT_TEXT_MODEL_ID: &str = "meta.llama3-8b-instruct-v1:0";
pub const DEFAULT_IMAGE_MODEL_ID: &str = "stability.stable-diffusion-xl-v1";
pub const DEFAULT_SCRATCH_DIR: &str = "/tmp/outputs";

#[derive(Debug, Clone)]
pub struct AwsConfig {
    pub region: Option<String>,
    pub access_key: Option<String>,
    pub secret_key: Option<String>,
}

#[derive(Debug, Clone)]
pub struct BedrockConfig {
    pub text_model_id: String,
    pub image_model_id: String,
}

#[derive(Debug, Clone)]
pub struct StorageConfig {
    pub bucket_name: Option<String>,
}

#[derive(Debug, Clone)]
pub struct MusicServiceConfig {
    pub base_url: Option<String>,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub host: Option<String>,
    pub port: Option<u16>,
    pub workers: usize,
    pub scratch_dir: PathBuf,
    pub aws: AwsConfig,
    pub bedrock: BedrockConfig,
    pub storage: StorageConfig,
    pub music: MusicServiceConfig,
}

impl Default for AwsConfig {
    fn default() -> Self {
        AwsConfig {
            region: None,
            access_key: None,
            secret_key: None,
        }
    }
}

impl AwsConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_env() -> Self {
        let region = env::var("AWS_REGION")
            .or_else(|_| env::var("AWS_DEFAULT_REGION"))
            .ok();
        let access_key = env::var("AWS_ACCESS_KEY_ID").ok();
        let secret_key = env::var("AWS_SECRET_ACCESS_KEY").ok();

        AwsConfig {
            region,
            access_key,
            secret_key,
        }
    }

    pub fn with_region(mut self, region: impl Into<String>) -> Self {
        self.region = Some(region.into());
        self
    }

    pub fn with_credentials(
        mut self,
        access_key: impl Into<String>,
        secret_key: impl Into<String>,
    ) -> Self {
        self.access_key = Some(access_key.into());
        self.secret_key = Some(secret_key.into());
        self
    }
}

impl Default for BedrockConfig {
    fn default() -> Self {
        BedrockConfig {
            text_model_id: DEFAULT_TEXT_MODEL_ID.to_string(),
            image_model_id: DEFAULT_IMAGE_MODEL_ID.to_string(),
        }
    }
}

impl BedrockConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_env() -> Self {
        let defaults = Self::default();
        BedrockConfig {
            text_model_id: env::var("TEXT_MODEL_ID").unwrap_or(defaults.text_model_id),
            image_model_id: env::var("IMAGE_MODEL_ID").unwrap_or(defaults.image_model_id),
        }
    }

    pub fn with_text_model(mut self, model_id: impl Into<String>) -> Self {
        self.text_model_id = model_id.into();
        self
    }

    pub fn with_image_model(mut self, model_id: impl Into<String>) -> Self {
        self.image_model_id = model_id.into();
        self
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        StorageConfig { bucket_name: None }
    }
}

impl StorageConfig {
    pub fn from_env() -> Self {
        StorageConfig {
            bucket_name: env::var("S3_BUCKET_NAME").ok(),
        }
    }
}

impl Default for MusicServiceConfig {
    fn default() -> Self {
        MusicServiceConfig { base_url: None }
    }
}

impl MusicServiceConfig {
    pub fn from_env() -> Self {
        MusicServiceConfig {
            base_url: env::var("MUSIC_SERVICE_URL").ok(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Config {
            host: None,
            port: None,
            workers: 1,
            scratch_dir: PathBuf::from(DEFAULT_SCRATCH_DIR),
            aws: AwsConfig::default(),
            bedrock: BedrockConfig::default(),
            storage: StorageConfig::default(),
            music: MusicServiceConfig::default(),
        }
    }
}

impl Config {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_env() -> Self {
        let host = env::var("HOST").ok();
        let port = env::var("PORT").ok().and_then(|port| port.parse().ok());
        let workers = env::var("WORKERS")
            .ok()
            .and_then(|w| w.parse().ok())
            .filter(|w: &usize| *w > 0)
            .unwrap_or(1);
        let scratch_dir = env::var("SCRATCH_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from(DEFAULT_SCRATCH_DIR));

        Config {
            host,
            port,
            workers,
            scratch_dir,
            aws: AwsConfig::from_env(),
            bedrock: BedrockConfig::from_env(),
            storage: StorageConfig::from_env(),
            music: MusicServiceConfig::from_env(),
        }
    }

    pub fn with_port(mut self, port: u16) -> Self {
        self.port = Some(port);
        self
    }

    pub fn with_scratch_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.scratch_dir = dir.into();
        self
    }

    pub fn with_aws(mut self, config: AwsConfig) -> Self {
        self.aws = config;
        self
    }

    pub fn with_bedrock(mut self, config: BedrockConfig) -> Self {
        self.bedrock = config;
        self
    }

    pub fn with_bucket(mut self, bucket_name: impl Into<String>) -> Self {
        self.storage.bucket_name = Some(bucket_name.into());
        self
    }

    pub fn with_music_service(mut self, base_url: impl Into<String>) -> Self {
        self.music.base_url = Some(base_url.into());
        self
    }

    pub fn bind_address(&self) -> (String, u16) {
        (
            self.host.clone().unwrap_or_else(|| "0.0.0.0".to_string()),
            self.port.unwrap_or(8080),
        )
    }

    /// Checks the settings a worker cannot start without.
    pub fn validate(&self) -> Result<()> {
        match &self.storage.bucket_name {
            Some(bucket) if !bucket.trim().is_empty() => {}
            _ => {
                return Err(TuneGenError::ConfigError(
                    "S3_BUCKET_NAME is required".into(),
                ))
            }
        }
        match &self.music.base_url {
            Some(url) if !url.trim().is_empty() => {}
            _ => {
                return Err(TuneGenError::ConfigError(
                    "MUSIC_SERVICE_URL is required".into(),
                ))
            }
        }
        if self.workers == 0 {
            return Err(TuneGenError::ConfigError(
                "at least one worker is required".into(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::new();
        assert_eq!(config.workers, 1);
        assert_eq!(config.scratch_dir, PathBuf::from("/tmp/outputs"));
        assert_eq!(config.bedrock.text_model_id, DEFAULT_TEXT_MODEL_ID);
        assert_eq!(config.bind_address(), ("0.0.0.0".to_string(), 8080));
    }

    #[test]
    fn test_validate_requires_bucket_and_music_service() {
        let config = Config::new();
        assert!(matches!(
            config.validate(),
            Err(TuneGenError::ConfigError(_))
        ));

        let config = Config::new().with_bucket("songs");
        assert!(config.validate().is_err());

        let config = Config::new()
            .with_bucket("songs")
            .with_music_service("http://localhost:8000");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_builders() {
        let config = Config::new()
            .with_port(9000)
            .with_scratch_dir("/var/tmp/tunegen")
            .with_aws(AwsConfig::new().with_region("eu-west-1"))
            .with_bedrock(BedrockConfig::new().with_text_model("mistral.mistral-7b-instruct-v0:2"));

        assert_eq!(config.port, Some(9000));
        assert_eq!(config.scratch_dir, PathBuf::from("/var/tmp/tunegen"));
        assert_eq!(config.aws.region.as_deref(), Some("eu-west-1"));
        assert_eq!(
            config.bedrock.text_model_id,
            "mistral.mistral-7b-instruct-v0:2"
        );
        assert_eq!(config.bedrock.image_model_id, DEFAULT_IMAGE_MODEL_ID);
    }
}

//! Song generation service: expands a description into tags and lyrics with a
//! text model, renders the track and a cover thumbnail, and publishes both to S3.

pub mod bedrock;
pub mod config;
pub mod error;
pub mod generation;
pub mod logger;
pub mod models;
pub mod music;
pub mod server;
pub mod storage;

pub use bedrock::{BedrockClient, ImageClient, TextClient};
pub use config::Config;
pub use error::{Result, TuneGenError};
pub use generation::{RequestOrchestrator, WorkerContext};
pub use models::{GeneratedArtifactSet, GenerationParams, GenerationRequest};
pub use music::AceStepClient;
pub use storage::{ObjectStore, S3ObjectStore};

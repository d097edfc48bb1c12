use crate::{
    config::Config,
    error::TuneGenError,
    generation::RequestOrchestrator,
    models::{
        ErrorResponse, GenerateFromDescriptionRequest, GenerateWithCustomLyricsRequest,
        GenerateWithDescribedLyricsRequest, HealthResponse,
    },
};
use actix_web::{http::StatusCode, web, App, HttpResponse, HttpServer, ResponseError};

impl ResponseError for TuneGenError {
    fn status_code(&self) -> StatusCode {
        match self {
            TuneGenError::ValidationError(_) => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(ErrorResponse {
            error: self.to_string(),
        })
    }
}

type Orchestrator = web::Data<RequestOrchestrator>;

/// Renders the built-in sample track; nothing is uploaded.
async fn generate_sample(orchestrator: Orchestrator) -> Result<HttpResponse, TuneGenError> {
    log::info!("🎵 Sample generation requested");
    let response = orchestrator.generate_sample().await?;
    Ok(HttpResponse::Ok().json(response))
}

async fn generate_from_description(
    orchestrator: Orchestrator,
    body: web::Json<GenerateFromDescriptionRequest>,
) -> Result<HttpResponse, TuneGenError> {
    log::info!("🎵 Generation from description requested");
    let artifacts = orchestrator.generate_from_description(&body).await?;
    Ok(HttpResponse::Ok().json(artifacts))
}

async fn generate_with_lyrics(
    orchestrator: Orchestrator,
    body: web::Json<GenerateWithCustomLyricsRequest>,
) -> Result<HttpResponse, TuneGenError> {
    log::info!("🎵 Generation with custom lyrics requested");
    let artifacts = orchestrator.generate_with_custom_lyrics(&body).await?;
    Ok(HttpResponse::Ok().json(artifacts))
}

async fn generate_with_described_lyrics(
    orchestrator: Orchestrator,
    body: web::Json<GenerateWithDescribedLyricsRequest>,
) -> Result<HttpResponse, TuneGenError> {
    log::info!("🎵 Generation with described lyrics requested");
    let artifacts = orchestrator.generate_with_described_lyrics(&body).await?;
    Ok(HttpResponse::Ok().json(artifacts))
}

async fn health() -> HttpResponse {
    HttpResponse::Ok().json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// Malformed JSON bodies get the same `{error}` shape as validation failures.
fn json_config() -> web::JsonConfig {
    web::JsonConfig::default().error_handler(|err, _req| {
        let message = err.to_string();
        actix_web::error::InternalError::from_response(
            err,
            HttpResponse::BadRequest().json(ErrorResponse {
                error: format!("Validation error: {}", message),
            }),
        )
        .into()
    })
}

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.app_data(json_config())
        .route("/generate", web::post().to(generate_sample))
        .route(
            "/generate_from_description",
            web::post().to(generate_from_description),
        )
        .route("/generate_with_lyrics", web::post().to(generate_with_lyrics))
        .route(
            "/generate_with_described_lyrics",
            web::post().to(generate_with_described_lyrics),
        )
        .route("/health", web::get().to(health));
}

/// Serves the generation endpoints until the process is stopped.
pub async fn run(config: &Config, orchestrator: RequestOrchestrator) -> std::io::Result<()> {
    let orchestrator = web::Data::new(orchestrator);
    let (host, port) = config.bind_address();

    HttpServer::new(move || {
        App::new()
            .app_data(orchestrator.clone())
            .configure(configure)
    })
    .workers(config.workers)
    .bind((host.as_str(), port))?
    .run()
    .await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generation::testing::*;
    use crate::generation::{ScratchDir, WorkerContext};
    use crate::models::{GeneratedArtifactSet, SampleAudioResponse};
    use crate::storage::MemoryObjectStore;
    use actix_web::test;
    use base64::{engine::general_purpose::STANDARD, Engine as _};
    use serde_json::json;
    use std::sync::Arc;

    fn orchestrator(scratch: &tempfile::TempDir, store: Arc<MemoryObjectStore>) -> Orchestrator {
        web::Data::new(RequestOrchestrator::new(WorkerContext {
            text: Arc::new(ScriptedTextGenerator::new("Pop, Summer")),
            music: Arc::new(RecordingMusicSynthesizer::default()),
            image: Arc::new(RecordingImageSynthesizer::default()),
            store,
            scratch: ScratchDir::new(scratch.path()),
        }))
    }

    #[actix_web::test]
    async fn test_generate_from_description() {
        let scratch = tempfile::tempdir().unwrap();
        let store = Arc::new(MemoryObjectStore::new("songs"));
        let app = test::init_service(
            App::new()
                .app_data(orchestrator(&scratch, store.clone()))
                .configure(configure),
        )
        .await;

        let req = test::TestRequest::post()
            .uri("/generate_from_description")
            .set_json(json!({ "full_described_song": "upbeat summer pop song" }))
            .to_request();
        let body: GeneratedArtifactSet = test::call_and_read_body_json(&app, req).await;

        assert!(body.s3_key.ends_with(".wav"));
        assert!(body.cover_image_s3_key.ends_with(".png"));
        assert_eq!(body.categories, vec!["Pop", "Summer"]);
        assert_eq!(store.keys().len(), 2);
    }

    #[actix_web::test]
    async fn test_generate_with_lyrics_and_described_lyrics() {
        let scratch = tempfile::tempdir().unwrap();
        let store = Arc::new(MemoryObjectStore::new("songs"));
        let app = test::init_service(
            App::new()
                .app_data(orchestrator(&scratch, store.clone()))
                .configure(configure),
        )
        .await;

        let req = test::TestRequest::post()
            .uri("/generate_with_lyrics")
            .set_json(json!({ "prompt": "lofi, chill", "lyrics": "[verse]\nrain", "seed": 3 }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);

        let req = test::TestRequest::post()
            .uri("/generate_with_described_lyrics")
            .set_json(json!({ "prompt": "sad, 100bpm", "described_lyrics": "a dying flower" }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);

        assert_eq!(store.keys().len(), 4);
    }

    #[actix_web::test]
    async fn test_validation_error_is_bad_request() {
        let scratch = tempfile::tempdir().unwrap();
        let store = Arc::new(MemoryObjectStore::new("songs"));
        let app = test::init_service(
            App::new()
                .app_data(orchestrator(&scratch, store.clone()))
                .configure(configure),
        )
        .await;

        let req = test::TestRequest::post()
            .uri("/generate_from_description")
            .set_json(json!({ "full_described_song": "" }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let body: serde_json::Value = test::read_body_json(resp).await;
        assert!(body["error"].as_str().unwrap().contains("full_described_song"));

        let req = test::TestRequest::post()
            .uri("/generate_with_described_lyrics")
            .set_json(json!({ "prompt": "sad" }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

        assert!(store.keys().is_empty());
    }

    #[actix_web::test]
    async fn test_sample_and_health() {
        let scratch = tempfile::tempdir().unwrap();
        let store = Arc::new(MemoryObjectStore::new("songs"));
        let app = test::init_service(
            App::new()
                .app_data(orchestrator(&scratch, store.clone()))
                .configure(configure),
        )
        .await;

        let req = test::TestRequest::post().uri("/generate").to_request();
        let body: SampleAudioResponse = test::call_and_read_body_json(&app, req).await;
        assert_eq!(STANDARD.decode(body.audio_data).unwrap(), FAKE_WAV);
        assert!(store.keys().is_empty());

        let req = test::TestRequest::get().uri("/health").to_request();
        let body: HealthResponse = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body.status, "ok");
    }

    #[actix_web::test]
    async fn test_error_status_codes() {
        assert_eq!(
            TuneGenError::ValidationError("x".into()).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            TuneGenError::SynthesisError("x".into()).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            TuneGenError::StorageError("x".into()).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}

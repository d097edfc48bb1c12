use tunegen::{Config, RequestOrchestrator, WorkerContext};

#[actix_web::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load .env file first
    let dotenv_loaded = dotenv::dotenv().is_ok();

    tunegen::logger::init()?;

    if dotenv_loaded {
        log::info!("✅ .env file loaded successfully");
    } else {
        log::warn!("⚠️  No .env file found, using system environment variables");
    }

    let config = Config::from_env();
    tunegen::logger::log_config_info(&config);

    log::info!("🔄 Connecting model and storage clients...");
    let context = match WorkerContext::from_config(&config).await {
        Ok(context) => {
            log::info!("✅ Worker context initialized");
            context
        }
        Err(e) => {
            log::error!("❌ Failed to initialize worker context: {}", e);
            return Err(e.into());
        }
    };

    let (host, port) = config.bind_address();
    tunegen::logger::log_startup_info("tunegen", env!("CARGO_PKG_VERSION"), &host, port);

    tunegen::server::run(&config, RequestOrchestrator::new(context)).await?;

    log::info!("👋 Server stopped");
    Ok(())
}

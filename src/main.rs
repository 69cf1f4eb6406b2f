use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use tts_gateway::controllers::tts::TtsController;
use tts_gateway::domain::tts::TtsService;
use tts_gateway::infrastructure::config::{Config, LogFormat};
use tts_gateway::infrastructure::http::{build_router, start_http_server};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load configuration
    let config = Config::from_env()?;

    // Initialize logging
    init_logging(&config);

    tracing::info!(
        environment = ?config.environment,
        "Starting TTS gateway on {}:{}",
        config.host,
        config.port
    );

    if config.is_development() {
        tracing::debug!(
            google_tts_url = %config.providers.google_tts_url,
            openai_api_base = %config.providers.openai_api_base,
            "Provider endpoints"
        );
    }

    if config.providers.openai_api_key.is_none() {
        tracing::warn!("OPENAI_API_KEY not set, the openai provider will report not configured");
    }

    // === DEPENDENCY INJECTION SETUP ===
    // 1. Instantiate the facade (repositories and credential manager are wired inside)
    tracing::info!("Instantiating TTS service...");
    let tts_service = Arc::new(TtsService::from_config(&config.providers)?);

    // 2. Instantiate controllers (inject services)
    tracing::info!("Instantiating controllers...");
    let tts_controller = Arc::new(TtsController::new(tts_service.clone()));

    // Start HTTP server with all routes
    let app = build_router(tts_controller, tts_service);
    start_http_server(&config, app).await?;

    Ok(())
}

fn init_logging(config: &Config) {
    if config.log_format == LogFormat::Json {
        tracing_subscriber::registry()
            .with(
                tracing_subscriber::EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| "tts_gateway=debug,tower_http=debug".into()),
            )
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(
                tracing_subscriber::EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| "tts_gateway=debug,tower_http=debug".into()),
            )
            .with(tracing_subscriber::fmt::layer().pretty())
            .init();
    }
}

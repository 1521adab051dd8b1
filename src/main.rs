use actix_cors::Cors;
use actix_web::{middleware, web, App, HttpServer};
use face_match::config::{LoggingSettings, Settings};
use face_match::core::FaceMatcher;
use face_match::routes::{self, AppState};
use face_match::services::remote::lazy_remote_extractor;
use std::sync::Arc;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

fn init_logging(settings: &LoggingSettings) {
    // LOG_LEVEL / LOG_FORMAT win over the config file
    let log_level = std::env::var("LOG_LEVEL").unwrap_or_else(|_| settings.level.clone());
    let log_format = std::env::var("LOG_FORMAT").unwrap_or_else(|_| settings.format.clone());

    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(log_level))
        .with_target(false)
        .with_level(true);

    if log_format == "pretty" {
        subscriber.pretty().init();
    } else {
        subscriber.json().init();
    }
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // Load .env file if present
    dotenv::dotenv().ok();

    let loaded = Settings::load();
    let logging = loaded
        .as_ref()
        .map(|s| s.logging.clone())
        .unwrap_or_default();
    init_logging(&logging);

    info!("Starting face matching service...");

    let settings = match loaded {
        Ok(settings) => settings,
        Err(e) => {
            error!("Failed to load configuration: {}", e);
            return Err(std::io::Error::new(
                std::io::ErrorKind::InvalidInput,
                format!("Configuration error: {}", e),
            ));
        }
    };

    info!("Configuration loaded successfully");

    // The extractor is connected on the first match request, not here
    match settings.extractor.endpoint() {
        Some(endpoint) => info!("Embedding extractor endpoint: {}", endpoint),
        None => warn!("No embedding extractor configured, match requests will return 503"),
    }
    let extractor = Arc::new(lazy_remote_extractor(&settings.extractor));

    let thresholds = settings.matching.thresholds();
    let matcher = FaceMatcher::new(extractor, thresholds);

    info!("Matcher initialized with thresholds: {:?}", thresholds);

    let app_state = AppState { matcher };

    // Configure HTTP server
    let host = settings.server.host.clone();
    let port = settings.server.port;
    let workers = settings.server.workers.unwrap_or(4);
    let json_limit = settings.server.json_limit_bytes;

    info!("Starting HTTP server on {}:{}", host, port);

    HttpServer::new(move || {
        let cors = Cors::permissive();

        App::new()
            .app_data(web::Data::new(app_state.clone()))
            .app_data(routes::json_config(json_limit))
            .wrap(cors)
            .wrap(middleware::Logger::default())
            .wrap(middleware::Compress::default())
            .configure(routes::configure_routes)
    })
    .workers(workers)
    .bind((host, port))?
    .run()
    .await
}

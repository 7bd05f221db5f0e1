use actix_cors::Cors;
use actix_web::{middleware, web, App, HttpServer};
use candidate_screener::config::{LoggingSettings, Settings};
use candidate_screener::core::{Screener, Vocabulary};
use candidate_screener::error::SettingsError;
use candidate_screener::models::ProgramCatalog;
use candidate_screener::routes::{self, handle_json_payload_error, handle_query_payload_error, AppState};
use std::sync::Arc;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

/// Initialize logging; LOG_LEVEL / LOG_FORMAT override the config file and
/// RUST_LOG overrides both
fn init_tracing(logging: &LoggingSettings) {
    let log_level = std::env::var("LOG_LEVEL").unwrap_or_else(|_| logging.level.clone());
    let log_format = std::env::var("LOG_FORMAT").unwrap_or_else(|_| logging.format.clone());

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level));

    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_level(true);

    if log_format == "pretty" {
        subscriber.pretty().init();
    } else {
        subscriber.json().init();
    }
}

/// Compile vocabularies and programs; any misconfiguration stops start-up
fn build_state(settings: &Settings) -> Result<AppState, SettingsError> {
    settings.scoring.validate()?;

    let vocabulary = Arc::new(Vocabulary::from_settings(&settings.vocabulary)?);
    info!("Vocabulary compiled ({} skills)", vocabulary.skill_names().len());

    let programs = settings.all_programs()?;
    let catalog = ProgramCatalog::from_configs(&programs, &vocabulary)?;
    if catalog.is_empty() {
        warn!("No programs configured; every scoring request will return 404");
    } else {
        info!("Loaded {} programs: {}", catalog.len(), catalog.ids().join(", "));
    }

    let screener = Screener::from_settings(vocabulary, &settings.scoring, &settings.extraction);
    match screener.pinned_as_of() {
        Some(date) => info!(
            "Screener initialized (as of {}, scoring {:?})",
            date, settings.scoring
        ),
        None => info!(
            "Screener initialized (as of the current date, scoring {:?})",
            settings.scoring
        ),
    }

    Ok(AppState {
        screener: Arc::new(screener),
        catalog: Arc::new(catalog),
        batch: settings.batch.clone(),
    })
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // Load .env file if present
    dotenv::dotenv().ok();

    let settings = Settings::load();
    let logging = settings
        .as_ref()
        .map(|s| s.logging.clone())
        .unwrap_or_default();
    init_tracing(&logging);

    info!("Starting candidate screening service...");

    let settings = match settings {
        Ok(settings) => settings,
        Err(e) => {
            error!("Failed to load configuration: {}", e);
            std::process::exit(1);
        }
    };

    let app_state = match build_state(&settings) {
        Ok(state) => state,
        Err(e) => {
            error!("Configuration error: {}", e);
            std::process::exit(1);
        }
    };

    info!("Configuration loaded successfully");

    // Configure HTTP server
    let host = settings.server.host.clone();
    let port = settings.server.port;
    let workers = settings.server.workers.unwrap_or(4);
    let payload_limit = settings.server.max_payload_bytes;

    info!("Starting HTTP server on {}:{}", host, port);

    HttpServer::new(move || {
        let cors = Cors::permissive();

        App::new()
            .app_data(web::Data::new(app_state.clone()))
            .app_data(
                web::JsonConfig::default()
                    .limit(payload_limit)
                    .error_handler(handle_json_payload_error),
            )
            .app_data(web::QueryConfig::default().error_handler(handle_query_payload_error))
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

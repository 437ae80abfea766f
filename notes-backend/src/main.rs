use actix_cors::Cors;
use actix_web::{App, HttpServer, middleware::Logger, web};
use dotenv::dotenv;
use std::sync::Arc;

mod config;
mod controllers;
mod notes;

use config::Config;
use notes::NoteStore;

pub struct AppState {
    /// File-per-note store rooted at the configured cache directory
    pub notes: Arc<NoteStore>,
    /// Server start time for uptime calculation
    pub started_at: std::time::Instant,
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenv().ok();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = Config::from_args();
    log::info!("notes-backend v{}", env!("CARGO_PKG_VERSION"));

    let store = match NoteStore::open(&config.cache_dir) {
        Ok(store) => Arc::new(store),
        Err(e) => {
            log::error!(
                "Failed to prepare cache directory {}: {}",
                config.cache_dir.display(),
                e
            );
            std::process::exit(1);
        }
    };
    log::info!("Using cache directory: {}", store.cache_dir().display());

    let started_at = std::time::Instant::now();
    let app_store = Arc::clone(&store);

    let server = HttpServer::new(move || {
        let cors = Cors::default()
            .allow_any_origin()
            .allow_any_method()
            .allow_any_header()
            .max_age(3600);

        App::new()
            .app_data(web::Data::new(AppState {
                notes: Arc::clone(&app_store),
                started_at,
            }))
            .wrap(Logger::default())
            .wrap(cors)
            .configure(controllers::health::config_routes)
            .configure(controllers::notes::config)
            .configure(controllers::upload_form::config)
            .configure(controllers::api_docs::config)
    })
    .bind((config.host.as_str(), config.port))?
    .run();

    log::info!("Server running at {}", config.server_url());

    // Get server handle for graceful shutdown
    let server_handle = server.handle();

    tokio::spawn(async move {
        if let Err(e) = tokio::signal::ctrl_c().await {
            log::error!("Failed to listen for Ctrl+C: {}", e);
            return;
        }
        log::info!("Received Ctrl+C, shutting down...");

        let server_stop = server_handle.stop(true);
        if tokio::time::timeout(std::time::Duration::from_secs(5), server_stop)
            .await
            .is_err()
        {
            log::warn!("Timeout waiting for HTTP server to stop, forcing exit...");
        }

        log::info!("Shutdown complete");
    });

    server.await
}

//! Captura API server binary.
//!
//! Connects to PostgreSQL, applies migrations, and serves the REST API.

use std::sync::Arc;

use clap::Parser;
use sqlx::postgres::PgPoolOptions;
use tracing::info;

use captura_core::ocr::OcrEngine;
use captura_core::ocr::tesseract::TesseractEngine;

/// CLI arguments for the API server.
#[derive(Parser, Debug)]
#[command(name = "captura_server", about = "Captura API server")]
struct Args {
    /// Address to bind the HTTP listener.
    #[arg(long, env = "BIND_ADDR", default_value = "127.0.0.1:3400")]
    bind_addr: String,

    /// PostgreSQL connection URL.
    #[arg(
        long,
        env = "DATABASE_URL",
        default_value = "postgres://localhost:5432/captura"
    )]
    database_url: String,

    /// Maximum number of database connections in the pool.
    #[arg(long, default_value_t = 5)]
    max_connections: u32,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,captura_api=debug,captura_core=debug".parse().unwrap()),
        )
        .init();

    let args = Args::parse();

    info!(database_url = %args.database_url, bind_addr = %args.bind_addr, "starting captura_server");

    let pool = PgPoolOptions::new()
        .max_connections(args.max_connections)
        .acquire_timeout(std::time::Duration::from_secs(30))
        .connect(&args.database_url)
        .await?;

    info!("running database migrations");
    captura_api::migrate(&pool).await?;

    let mut config = captura_api::config::ApiConfig::from_env();
    config.bind_addr = args.bind_addr;
    config.database_url = args.database_url;

    info!(
        ocr_command = %config.ocr_command,
        ocr_lang = %config.ocr_lang,
        ocr_timeout_secs = config.ocr_timeout_secs,
        "configuring OCR engine"
    );
    let ocr: Arc<dyn OcrEngine> = Arc::new(TesseractEngine::new(config.ocr_command.clone()));

    let state = captura_api::AppState {
        pool,
        config: config.clone(),
        ocr,
    };
    let app = captura_api::router(state);

    let listener = tokio::net::TcpListener::bind(&config.bind_addr).await?;
    info!(addr = %listener.local_addr()?, "REST API listening");

    axum::serve(listener, app).await?;

    Ok(())
}

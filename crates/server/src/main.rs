use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use sha2::{Digest, Sha256};
use tokio::signal;
use tokio_util::sync::CancellationToken;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use courier_core::{
    load_config, validate_config, CommandTranscoder, FsRelocator, IngestPipeline, ObjectStore,
    PipelineConfig, PipelineScheduler, ProcessingJournal, Relocator, S3ObjectStore, SqliteJournal,
    Transcoder, UploadPolicy, Uploader,
};

use courier_server::api::create_router;
use courier_server::state::AppState;

/// Application version
const VERSION: &str = env!("CARGO_PKG_VERSION");

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        error!("Fatal error: {}", e);
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Determine config path
    let config_path = std::env::var("COURIER_CONFIG")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("config.toml"));

    // Load configuration
    info!("Loading configuration from {:?}", config_path);
    let config = load_config(&config_path)
        .with_context(|| format!("Failed to load config from {:?}", config_path))?;

    // Validate configuration
    validate_config(&config).context("Configuration validation failed")?;

    info!(version = VERSION, "Configuration loaded successfully");
    info!("Recordings path: {:?}", config.recordings.recordings_path);
    info!("Database path: {:?}", config.database.path);

    // Config hash identifies the running configuration without leaking it
    let config_json = serde_json::to_string(&config).unwrap_or_default();
    let config_hash = format!("{:x}", Sha256::digest(config_json.as_bytes()));
    info!(config_hash = &config_hash[..16], "Configuration fingerprint");

    // Create processing journal
    let journal: Arc<dyn ProcessingJournal> = Arc::new(
        SqliteJournal::new(&config.database.path).context("Failed to create journal")?,
    );
    info!("Processing journal initialized");

    // Create object store and uploader
    let store: Arc<dyn ObjectStore> = Arc::new(S3ObjectStore::new(&config.storage).await);
    let uploader = Arc::new(Uploader::new(
        store,
        UploadPolicy::default(),
        &config.storage.endpoint,
        &config.storage.bucket,
    ));
    info!(
        endpoint = %config.storage.endpoint,
        bucket = %config.storage.bucket,
        "Object store initialized"
    );

    // Create transcoder and relocator
    let transcoder: Arc<dyn Transcoder> = Arc::new(CommandTranscoder::new(
        &config.transcoder,
        &config.recordings.output_ext,
    ));
    let relocator: Arc<dyn Relocator> = Arc::new(FsRelocator::new());

    // Create the ingest pipeline
    let pipeline = Arc::new(IngestPipeline::new(
        PipelineConfig::from_config(&config),
        transcoder,
        uploader,
        relocator,
        Arc::clone(&journal),
    ));

    // Start the scheduler if enabled
    let scheduler = if config.scheduler.enabled {
        let scheduler = PipelineScheduler::new(
            Arc::clone(&pipeline),
            Duration::from_secs(config.scheduler.interval_secs),
        );
        scheduler.start();
        info!(
            interval_secs = config.scheduler.interval_secs,
            "Scheduler started"
        );
        Some(scheduler)
    } else {
        info!("Scheduler disabled in config");
        None
    };

    // Manual runs share the scheduler's cancellation token so shutdown
    // stops them too
    let cancel = scheduler
        .as_ref()
        .map(|s| s.cancel_token())
        .unwrap_or_else(CancellationToken::new);

    // Create app state
    let app_state = Arc::new(AppState::new(config.clone(), pipeline, journal, cancel.clone()));

    // Create router
    let app = create_router(app_state);

    // Start server
    let addr = SocketAddr::new(config.server.host, config.server.port);
    info!("Starting server on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind to {}", addr))?;

    // Run server with graceful shutdown
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("Server shutting down...");

    // Stop the scheduler and cancel in-flight batch work
    if let Some(ref scheduler) = scheduler {
        scheduler.stop();
        info!("Scheduler stopped");
    }
    cancel.cancel();

    Ok(())
}

/// Wait for shutdown signal (Ctrl+C or SIGTERM)
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}

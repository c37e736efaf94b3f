use std::net::SocketAddr;
use std::sync::Arc;

use thumbnailer_cloud::S3ObjectStore;
use thumbnailer_pipeline::{
    ImageMagickResampler, MemoryObjectStore, ObjectStore, Pipeline, PipelineConfig,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use thumbnailer_api::config::{ServerConfig, StorageBackend};
use thumbnailer_api::router::build_app_router;
use thumbnailer_api::settings::Settings;
use thumbnailer_api::state::AppState;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    // --- Tracing ---
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            "thumbnailer_api=debug,thumbnailer_pipeline=debug,tower_http=debug".into()
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    // --- Configuration ---
    let config = ServerConfig::from_env();
    tracing::info!(host = %config.host, port = %config.port, "Loaded server configuration");

    let settings = Settings::load(&config.settings_path)
        .unwrap_or_else(|e| panic!("Failed to load settings: {e}"));
    tracing::info!(
        path = %config.settings_path.display(),
        sizes = ?settings.sizes.as_slice(),
        bucket = %settings.storage.bucket,
        region = %settings.storage.region,
        "Loaded settings"
    );

    // --- Object store ---
    let store: Arc<dyn ObjectStore> = match config.storage_backend {
        StorageBackend::S3 => Arc::new(
            S3ObjectStore::connect(&settings.storage, &settings.credentials)
                .await
                .unwrap_or_else(|e| panic!("Failed to configure S3 client: {e}")),
        ),
        StorageBackend::Memory => {
            tracing::warn!("Using in-memory object store; variants are not persisted");
            Arc::new(MemoryObjectStore::new())
        }
    };

    // --- Pipeline ---
    let resampler = Arc::new(ImageMagickResampler::new(&config.convert_bin));
    let pipeline = Pipeline::new(
        PipelineConfig {
            base_dir: config.tmp_dir.clone(),
            sizes: settings.sizes,
            storage: settings.storage,
        },
        resampler,
        store,
    );
    tracing::info!(
        tmp_dir = %config.tmp_dir.display(),
        convert_bin = %config.convert_bin,
        "Pipeline ready"
    );

    // --- App state ---
    let state = AppState {
        pipeline: Arc::new(pipeline),
    };

    let app = build_app_router(state, &config);

    // --- Start server ---
    let addr = SocketAddr::new(
        config.host.parse().expect("Invalid HOST address"),
        config.port,
    );
    tracing::info!(%addr, "Starting server");

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind to address");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("Server error");

    tracing::info!("Graceful shutdown complete");
}

/// Wait for a termination signal to initiate graceful shutdown.
///
/// Handles both SIGINT (Ctrl-C) and SIGTERM (on Unix). In-flight uploads
/// finish and clean their workspaces before the process exits.
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl-C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            tracing::info!("Received SIGINT (Ctrl-C), starting graceful shutdown");
        }
        () = terminate => {
            tracing::info!("Received SIGTERM, starting graceful shutdown");
        }
    }
}

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use tokio_util::sync::CancellationToken;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use ytgrab_api::background;
use ytgrab_api::config::ServerConfig;
use ytgrab_api::router::build_app_router;
use ytgrab_api::state::AppState;
use ytgrab_core::launcher::TokioLauncher;
use ytgrab_core::metadata;
use ytgrab_core::registry::JobRegistry;
use ytgrab_core::supervisor::Supervisor;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    // --- Tracing ---
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "ytgrab_api=debug,ytgrab_core=debug,tower_http=debug".into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // --- Configuration ---
    let config = ServerConfig::from_env();
    tracing::info!(
        host = %config.host,
        port = %config.port,
        ytdlp_bin = %config.ytdlp_bin.display(),
        downloads_dir = %config.downloads_dir.display(),
        max_concurrent_jobs = ?config.max_concurrent_jobs,
        "Loaded server configuration"
    );

    // --- Downloads directory ---
    tokio::fs::create_dir_all(&config.downloads_dir)
        .await
        .expect("Failed to create downloads directory");

    // --- yt-dlp probe (informational only) ---
    match metadata::tool_version(&config.ytdlp_bin).await {
        Ok(version) => tracing::info!(%version, "yt-dlp available"),
        Err(e) => tracing::error!(error = %e, "yt-dlp probe failed"),
    }

    // --- Job supervisor ---
    let registry = Arc::new(JobRegistry::new());
    let supervisor = Arc::new(Supervisor::new(
        Arc::clone(&registry),
        Arc::new(TokioLauncher),
        config.supervisor_config(),
    ));

    // --- Job retention (optional) ---
    let retention_cancel = CancellationToken::new();
    let retention_handle = config.job_retention_secs.map(|secs| {
        tokio::spawn(background::job_retention::run(
            Arc::clone(&registry),
            Duration::from_secs(secs),
            retention_cancel.clone(),
        ))
    });

    // --- App state & router ---
    let state = AppState::new(Arc::new(config.clone()), supervisor);
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

    // --- Post-shutdown cleanup ---
    tracing::info!("Server stopped accepting connections, cleaning up");

    retention_cancel.cancel();
    if let Some(handle) = retention_handle {
        let _ = tokio::time::timeout(Duration::from_secs(5), handle).await;
        tracing::info!("Job retention task stopped");
    }

    let tracked = registry.len().await;
    tracing::info!(tracked, "Graceful shutdown complete; in-memory jobs discarded");
}

/// Wait for a termination signal to initiate graceful shutdown.
///
/// Handles both SIGINT (Ctrl-C) and SIGTERM (on Unix).
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

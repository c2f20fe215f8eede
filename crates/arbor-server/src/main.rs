mod config;

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::{error, info};

use arbor_api::reporter::MailReporter;
use arbor_api::{AppStateInner, router};
use arbor_db::{Posts, RefcodeGate, Store, Users};
use arbor_types::ErrorReporter;

use crate::config::Config;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present
    let _ = dotenvy::dotenv();

    // Init logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "arbor=debug,tower_http=debug".into()),
        )
        .init();

    let config = Config::load()?;

    // Shared state: one store, one reporter, one gate
    let store = Arc::new(Store::open(&config.db_path)?);
    let reporter: Arc<dyn ErrorReporter> = Arc::new(MailReporter::new(config.mail_relay.clone()));
    let state = Arc::new(AppStateInner {
        users: Users::new(store.clone(), reporter.clone(), config.hash_cost),
        posts: Posts::new(store, reporter),
        gate: RefcodeGate::load(&config.refcodes_path),
    });

    let app = router(state)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http());

    let addr: SocketAddr = format!("{}:{}", config.host, config.port).parse()?;
    info!("arbor listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal(config.shutdown_grace))
        .await?;

    info!("Shutdown complete");
    Ok(())
}

/// Resolves on Ctrl+C or SIGTERM, then arms a watchdog: if in-flight
/// connections have not drained within `grace`, the process is forced down.
async fn shutdown_signal(grace: Duration) {
    let ctrl_c = tokio::signal::ctrl_c();
    #[cfg(unix)]
    {
        let mut sigterm =
            tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
                .expect("failed to install SIGTERM handler");
        tokio::select! {
            _ = ctrl_c => info!("Received Ctrl+C, shutting down..."),
            _ = sigterm.recv() => info!("Received SIGTERM, shutting down..."),
        }
    }
    #[cfg(not(unix))]
    {
        ctrl_c.await.ok();
        info!("Received Ctrl+C, shutting down...");
    }

    tokio::spawn(async move {
        tokio::time::sleep(grace).await;
        error!(
            "Could not drain connections within {}s, forcing exit",
            grace.as_secs()
        );
        std::process::exit(1);
    });
}

use std::sync::Arc;

use tokio::sync::watch;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use dsd_api::api::router;
use dsd_api::config::Config;
use dsd_api::db::MySqlCatalog;
use dsd_api::db::pool::{self, Readiness};
use dsd_api::state::AppState;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "dsd_api=debug,tower_http=info".to_string()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::new_from_env()?;
    let pool = pool::create_pool(&config.database_url, &config.pool)?;

    let (status_tx, status_rx) = watch::channel(Readiness::Connecting { attempt: 0 });
    let startup_pool = pool.clone();
    let retry = config.retry.clone();
    tokio::spawn(async move {
        pool::wait_until_ready(&retry, &status_tx, || pool::ping(&startup_pool)).await;
    });

    let state = AppState::new(Arc::new(MySqlCatalog::new(pool)), status_rx.clone());
    let app = router(state, &config.cors_origins);

    let listener = tokio::net::TcpListener::bind(config.bind_addr).await?;
    info!("listening on http://{}", config.bind_addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal(status_rx.clone()))
        .await?;

    if let Readiness::Failed { attempts, reason } = status_rx.borrow().clone() {
        return Err(format!("database unreachable after {} attempt(s): {}", attempts, reason).into());
    }
    info!("server shutdown complete");
    Ok(())
}

/// Resolves on Ctrl+C, SIGTERM, or when startup gives up on the database.
async fn shutdown_signal(mut readiness: watch::Receiver<Readiness>) {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    let startup_failed = async move {
        let failed = readiness
            .wait_for(|r| matches!(r, Readiness::Failed { .. }))
            .await
            .is_ok();
        if !failed {
            std::future::pending::<()>().await;
        }
    };

    tokio::select! {
        _ = ctrl_c => info!("received Ctrl+C, shutting down"),
        _ = terminate => info!("received SIGTERM, shutting down"),
        _ = startup_failed => tracing::error!("database never became ready, shutting down"),
    }
}

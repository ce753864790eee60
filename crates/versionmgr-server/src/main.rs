use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use sea_orm_migration::MigratorTrait;
use versionmgr_server::config::Config;
use versionmgr_server::routes;
use versionmgr_server::state::AppState;

async fn init_db_and_migrate(config: &Config) -> anyhow::Result<AppState> {
    let db = versionmgr_db::connect_with_pool(&config.database_url, config.db_max_connections)
        .await
        .context("connect to database")?;

    // Apply migrations on boot (idempotent).
    versionmgr_migration::Migrator::up(&db, None)
        .await
        .context("apply migrations")?;

    Ok(AppState {
        db: Arc::new(db),
        read_only: config.read_only,
    })
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            tracing::warn!(error = %err, "failed to listen for ctrl-c");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(err) => {
                tracing::warn!(error = %err, "failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
    tracing::info!("shutting down");
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let config = Config::from_env()?;
    let state = init_db_and_migrate(&config).await?;
    let app = routes::router(state);

    tracing::info!(addr = %config.listen, read_only = config.read_only, "versionmgr HTTP listening");
    let listener = tokio::net::TcpListener::bind(config.listen)
        .await
        .with_context(|| format!("bind {}", config.listen))?;
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await?;

    Ok(())
}

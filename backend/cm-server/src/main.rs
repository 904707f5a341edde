use cm_server::{build_authenticator, build_router, logger};

use cm_db::{CatalogObjectModel, SettingsRepository};
use cm_engine::{EngineContext, ServerIdentity};
use cm_session::AppState;

use std::error::Error;
use std::sync::Arc;

use log::{error, info};
use tokio::net::TcpListener;

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    // Load and validate configuration
    let config = cm_config::Config::load()?;
    config.validate()?;

    let log_file_path = match config.logging.file {
        Some(ref filename) => {
            let log_dir = config.log_dir()?;
            std::fs::create_dir_all(&log_dir)?;
            Some(log_dir.join(filename))
        }
        None => None,
    };

    // Initialize logger (before any other logging)
    logger::initialize(config.logging.level, log_file_path, config.logging.colored)?;

    info!("Starting cm-server v{}", env!("CARGO_PKG_VERSION"));
    config.log_summary();

    let database_path = config.database_path()?;
    info!("Connecting to database: {}", database_path.display());
    let pool = cm_db::connect(
        &database_path,
        config.database.max_connections,
        config.database.busy_timeout(),
    )
    .await?;

    info!("Running database migrations...");
    cm_db::run_migrations(&pool).await?;
    info!("Migrations complete");

    let repository_id = match config.repository.id {
        Some(ref id) => id.clone(),
        None => {
            SettingsRepository::new(pool.clone())
                .ensure_repository_id()
                .await?
        }
    };
    info!("Repository id: {}", repository_id);

    let archive_dir = config.archive_dir()?;
    std::fs::create_dir_all(&archive_dir)?;

    let identity = ServerIdentity {
        server_address: config.repository.server_address.clone(),
        server_version: config.repository.server_version.clone(),
        server_build: config.repository.server_build.clone(),
        repository_id,
    };
    let model = Arc::new(CatalogObjectModel::new(pool.clone()));
    let engine = EngineContext::new(pool, model, archive_dir, identity);

    let config_dir = cm_config::Config::config_dir()?;
    let authenticator = build_authenticator(&config.auth, &config_dir)?;

    let app_state = AppState::new(engine, authenticator, config.lock.hold_duration());
    let app = build_router(app_state);

    let listener = TcpListener::bind(config.bind_addr()).await?;
    info!("Server listening on {}", listener.local_addr()?);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Graceful shutdown complete");
    Ok(())
}

async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => info!("Received SIGINT (Ctrl+C), initiating graceful shutdown"),
        Err(e) => {
            error!("Failed to listen for SIGINT: {}", e);
            std::future::pending::<()>().await;
        }
    }
}

//! # Vapor POS Server
//!
//! ## Usage
//! ```bash
//! # Defaults: 0.0.0.0:3000, ./vapor.db
//! cargo run -p vapor-server
//!
//! # Verbose SQL-side logging
//! RUST_LOG=info,vapor=debug,sqlx=info cargo run -p vapor-server
//! ```

use tokio::net::TcpListener;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use vapor_db::Database;
use vapor_server::{build_router, AppState, ServerConfig};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load configuration (reads .env first, so RUST_LOG may come from there)
    let config = ServerConfig::load()?;

    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info,vapor=debug")),
        )
        .with_target(true)
        .init();

    info!("Starting Vapor POS server...");
    info!(
        addr = %config.http_addr,
        db = %config.database_path.display(),
        enforce_totals = config.enforce_totals,
        tax_rate_bps = config.tax_rate.bps(),
        "Configuration loaded"
    );

    // Connect to database (migrations run on open)
    let db = Database::new(config.db_config()).await?;
    info!("Database ready");

    let state = AppState::from_config(db.clone(), &config).shared();
    let app = build_router(state);

    let listener = TcpListener::bind(config.http_addr).await?;
    info!(addr = %listener.local_addr()?, "Listening for HTTP requests");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    db.close().await;
    info!("Server shutdown complete");
    Ok(())
}

/// Graceful shutdown signal handler.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!(?e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                error!(?e, "Failed to install SIGTERM handler");
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

    info!("Shutdown signal received, starting graceful shutdown...");
}

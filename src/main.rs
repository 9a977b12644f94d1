use anyhow::Result;
use tracing::info;

use langswitch::config::Config;
use langswitch::db::Database;
use langswitch::server::{self, AppState};

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file (ignored in production)
    let _ = dotenvy::dotenv();

    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("langswitch=info".parse()?),
        )
        .init();

    info!("Starting language switcher service");

    // Load configuration from environment
    let config = Config::from_env()?;
    let port = config.port;

    // Open storage and restore the persisted registry
    let db = Database::new(&config.database_path)?;
    let state = AppState::new(db, config)?;
    let app = server::router(state);

    let addr = std::net::SocketAddr::from(([0, 0, 0, 0], port));
    info!("Listening on {}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

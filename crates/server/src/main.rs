// crates/server/src/main.rs
//! Taskmarket server binary.
//!
//! Opens (or creates) the SQLite database, runs migrations, and serves the
//! marketplace API on localhost.

use std::net::SocketAddr;
use std::path::PathBuf;

use anyhow::Result;
use taskmarket_db::Database;
use taskmarket_server::create_app;
use tracing_subscriber::{fmt, EnvFilter};

/// Default port for the server.
const DEFAULT_PORT: u16 = 47310;

/// Get the server port from environment or use default.
fn get_port() -> u16 {
    std::env::var("TASKMARKET_PORT")
        .ok()
        .or_else(|| std::env::var("PORT").ok())
        .and_then(|p| p.parse().ok())
        .unwrap_or(DEFAULT_PORT)
}

#[tokio::main]
async fn main() -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt().with_env_filter(filter).compact().init();

    eprintln!("\n\u{1f6e0} taskmarket v{}\n", env!("CARGO_PKG_VERSION"));

    // TASKMARKET_DB overrides the default cache-dir location.
    let db = match std::env::var("TASKMARKET_DB").ok().map(PathBuf::from) {
        Some(path) => Database::new(&path).await?,
        None => Database::open_default().await?,
    };
    tracing::info!(db_path = %db.db_path().display(), "Database ready");

    let app = create_app(db);

    let port = get_port();
    let addr = SocketAddr::from(([127, 0, 0, 1], port));
    let listener = tokio::net::TcpListener::bind(addr).await?;
    eprintln!("  \u{2192} http://localhost:{port}\n");

    axum::serve(listener, app).await?;

    Ok(())
}

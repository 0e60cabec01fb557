//! # HTTP Server for the QR Form
//!
//! Serves the browser form and the submit path: the form posts its fields,
//! the server re-derives the same render request the live preview uses,
//! writes the generated file and returns its path.
//!
//! ## Usage
//!
//! ```bash
//! lucero serve --listen 0.0.0.0:8080 --output-dir ./generated
//! ```
//!
//! Then open http://localhost:8080 in a browser.

mod handlers;
mod state;
mod static_files;

pub use state::ServerConfig;

use axum::{
    Router,
    extract::DefaultBodyLimit,
    routing::{get, post},
};
use std::sync::Arc;

use crate::error::LuceroError;
use state::AppState;

/// Start the HTTP server.
///
/// ## Example
///
/// ```no_run
/// use lucero::server::{ServerConfig, serve};
///
/// # async fn example() -> Result<(), lucero::LuceroError> {
/// let config = ServerConfig {
///     listen_addr: "0.0.0.0:8080".to_string(),
///     output_dir: ".".into(),
/// };
///
/// serve(config).await?;
/// # Ok(())
/// # }
/// ```
pub async fn serve(config: ServerConfig) -> Result<(), LuceroError> {
    tokio::fs::create_dir_all(&config.output_dir).await?;
    let app_state = Arc::new(AppState::new(config.clone()));

    let app = Router::new()
        // Frontend
        .route("/", get(static_files::index_handler))
        .route("/assets/*path", get(static_files::asset_handler))
        // QR API (10MB limit covers logo uploads)
        .route(
            "/api/qr/generate",
            post(handlers::generate).layer(DefaultBodyLimit::max(10 * 1024 * 1024)),
        )
        .route("/generated/:name", get(handlers::download))
        .with_state(app_state);

    println!("Lucero HTTP server starting...");
    println!("Listening on: {}", config.listen_addr);
    println!("Output directory: {}", config.output_dir.display());
    println!();
    println!(
        "Open http://{}/ in your browser to generate QR codes",
        config.listen_addr
    );

    let listener = tokio::net::TcpListener::bind(&config.listen_addr)
        .await
        .map_err(|e| {
            LuceroError::Io(std::io::Error::other(format!(
                "Failed to bind to {}: {}",
                config.listen_addr, e
            )))
        })?;

    axum::serve(listener, app)
        .await
        .map_err(|e| LuceroError::Io(std::io::Error::other(format!("Server error: {}", e))))?;

    Ok(())
}

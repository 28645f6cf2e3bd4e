//! Standalone server binary.
//!
//! Usage: cargo run -p bjround-server -- --port 8080

use bjround_server::{ServerArgs, ServerConfig, WebServer, init_logging};
use clap::Parser;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    // A missing .env file is fine; real environment variables still apply.
    dotenvy::dotenv().ok();

    let args = ServerArgs::parse();
    init_logging(args.log_json)?;

    let config = ServerConfig::from(args);
    if config.aes_key().is_none() {
        tracing::warn!("AES_ENCRYPTION_KEY is not set, export and restore will fail");
    }
    tracing::info!(
        host = config.host(),
        port = config.port(),
        session_ttl_secs = config.session_ttl().as_secs(),
        "starting bjround server"
    );

    let handle = WebServer::new(config).start().await?;
    tracing::info!("server running at http://{}", handle.address());

    tokio::signal::ctrl_c().await?;

    tracing::info!("shutting down server");
    handle.shutdown().await?;
    tracing::info!("server stopped cleanly");

    Ok(())
}

//! Lorenzo de' Medici persona chat server.
//!
//! Entry point: logging, `.env`, configuration, then the server loop.

use mimalloc::MiMalloc;

/// Global allocator for improved performance (M-MIMALLOC-APPS).
#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

use dotenvy::dotenv;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use medici_chat::config::{AppConfig, load_llm_settings};
use medici_chat::server::start_server;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing (M-LOG-STRUCTURED)
    tracing_subscriber::registry()
        .with(fmt::layer().with_target(true))
        .with(EnvFilter::from_default_env().add_directive("info".parse()?))
        .init();

    // Load .env (if present)
    let _ = dotenv();

    let config = match AppConfig::load() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Configuration error: {e}");
            std::process::exit(1);
        }
    };

    let settings = load_llm_settings();

    start_server(config, settings).await
}

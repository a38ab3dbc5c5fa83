//! Server configuration and LLM settings loading.
//!
//! Server settings layer defaults, an optional YAML config file, `MEDICI_`
//! prefixed environment variables, and CLI flags (highest priority). LLM
//! settings come from plain environment variables so the same names work
//! in a `.env` file and in a deployment environment.

use crate::llm::{DEFAULT_BASE_URL, DEFAULT_MODEL, LlmSettings};
use clap::Parser;
use config::{Config, Environment, File, FileFormat};
use serde::Deserialize;
use std::env;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Config file path
    #[arg(short, long, env = "CONFIG_FILE")]
    pub config: Option<String>,

    /// Host to bind
    #[arg(long, env = "HOST")]
    pub host: Option<String>,

    /// Port to listen on
    #[arg(long, env = "PORT")]
    pub port: Option<u16>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    pub server: ServerConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl AppConfig {
    pub fn load() -> Result<Self, config::ConfigError> {
        Self::load_from_args(std::env::args())
    }

    pub fn load_from_args<I, T>(args: I) -> Result<Self, config::ConfigError>
    where
        I: IntoIterator<Item = T>,
        T: Into<std::ffi::OsString> + Clone,
    {
        let cli =
            Cli::try_parse_from(args).map_err(|e| config::ConfigError::Message(e.to_string()))?;

        let mut builder = Config::builder()
            .set_default("server.host", "127.0.0.1")?
            .set_default("server.port", 3000)?;

        // Optional config file: explicit path beats ./config.yaml fallback.
        builder = match &cli.config {
            Some(path) => builder.add_source(File::new(path, FileFormat::Yaml)),
            None => builder.add_source(File::new("config", FileFormat::Yaml).required(false)),
        };

        // Environment variables, e.g. MEDICI_SERVER__PORT=8000.
        builder = builder.add_source(
            Environment::with_prefix("MEDICI")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        // CLI flags (and their env fallbacks via clap) win.
        if let Some(host) = cli.host {
            builder = builder.set_override("server.host", host)?;
        }
        if let Some(port) = cli.port {
            builder = builder.set_override("server.port", port)?;
        }

        builder.build()?.try_deserialize()
    }
}

/// Load LLM settings from the environment.
///
/// The credential and the model override are optional; a missing model
/// falls back to [`DEFAULT_MODEL`] and a missing key means
/// unauthenticated requests (upstream rejects those with a status the
/// relay maps to a 502). Presence is logged at startup, never the values.
#[must_use]
pub fn load_llm_settings() -> LlmSettings {
    let api_key = env::var("OPENROUTER_API_KEY")
        .ok()
        .filter(|s| !s.trim().is_empty());

    let model = env::var("OPENROUTER_MODEL")
        .ok()
        .filter(|s| !s.trim().is_empty())
        .unwrap_or_else(|| DEFAULT_MODEL.to_string());

    let base_url = env::var("OPENROUTER_BASE_URL")
        .ok()
        .filter(|s| !s.trim().is_empty())
        .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());

    LlmSettings {
        base_url,
        api_key,
        model,
    }
}

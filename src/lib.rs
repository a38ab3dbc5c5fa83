//! Lorenzo de' Medici persona chat.
//!
//! A single-page chat interface backed by a thin relay: the browser posts
//! its conversation history to `/api/chat`, the server forwards it to an
//! `OpenAI`-compatible completions API (OpenRouter by default) and
//! returns the normalized reply as plain text.
//!
//! # Modules
//!
//! - [`config`]: server configuration and LLM settings loading
//! - [`llm`]: message types, outbound client, reply extraction
//! - [`server`]: router and the relay handler
//! - [`ui`]: the server-rendered chat page

// Allow pedantic clippy warnings that don't add value for this codebase
#![allow(clippy::unused_async)]

pub mod config;
pub mod llm;
pub mod server;
pub mod ui;

use llm::ChatCompletionsClient;
use std::sync::Arc;

/// Application state shared across all handlers.
///
/// Read-only after startup; clones are cheap `Arc` bumps.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Outbound completions client.
    pub llm: Arc<ChatCompletionsClient>,
}

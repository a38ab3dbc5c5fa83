//! HTTP server and the chat relay handler.

use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{State, rejection::JsonRejection},
    http::StatusCode,
    response::{Html, IntoResponse, Response},
    routing::{get, post},
};
use serde::Serialize;
use serde_json::Value;
use tower_http::trace::TraceLayer;
use tracing::{error, info, warn};

use crate::AppState;
use crate::config::AppConfig;
use crate::llm::{ChatCompletionsClient, LlmError, LlmSettings, Message};
use crate::ui;

/// Start the Axum server with the provided configuration.
pub async fn start_server(config: AppConfig, settings: LlmSettings) -> anyhow::Result<()> {
    info!(
        name: "llm.config.loaded",
        api_key_present = settings.api_key.is_some(),
        model = %settings.model,
        base_url = %settings.base_url,
        "LLM configuration loaded"
    );

    let state = AppState {
        llm: Arc::new(ChatCompletionsClient::new(settings)),
    };

    let app = build_router(state);

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    info!(
        name: "server.started",
        address = %addr,
        "Server started"
    );

    axum::serve(listener, app).await?;
    Ok(())
}

/// Build the application router.
///
/// Only a POST route is registered for `/api/chat`, so axum answers any
/// other method there with a bodyless 405.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(index_handler))
        .route("/api/chat", post(api_chat))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

// ─────────────────────────────────────────────────────────────────────────────
// HTML Page Handlers
// ─────────────────────────────────────────────────────────────────────────────

/// Index page handler.
async fn index_handler() -> impl IntoResponse {
    Html(ui::html_shell("Chat", ui::chat_content()))
}

// ─────────────────────────────────────────────────────────────────────────────
// API Handlers
// ─────────────────────────────────────────────────────────────────────────────

/// Uniform response body: the reply text, or an error string standing in
/// for it. The client only ever displays this field.
#[derive(Debug, Serialize)]
struct ChatReply {
    reply: String,
}

fn reply_response(status: StatusCode, reply: impl Into<String>) -> Response {
    (
        status,
        Json(ChatReply {
            reply: reply.into(),
        }),
    )
        .into_response()
}

/// POST /api/chat - relay the conversation upstream and return the reply.
async fn api_chat(
    State(state): State<AppState>,
    body: Result<Json<Value>, JsonRejection>,
) -> Response {
    let Ok(Json(body)) = body else {
        return reply_response(StatusCode::BAD_REQUEST, "Bad request: messages missing");
    };

    let Some(raw_messages) = body.get("messages").filter(|v| v.is_array()) else {
        return reply_response(StatusCode::BAD_REQUEST, "Bad request: messages missing");
    };

    let messages: Vec<Message> = match serde_json::from_value(raw_messages.clone()) {
        Ok(m) => m,
        Err(e) => {
            return reply_response(
                StatusCode::BAD_REQUEST,
                format!("Bad request: malformed messages: {e}"),
            );
        }
    };

    info!(
        name: "chat.request",
        count = messages.len(),
        model = %state.llm.model(),
        "Relaying conversation"
    );

    match state.llm.complete(&messages).await {
        Ok(reply) => reply_response(StatusCode::OK, reply),
        Err(LlmError::Upstream { status, message }) => {
            warn!(
                name: "chat.upstream_error",
                status,
                message = %message,
                "Upstream reported failure"
            );
            reply_response(
                StatusCode::BAD_GATEWAY,
                format!("Error from upstream: {message}"),
            )
        }
        Err(err) => {
            error!(
                name: "chat.relay_error",
                error = %err,
                "Relay call failed"
            );
            reply_response(
                StatusCode::INTERNAL_SERVER_ERROR,
                "Something went wrong on the server.",
            )
        }
    }
}

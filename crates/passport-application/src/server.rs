//! HTTP surface: `GET /api/chat` for health, `POST /api/chat` for readings.

use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use passport_core::api::{ChatRequest, HealthResponse};

use crate::reading_service::{ChatError, ReadingService};

pub fn build_router(service: ReadingService) -> Router {
    Router::new()
        .route("/api/chat", get(health).post(chat))
        .with_state(service)
}

/// Binds `bind` and serves until ctrl-c.
pub async fn serve(bind: &str, service: ReadingService) -> passport_core::Result<()> {
    let listener = tokio::net::TcpListener::bind(bind).await?;
    tracing::info!(bind, backend = service.has_backend(), "reading server listening");

    axum::serve(listener, build_router(service))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("reading server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %err, "failed to listen for ctrl-c");
    }
}

async fn health() -> Json<HealthResponse> {
    Json(HealthResponse::default())
}

async fn chat(
    State(service): State<ReadingService>,
    body: Result<Json<ChatRequest>, JsonRejection>,
) -> Response {
    let Json(body) = match body {
        Ok(body) => body,
        Err(rejection) => {
            tracing::debug!(error = %rejection, "unreadable chat body");
            return error_response(ChatError::Validation);
        }
    };

    match service.answer(body).await {
        Ok(reply) => Json(reply).into_response(),
        Err(err) => error_response(err),
    }
}

fn error_response(err: ChatError) -> Response {
    if let ChatError::Server(detail) = &err {
        tracing::error!(detail = %detail, "chat request failed");
    }
    let status = StatusCode::from_u16(err.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    (status, Json(err.body())).into_response()
}

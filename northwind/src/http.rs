pub mod middleware;

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;

use crate::config::ServerConfig;

pub async fn run(
    router: axum::Router,
    config: &ServerConfig,
) -> crate::Result<()> {
    let listener = tokio::net::TcpListener::bind(format!(
        "{}:{}",
        config.host.as_str(),
        config.port
    ))
    .await
    .map_err(|e| anyhow::anyhow!("tcp bind failed: {:?}", e))?;

    if let Ok(addr) = listener.local_addr() {
        tracing::info!(%addr, "http server listening");
    }

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| anyhow::anyhow!("http serve failed: {:?}", e))?;

    tracing::info!("http server stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("failed to listen for ctrl-c: {e}");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(
            tokio::signal::unix::SignalKind::terminate(),
        ) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!("failed to listen for SIGTERM: {e}");
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
    tracing::info!("shutdown signal received");
}

#[derive(Debug, Serialize)]
pub struct ErrorEnvelope {
    pub error: ErrorBody,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorBody {
    pub code: String,
    pub message: String,
    pub trace_id: String,
}

impl ErrorEnvelope {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            error: ErrorBody {
                code: status_code_to_string(status),
                message: message.into(),
                trace_id: crate::observability::get_trace_id_string(),
            },
        }
    }
}

pub fn error_response(status: StatusCode, message: impl Into<String>) -> Response {
    (status, Json(ErrorEnvelope::new(status, message))).into_response()
}

impl IntoResponse for crate::Error {
    fn into_response(self) -> Response {
        match self {
            crate::Error::Validation(message) => {
                error_response(StatusCode::BAD_REQUEST, message)
            }
            crate::Error::NotFound(message) => {
                error_response(StatusCode::NOT_FOUND, message)
            }
            crate::Error::Conflict(message) => {
                error_response(StatusCode::CONFLICT, message)
            }
            e @ (crate::Error::Internal(_)
            | crate::Error::Config(_)
            | crate::Error::Database(_)) => {
                tracing::error!("request failed: {e}");
                error_response(
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal server error",
                )
            }
        }
    }
}

fn status_code_to_string(status: StatusCode) -> String {
    match status {
        StatusCode::BAD_REQUEST => "bad_request",
        StatusCode::NOT_FOUND => "not_found",
        StatusCode::METHOD_NOT_ALLOWED => "method_not_allowed",
        StatusCode::CONFLICT => "conflict",
        StatusCode::UNSUPPORTED_MEDIA_TYPE => "unsupported_media_type",
        StatusCode::INTERNAL_SERVER_ERROR => "internal_error",
        _ => status.canonical_reason().unwrap_or("error"),
    }
    .to_string()
}

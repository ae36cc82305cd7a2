use std::sync::Arc;
use std::time::Instant;

use anyhow::Result;
use axum::extract::State;
use axum::http::{header, HeaderName, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Deserialize;
use serde_json::json;
use tower_http::cors::CorsLayer;
use tracing::{error, info};

use crate::config::ServerConfig;
use crate::engine::TranslationEngine;
use crate::error::TranslateError;

/// Shared state handed to every request handler
#[derive(Debug, Clone)]
pub struct AppState {
    pub engine: Arc<TranslationEngine>,
}

#[derive(Debug, Deserialize)]
pub struct TranslateRequest {
    #[serde(default)]
    pub text: String,
}

/// Build the application router
#[must_use]
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/translate", post(translate).options(preflight))
        .route("/health", get(health))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Bind and serve until the process is stopped
///
/// # Errors
///
/// Returns an error if the listen address cannot be bound or the server
/// loop fails.
pub async fn serve(config: &ServerConfig, engine: TranslationEngine) -> Result<()> {
    let state = AppState {
        engine: Arc::new(engine),
    };
    let addr = format!("{}:{}", config.bind_addr, config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!(%addr, "listening");
    axum::serve(listener, router(state)).await?;
    Ok(())
}

async fn translate(State(state): State<AppState>, Json(request): Json<TranslateRequest>) -> Response {
    if request.text.trim().is_empty() {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({ "error": TranslateError::EmptyInput.to_string() })),
        )
            .into_response();
    }

    let started = Instant::now();
    match state.engine.translate(&request.text).await {
        Ok(translation) => {
            let mut response = (StatusCode::OK, Json(translation)).into_response();
            let headers = response.headers_mut();
            headers.insert(
                header::CACHE_CONTROL,
                HeaderValue::from_static("public, max-age=3600"),
            );
            let elapsed = format!("{:.2}s", started.elapsed().as_secs_f64());
            if let Ok(value) = HeaderValue::from_str(&elapsed) {
                headers.insert(HeaderName::from_static("x-translation-time"), value);
            }
            response
        }
        Err(TranslateError::Throttled { retry_after }) => {
            let seconds = retry_after.as_secs().max(1);
            let mut response = (
                StatusCode::TOO_MANY_REQUESTS,
                Json(json!({
                    "error": "Rate limit exceeded. Please try again later.",
                    "retry_after": seconds,
                })),
            )
                .into_response();
            if let Ok(value) = HeaderValue::from_str(&seconds.to_string()) {
                response.headers_mut().insert(header::RETRY_AFTER, value);
            }
            response
        }
        Err(err) => {
            error!(error = %err, "translation request failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "error": "Translation failed" })),
            )
                .into_response()
        }
    }
}

async fn preflight() -> StatusCode {
    StatusCode::OK
}

async fn health() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

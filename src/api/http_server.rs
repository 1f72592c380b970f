// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
use anyhow::Result;
use axum::{
    extract::{DefaultBodyLimit, State},
    response::{Html, IntoResponse},
    routing::{get, post},
    Json, Router,
};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use super::ocr::{
    ocr_handler, progress_handler, reconstruct_handler, upload_handler, HealthResponse,
};
use crate::config::ServerSettings;
use crate::vision::image_utils::MAX_IMAGE_SIZE;
use crate::vision::ocr::OcrService;

/// Request bodies carry base64 or multipart framing on top of the image
pub const MAX_BODY_SIZE: usize = MAX_IMAGE_SIZE * 2;

const INDEX_HTML: &str = include_str!("../../static/index.html");

#[derive(Clone)]
pub struct AppState {
    pub ocr: Arc<OcrService>,
}

impl AppState {
    pub fn new(ocr: Arc<OcrService>) -> Self {
        Self { ocr }
    }
}

pub fn create_app(state: AppState) -> Router {
    Router::new()
        // Upload page
        .route("/", get(index_handler))
        // Health check
        .route("/health", get(health_handler))
        // OCR endpoints
        .route("/v1/ocr", post(ocr_handler))
        .route("/v1/ocr/upload", post(upload_handler))
        .route("/v1/ocr/reconstruct", post(reconstruct_handler))
        .route("/v1/ocr/progress", get(progress_handler))
        .layer(DefaultBodyLimit::max(MAX_BODY_SIZE))
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state)
}

pub async fn start_server(settings: ServerSettings, ocr: Arc<OcrService>) -> Result<()> {
    let app = create_app(AppState::new(ocr));

    let addr = settings.socket_addr();
    let listener = tokio::net::TcpListener::bind(addr).await?;

    tracing::info!("API server listening on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("API server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}

async fn index_handler() -> Html<&'static str> {
    Html(INDEX_HTML)
}

async fn health_handler(State(state): State<AppState>) -> impl IntoResponse {
    Json(HealthResponse {
        status: "ok".to_string(),
        engine: state.ocr.engine_name().to_string(),
        busy: state.ocr.is_busy(),
    })
}

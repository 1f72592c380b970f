// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1

//! Route registration tests
//!
//! These tests verify that:
//! - The upload page and health check are served
//! - The OCR routes only accept their methods
//! - The progress route streams server-sent events

use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
    Router,
};
use std::sync::Arc;
use tokio_stream::StreamExt;
use tower::util::ServiceExt;

use ocr_text_extractor::api::http_server::{create_app, AppState};
use ocr_text_extractor::config::OcrSettings;
use ocr_text_extractor::vision::ocr::OcrService;

use crate::common::{Script, ScriptedEngine};

fn setup_app() -> Router {
    let engine = Arc::new(ScriptedEngine::new(Script::default()));
    let ocr = Arc::new(OcrService::new(engine, OcrSettings::default()));
    create_app(AppState::new(ocr))
}

fn get(uri: &str) -> Request<Body> {
    Request::builder()
        .method(Method::GET)
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

#[cfg(test)]
mod route_registration_tests {
    use super::*;

    #[tokio::test]
    async fn test_index_page_is_served() {
        let response = setup_app().oneshot(get("/")).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let content_type = response.headers()[header::CONTENT_TYPE].to_str().unwrap();
        assert!(content_type.starts_with("text/html"));

        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let html = String::from_utf8(bytes.to_vec()).unwrap();
        assert!(html.contains("/v1/ocr/upload"));
    }

    #[tokio::test]
    async fn test_health_reports_engine_and_idle_gate() {
        let response = setup_app().oneshot(get("/health")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["status"], "ok");
        assert_eq!(body["engine"], "scripted");
        assert_eq!(body["busy"], false);
    }

    #[tokio::test]
    async fn test_ocr_route_rejects_get() {
        let response = setup_app().oneshot(get("/v1/ocr")).await.unwrap();
        assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
    }

    #[tokio::test]
    async fn test_unknown_route_is_not_found() {
        let response = setup_app().oneshot(get("/v1/models")).await.unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_progress_streams_current_state() {
        let response = setup_app().oneshot(get("/v1/ocr/progress")).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let content_type = response.headers()[header::CONTENT_TYPE].to_str().unwrap();
        assert!(content_type.starts_with("text/event-stream"));

        let mut stream = response.into_body().into_data_stream();
        let first = stream.next().await.unwrap().unwrap();
        let frame = String::from_utf8(first.to_vec()).unwrap();
        assert!(frame.contains("event: progress"));
        assert!(frame.contains("\"percent\":0"));
    }
}

// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! OCR endpoint handlers

use axum::{
    extract::State,
    http::{header, HeaderMap, StatusCode},
    response::sse::{Event, KeepAlive, Sse},
    Json,
};
use axum_extra::extract::{multipart::MultipartError, Multipart};
use std::convert::Infallible;
use tokio_stream::{wrappers::WatchStream, Stream, StreamExt};
use tracing::{debug, error, warn};

use super::request::{validate_language, OcrRequest, ReconstructRequest};
use super::response::{OcrResponse, ReconstructResponse};
use crate::api::errors::{ApiError, ApiErrorResponse};
use crate::api::http_server::{AppState, MAX_BODY_SIZE};
use crate::vision::image_utils::{ensure_image_mime, ImageInput};
use crate::vision::ocr::{select_text, RecognitionResult};

/// POST /v1/ocr - Extract text from a base64-encoded image
///
/// # Request
/// - `image`: Base64-encoded image data, optionally as a `data:` URL (required)
/// - `language`: Tesseract language code(s), e.g. `eng+deu` (optional)
///
/// # Errors
/// - 400 Bad Request: missing or undecodable image, invalid language
/// - 409 Conflict: another image is being processed
/// - 413 Payload Too Large: image over 10MB
/// - 500 Internal Server Error: recognition failed (retryable)
pub async fn ocr_handler(
    State(state): State<AppState>,
    Json(request): Json<OcrRequest>,
) -> Result<Json<OcrResponse>, ApiErrorResponse> {
    if let Err(e) = request.validate() {
        warn!("OCR validation failed: {}", e);
        return Err(e.into());
    }

    let encoded = request.image.as_deref().unwrap_or_default();
    let image = ImageInput::from_base64(encoded).map_err(|e| {
        warn!("Failed to decode image: {}", e);
        ApiErrorResponse::from(e)
    })?;

    run_extraction(state, image, request.language).await
}

/// POST /v1/ocr/upload - Extract text from a multipart upload
///
/// Expects an `image` file field whose content type starts with `image/`,
/// and an optional `language` text field. Bodies over the router's limit
/// are rejected with 413.
pub async fn upload_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    mut multipart: Multipart,
) -> Result<Json<OcrResponse>, ApiErrorResponse> {
    let body_size = headers
        .get(header::CONTENT_LENGTH)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.parse::<usize>().ok());
    let to_api_error = |err| multipart_error(err, body_size);

    let mut image = None;
    let mut language = None;

    while let Some(field) = multipart.next_field().await.map_err(to_api_error)? {
        let name = field.name().map(str::to_string);
        match name.as_deref() {
            Some("image") => {
                ensure_image_mime(field.content_type())?;
                let file_name = field.file_name().map(str::to_string);
                let bytes = field.bytes().await.map_err(to_api_error)?;
                debug!(
                    "Received upload {:?} ({} bytes)",
                    file_name.as_deref().unwrap_or("<unnamed>"),
                    bytes.len()
                );
                image = Some(ImageInput::from_bytes(bytes.to_vec())?);
            }
            Some("language") => {
                let value = field.text().await.map_err(to_api_error)?;
                let value = value.trim();
                if !value.is_empty() {
                    language = Some(value.to_string());
                }
            }
            other => debug!("Ignoring multipart field {:?}", other),
        }
    }

    let image = image.ok_or_else(|| ApiError::ValidationError {
        field: "image".to_string(),
        message: "image is required".to_string(),
    })?;

    if let Some(language) = &language {
        validate_language(language)?;
    }

    run_extraction(state, image, language).await
}

/// POST /v1/ocr/reconstruct - Reading-order text from client-side OCR output
pub async fn reconstruct_handler(
    Json(request): Json<ReconstructRequest>,
) -> Json<ReconstructResponse> {
    let word_count = request.words.len();
    let result = RecognitionResult::new(request.raw_text, request.words);
    Json(ReconstructResponse::new(select_text(&result), word_count))
}

/// GET /v1/ocr/progress - Progress of the current recognition as SSE
pub async fn progress_handler(
    State(state): State<AppState>,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    let updates = WatchStream::new(state.ocr.progress().subscribe()).map(|update| {
        let event = Event::default()
            .event("progress")
            .json_data(&update)
            .unwrap_or_else(|_| Event::default().event("progress").data(update.message));
        Ok(event)
    });

    Sse::new(updates).keep_alive(KeepAlive::default())
}

async fn run_extraction(
    state: AppState,
    image: ImageInput,
    language: Option<String>,
) -> Result<Json<OcrResponse>, ApiErrorResponse> {
    let ocr = state.ocr.clone();
    let language = language.unwrap_or_else(|| ocr.settings().language.clone());

    // Detached so a dropped connection cannot interrupt session release
    let task = tokio::spawn(async move {
        let extraction = ocr.extract_with_language(&image, &language).await?;
        Ok::<_, ApiError>(OcrResponse::from_extraction(
            extraction,
            ocr.engine_name(),
        ))
    });

    match task.await {
        Ok(Ok(response)) => Ok(Json(response)),
        Ok(Err(e)) => Err(e.into()),
        Err(e) => {
            error!("OCR task failed: {}", e);
            Err(ApiError::InternalError("OCR task failed".to_string()).into())
        }
    }
}

fn multipart_error(err: MultipartError, body_size: Option<usize>) -> ApiErrorResponse {
    if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
        warn!("Multipart upload over the body limit: {}", err);
        return ApiError::PayloadTooLarge {
            size: body_size.unwrap_or(MAX_BODY_SIZE),
            limit: MAX_BODY_SIZE,
        }
        .into();
    }

    warn!("Malformed multipart request: {}", err);
    ApiError::InvalidRequest(err.body_text()).into()
}

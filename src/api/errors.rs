// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

use crate::output::PROCESSING_FAILED;
use crate::vision::ocr::{ExtractionError, OcrError};
use crate::vision::ImageError;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ErrorResponse {
    pub error_type: String,
    pub message: String,
    pub request_id: Option<String>,
    pub details: Option<HashMap<String, serde_json::Value>>,
}

#[derive(Debug, Clone)]
pub enum ApiError {
    NotFound(String),
    InvalidRequest(String),
    ValidationError { field: String, message: String },
    PayloadTooLarge { size: usize, limit: usize },
    Busy,
    ProcessingFailed(String),
    InternalError(String),
}

impl ApiError {
    pub fn to_response(&self, request_id: Option<String>) -> ErrorResponse {
        let (error_type, message, details) = match self {
            ApiError::NotFound(msg) => ("not_found", msg.clone(), None),
            ApiError::InvalidRequest(msg) => ("invalid_request", msg.clone(), None),
            ApiError::ValidationError { field, message } => {
                let mut details = HashMap::new();
                details.insert(
                    "field".to_string(),
                    serde_json::Value::String(field.clone()),
                );
                ("validation_error", message.clone(), Some(details))
            }
            ApiError::PayloadTooLarge { size, limit } => {
                let mut details = HashMap::new();
                details.insert("size".to_string(), serde_json::Value::Number((*size).into()));
                details.insert(
                    "limit".to_string(),
                    serde_json::Value::Number((*limit).into()),
                );
                (
                    "payload_too_large",
                    format!("Image exceeds maximum size of {} bytes", limit),
                    Some(details),
                )
            }
            ApiError::Busy => (
                "busy",
                "Another image is being processed. Please try again shortly.".to_string(),
                Some(retryable()),
            ),
            ApiError::ProcessingFailed(_) => (
                "processing_failed",
                PROCESSING_FAILED.to_string(),
                Some(retryable()),
            ),
            ApiError::InternalError(msg) => ("internal_error", msg.clone(), None),
        };

        ErrorResponse {
            error_type: error_type.to_string(),
            message,
            request_id,
            details,
        }
    }

    pub fn status_code(&self) -> u16 {
        match self {
            ApiError::NotFound(_) => 404,
            ApiError::InvalidRequest(_) | ApiError::ValidationError { .. } => 400,
            ApiError::PayloadTooLarge { .. } => 413,
            ApiError::Busy => 409,
            ApiError::ProcessingFailed(_) | ApiError::InternalError(_) => 500,
        }
    }
}

fn retryable() -> HashMap<String, serde_json::Value> {
    let mut details = HashMap::new();
    details.insert("retryable".to_string(), serde_json::Value::Bool(true));
    details
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::NotFound(msg) => write!(f, "Not found: {}", msg),
            ApiError::InvalidRequest(msg) => write!(f, "Invalid request: {}", msg),
            ApiError::ValidationError { field, message } => {
                write!(f, "Validation error for {}: {}", field, message)
            }
            ApiError::PayloadTooLarge { size, limit } => {
                write!(f, "Payload too large: {} bytes (limit {})", size, limit)
            }
            ApiError::Busy => write!(f, "Recognition already in progress"),
            ApiError::ProcessingFailed(msg) => write!(f, "Processing failed: {}", msg),
            ApiError::InternalError(msg) => write!(f, "Internal error: {}", msg),
        }
    }
}

impl std::error::Error for ApiError {}

impl From<ImageError> for ApiError {
    fn from(err: ImageError) -> Self {
        match err {
            ImageError::TooLarge(size, limit) => ApiError::PayloadTooLarge { size, limit },
            other => ApiError::ValidationError {
                field: "image".to_string(),
                message: other.to_string(),
            },
        }
    }
}

impl From<ExtractionError> for ApiError {
    fn from(err: ExtractionError) -> Self {
        match err {
            ExtractionError::Busy => ApiError::Busy,
            // Retrying cannot install a missing language
            ExtractionError::Recognition(OcrError::LanguageUnavailable(language)) => {
                ApiError::ValidationError {
                    field: "language".to_string(),
                    message: format!("language '{}' is not installed", language),
                }
            }
            ExtractionError::Recognition(e) => ApiError::ProcessingFailed(e.to_string()),
        }
    }
}

/// Error response wrapper
pub struct ApiErrorResponse(pub ApiError);

impl From<ApiError> for ApiErrorResponse {
    fn from(err: ApiError) -> Self {
        ApiErrorResponse(err)
    }
}

impl From<ImageError> for ApiErrorResponse {
    fn from(err: ImageError) -> Self {
        ApiErrorResponse(err.into())
    }
}

impl From<ExtractionError> for ApiErrorResponse {
    fn from(err: ExtractionError) -> Self {
        ApiErrorResponse(err.into())
    }
}

impl IntoResponse for ApiErrorResponse {
    fn into_response(self) -> Response {
        let status = StatusCode::from_u16(self.0.status_code())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        let error_response = self.0.to_response(None);

        (status, Json(error_response)).into_response()
    }
}

// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! OCR request types and validation

use serde::{Deserialize, Serialize};

use crate::api::errors::ApiError;
use crate::vision::image_utils::MAX_IMAGE_SIZE;
use crate::vision::ocr::WordToken;

/// Base64 inflates payloads by 4/3; allow for a `data:` prefix on top
const MAX_ENCODED_SIZE: usize = MAX_IMAGE_SIZE / 3 * 4 + 1024;

/// Request for OCR processing
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OcrRequest {
    /// Base64-encoded image data, optionally as a `data:` URL
    #[serde(default)]
    pub image: Option<String>,

    /// Tesseract language code(s); the server default when absent
    #[serde(default)]
    pub language: Option<String>,
}

impl OcrRequest {
    /// Validate the OCR request
    pub fn validate(&self) -> Result<(), ApiError> {
        let image = match self.image.as_deref() {
            Some(image) if !image.trim().is_empty() => image,
            _ => {
                return Err(ApiError::ValidationError {
                    field: "image".to_string(),
                    message: "image is required".to_string(),
                })
            }
        };

        if image.len() > MAX_ENCODED_SIZE {
            return Err(ApiError::PayloadTooLarge {
                size: image.len(),
                limit: MAX_ENCODED_SIZE,
            });
        }

        if let Some(language) = &self.language {
            validate_language(language)?;
        }

        Ok(())
    }
}

/// Language codes look like `eng` or `eng+deu`; anything else would be
/// passed straight to the engine's command line
pub(crate) fn validate_language(language: &str) -> Result<(), ApiError> {
    let valid = !language.is_empty()
        && language.split('+').all(|part| {
            !part.is_empty()
                && part
                    .chars()
                    .all(|c| c.is_ascii_alphanumeric() || c == '_')
        });

    if valid {
        Ok(())
    } else {
        Err(ApiError::ValidationError {
            field: "language".to_string(),
            message: format!("invalid language '{}'", language),
        })
    }
}

/// Words recognized by a client-side engine, to be put into reading order
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReconstructRequest {
    #[serde(default)]
    pub raw_text: String,
    #[serde(default)]
    pub words: Vec<WordToken>,
}

// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! OCR response types

use serde::{Deserialize, Serialize};

use crate::output::{download_file_name_today, NO_TEXT_DETECTED};
use crate::vision::ocr::Extraction;

/// Response from OCR processing
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OcrResponse {
    /// Extracted text, or the no-text message when nothing was found
    pub text: String,
    /// False when `text` carries the no-text message
    pub text_detected: bool,
    /// Guidance shown alongside an empty result
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    /// Number of words reported by the engine
    pub word_count: usize,
    /// Mean word confidence (0-100)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub confidence: Option<f32>,
    /// Processing time in milliseconds
    pub processing_time_ms: u64,
    /// Engine used for OCR
    pub engine: String,
    pub language: String,
    /// Suggested name when saving the text
    pub download_file_name: String,
}

impl OcrResponse {
    pub fn from_extraction(extraction: Extraction, engine: &str) -> Self {
        let (text, text_detected, message) = match extraction.text {
            Some(text) => (text, true, None),
            None => (
                NO_TEXT_DETECTED.to_string(),
                false,
                Some(NO_TEXT_DETECTED.to_string()),
            ),
        };

        Self {
            text,
            text_detected,
            message,
            word_count: extraction.word_count,
            confidence: extraction.confidence,
            processing_time_ms: extraction.processing_time_ms,
            engine: engine.to_string(),
            language: extraction.language,
            download_file_name: download_file_name_today(),
        }
    }
}

/// Response from reading-order reconstruction
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReconstructResponse {
    pub text: String,
    pub text_detected: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    pub word_count: usize,
}

impl ReconstructResponse {
    pub fn new(text: Option<String>, word_count: usize) -> Self {
        match text {
            Some(text) => Self {
                text,
                text_detected: true,
                message: None,
                word_count,
            },
            None => Self {
                text: NO_TEXT_DETECTED.to_string(),
                text_detected: false,
                message: Some(NO_TEXT_DETECTED.to_string()),
                word_count,
            },
        }
    }
}

/// GET /health body
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub engine: String,
    pub busy: bool,
}

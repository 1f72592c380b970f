// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Recognition client errors

use thiserror::Error;

#[derive(Debug, Error)]
pub enum OcrError {
    #[error("Failed to initialize OCR engine: {0}")]
    Initialization(String),

    #[error("Language '{0}' is not installed for the OCR engine")]
    LanguageUnavailable(String),

    #[error("Failed to configure OCR engine: {0}")]
    Configuration(String),

    #[error("Text recognition failed: {0}")]
    Recognition(String),

    #[error("Failed to release OCR engine: {0}")]
    Release(String),

    #[error("OCR engine I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl OcrError {
    pub fn recognition(message: impl Into<String>) -> Self {
        Self::Recognition(message.into())
    }
}

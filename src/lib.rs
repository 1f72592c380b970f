// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
pub mod api;
pub mod cli;
pub mod config;
pub mod output;
pub mod vision;

pub use config::{OcrSettings, ServerSettings};
pub use vision::ocr::{
    normalize, reconstruct, select_text, Extraction, ExtractionError, OcrError, OcrService,
    RecognitionClient, RecognitionEngine, RecognitionResult, TesseractEngine, WordToken,
};

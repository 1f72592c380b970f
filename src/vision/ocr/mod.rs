// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Text extraction from images
//!
//! Components:
//! - `client` - Recognition engine/session boundary
//! - `tesseract` - Tesseract command-line engine
//! - `reading_order` - Spatial reordering of recognized words
//! - `normalize` - Cleanup rules for reconstructed text
//! - `pipeline` - Orchestration with guaranteed session release
//! - `progress` - Progress reporting for a recognition run

pub mod client;
pub mod error;
pub mod normalize;
pub mod pipeline;
pub mod progress;
pub mod reading_order;
pub mod tesseract;
pub mod types;

pub use client::{RecognitionClient, RecognitionEngine};
pub use error::OcrError;
pub use normalize::{normalize, TextNormalizer};
pub use pipeline::{run_recognition, select_text, Extraction, ExtractionError, OcrService};
pub use progress::{display_percent, ProgressCallback, ProgressReporter, ProgressUpdate};
pub use reading_order::{reconstruct, spatial_sort, PositionedWord};
pub use tesseract::{parse_tsv, TesseractEngine};
pub use types::{
    BoundingBox, PageSegmentationMode, RecognitionOptions, RecognitionResult, WordToken,
    DEFAULT_CHARACTER_WHITELIST, DEFAULT_LANGUAGE,
};

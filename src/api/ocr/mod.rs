// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! OCR API endpoint module
//!
//! Provides POST /v1/ocr, POST /v1/ocr/upload, POST /v1/ocr/reconstruct
//! and GET /v1/ocr/progress.

pub mod handler;
pub mod request;
pub mod response;

pub use handler::{ocr_handler, progress_handler, reconstruct_handler, upload_handler};
pub use request::{OcrRequest, ReconstructRequest};
pub use response::{HealthResponse, OcrResponse, ReconstructResponse};

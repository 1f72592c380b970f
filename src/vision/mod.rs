// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Vision processing module
//!
//! This module provides:
//! - Image intake (size limits, format sniffing)
//! - OCR through an external recognition engine, with reading-order
//!   reconstruction and text cleanup on top

pub mod image_utils;
pub mod ocr;

pub use image_utils::{detect_format, ensure_image_mime, ImageError, ImageInfo, ImageInput};

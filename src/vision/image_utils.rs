// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Image intake for recognition: size limits, format sniffing, header checks

use base64::{engine::general_purpose::STANDARD, Engine as _};
use image::{ImageFormat, ImageReader};
use std::io::Cursor;
use thiserror::Error;

/// Maximum image size (10MB)
pub const MAX_IMAGE_SIZE: usize = 10 * 1024 * 1024;

/// Custom error types for image intake
#[derive(Debug, Error)]
pub enum ImageError {
    #[error("Image data is too large: {0} bytes (max: {1} bytes)")]
    TooLarge(usize, usize),

    #[error("Invalid base64 encoding: {0}")]
    InvalidBase64(#[from] base64::DecodeError),

    #[error("Unsupported image format")]
    UnsupportedFormat,

    #[error("Content type '{0}' is not an image")]
    NotAnImage(String),

    #[error("Failed to read image header: {0}")]
    DecodeFailed(String),

    #[error("Image data is empty")]
    EmptyData,
}

/// Image information extracted during loading
#[derive(Debug, Clone, PartialEq)]
pub struct ImageInfo {
    /// Width in pixels
    pub width: u32,
    /// Height in pixels
    pub height: u32,
    /// Detected format
    pub format: ImageFormat,
    /// Size in bytes
    pub size_bytes: usize,
}

/// Encoded image bytes ready to hand to a recognition engine
#[derive(Clone)]
pub struct ImageInput {
    data: Vec<u8>,
    info: ImageInfo,
}

impl std::fmt::Debug for ImageInput {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ImageInput")
            .field("info", &self.info)
            .finish_non_exhaustive()
    }
}

impl ImageInput {
    /// Accept raw image bytes (multipart uploads, files on disk)
    pub fn from_bytes(data: Vec<u8>) -> Result<Self, ImageError> {
        if data.is_empty() {
            return Err(ImageError::EmptyData);
        }
        if data.len() > MAX_IMAGE_SIZE {
            return Err(ImageError::TooLarge(data.len(), MAX_IMAGE_SIZE));
        }

        let format = detect_format(&data)?;
        let (width, height) = ImageReader::with_format(Cursor::new(&data), format)
            .into_dimensions()
            .map_err(|e| ImageError::DecodeFailed(e.to_string()))?;

        let info = ImageInfo {
            width,
            height,
            format,
            size_bytes: data.len(),
        };

        Ok(Self { data, info })
    }

    /// Accept a base64 payload, with or without a `data:` URL prefix
    pub fn from_base64(encoded: &str) -> Result<Self, ImageError> {
        let payload = strip_data_url(encoded.trim());
        if payload.is_empty() {
            return Err(ImageError::EmptyData);
        }
        let bytes = STANDARD.decode(payload)?;
        Self::from_bytes(bytes)
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn info(&self) -> &ImageInfo {
        &self.info
    }

    pub fn extension(&self) -> &'static str {
        format_to_extension(self.info.format)
    }
}

fn strip_data_url(value: &str) -> &str {
    match value.strip_prefix("data:") {
        Some(rest) => rest.split_once(',').map(|(_, data)| data).unwrap_or(""),
        None => value,
    }
}

/// Boundary check on a declared MIME type (`image/*`)
pub fn ensure_image_mime(content_type: Option<&str>) -> Result<(), ImageError> {
    match content_type {
        Some(mime) if mime.trim().to_ascii_lowercase().starts_with("image/") => Ok(()),
        Some(mime) => Err(ImageError::NotAnImage(mime.to_string())),
        None => Err(ImageError::NotAnImage(String::new())),
    }
}

/// Detect image format from magic bytes
pub fn detect_format(bytes: &[u8]) -> Result<ImageFormat, ImageError> {
    if bytes.len() < 4 {
        return Err(ImageError::UnsupportedFormat);
    }

    match bytes {
        // PNG: 89 50 4E 47 (0x89 P N G)
        [0x89, 0x50, 0x4E, 0x47, ..] => Ok(ImageFormat::Png),

        // JPEG: FF D8 FF
        [0xFF, 0xD8, 0xFF, ..] => Ok(ImageFormat::Jpeg),

        // WebP: RIFF .... WEBP
        [0x52, 0x49, 0x46, 0x46, _, _, _, _, 0x57, 0x45, 0x42, 0x50, ..] => Ok(ImageFormat::WebP),

        // GIF: GIF87a or GIF89a
        [0x47, 0x49, 0x46, 0x38, x, ..] if *x == 0x37 || *x == 0x39 => Ok(ImageFormat::Gif),

        // BMP: BM
        [0x42, 0x4D, ..] => Ok(ImageFormat::Bmp),

        // TIFF: II (little-endian) or MM (big-endian)
        [0x49, 0x49, 0x2A, 0x00, ..] | [0x4D, 0x4D, 0x00, 0x2A, ..] => Ok(ImageFormat::Tiff),

        _ => Err(ImageError::UnsupportedFormat),
    }
}

/// Get the format extension as a string
pub fn format_to_extension(format: ImageFormat) -> &'static str {
    match format {
        ImageFormat::Png => "png",
        ImageFormat::Jpeg => "jpg",
        ImageFormat::WebP => "webp",
        ImageFormat::Gif => "gif",
        ImageFormat::Bmp => "bmp",
        ImageFormat::Tiff => "tiff",
        _ => "img",
    }
}

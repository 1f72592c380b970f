// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Presentation of extracted text: fallback message and download files

use chrono::{NaiveDate, Utc};
use std::path::{Path, PathBuf};
use tracing::info;

/// Shown in place of the text when nothing was detected
pub const NO_TEXT_DETECTED: &str = "No text was detected in the image. Please try:\n\n\
• Using a clearer, higher resolution image\n\
• Ensuring good contrast between text and background\n\
• Making sure the text is not too small or blurry\n\
• Checking that the image actually contains readable text";

/// Shown when recognition fails
pub const PROCESSING_FAILED: &str = "Error processing image. Please try again.";

/// `extracted-text-YYYY-MM-DD.txt`
pub fn download_file_name(date: NaiveDate) -> String {
    format!("extracted-text-{}.txt", date.format("%Y-%m-%d"))
}

/// Download file name for the current UTC date
pub fn download_file_name_today() -> String {
    download_file_name(Utc::now().date_naive())
}

/// Text to present for an extraction outcome
pub fn display_text(text: Option<&str>) -> &str {
    text.unwrap_or(NO_TEXT_DETECTED)
}

/// Write `text` to a dated file under `dir`, returning the file's path
pub async fn save_text(dir: &Path, text: &str) -> std::io::Result<PathBuf> {
    tokio::fs::create_dir_all(dir).await?;
    let path = dir.join(download_file_name_today());
    tokio::fs::write(&path, text.as_bytes()).await?;
    info!("Saved extracted text to {}", path.display());
    Ok(path)
}

// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Recognition orchestration
//!
//! One image at a time: a session is acquired from the engine, configured,
//! used once and always released. The recognized words are put back into
//! reading order and normalized; the engine's raw text is the fallback.

use std::sync::Arc;
use std::time::Instant;
use thiserror::Error;
use tokio::sync::Semaphore;
use tracing::{debug, info, warn};

use super::client::{RecognitionClient, RecognitionEngine};
use super::error::OcrError;
use super::normalize::normalize;
use super::progress::{ProgressReporter, STAGE_ANALYZING, STAGE_PROCESSING};
use super::reading_order::reconstruct;
use super::types::{RecognitionOptions, RecognitionResult};
use crate::config::OcrSettings;
use crate::vision::image_utils::ImageInput;

#[derive(Debug, Error)]
pub enum ExtractionError {
    #[error("A recognition is already in progress")]
    Busy,

    #[error(transparent)]
    Recognition(#[from] OcrError),
}

/// Final text of one recognition run
#[derive(Debug, Clone, PartialEq)]
pub struct Extraction {
    /// Extracted text; `None` when nothing was detected
    pub text: Option<String>,
    pub word_count: usize,
    pub confidence: Option<f32>,
    pub processing_time_ms: u64,
    pub language: String,
}

/// Choose the text to present for a recognition result
///
/// Reconstructed-and-normalized words win when they are not blank;
/// otherwise the trimmed raw text is used. `None` means no text at all.
pub fn select_text(result: &RecognitionResult) -> Option<String> {
    if !result.words.is_empty() {
        let text = normalize(&reconstruct(&result.words));
        if !text.is_empty() {
            return Some(text);
        }
        debug!("Reconstructed text is blank, falling back to raw text");
    }

    let raw = result.raw_text.trim();
    if raw.is_empty() {
        None
    } else {
        Some(raw.to_string())
    }
}

/// Run one recognition with a scoped client session
///
/// The session is released whether recognition succeeded or not; a failed
/// release is logged and does not affect the outcome.
pub async fn run_recognition(
    engine: &dyn RecognitionEngine,
    image: &ImageInput,
    language: &str,
    options: &RecognitionOptions,
    reporter: &ProgressReporter,
) -> Result<RecognitionResult, OcrError> {
    let mut client = engine
        .initialize(language, reporter.engine_callback())
        .await?;

    let outcome = recognize_with(client.as_mut(), image, options, reporter).await;

    if let Err(e) = client.release().await {
        warn!("OCR engine release failed: {}", e);
    }

    outcome
}

async fn recognize_with(
    client: &mut dyn RecognitionClient,
    image: &ImageInput,
    options: &RecognitionOptions,
    reporter: &ProgressReporter,
) -> Result<RecognitionResult, OcrError> {
    client.configure(options).await?;
    reporter.stage(STAGE_ANALYZING);
    client.recognize(image).await
}

/// Single-flight text extraction service
pub struct OcrService {
    engine: Arc<dyn RecognitionEngine>,
    settings: OcrSettings,
    reporter: ProgressReporter,
    gate: Semaphore,
}

impl OcrService {
    pub fn new(engine: Arc<dyn RecognitionEngine>, settings: OcrSettings) -> Self {
        Self {
            engine,
            settings,
            reporter: ProgressReporter::new(),
            gate: Semaphore::new(1),
        }
    }

    pub fn engine_name(&self) -> &'static str {
        self.engine.name()
    }

    pub fn settings(&self) -> &OcrSettings {
        &self.settings
    }

    pub fn progress(&self) -> &ProgressReporter {
        &self.reporter
    }

    /// Whether a recognition is currently running
    pub fn is_busy(&self) -> bool {
        self.gate.available_permits() == 0
    }

    /// Extract text using the configured language
    pub async fn extract(&self, image: &ImageInput) -> Result<Extraction, ExtractionError> {
        self.extract_with_language(image, &self.settings.language)
            .await
    }

    /// Extract text; rejected with `Busy` while another run is in flight
    pub async fn extract_with_language(
        &self,
        image: &ImageInput,
        language: &str,
    ) -> Result<Extraction, ExtractionError> {
        let _permit = self.gate.try_acquire().map_err(|_| ExtractionError::Busy)?;
        let start = Instant::now();

        self.reporter.begin();
        debug!(
            "Recognizing {}x{} {:?} image with {} ({})",
            image.info().width,
            image.info().height,
            image.info().format,
            self.engine.name(),
            language
        );

        let result = match run_recognition(
            self.engine.as_ref(),
            image,
            language,
            &self.settings.options,
            &self.reporter,
        )
        .await
        {
            Ok(result) => result,
            Err(e) => {
                warn!("OCR error: {}", e);
                self.reporter.fail();
                return Err(e.into());
            }
        };

        self.reporter.stage(STAGE_PROCESSING);
        let text = select_text(&result);
        self.reporter.complete();

        let extraction = Extraction {
            word_count: result.words.len(),
            confidence: result.mean_confidence(),
            processing_time_ms: start.elapsed().as_millis() as u64,
            language: language.to_string(),
            text,
        };

        info!(
            "OCR complete: {} words, {} chars, {}ms",
            extraction.word_count,
            extraction.text.as_deref().map(str::len).unwrap_or(0),
            extraction.processing_time_ms
        );

        Ok(extraction)
    }
}

// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Recognition client boundary
//!
//! An engine hands out one client session per image. The session is
//! configured, used for a single recognition and then released.

use async_trait::async_trait;

use super::error::OcrError;
use super::progress::ProgressCallback;
use super::types::{RecognitionOptions, RecognitionResult};
use crate::vision::image_utils::ImageInput;

/// Factory for recognition sessions
#[async_trait]
pub trait RecognitionEngine: Send + Sync {
    fn name(&self) -> &'static str;

    /// Start a session for `language`; `progress` receives fractions in [0, 1]
    async fn initialize(
        &self,
        language: &str,
        progress: ProgressCallback,
    ) -> Result<Box<dyn RecognitionClient>, OcrError>;
}

/// A live recognition session
#[async_trait]
pub trait RecognitionClient: Send {
    async fn configure(&mut self, options: &RecognitionOptions) -> Result<(), OcrError>;

    async fn recognize(&mut self, image: &ImageInput) -> Result<RecognitionResult, OcrError>;

    /// Tear the session down; consumes the client
    async fn release(self: Box<Self>) -> Result<(), OcrError>;
}

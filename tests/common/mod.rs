// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Scripted recognition engine for tests that must not depend on Tesseract

#![allow(dead_code)]

use async_trait::async_trait;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use ocr_text_extractor::vision::image_utils::ImageInput;
use ocr_text_extractor::vision::ocr::{
    BoundingBox, OcrError, ProgressCallback, RecognitionClient, RecognitionEngine,
    RecognitionOptions, RecognitionResult, WordToken,
};

/// 1x1 red PNG
pub const TINY_PNG_BASE64: &str =
    "iVBORw0KGgoAAAANSUhEUgAAAAEAAAABCAYAAAAfFcSJAAAADUlEQVR42mP8z8DwHwAFBQIAX8jx0gAAAABJRU5ErkJggg==";

pub fn tiny_png() -> ImageInput {
    ImageInput::from_base64(TINY_PNG_BASE64).unwrap()
}

pub fn word(text: &str, x0: i32, y0: i32, x1: i32, y1: i32) -> WordToken {
    WordToken::new(text, BoundingBox::new(x0, y0, x1, y1))
}

/// What the scripted engine does at each step
#[derive(Clone, Default)]
pub struct Script {
    pub raw_text: String,
    pub words: Vec<WordToken>,
    pub progress: Vec<f32>,
    pub delay: Option<Duration>,
    pub fail_initialize: bool,
    /// Reject the requested language as not installed
    pub missing_language: bool,
    pub fail_configure: bool,
    pub fail_recognize: bool,
    pub fail_release: bool,
}

impl Script {
    pub fn words(raw_text: &str, words: Vec<WordToken>) -> Self {
        Self {
            raw_text: raw_text.to_string(),
            words,
            ..Self::default()
        }
    }
}

pub struct ScriptedEngine {
    script: Script,
    calls: Arc<Mutex<Vec<String>>>,
}

impl ScriptedEngine {
    pub fn new(script: Script) -> Self {
        Self {
            script,
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Calls made so far, in order
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    pub fn call_log(&self) -> Arc<Mutex<Vec<String>>> {
        self.calls.clone()
    }
}

#[async_trait]
impl RecognitionEngine for ScriptedEngine {
    fn name(&self) -> &'static str {
        "scripted"
    }

    async fn initialize(
        &self,
        language: &str,
        progress: ProgressCallback,
    ) -> Result<Box<dyn RecognitionClient>, OcrError> {
        self.calls
            .lock()
            .unwrap()
            .push(format!("initialize:{}", language));

        if self.script.fail_initialize {
            return Err(OcrError::Initialization("scripted".to_string()));
        }
        if self.script.missing_language {
            return Err(OcrError::LanguageUnavailable(language.to_string()));
        }

        Ok(Box::new(ScriptedClient {
            script: self.script.clone(),
            calls: self.calls.clone(),
            progress,
        }))
    }
}

struct ScriptedClient {
    script: Script,
    calls: Arc<Mutex<Vec<String>>>,
    progress: ProgressCallback,
}

impl ScriptedClient {
    fn record(&self, call: &str) {
        self.calls.lock().unwrap().push(call.to_string());
    }
}

#[async_trait]
impl RecognitionClient for ScriptedClient {
    async fn configure(&mut self, _options: &RecognitionOptions) -> Result<(), OcrError> {
        self.record("configure");
        if self.script.fail_configure {
            return Err(OcrError::Configuration("scripted".to_string()));
        }
        Ok(())
    }

    async fn recognize(&mut self, _image: &ImageInput) -> Result<RecognitionResult, OcrError> {
        self.record("recognize");

        for fraction in &self.script.progress {
            (self.progress)(*fraction);
        }
        if let Some(delay) = self.script.delay {
            tokio::time::sleep(delay).await;
        }
        if self.script.fail_recognize {
            return Err(OcrError::recognition("scripted"));
        }

        Ok(RecognitionResult::new(
            self.script.raw_text.clone(),
            self.script.words.clone(),
        ))
    }

    async fn release(self: Box<Self>) -> Result<(), OcrError> {
        self.record("release");
        if self.script.fail_release {
            return Err(OcrError::Release("scripted".to_string()));
        }
        Ok(())
    }
}

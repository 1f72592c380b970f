// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Progress reporting for a recognition run
//!
//! The engine reports a fraction in [0, 1]; it is mapped into the 30-90
//! display band, bracketed by fixed stage updates before and after.

use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::watch;

/// Engine progress callback, invoked with a fraction in [0, 1]
pub type ProgressCallback = Arc<dyn Fn(f32) + Send + Sync>;

pub const STAGE_INITIALIZING: (u8, &str) = (10, "Initializing advanced OCR engine...");
pub const STAGE_ANALYZING: (u8, &str) = (30, "Analyzing text layout...");
pub const STAGE_PROCESSING: (u8, &str) = (70, "Processing scattered text...");
pub const STAGE_COMPLETE: (u8, &str) = (100, "Processing complete!");
pub const STAGE_FAILED: (u8, &str) = (0, "Error processing image. Please try again.");

const RECOGNITION_FLOOR: f32 = 30.0;
const RECOGNITION_SPAN: f32 = 60.0;

/// Snapshot published to observers
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProgressUpdate {
    pub percent: u8,
    pub message: String,
}

impl ProgressUpdate {
    pub fn new(percent: u8, message: impl Into<String>) -> Self {
        Self {
            percent,
            message: message.into(),
        }
    }

    pub fn idle() -> Self {
        Self::new(0, "Idle")
    }
}

/// Map an engine fraction into the display band (30..=90)
pub fn display_percent(fraction: f32) -> u8 {
    let fraction = if fraction.is_finite() {
        fraction.clamp(0.0, 1.0)
    } else {
        0.0
    };
    (RECOGNITION_FLOOR + fraction * RECOGNITION_SPAN).round() as u8
}

/// Publishes progress on a watch channel
///
/// Within a run the reported percentage never decreases; `begin` and
/// `fail` are the only resets.
#[derive(Debug, Clone)]
pub struct ProgressReporter {
    sender: Arc<watch::Sender<ProgressUpdate>>,
}

impl ProgressReporter {
    pub fn new() -> Self {
        let (sender, _) = watch::channel(ProgressUpdate::idle());
        Self {
            sender: Arc::new(sender),
        }
    }

    pub fn subscribe(&self) -> watch::Receiver<ProgressUpdate> {
        self.sender.subscribe()
    }

    pub fn current(&self) -> ProgressUpdate {
        self.sender.borrow().clone()
    }

    /// Reset for a new run
    pub fn begin(&self) {
        let (percent, message) = STAGE_INITIALIZING;
        self.sender.send_replace(ProgressUpdate::new(percent, message));
    }

    /// Announce a stage; the percentage is held if already past it
    pub fn stage(&self, stage: (u8, &str)) {
        let (percent, message) = stage;
        self.sender.send_modify(|current| {
            *current = ProgressUpdate::new(percent.max(current.percent), message);
        });
    }

    /// Engine progress, mapped into the recognition band
    pub fn recognizing(&self, fraction: f32) {
        let fraction = if fraction.is_finite() {
            fraction.clamp(0.0, 1.0)
        } else {
            0.0
        };
        let message = format!("Recognizing text... {}%", (fraction * 100.0).round() as u8);
        self.advance(display_percent(fraction), &message);
    }

    pub fn complete(&self) {
        self.stage(STAGE_COMPLETE);
    }

    pub fn fail(&self) {
        let (percent, message) = STAGE_FAILED;
        self.sender.send_replace(ProgressUpdate::new(percent, message));
    }

    /// Callback handed to the engine
    pub fn engine_callback(&self) -> ProgressCallback {
        let reporter = self.clone();
        Arc::new(move |fraction| reporter.recognizing(fraction))
    }

    fn advance(&self, percent: u8, message: &str) {
        self.sender.send_if_modified(|current| {
            if percent < current.percent {
                return false;
            }
            *current = ProgressUpdate::new(percent, message);
            true
        });
    }
}

impl Default for ProgressReporter {
    fn default() -> Self {
        Self::new()
    }
}

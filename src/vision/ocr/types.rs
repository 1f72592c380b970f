// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Recognition data model shared by the engine, the reconstructor and the API

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Characters the engine is allowed to emit by default
pub const DEFAULT_CHARACTER_WHITELIST: &str =
    "ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789 .,!?-:;()[]{}\"'/\\@#$%^&*+=<>|`~";

/// Default recognition language
pub const DEFAULT_LANGUAGE: &str = "eng";

/// Pixel bounding box of a recognized word
///
/// Missing coordinates deserialize as 0 so that partial boxes from external
/// engines never fail the request.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoundingBox {
    #[serde(default)]
    pub x0: i32,
    #[serde(default)]
    pub y0: i32,
    #[serde(default)]
    pub x1: i32,
    #[serde(default)]
    pub y1: i32,
}

impl BoundingBox {
    pub fn new(x0: i32, y0: i32, x1: i32, y1: i32) -> Self {
        Self { x0, y0, x1, y1 }
    }

    /// Build a box from a top-left corner and a size
    pub fn from_rect(left: i32, top: i32, width: i32, height: i32) -> Self {
        Self {
            x0: left,
            y0: top,
            x1: left.saturating_add(width),
            y1: top.saturating_add(height),
        }
    }
}

/// A single recognized word
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WordToken {
    #[serde(default)]
    pub text: String,
    #[serde(default, alias = "boundingBox")]
    pub bbox: Option<BoundingBox>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub confidence: Option<f32>,
}

impl WordToken {
    pub fn new(text: impl Into<String>, bbox: BoundingBox) -> Self {
        Self {
            text: text.into(),
            bbox: Some(bbox),
            confidence: None,
        }
    }

    pub fn with_confidence(mut self, value: f32) -> Self {
        self.confidence = Some(value);
        self
    }
}

/// Output of one recognition pass
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecognitionResult {
    #[serde(default)]
    pub raw_text: String,
    #[serde(default)]
    pub words: Vec<WordToken>,
}

impl RecognitionResult {
    pub fn new(raw_text: impl Into<String>, words: Vec<WordToken>) -> Self {
        Self {
            raw_text: raw_text.into(),
            words,
        }
    }

    /// Mean word confidence, ignoring words the engine did not score
    pub fn mean_confidence(&self) -> Option<f32> {
        let scores: Vec<f32> = self
            .words
            .iter()
            .filter_map(|w| w.confidence)
            .filter(|c| *c >= 0.0)
            .collect();
        if scores.is_empty() {
            return None;
        }
        Some(scores.iter().sum::<f32>() / scores.len() as f32)
    }
}

/// Tesseract page segmentation modes
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PageSegmentationMode {
    OsdOnly,
    AutoOsd,
    AutoOnly,
    Auto,
    SingleColumn,
    SingleBlockVertText,
    SingleBlock,
    SingleLine,
    SingleWord,
    CircleWord,
    SingleChar,
    #[default]
    SparseText,
    SparseTextOsd,
    RawLine,
}

impl PageSegmentationMode {
    const ALL: [PageSegmentationMode; 14] = [
        Self::OsdOnly,
        Self::AutoOsd,
        Self::AutoOnly,
        Self::Auto,
        Self::SingleColumn,
        Self::SingleBlockVertText,
        Self::SingleBlock,
        Self::SingleLine,
        Self::SingleWord,
        Self::CircleWord,
        Self::SingleChar,
        Self::SparseText,
        Self::SparseTextOsd,
        Self::RawLine,
    ];

    /// Numeric value passed to `--psm`
    pub fn as_number(self) -> u8 {
        Self::ALL
            .iter()
            .position(|mode| *mode == self)
            .map(|idx| idx as u8)
            .unwrap_or(3)
    }

    pub fn from_number(value: u8) -> Option<Self> {
        Self::ALL.get(value as usize).copied()
    }
}

impl fmt::Display for PageSegmentationMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_number())
    }
}

impl FromStr for PageSegmentationMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let value: u8 = s
            .trim()
            .parse()
            .map_err(|_| format!("page segmentation mode must be a number, got '{}'", s))?;
        Self::from_number(value)
            .ok_or_else(|| format!("page segmentation mode must be 0-13, got {}", value))
    }
}

/// Engine configuration applied after initialization
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecognitionOptions {
    pub page_segmentation_mode: PageSegmentationMode,
    pub character_whitelist: Option<String>,
    pub preserve_interword_spacing: bool,
}

impl Default for RecognitionOptions {
    fn default() -> Self {
        Self {
            page_segmentation_mode: PageSegmentationMode::default(),
            character_whitelist: Some(DEFAULT_CHARACTER_WHITELIST.to_string()),
            preserve_interword_spacing: true,
        }
    }
}

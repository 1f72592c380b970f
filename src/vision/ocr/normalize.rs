// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Deterministic cleanup of reconstructed OCR text

use regex::Regex;
use std::sync::OnceLock;

/// Ordered rewrite rules; each runs once over the previous rule's output
#[derive(Debug, Clone)]
pub struct TextNormalizer {
    rules: Vec<(Regex, &'static str)>,
}

impl TextNormalizer {
    pub fn new() -> Self {
        let rules = vec![
            // Whitespace runs
            (Regex::new(r"\s+").unwrap(), " "),
            // lowercase followed by uppercase ("wordNext")
            (Regex::new(r"([a-z])([A-Z])").unwrap(), "${1} ${2}"),
            // digit followed by letter
            (Regex::new(r"([0-9])([A-Za-z])").unwrap(), "${1} ${2}"),
            // letter followed by digit
            (Regex::new(r"([A-Za-z])([0-9])").unwrap(), "${1} ${2}"),
            // Blank lines
            (Regex::new(r"\n\s*\n").unwrap(), "\n"),
        ];

        Self { rules }
    }

    pub fn normalize(&self, text: &str) -> String {
        let mut current = text.to_string();
        for (pattern, replacement) in &self.rules {
            current = pattern.replace_all(&current, *replacement).into_owned();
        }
        current.trim().to_string()
    }
}

impl Default for TextNormalizer {
    fn default() -> Self {
        Self::new()
    }
}

/// Normalize text with the shared rule set
pub fn normalize(text: &str) -> String {
    static NORMALIZER: OnceLock<TextNormalizer> = OnceLock::new();
    NORMALIZER.get_or_init(TextNormalizer::new).normalize(text)
}

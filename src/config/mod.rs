// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Runtime settings for the recognition engine and the HTTP server
//!
//! Values come from command-line flags with environment fallbacks; see
//! `cli::EngineArgs` and `cli::serve::ServeArgs`.

use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::PathBuf;

use crate::vision::ocr::{RecognitionOptions, TesseractEngine, DEFAULT_LANGUAGE};

/// Default tesseract binary, resolved through `PATH`
pub const DEFAULT_TESSERACT_PATH: &str = "tesseract";

/// Recognition settings applied to every session
#[derive(Debug, Clone, PartialEq)]
pub struct OcrSettings {
    /// Tesseract language code(s), e.g. `eng` or `eng+deu`
    pub language: String,
    pub options: RecognitionOptions,
    pub tesseract_path: PathBuf,
    pub dpi: Option<u32>,
}

impl Default for OcrSettings {
    fn default() -> Self {
        Self {
            language: DEFAULT_LANGUAGE.to_string(),
            options: RecognitionOptions::default(),
            tesseract_path: PathBuf::from(DEFAULT_TESSERACT_PATH),
            dpi: None,
        }
    }
}

impl OcrSettings {
    /// Tesseract engine for these settings
    pub fn tesseract(&self) -> TesseractEngine {
        let engine = TesseractEngine::new(&self.tesseract_path);
        match self.dpi {
            Some(dpi) => engine.with_dpi(dpi),
            None => engine,
        }
    }
}

/// HTTP listener settings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerSettings {
    pub host: IpAddr,
    pub port: u16,
}

impl ServerSettings {
    pub fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: IpAddr::V4(Ipv4Addr::LOCALHOST),
            port: 8080,
        }
    }
}

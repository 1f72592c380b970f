// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
pub mod extract;
pub mod serve;

use anyhow::Result;
use clap::{ArgAction, Args, Parser, Subcommand};
use std::path::PathBuf;

use crate::config::{OcrSettings, DEFAULT_TESSERACT_PATH};
use crate::vision::ocr::{
    PageSegmentationMode, RecognitionOptions, DEFAULT_CHARACTER_WHITELIST, DEFAULT_LANGUAGE,
};

const WHITELIST_ENV: &str = "OCR_CHAR_WHITELIST";

/// OCR text extraction CLI
#[derive(Parser, Debug)]
#[command(name = "ocr-extract")]
#[command(version)]
#[command(about = "Extract text from images in reading order", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Start the HTTP server
    Serve(serve::ServeArgs),

    /// Extract text from one image file
    Extract(extract::ExtractArgs),
}

/// Recognition engine settings shared by all commands
#[derive(Args, Debug, Clone)]
pub struct EngineArgs {
    /// Tesseract language code(s), e.g. eng or eng+deu
    #[arg(long, env = "OCR_LANGUAGE", default_value = DEFAULT_LANGUAGE)]
    pub language: String,

    /// Page segmentation mode (0-13)
    #[arg(long, env = "OCR_PSM", default_value = "11")]
    pub psm: PageSegmentationMode,

    /// Characters the engine may emit; an empty value disables the whitelist
    #[arg(long, env = WHITELIST_ENV)]
    pub char_whitelist: Option<String>,

    /// Keep the spacing between words as recognized
    #[arg(
        long,
        env = "OCR_PRESERVE_INTERWORD_SPACES",
        default_value_t = true,
        action = ArgAction::Set
    )]
    pub preserve_interword_spaces: bool,

    /// Path to the tesseract binary
    #[arg(long, env = "TESSERACT_PATH", default_value = DEFAULT_TESSERACT_PATH)]
    pub tesseract_path: PathBuf,

    /// Resolution hint for images without DPI metadata
    #[arg(long, env = "OCR_DPI")]
    pub dpi: Option<u32>,
}

impl EngineArgs {
    pub fn into_settings(self) -> OcrSettings {
        let explicitly_empty =
            std::env::var_os(WHITELIST_ENV).is_some_and(|value| value.is_empty());
        let character_whitelist = resolve_whitelist(self.char_whitelist, explicitly_empty);

        OcrSettings {
            language: self.language,
            options: RecognitionOptions {
                page_segmentation_mode: self.psm,
                character_whitelist,
                preserve_interword_spacing: self.preserve_interword_spaces,
            },
            tesseract_path: self.tesseract_path,
            dpi: self.dpi,
        }
    }
}

/// An empty value (flag or environment) disables the whitelist
fn resolve_whitelist(value: Option<String>, env_empty: bool) -> Option<String> {
    match value {
        Some(value) if value.is_empty() => None,
        Some(value) => Some(value),
        None if env_empty => None,
        None => Some(DEFAULT_CHARACTER_WHITELIST.to_string()),
    }
}

/// Execute CLI command
pub async fn execute(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Serve(args) => serve::serve(args).await,
        Commands::Extract(args) => extract::extract(args).await,
    }
}

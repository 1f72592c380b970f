// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Tesseract command-line engine
//!
//! Each session owns a scratch directory for the input image. Recognition
//! runs `tesseract ... tsv` and turns word rows into tokens; the raw text is
//! rebuilt from the same rows (words per line, lines per paragraph, blank
//! line between paragraphs).

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::process::Output;
use tempfile::TempDir;
use tokio::process::Command;
use tracing::{debug, info};

use super::client::{RecognitionClient, RecognitionEngine};
use super::error::OcrError;
use super::progress::ProgressCallback;
use super::types::{BoundingBox, RecognitionOptions, RecognitionResult, WordToken};
use crate::vision::image_utils::ImageInput;

/// TSV level of word rows
const WORD_LEVEL: u32 = 5;

/// Number of TSV columns emitted by tesseract 4+
const TSV_COLUMNS: usize = 12;

/// Engine backed by the `tesseract` binary
#[derive(Debug, Clone)]
pub struct TesseractEngine {
    binary: PathBuf,
    dpi: Option<u32>,
}

impl TesseractEngine {
    pub fn new(binary: impl Into<PathBuf>) -> Self {
        Self {
            binary: binary.into(),
            dpi: None,
        }
    }

    /// Resolution hint for images without DPI metadata
    pub fn with_dpi(mut self, dpi: u32) -> Self {
        self.dpi = Some(dpi);
        self
    }

    pub fn binary(&self) -> &Path {
        &self.binary
    }

    async fn run(&self, args: &[&str]) -> Result<Output, OcrError> {
        Command::new(&self.binary)
            .args(args)
            .output()
            .await
            .map_err(|e| {
                OcrError::Initialization(format!(
                    "failed to run {} (is it installed?): {}",
                    self.binary.display(),
                    e
                ))
            })
    }

    /// Languages installed for the binary
    pub async fn installed_languages(&self) -> Result<Vec<String>, OcrError> {
        let output = self.run(&["--list-langs"]).await?;
        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(OcrError::Initialization(format!(
                "tesseract --list-langs failed: {}",
                stderr.trim()
            )));
        }
        // Some builds print the list on stderr
        let listing = if output.stdout.is_empty() {
            String::from_utf8_lossy(&output.stderr).to_string()
        } else {
            String::from_utf8_lossy(&output.stdout).to_string()
        };
        Ok(parse_language_list(&listing))
    }
}

#[async_trait]
impl RecognitionEngine for TesseractEngine {
    fn name(&self) -> &'static str {
        "tesseract"
    }

    async fn initialize(
        &self,
        language: &str,
        progress: ProgressCallback,
    ) -> Result<Box<dyn RecognitionClient>, OcrError> {
        let version = self.run(&["--version"]).await?;
        if !version.status.success() {
            return Err(OcrError::Initialization(format!(
                "{} --version exited with {}",
                self.binary.display(),
                version.status
            )));
        }

        let installed = self.installed_languages().await?;
        if let Some(missing) = language
            .split('+')
            .find(|lang| !installed.iter().any(|l| l.as_str() == *lang))
        {
            return Err(OcrError::LanguageUnavailable(missing.to_string()));
        }

        let workdir = tempfile::Builder::new().prefix("ocr-session-").tempdir()?;
        debug!(
            "Tesseract session ready: language={}, workdir={}",
            language,
            workdir.path().display()
        );

        Ok(Box::new(TesseractClient {
            binary: self.binary.clone(),
            dpi: self.dpi,
            language: language.to_string(),
            options: RecognitionOptions::default(),
            workdir,
            progress,
        }))
    }
}

/// One tesseract session
pub struct TesseractClient {
    binary: PathBuf,
    dpi: Option<u32>,
    language: String,
    options: RecognitionOptions,
    workdir: TempDir,
    progress: ProgressCallback,
}

impl TesseractClient {
    fn command_args(&self, image_path: &Path) -> Vec<String> {
        let mut args = vec![
            image_path.display().to_string(),
            "stdout".to_string(),
            "-l".to_string(),
            self.language.clone(),
            "--psm".to_string(),
            self.options.page_segmentation_mode.to_string(),
        ];
        if let Some(dpi) = self.dpi {
            args.push("--dpi".to_string());
            args.push(dpi.to_string());
        }
        if let Some(whitelist) = self
            .options
            .character_whitelist
            .as_deref()
            .filter(|w| !w.is_empty())
        {
            args.push("-c".to_string());
            args.push(format!("tessedit_char_whitelist={}", whitelist));
        }
        if self.options.preserve_interword_spacing {
            args.push("-c".to_string());
            args.push("preserve_interword_spaces=1".to_string());
        }
        args.push("tsv".to_string());
        args
    }
}

#[async_trait]
impl RecognitionClient for TesseractClient {
    async fn configure(&mut self, options: &RecognitionOptions) -> Result<(), OcrError> {
        if let Some(whitelist) = &options.character_whitelist {
            if whitelist.contains('\n') {
                return Err(OcrError::Configuration(
                    "character whitelist cannot contain newlines".to_string(),
                ));
            }
        }
        self.options = options.clone();
        Ok(())
    }

    async fn recognize(&mut self, image: &ImageInput) -> Result<RecognitionResult, OcrError> {
        let image_path = self
            .workdir
            .path()
            .join(format!("input.{}", image.extension()));
        tokio::fs::write(&image_path, image.data()).await?;

        (self.progress)(0.0);
        let args = self.command_args(&image_path);
        debug!("Running {} {:?}", self.binary.display(), args);

        let output = Command::new(&self.binary).args(&args).output().await?;

        if let Err(e) = tokio::fs::remove_file(&image_path).await {
            debug!("Could not remove {}: {}", image_path.display(), e);
        }

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(OcrError::recognition(format!(
                "tesseract exited with {}: {}",
                output.status,
                stderr.trim()
            )));
        }

        let result = parse_tsv(&String::from_utf8_lossy(&output.stdout));
        (self.progress)(1.0);

        info!(
            "Tesseract recognized {} words ({} chars raw)",
            result.words.len(),
            result.raw_text.len()
        );
        Ok(result)
    }

    async fn release(self: Box<Self>) -> Result<(), OcrError> {
        let client = *self;
        let path = client.workdir.path().to_path_buf();
        client
            .workdir
            .close()
            .map_err(|e| OcrError::Release(format!("{}: {}", path.display(), e)))
    }
}

/// Parse `tesseract --list-langs` output
pub fn parse_language_list(listing: &str) -> Vec<String> {
    listing
        .lines()
        .filter(|line| !line.starts_with("List of available languages"))
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}

/// Parse tesseract TSV output into a recognition result
pub fn parse_tsv(tsv: &str) -> RecognitionResult {
    let mut words = Vec::new();
    let mut raw_text = String::new();
    let mut previous: Option<(u32, u32, u32, u32)> = None;

    for row in tsv.lines() {
        let cols: Vec<&str> = row.splitn(TSV_COLUMNS, '\t').collect();
        if cols.len() < TSV_COLUMNS {
            continue;
        }
        // Header row and malformed rows fail here
        let Ok(level) = cols[0].parse::<u32>() else {
            continue;
        };
        if level != WORD_LEVEL {
            continue;
        }

        let text = cols[11].trim_end_matches(['\r', '\n']);
        if text.trim().is_empty() {
            continue;
        }

        let number = |idx: usize| cols[idx].trim().parse::<u32>().unwrap_or(0);
        let coord = |idx: usize| cols[idx].trim().parse::<i32>().unwrap_or(0);
        let key = (number(1), number(2), number(3), number(4));

        match previous {
            Some(prev) if prev == key => raw_text.push(' '),
            Some(prev) if (prev.0, prev.1, prev.2) == (key.0, key.1, key.2) => raw_text.push('\n'),
            Some(_) => raw_text.push_str("\n\n"),
            None => {}
        }
        raw_text.push_str(text);
        previous = Some(key);

        let bbox = BoundingBox::from_rect(coord(6), coord(7), coord(8), coord(9));
        let mut word = WordToken::new(text, bbox);
        if let Ok(conf) = cols[10].trim().parse::<f32>() {
            word = word.with_confidence(conf);
        }
        words.push(word);
    }

    RecognitionResult::new(raw_text, words)
}

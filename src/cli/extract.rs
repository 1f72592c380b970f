// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
use anyhow::{Context, Result};
use clap::Args;
use indicatif::{ProgressBar, ProgressStyle};
use std::path::PathBuf;
use std::sync::Arc;

use super::EngineArgs;
use crate::output::{display_text, save_text, PROCESSING_FAILED};
use crate::vision::image_utils::ImageInput;
use crate::vision::ocr::{OcrService, ProgressReporter};

/// Arguments for the extract command
#[derive(Args, Debug)]
pub struct ExtractArgs {
    /// Image file to read
    pub image: PathBuf,

    /// Save the text to extracted-text-YYYY-MM-DD.txt
    #[arg(long)]
    pub save: bool,

    /// Directory for the saved text file
    #[arg(long, default_value = ".", requires = "save")]
    pub output_dir: PathBuf,

    #[command(flatten)]
    pub engine: EngineArgs,
}

/// Extract text from one image and print it
pub async fn extract(args: ExtractArgs) -> Result<()> {
    let bytes = tokio::fs::read(&args.image)
        .await
        .with_context(|| format!("Failed to read {}", args.image.display()))?;
    let image = ImageInput::from_bytes(bytes)
        .with_context(|| format!("{} is not a usable image", args.image.display()))?;

    let settings = args.engine.into_settings();
    let engine = Arc::new(settings.tesseract());
    let service = OcrService::new(engine, settings);

    let bar = progress_bar();
    let watcher = tokio::spawn(follow_progress(service.progress().clone(), bar.clone()));

    let outcome = service.extract(&image).await;
    watcher.abort();

    let extraction = match outcome {
        Ok(extraction) => {
            bar.finish_with_message(service.progress().current().message);
            extraction
        }
        Err(e) => {
            bar.abandon_with_message(PROCESSING_FAILED);
            return Err(e).context("Text extraction failed");
        }
    };

    println!("{}", display_text(extraction.text.as_deref()));

    if args.save {
        match extraction.text.as_deref() {
            Some(text) => {
                let path = save_text(&args.output_dir, text).await.with_context(|| {
                    format!("Failed to save text to {}", args.output_dir.display())
                })?;
                eprintln!("💾 Saved to {}", path.display());
            }
            None => eprintln!("⚠️  No text detected, nothing saved"),
        }
    }

    Ok(())
}

async fn follow_progress(reporter: ProgressReporter, bar: ProgressBar) {
    let mut updates = reporter.subscribe();
    loop {
        {
            let update = updates.borrow_and_update();
            bar.set_position(update.percent as u64);
            bar.set_message(update.message.clone());
        }
        if updates.changed().await.is_err() {
            break;
        }
    }
}

fn progress_bar() -> ProgressBar {
    let bar = ProgressBar::new(100);
    let style = ProgressStyle::with_template(
        "{spinner:.cyan.bold} {bar:40.cyan/blue} {pos:>3.bold}% {msg:.yellow}",
    )
    .unwrap_or_else(|_| ProgressStyle::default_bar())
    .progress_chars("█▉▊▋▌▍▎▏ ");
    bar.set_style(style);
    bar
}

// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
use anyhow::Result;
use clap::Args;
use std::net::IpAddr;
use std::path::Path;
use std::sync::Arc;
use tracing::{info, warn};

use super::EngineArgs;
use crate::api::start_server;
use crate::config::ServerSettings;
use crate::vision::ocr::OcrService;

/// Arguments for the serve command
#[derive(Args, Debug)]
pub struct ServeArgs {
    /// Address to bind
    #[arg(long, env = "API_HOST", default_value = "127.0.0.1")]
    pub host: IpAddr,

    /// Port to listen on
    #[arg(long, env = "API_PORT", default_value_t = 8080)]
    pub port: u16,

    #[command(flatten)]
    pub engine: EngineArgs,
}

/// Start the HTTP server
pub async fn serve(args: ServeArgs) -> Result<()> {
    let server = ServerSettings {
        host: args.host,
        port: args.port,
    };
    let settings = args.engine.into_settings();
    let engine = settings.tesseract();

    match engine.installed_languages().await {
        Ok(languages) => info!(
            "{}",
            engine_summary(engine.binary(), &settings.language, languages.len())
        ),
        Err(e) => warn!("Tesseract is not usable yet, requests will fail: {}", e),
    }

    println!("🚀 OCR server starting on http://{}", server.socket_addr());

    let ocr = Arc::new(OcrService::new(Arc::new(engine), settings));
    start_server(server, ocr).await
}

fn engine_summary(binary: &Path, language: &str, installed: usize) -> String {
    format!(
        "Using {} (language {}, {} installed)",
        binary.display(),
        language,
        installed
    )
}

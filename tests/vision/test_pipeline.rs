// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1

//! Recognition orchestration tests
//!
//! Drive `OcrService` and `run_recognition` with a scripted engine and check:
//! - the client session is always released
//! - release failures never change the outcome
//! - progress stays in the recognition band and never goes backwards
//! - only one recognition runs at a time

use std::sync::Arc;
use std::time::Duration;

use ocr_text_extractor::config::OcrSettings;
use ocr_text_extractor::vision::ocr::{
    run_recognition, ExtractionError, OcrError, OcrService, ProgressReporter, RecognitionOptions,
};

use crate::common::{tiny_png, word, Script, ScriptedEngine};

fn service(engine: Arc<ScriptedEngine>) -> OcrService {
    OcrService::new(engine, OcrSettings::default())
}

fn scattered_words() -> Script {
    Script::words(
        "Bottom Top",
        vec![
            word("Bottom", 0, 100, 60, 120),
            word("right", 200, 0, 250, 20),
            word("Top", 0, 0, 40, 20),
        ],
    )
}

#[tokio::test]
async fn test_extract_releases_after_success() {
    let engine = Arc::new(ScriptedEngine::new(scattered_words()));
    let ocr = service(engine.clone());

    let extraction = ocr.extract(&tiny_png()).await.unwrap();

    assert_eq!(extraction.text.as_deref(), Some("Top right Bottom"));
    assert_eq!(extraction.word_count, 3);
    assert_eq!(extraction.language, "eng");
    assert_eq!(
        engine.calls(),
        vec!["initialize:eng", "configure", "recognize", "release"]
    );
}

#[tokio::test]
async fn test_extract_releases_after_recognition_failure() {
    let engine = Arc::new(ScriptedEngine::new(Script {
        fail_recognize: true,
        ..scattered_words()
    }));
    let ocr = service(engine.clone());

    let err = ocr.extract(&tiny_png()).await.unwrap_err();

    assert!(matches!(
        err,
        ExtractionError::Recognition(OcrError::Recognition(_))
    ));
    assert_eq!(engine.calls().last().map(String::as_str), Some("release"));

    let progress = ocr.progress().current();
    assert_eq!(progress.percent, 0);
    assert_eq!(progress.message, "Error processing image. Please try again.");
}

#[tokio::test]
async fn test_extract_releases_after_configuration_failure() {
    let engine = Arc::new(ScriptedEngine::new(Script {
        fail_configure: true,
        ..scattered_words()
    }));
    let ocr = service(engine.clone());

    let err = ocr.extract(&tiny_png()).await.unwrap_err();

    assert!(matches!(
        err,
        ExtractionError::Recognition(OcrError::Configuration(_))
    ));
    assert_eq!(
        engine.calls(),
        vec!["initialize:eng", "configure", "release"]
    );
}

#[tokio::test]
async fn test_initialization_failure_has_nothing_to_release() {
    let engine = Arc::new(ScriptedEngine::new(Script {
        fail_initialize: true,
        ..Script::default()
    }));
    let ocr = service(engine.clone());

    let err = ocr.extract(&tiny_png()).await.unwrap_err();

    assert!(matches!(
        err,
        ExtractionError::Recognition(OcrError::Initialization(_))
    ));
    assert_eq!(engine.calls(), vec!["initialize:eng"]);
}

#[tokio::test]
async fn test_release_failure_keeps_text() {
    let engine = Arc::new(ScriptedEngine::new(Script {
        fail_release: true,
        ..scattered_words()
    }));
    let ocr = service(engine.clone());

    let extraction = ocr.extract(&tiny_png()).await.unwrap();

    assert_eq!(extraction.text.as_deref(), Some("Top right Bottom"));
    assert_eq!(engine.calls().last().map(String::as_str), Some("release"));
}

#[tokio::test]
async fn test_no_words_falls_back_to_raw_text() {
    let engine = Arc::new(ScriptedEngine::new(Script::words("  raw line\n", vec![])));
    let ocr = service(engine);

    let extraction = ocr.extract(&tiny_png()).await.unwrap();
    assert_eq!(extraction.text.as_deref(), Some("raw line"));
}

#[tokio::test]
async fn test_nothing_detected() {
    let engine = Arc::new(ScriptedEngine::new(Script::default()));
    let ocr = service(engine);

    let extraction = ocr.extract(&tiny_png()).await.unwrap();
    assert_eq!(extraction.text, None);
    assert_eq!(extraction.word_count, 0);
    assert_eq!(extraction.confidence, None);
}

#[tokio::test]
async fn test_language_override() {
    let engine = Arc::new(ScriptedEngine::new(scattered_words()));
    let ocr = service(engine.clone());

    let extraction = ocr
        .extract_with_language(&tiny_png(), "deu")
        .await
        .unwrap();

    assert_eq!(extraction.language, "deu");
    assert_eq!(engine.calls()[0], "initialize:deu");
}

#[tokio::test]
async fn test_progress_band_never_decreases() {
    let engine = ScriptedEngine::new(Script {
        progress: vec![0.0, 0.5, 0.25, 1.0, 0.9],
        ..scattered_words()
    });
    let reporter = ProgressReporter::new();
    reporter.begin();

    run_recognition(
        &engine,
        &tiny_png(),
        "eng",
        &RecognitionOptions::default(),
        &reporter,
    )
    .await
    .unwrap();

    let progress = reporter.current();
    assert_eq!(progress.percent, 90);
    assert_eq!(progress.message, "Recognizing text... 100%");
}

#[tokio::test]
async fn test_progress_complete_after_extract() {
    let engine = Arc::new(ScriptedEngine::new(Script {
        progress: vec![0.3, 0.7],
        ..scattered_words()
    }));
    let ocr = service(engine);
    let receiver = ocr.progress().subscribe();

    ocr.extract(&tiny_png()).await.unwrap();

    let progress = receiver.borrow().clone();
    assert_eq!(progress.percent, 100);
    assert_eq!(progress.message, "Processing complete!");
}

#[tokio::test]
async fn test_concurrent_extract_is_rejected_while_busy() {
    let engine = Arc::new(ScriptedEngine::new(Script {
        delay: Some(Duration::from_millis(300)),
        ..scattered_words()
    }));
    let ocr = Arc::new(service(engine.clone()));
    assert!(!ocr.is_busy());

    let first = {
        let ocr = ocr.clone();
        tokio::spawn(async move { ocr.extract(&tiny_png()).await })
    };

    while !ocr.is_busy() {
        tokio::time::sleep(Duration::from_millis(5)).await;
    }

    let second = ocr.extract(&tiny_png()).await;
    assert!(matches!(second, Err(ExtractionError::Busy)));

    let first = first.await.unwrap().unwrap();
    assert_eq!(first.text.as_deref(), Some("Top right Bottom"));
    assert!(!ocr.is_busy());

    // the gate is free again once the first run returns
    assert!(ocr.extract(&tiny_png()).await.is_ok());
    let initializations = engine
        .calls()
        .iter()
        .filter(|call| call.starts_with("initialize"))
        .count();
    assert_eq!(initializations, 2);
}

// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Neural OCR adapter built on the `ocrs` crate, a pure-Rust OCR engine backed
// by models executed via `rten`.
//
// # Feature Gate
//
// This module is only available when the `ocr` feature is enabled:
//
// ```toml
// ocrsentry-vision = { path = "crates/ocrsentry-vision", features = ["ocr"] }
// ```
//
// # Model Setup
//
// The engine requires two model files:
//
// - **Detection model** (`text-detection.rten`) — locates text regions.
// - **Recognition model** (`text-recognition.rten`) — decodes characters.
//
// Running the `ocrs` CLI once downloads them to the cache directory
// (`$XDG_CACHE_HOME/ocrs`, typically `~/.cache/ocrs`):
//
// ```sh
// cargo install ocrs-cli
// ocrs some-image.png
// ```

use std::path::{Path, PathBuf};

use image::DynamicImage;
use ocrs::{ImageSource, OcrEngine as OcrsBackend, OcrEngineParams, TextItem};
use ocrsentry_core::error::{Result, SentryError};
use ocrsentry_core::types::{BoundingBox, Recognition, TextFragment};
use rten::Model;
use tracing::{debug, info, instrument};

use super::OcrEngine;

/// Well-known filenames for the detection and recognition models.
const DETECTION_MODEL_FILENAME: &str = "text-detection.rten";
const RECOGNITION_MODEL_FILENAME: &str = "text-recognition.rten";

/// Default directory for cached OCR model files.
///
/// Follows the XDG Base Directory specification: `$XDG_CACHE_HOME/ocrs`, falling
/// back to `~/.cache/ocrs` when `XDG_CACHE_HOME` is unset.
fn default_model_dir() -> PathBuf {
    if let Ok(xdg) = std::env::var("XDG_CACHE_HOME") {
        PathBuf::from(xdg).join("ocrs")
    } else if let Ok(home) = std::env::var("HOME") {
        PathBuf::from(home).join(".cache").join("ocrs")
    } else {
        PathBuf::from("ocrs-models")
    }
}

/// Locations of the two model files.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OcrsModels {
    pub detection_model_path: PathBuf,
    pub recognition_model_path: PathBuf,
}

impl Default for OcrsModels {
    /// Models in the default cache directory.
    fn default() -> Self {
        Self::from_dir(default_model_dir())
    }
}

impl OcrsModels {
    /// Expects `dir` to contain `text-detection.rten` and `text-recognition.rten`.
    pub fn from_dir(dir: impl AsRef<Path>) -> Self {
        let dir = dir.as_ref();
        Self {
            detection_model_path: dir.join(DETECTION_MODEL_FILENAME),
            recognition_model_path: dir.join(RECOGNITION_MODEL_FILENAME),
        }
    }

    /// Verify that both model files exist.
    pub fn validate(&self) -> Result<()> {
        for (kind, path) in [
            ("detection", &self.detection_model_path),
            ("recognition", &self.recognition_model_path),
        ] {
            if !path.exists() {
                return Err(SentryError::Ocr(format!(
                    "{kind} model not found at {}; run `ocrs` once to download models",
                    path.display()
                )));
            }
        }
        Ok(())
    }
}

/// OCR via `ocrs`.
///
/// Model loading is the expensive step; the engine is built once and reused
/// for every image in a run.
///
/// **Important:** `ocrs` and `rten` should be compiled in release mode. Debug
/// builds are 10-100x slower.
pub struct OcrsEngine {
    engine: OcrsBackend,
}

impl OcrsEngine {
    /// Load both models and initialise the engine.
    #[instrument(skip_all, fields(
        detection = %models.detection_model_path.display(),
        recognition = %models.recognition_model_path.display(),
    ))]
    pub fn new(models: OcrsModels) -> Result<Self> {
        models.validate()?;

        info!("Loading OCR detection model");
        let detection_model = load_model(&models.detection_model_path, "detection")?;
        info!("Loading OCR recognition model");
        let recognition_model = load_model(&models.recognition_model_path, "recognition")?;

        let engine = OcrsBackend::new(OcrEngineParams {
            detection_model: Some(detection_model),
            recognition_model: Some(recognition_model),
            ..Default::default()
        })
        .map_err(|err| SentryError::Ocr(format!("failed to initialise OCR engine: {}", err)))?;

        info!("OCR engine initialised");
        Ok(Self { engine })
    }
}

fn load_model(path: &Path, kind: &str) -> Result<Model> {
    Model::load_file(path).map_err(|err| {
        SentryError::Ocr(format!(
            "failed to load {kind} model from {}: {}",
            path.display(),
            err
        ))
    })
}

impl OcrEngine for OcrsEngine {
    fn name(&self) -> &str {
        "ocrs"
    }

    /// Detect words, group them into lines, and recognise each line.
    ///
    /// Each non-blank line becomes one fragment carrying its bounding box.
    /// `ocrs` does not report per-line confidence.
    #[instrument(skip_all, fields(width = image.width(), height = image.height()))]
    fn recognize(&self, image: &DynamicImage) -> Result<Recognition> {
        let rgb = image.to_rgb8();
        let (width, height) = rgb.dimensions();

        let source = ImageSource::from_bytes(rgb.as_raw(), (width, height)).map_err(|err| {
            SentryError::Ocr(format!(
                "failed to create image source ({}x{}): {}",
                width, height, err
            ))
        })?;

        let input = self
            .engine
            .prepare_input(source)
            .map_err(|err| SentryError::Ocr(format!("OCR preprocessing failed: {}", err)))?;

        let word_rects = self
            .engine
            .detect_words(&input)
            .map_err(|err| SentryError::Ocr(format!("word detection failed: {}", err)))?;
        debug!(word_count = word_rects.len(), "Words detected");

        let line_rects = self.engine.find_text_lines(&input, &word_rects);
        debug!(line_count = line_rects.len(), "Text lines found");

        let line_texts = self
            .engine
            .recognize_text(&input, &line_rects)
            .map_err(|err| SentryError::Ocr(format!("line recognition failed: {}", err)))?;

        let fragments: Vec<TextFragment> = line_texts
            .iter()
            .flatten()
            .filter_map(|line| {
                let rect = line.bounding_rect();
                line_fragment(
                    line.to_string(),
                    rect.left() as i64,
                    rect.top() as i64,
                    rect.width() as i64,
                    rect.height() as i64,
                )
            })
            .collect();

        info!(recognized_lines = fragments.len(), "ocrs recognition complete");
        Ok(Recognition::new(fragments))
    }
}

/// Turn one recognised line into a fragment.
///
/// Blank lines yield `None`. The rectangle is clipped to the non-negative
/// quadrant, shrinking it when it starts left of or above the image.
fn line_fragment(
    text: String,
    left: i64,
    top: i64,
    width: i64,
    height: i64,
) -> Option<TextFragment> {
    if text.trim().is_empty() {
        return None;
    }
    let (x, w) = clip_span(left, width);
    let (y, h) = clip_span(top, height);
    Some(TextFragment {
        text,
        confidence: None,
        bbox: Some(BoundingBox::new(x, y, w, h)),
    })
}

fn clip_span(start: i64, len: i64) -> (u32, u32) {
    let max = i64::from(u32::MAX);
    let end = start.saturating_add(len.max(0));
    let start = start.clamp(0, max);
    let end = end.clamp(start, max);
    (start as u32, (end - start) as u32)
}

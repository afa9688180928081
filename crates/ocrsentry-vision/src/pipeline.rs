// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// The scan pipeline: load → fingerprint → preprocess → OCR → keyword scan.

use std::path::{Path, PathBuf};

use chrono::Utc;
use image::DynamicImage;
use ocrsentry_core::config::{PreprocessOptions, SentryConfig};
use ocrsentry_core::error::Result;
use ocrsentry_core::scanner::KeywordScanner;
use ocrsentry_core::types::{AnalysisReport, Outcome};
use tracing::{info, instrument, warn};

use crate::loader;
use crate::ocr::{self, OcrEngine};
use crate::preprocess::preprocess;

/// One OCR engine, one keyword scanner and the preprocessing settings,
/// applied to images one at a time.
pub struct Pipeline {
    engine: Box<dyn OcrEngine>,
    scanner: KeywordScanner,
    options: PreprocessOptions,
}

impl Pipeline {
    pub fn new(
        engine: Box<dyn OcrEngine>,
        scanner: KeywordScanner,
        options: PreprocessOptions,
    ) -> Self {
        Self {
            engine,
            scanner,
            options,
        }
    }

    /// Build the engine and scanner described by `config`.
    pub fn from_config(config: &SentryConfig) -> Result<Self> {
        let engine = ocr::build_engine(config)?;
        let scanner = KeywordScanner::new(&config.keywords, config.boundary)?;
        Ok(Self::new(engine, scanner, config.preprocess))
    }

    pub fn engine_name(&self) -> &str {
        self.engine.name()
    }

    pub fn scanner(&self) -> &KeywordScanner {
        &self.scanner
    }

    /// Analyse the image file at `path`.
    ///
    /// Fails with `ImageLoad` when the file is missing or cannot be decoded.
    #[instrument(skip_all, fields(path = %path.as_ref().display(), engine = self.engine.name()))]
    pub fn analyze(&self, path: impl AsRef<Path>) -> Result<AnalysisReport> {
        let loaded = loader::load_image_with_fingerprint(path)?;
        self.run(&loaded.image, loaded.path, Some(loaded.fingerprint))
    }

    /// Analyse an already-decoded image. `source` labels it in the report.
    #[instrument(skip_all, fields(engine = self.engine.name()))]
    pub fn analyze_image(
        &self,
        image: &DynamicImage,
        source: impl Into<PathBuf>,
    ) -> Result<AnalysisReport> {
        self.run(image, source.into(), None)
    }

    fn run(
        &self,
        image: &DynamicImage,
        source: PathBuf,
        fingerprint: Option<String>,
    ) -> Result<AnalysisReport> {
        let processed = DynamicImage::ImageRgb8(preprocess(image, &self.options));
        let recognition = self.engine.recognize(&processed)?;

        let text = recognition.joined_text();
        let findings = self.scanner.scan(&text);
        let outcome = if recognition.is_empty() {
            Outcome::NoText
        } else if findings.is_empty() {
            Outcome::Clean
        } else {
            Outcome::SensitiveFound
        };

        match outcome {
            Outcome::NoText => info!(source = %source.display(), "No text recognised"),
            Outcome::Clean => info!(
                source = %source.display(),
                fragments = recognition.len(),
                "No sensitive keywords found"
            ),
            Outcome::SensitiveFound => warn!(
                source = %source.display(),
                findings = ?findings,
                "Sensitive keywords found"
            ),
        }

        Ok(AnalysisReport {
            source,
            fingerprint,
            engine: self.engine.name().to_string(),
            width: image.width(),
            height: image.height(),
            fragments: recognition.fragments,
            text,
            findings,
            outcome,
            analyzed_at: Utc::now(),
        })
    }
}

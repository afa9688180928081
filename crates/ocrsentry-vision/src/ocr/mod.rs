// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// OCR engine abstraction and the adapters behind it.
//
// The pipeline only ever talks to `dyn OcrEngine`; which adapter backs it is
// a configuration choice (`EngineKind`).

pub mod fixed;
pub mod tesseract;

#[cfg(feature = "ocr")]
pub mod ocrs_engine;

use image::DynamicImage;
use ocrsentry_core::config::SentryConfig;
use ocrsentry_core::error::Result;
use ocrsentry_core::types::{EngineKind, Recognition};
use tracing::info;

pub use fixed::StaticEngine;
pub use tesseract::TesseractEngine;

#[cfg(feature = "ocr")]
pub use ocrs_engine::{OcrsEngine, OcrsModels};

/// A text recognizer.
///
/// Implementations receive the already-preprocessed image and return the
/// recognised fragments in reading order. Engines hold no per-image state.
pub trait OcrEngine {
    /// Short identifier, e.g. `"tesseract"`.
    fn name(&self) -> &str;

    /// Recognise all text in `image`.
    fn recognize(&self, image: &DynamicImage) -> Result<Recognition>;
}

/// Construct the engine selected by `config.engine`.
///
/// Model loading for `ocrs` happens here, so construction can fail on missing
/// model files before any image is touched.
pub fn build_engine(config: &SentryConfig) -> Result<Box<dyn OcrEngine>> {
    info!(engine = %config.engine, "Building OCR engine");
    match config.engine {
        EngineKind::Tesseract => Ok(Box::new(TesseractEngine::new(config.tesseract.clone()))),
        EngineKind::Static => Ok(Box::new(StaticEngine::from_lines(&config.static_text))),
        EngineKind::Ocrs => build_ocrs(config),
    }
}

#[cfg(feature = "ocr")]
fn build_ocrs(config: &SentryConfig) -> Result<Box<dyn OcrEngine>> {
    let models = match &config.ocrs.model_dir {
        Some(dir) => OcrsModels::from_dir(dir),
        None => OcrsModels::default(),
    };
    Ok(Box::new(OcrsEngine::new(models)?))
}

#[cfg(not(feature = "ocr"))]
fn build_ocrs(_config: &SentryConfig) -> Result<Box<dyn OcrEngine>> {
    Err(ocrsentry_core::error::SentryError::EngineUnavailable(
        EngineKind::Ocrs.to_string(),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use ocrsentry_core::error::SentryError;

    #[test]
    fn builds_static_engine_from_config() {
        let config = SentryConfig {
            engine: EngineKind::Static,
            static_text: vec!["hello".into()],
            ..SentryConfig::default()
        };
        let engine = build_engine(&config).unwrap();
        assert_eq!(engine.name(), "static");

        let image = DynamicImage::new_rgb8(1, 1);
        let rec = engine.recognize(&image).unwrap();
        assert_eq!(rec.joined_text(), "hello");
    }

    #[test]
    fn builds_tesseract_engine_without_touching_the_executable() {
        let config = SentryConfig {
            engine: EngineKind::Tesseract,
            ..SentryConfig::default()
        };
        let engine = build_engine(&config).unwrap();
        assert_eq!(engine.name(), "tesseract");
    }

    #[cfg(not(feature = "ocr"))]
    #[test]
    fn ocrs_without_feature_is_unavailable() {
        let result = build_engine(&SentryConfig::default());
        assert!(matches!(result, Err(SentryError::EngineUnavailable(_))));
    }

    #[cfg(feature = "ocr")]
    #[test]
    fn ocrs_with_missing_models_fails_early() {
        let mut config = SentryConfig::default();
        config.ocrs.model_dir = Some("/nonexistent/ocr-models".into());
        assert!(matches!(build_engine(&config), Err(SentryError::Ocr(_))));
    }
}

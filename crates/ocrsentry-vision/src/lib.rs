// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// ocrsentry-vision — Image side of ocrsentry.
//
// Provides image loading and fingerprinting, the preprocessing pipeline
// (grayscale, median denoise, Otsu binarization), OCR engine adapters behind a
// single trait, the end-to-end scan pipeline, and report rendering.

pub mod loader;
pub mod ocr;
pub mod pipeline;
pub mod preprocess;
pub mod report;

// Re-export the primary items so callers can use `ocrsentry_vision::Pipeline` etc.
pub use loader::{LoadedImage, load_image};
pub use ocr::{OcrEngine, StaticEngine, TesseractEngine, build_engine};
pub use pipeline::Pipeline;
pub use preprocess::{Preprocessor, preprocess};
pub use report::OutputFormat;

#[cfg(feature = "ocr")]
pub use ocr::OcrsEngine;

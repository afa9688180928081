// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Engine that "recognises" a fixed set of fragments regardless of input.

use image::DynamicImage;
use ocrsentry_core::error::Result;
use ocrsentry_core::types::{Recognition, TextFragment};
use tracing::debug;

use super::OcrEngine;

/// Returns the same fragments for every image.
///
/// Used for dry runs of the keyword rules (`--engine static --static-text ...`)
/// and for exercising the pipeline without OCR models installed.
#[derive(Debug, Clone, Default)]
pub struct StaticEngine {
    fragments: Vec<TextFragment>,
}

impl StaticEngine {
    pub fn new(fragments: Vec<TextFragment>) -> Self {
        Self { fragments }
    }

    /// One fragment per line, with full confidence.
    pub fn from_lines<S: AsRef<str>>(lines: &[S]) -> Self {
        let fragments = lines
            .iter()
            .map(|line| TextFragment {
                text: line.as_ref().to_string(),
                confidence: Some(1.0),
                bbox: None,
            })
            .collect();
        Self { fragments }
    }
}

impl OcrEngine for StaticEngine {
    fn name(&self) -> &str {
        "static"
    }

    fn recognize(&self, image: &DynamicImage) -> Result<Recognition> {
        debug!(
            width = image.width(),
            height = image.height(),
            fragments = self.fragments.len(),
            "Returning static recognition"
        );
        Ok(Recognition::new(self.fragments.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn returns_configured_lines_in_order() {
        let engine = StaticEngine::from_lines(&["first", "second"]);
        let rec = engine.recognize(&DynamicImage::new_luma8(2, 2)).unwrap();
        assert_eq!(rec.len(), 2);
        assert_eq!(rec.fragments[0].text, "first");
        assert_eq!(rec.fragments[1].confidence, Some(1.0));
    }

    #[test]
    fn default_engine_recognises_nothing() {
        let rec = StaticEngine::default()
            .recognize(&DynamicImage::new_luma8(2, 2))
            .unwrap();
        assert!(rec.is_empty());
    }
}

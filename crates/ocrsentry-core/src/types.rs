// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Core domain types for ocrsentry: recognition results, engine selection and
// analysis outcomes.

use std::collections::BTreeSet;
use std::fmt;
use std::path::PathBuf;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Axis-aligned rectangle in image pixel coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub left: u32,
    pub top: u32,
    pub width: u32,
    pub height: u32,
}

impl BoundingBox {
    pub fn new(left: u32, top: u32, width: u32, height: u32) -> Self {
        Self {
            left,
            top,
            width,
            height,
        }
    }

    pub fn right(&self) -> u32 {
        self.left.saturating_add(self.width)
    }

    pub fn bottom(&self) -> u32 {
        self.top.saturating_add(self.height)
    }

    /// Smallest box containing both `self` and `other`.
    pub fn union(&self, other: &BoundingBox) -> BoundingBox {
        let left = self.left.min(other.left);
        let top = self.top.min(other.top);
        let right = self.right().max(other.right());
        let bottom = self.bottom().max(other.bottom());
        BoundingBox::new(left, top, right - left, bottom - top)
    }
}

/// A piece of text recognised by an OCR engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextFragment {
    pub text: String,
    /// Engine confidence in `0.0..=1.0`, when the engine reports one.
    pub confidence: Option<f32>,
    pub bbox: Option<BoundingBox>,
}

impl TextFragment {
    /// A fragment with text only.
    pub fn plain(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            confidence: None,
            bbox: None,
        }
    }
}

impl fmt::Display for TextFragment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

/// Ordered output of a single OCR engine call.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Recognition {
    pub fragments: Vec<TextFragment>,
}

impl Recognition {
    pub fn new(fragments: Vec<TextFragment>) -> Self {
        Self { fragments }
    }

    /// True when no fragment carries any non-whitespace text.
    pub fn is_empty(&self) -> bool {
        self.fragments.iter().all(|f| f.text.trim().is_empty())
    }

    pub fn len(&self) -> usize {
        self.fragments.len()
    }

    /// Fragment texts joined by newlines, in recognition order.
    pub fn joined_text(&self) -> String {
        self.fragments
            .iter()
            .map(|f| f.text.as_str())
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Mean confidence over fragments that report one.
    pub fn mean_confidence(&self) -> Option<f32> {
        let scores: Vec<f32> = self.fragments.iter().filter_map(|f| f.confidence).collect();
        if scores.is_empty() {
            None
        } else {
            Some(scores.iter().sum::<f32>() / scores.len() as f32)
        }
    }
}

/// Which OCR engine adapter the pipeline should use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EngineKind {
    /// Pure-Rust neural OCR (`ocrs` + `rten`).
    #[default]
    Ocrs,
    /// External `tesseract` executable.
    Tesseract,
    /// Fixed, preconfigured text. Useful for dry runs.
    Static,
}

impl EngineKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Ocrs => "ocrs",
            Self::Tesseract => "tesseract",
            Self::Static => "static",
        }
    }
}

impl fmt::Display for EngineKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for EngineKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "ocrs" => Ok(Self::Ocrs),
            "tesseract" => Ok(Self::Tesseract),
            "static" => Ok(Self::Static),
            other => Err(format!(
                "unknown engine '{other}' (expected ocrs, tesseract or static)"
            )),
        }
    }
}

/// Overall verdict for one analysed image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    /// The engine returned no text at all.
    NoText,
    /// Text was recognised but no keyword matched.
    Clean,
    /// At least one sensitive keyword was found.
    SensitiveFound,
}

/// Everything learned about one image in one invocation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisReport {
    /// Where the image came from (file path or caller-supplied label).
    pub source: PathBuf,
    /// Lowercase hex SHA-256 of the encoded input, when read from a file.
    pub fingerprint: Option<String>,
    pub engine: String,
    pub width: u32,
    pub height: u32,
    pub fragments: Vec<TextFragment>,
    pub text: String,
    pub findings: BTreeSet<String>,
    pub outcome: Outcome,
    pub analyzed_at: DateTime<Utc>,
}

impl AnalysisReport {
    pub fn has_findings(&self) -> bool {
        !self.findings.is_empty()
    }
}

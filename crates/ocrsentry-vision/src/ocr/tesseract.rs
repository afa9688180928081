// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Tesseract adapter — runs an external `tesseract` executable on a temporary
// PNG and parses its TSV output into line fragments.
//
// The executable path comes from `TesseractConfig`, so installations outside
// `PATH` (e.g. `C:\Program Files\Tesseract-OCR\tesseract.exe`) are configured
// per run rather than through a process-wide setting.

use std::io::Write;
use std::process::Command;

use image::{DynamicImage, ImageFormat};
use ocrsentry_core::config::TesseractConfig;
use ocrsentry_core::error::{Result, SentryError};
use ocrsentry_core::types::{BoundingBox, Recognition, TextFragment};
use tracing::{debug, info, instrument};

use super::OcrEngine;

/// Tesseract TSV word rows have this level.
const WORD_LEVEL: u32 = 5;

/// OCR through the Tesseract command-line tool.
#[derive(Debug, Clone)]
pub struct TesseractEngine {
    config: TesseractConfig,
}

impl TesseractEngine {
    pub fn new(config: TesseractConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &TesseractConfig {
        &self.config
    }

    /// Run the executable on an encoded PNG file and return raw TSV output.
    fn run(&self, input: &std::path::Path) -> Result<String> {
        let mut command = Command::new(&self.config.command);
        command
            .arg(input)
            .arg("stdout")
            .arg("-l")
            .arg(&self.config.language);
        if let Some(psm) = self.config.psm {
            command.arg("--psm").arg(psm.to_string());
        }
        command.arg("tsv");

        debug!(command = ?command, "Invoking tesseract");
        let output = command.output().map_err(|err| {
            SentryError::Ocr(format!(
                "could not start `{}`: {}",
                self.config.command.display(),
                err
            ))
        })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(SentryError::Ocr(format!(
                "tesseract exited with {}: {}",
                output.status,
                stderr.trim()
            )));
        }

        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

impl OcrEngine for TesseractEngine {
    fn name(&self) -> &str {
        "tesseract"
    }

    #[instrument(skip_all, fields(width = image.width(), height = image.height()))]
    fn recognize(&self, image: &DynamicImage) -> Result<Recognition> {
        info!(
            command = %self.config.command.display(),
            language = %self.config.language,
            "Starting Tesseract recognition"
        );

        let mut encoded = std::io::Cursor::new(Vec::new());
        image
            .write_to(&mut encoded, ImageFormat::Png)
            .map_err(|err| SentryError::ImageError(format!("PNG encoding failed: {}", err)))?;

        let mut file = tempfile::Builder::new()
            .prefix("ocrsentry-")
            .suffix(".png")
            .tempfile()?;
        file.write_all(encoded.get_ref())?;
        file.flush()?;

        let tsv = self.run(file.path())?;
        let recognition = parse_tsv(&tsv);
        debug!(lines = recognition.len(), "Tesseract recognition complete");
        Ok(recognition)
    }
}

/// Group Tesseract TSV word rows into one fragment per text line.
///
/// Lines are keyed by (page, block, paragraph, line). Confidence is the mean
/// of the word confidences, rescaled from `0..=100` to `0.0..=1.0`; words
/// reported with confidence `-1` do not contribute.
pub fn parse_tsv(tsv: &str) -> Recognition {
    let mut fragments: Vec<TextFragment> = Vec::new();
    let mut current_key: Option<[u32; 4]> = None;
    let mut confidences: Vec<f32> = Vec::new();

    for row in tsv.lines() {
        let Some(word) = parse_word_row(row) else {
            continue;
        };

        if current_key == Some(word.key) {
            if let Some(fragment) = fragments.last_mut() {
                fragment.text.push(' ');
                fragment.text.push_str(&word.text);
                fragment.bbox = fragment.bbox.map(|b| b.union(&word.bbox));
            }
        } else {
            finish_line(fragments.last_mut(), &mut confidences);
            fragments.push(TextFragment {
                text: word.text,
                confidence: None,
                bbox: Some(word.bbox),
            });
            current_key = Some(word.key);
        }

        if let Some(conf) = word.confidence {
            confidences.push(conf);
        }
    }
    finish_line(fragments.last_mut(), &mut confidences);

    Recognition::new(fragments)
}

struct WordRow {
    key: [u32; 4],
    bbox: BoundingBox,
    confidence: Option<f32>,
    text: String,
}

fn parse_word_row(row: &str) -> Option<WordRow> {
    let cols: Vec<&str> = row.split('\t').collect();
    if cols.len() < 12 {
        return None;
    }
    let num = |i: usize| cols[i].trim().parse::<u32>().ok();

    if num(0)? != WORD_LEVEL {
        return None;
    }
    let text = cols[11..].join("\t").trim().to_string();
    if text.is_empty() {
        return None;
    }

    let conf = cols[10].trim().parse::<f32>().ok().filter(|c| *c >= 0.0);

    Some(WordRow {
        key: [num(1)?, num(2)?, num(3)?, num(4)?],
        bbox: BoundingBox::new(num(6)?, num(7)?, num(8)?, num(9)?),
        confidence: conf.map(|c| (c / 100.0).clamp(0.0, 1.0)),
        text,
    })
}

fn finish_line(fragment: Option<&mut TextFragment>, confidences: &mut Vec<f32>) {
    if let Some(fragment) = fragment {
        if !confidences.is_empty() {
            fragment.confidence = Some(confidences.iter().sum::<f32>() / confidences.len() as f32);
        }
    }
    confidences.clear();
}

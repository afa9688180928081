// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Command-line arguments and how they override the loaded configuration.

use std::path::PathBuf;

use clap::{ArgAction, Parser, ValueEnum};
use ocrsentry_core::config::SentryConfig;
use ocrsentry_core::scanner::BoundaryMode;
use ocrsentry_core::types::EngineKind;
use ocrsentry_vision::OutputFormat;

/// Binarize images, run OCR, and flag sensitive keywords in the recognised text.
#[derive(Parser, Debug)]
#[command(name = "ocrsentry", version)]
pub struct Cli {
    /// Images to analyse, processed one at a time in the given order
    #[arg(required_unless_present = "print_config")]
    pub images: Vec<PathBuf>,

    /// Config file (JSON). Defaults to $XDG_CONFIG_HOME/ocrsentry/config.json
    #[arg(short, long, env = "OCRSENTRY_CONFIG")]
    pub config: Option<PathBuf>,

    /// OCR engine: ocrs, tesseract or static
    #[arg(short, long)]
    pub engine: Option<EngineKind>,

    /// Path to the tesseract executable
    #[arg(long, value_name = "PATH")]
    pub tesseract_cmd: Option<PathBuf>,

    /// Tesseract language(s), e.g. eng or chi_sim+eng
    #[arg(long)]
    pub lang: Option<String>,

    /// Tesseract page segmentation mode
    #[arg(long)]
    pub psm: Option<u8>,

    /// Directory containing the ocrs .rten models
    #[arg(long, value_name = "DIR")]
    pub model_dir: Option<PathBuf>,

    /// Keyword to flag (repeatable; replaces the configured list)
    #[arg(short = 'k', long = "keyword", value_name = "WORD")]
    pub keywords: Vec<String>,

    /// Word-boundary rule: prefix or whole-word
    #[arg(long)]
    pub boundary: Option<BoundaryMode>,

    /// Skip Otsu binarization (grayscale + denoise only)
    #[arg(long)]
    pub no_binarize: bool,

    /// Median filter radius (0 disables denoising)
    #[arg(long, value_name = "PIXELS")]
    pub median_radius: Option<u32>,

    /// Text returned by the static engine (repeatable, one line each)
    #[arg(long = "static-text", value_name = "LINE")]
    pub static_text: Vec<String>,

    /// Report format
    #[arg(short, long, value_enum, default_value_t = FormatArg::Text)]
    pub format: FormatArg,

    /// Exit with status 2 when any image contains a sensitive keyword
    #[arg(long)]
    pub fail_on_match: bool,

    /// Print the effective configuration as JSON and exit
    #[arg(long)]
    pub print_config: bool,

    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum FormatArg {
    Text,
    Json,
}

impl From<FormatArg> for OutputFormat {
    fn from(arg: FormatArg) -> Self {
        match arg {
            FormatArg::Text => OutputFormat::Text,
            FormatArg::Json => OutputFormat::Json,
        }
    }
}

impl Cli {
    /// Overlay the flags that were given onto `config`.
    pub fn apply(&self, config: &mut SentryConfig) {
        if let Some(engine) = self.engine {
            config.engine = engine;
        }
        if let Some(cmd) = &self.tesseract_cmd {
            config.tesseract.command = cmd.clone();
        }
        if let Some(lang) = &self.lang {
            config.tesseract.language = lang.clone();
        }
        if self.psm.is_some() {
            config.tesseract.psm = self.psm;
        }
        if let Some(dir) = &self.model_dir {
            config.ocrs.model_dir = Some(dir.clone());
        }
        if !self.keywords.is_empty() {
            config.keywords = self.keywords.clone();
        }
        if let Some(boundary) = self.boundary {
            config.boundary = boundary;
        }
        if self.no_binarize {
            config.preprocess.binarize = false;
        }
        if let Some(radius) = self.median_radius {
            config.preprocess.median_radius = radius;
        }
        if !self.static_text.is_empty() {
            config.static_text = self.static_text.clone();
        }
    }

    /// `tracing` filter directive for the requested verbosity.
    pub fn log_level(&self) -> &'static str {
        match self.verbose {
            0 => "warn",
            1 => "info",
            _ => "debug",
        }
    }
}

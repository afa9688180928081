// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Application configuration, persisted as JSON.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::{Result, SentryError};
use crate::scanner::{BoundaryMode, DEFAULT_KEYWORDS};
use crate::types::EngineKind;

const CONFIG_DIR: &str = "ocrsentry";
const CONFIG_FILE: &str = "config.json";

/// Settings for one ocrsentry run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SentryConfig {
    /// OCR engine used to recognise text.
    pub engine: EngineKind,
    /// Sensitive keywords, matched case-insensitively.
    pub keywords: Vec<String>,
    /// Word-boundary rule applied around each keyword.
    pub boundary: BoundaryMode,
    pub preprocess: PreprocessOptions,
    pub tesseract: TesseractConfig,
    pub ocrs: OcrsConfig,
    /// Text returned by the `static` engine, one fragment per line.
    pub static_text: Vec<String>,
}

impl Default for SentryConfig {
    fn default() -> Self {
        Self {
            engine: EngineKind::default(),
            keywords: DEFAULT_KEYWORDS.iter().map(|w| w.to_string()).collect(),
            boundary: BoundaryMode::default(),
            preprocess: PreprocessOptions::default(),
            tesseract: TesseractConfig::default(),
            ocrs: OcrsConfig::default(),
            static_text: Vec::new(),
        }
    }
}

/// Image preprocessing applied before OCR.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PreprocessOptions {
    /// Radius of the median filter (1 = 3x3 kernel, 0 = no denoising).
    pub median_radius: u32,
    /// Apply Otsu binarization after denoising.
    pub binarize: bool,
}

impl Default for PreprocessOptions {
    fn default() -> Self {
        Self {
            median_radius: 1,
            binarize: true,
        }
    }
}

/// How to invoke the external `tesseract` executable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TesseractConfig {
    /// Executable name or full path (e.g. `C:\Program Files\Tesseract-OCR\tesseract.exe`).
    pub command: PathBuf,
    /// Language code(s) passed with `-l`, e.g. `eng` or `chi_sim+eng`.
    pub language: String,
    /// Page segmentation mode passed with `--psm`.
    pub psm: Option<u8>,
}

impl Default for TesseractConfig {
    fn default() -> Self {
        Self {
            command: PathBuf::from("tesseract"),
            language: "eng".into(),
            psm: None,
        }
    }
}

/// Where the `ocrs` engine finds its models.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OcrsConfig {
    /// Directory holding `text-detection.rten` and `text-recognition.rten`.
    /// `None` uses the ocrs cache directory.
    pub model_dir: Option<PathBuf>,
}

impl SentryConfig {
    /// Default config file location: `$XDG_CONFIG_HOME/ocrsentry/config.json`,
    /// falling back to `~/.config/ocrsentry/config.json`.
    pub fn default_path() -> PathBuf {
        config_base().join(CONFIG_DIR).join(CONFIG_FILE)
    }

    /// Read and parse a config file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let data = std::fs::read_to_string(path).map_err(|err| {
            SentryError::Config(format!("cannot read {}: {}", path.display(), err))
        })?;
        let config: Self = serde_json::from_str(&data)?;
        info!(path = %path.display(), engine = %config.engine, "Configuration loaded");
        Ok(config)
    }

    /// Load the config at `path`, or the default location when `path` is `None`.
    ///
    /// A missing file at the default location yields the defaults; a missing
    /// explicitly named file is an error.
    pub fn load_or_default(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::load(path),
            None => {
                let path = Self::default_path();
                if path.exists() {
                    Self::load(&path)
                } else {
                    debug!(path = %path.display(), "No config file; using defaults");
                    Ok(Self::default())
                }
            }
        }
    }

    /// Write the config as pretty JSON, creating parent directories.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        Ok(())
    }
}

fn config_base() -> PathBuf {
    if let Ok(xdg) = std::env::var("XDG_CONFIG_HOME") {
        return PathBuf::from(xdg);
    }
    if let Ok(home) = std::env::var("HOME") {
        return PathBuf::from(home).join(".config");
    }
    PathBuf::from(".")
}

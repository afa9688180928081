// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Unified error types for ocrsentry.

use std::path::PathBuf;

use thiserror::Error;

/// Top-level error type for all ocrsentry operations.
#[derive(Debug, Error)]
pub enum SentryError {
    // -- Image errors --
    #[error("failed to load image {}: {source}", .path.display())]
    ImageLoad {
        path: PathBuf,
        #[source]
        source: image_source::ImageSourceError,
    },

    #[error("image processing failed: {0}")]
    ImageError(String),

    // -- OCR errors --
    #[error("OCR failed: {0}")]
    Ocr(String),

    #[error("OCR engine not available in this build: {0}")]
    EngineUnavailable(String),

    // -- Scanner errors --
    #[error("invalid keyword pattern: {0}")]
    InvalidPattern(String),

    // -- Configuration / persistence --
    #[error("configuration error: {0}")]
    Config(String),

    #[error("file I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl SentryError {
    /// Build an [`SentryError::ImageLoad`] for a file that could not be read.
    pub fn image_io(path: impl Into<PathBuf>, err: std::io::Error) -> Self {
        Self::ImageLoad {
            path: path.into(),
            source: image_source::ImageSourceError::Io(err),
        }
    }

    /// Build an [`SentryError::ImageLoad`] for bytes that could not be decoded.
    pub fn image_decode(path: impl Into<PathBuf>, detail: impl Into<String>) -> Self {
        Self::ImageLoad {
            path: path.into(),
            source: image_source::ImageSourceError::Decode(detail.into()),
        }
    }

    /// True when the error means the input file does not exist.
    pub fn is_not_found(&self) -> bool {
        match self {
            Self::ImageLoad {
                source: image_source::ImageSourceError::Io(err),
                ..
            } => err.kind() == std::io::ErrorKind::NotFound,
            Self::Io(err) => err.kind() == std::io::ErrorKind::NotFound,
            _ => false,
        }
    }
}

/// Underlying cause of an image load failure.
pub mod image_source {
    use thiserror::Error;

    #[derive(Debug, Error)]
    pub enum ImageSourceError {
        #[error("{0}")]
        Io(#[from] std::io::Error),

        #[error("could not decode image: {0}")]
        Decode(String),
    }
}

/// Alias used throughout the codebase.
pub type Result<T> = std::result::Result<T, SentryError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_is_detected() {
        let err = SentryError::image_io(
            "/missing.png",
            std::io::Error::new(std::io::ErrorKind::NotFound, "no such file"),
        );
        assert!(err.is_not_found());
        assert!(err.to_string().contains("/missing.png"));
    }

    #[test]
    fn decode_failure_is_not_not_found() {
        let err = SentryError::image_decode("broken.png", "bad PNG signature");
        assert!(!err.is_not_found());
        assert!(err.to_string().contains("broken.png"));
    }
}

// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Human-readable error messages for the command line.
//
// Every technical error is mapped to plain English with a clear suggestion.
// Transient errors also get a note that running again may succeed.

use crate::error::{SentryError, image_source::ImageSourceError};

/// Severity of an error from the user's perspective.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// Running again may succeed without changes.
    Transient,
    /// The user must fix something (install an engine, correct a path).
    ActionRequired,
    /// The input itself is unusable.
    Permanent,
}

/// A human-readable error with plain English message and actionable suggestion.
#[derive(Debug, Clone)]
pub struct HumanError {
    /// One-line summary.
    pub message: String,
    /// What the user should try next.
    pub suggestion: String,
    pub severity: Severity,
}

impl HumanError {
    /// Running again unchanged may succeed.
    pub fn is_retryable(&self) -> bool {
        self.severity == Severity::Transient
    }
}

impl std::fmt::Display for HumanError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}\n  hint: {}", self.message, self.suggestion)
    }
}

/// Convert a `SentryError` into a `HumanError`.
pub fn humanize_error(err: &SentryError) -> HumanError {
    match err {
        SentryError::ImageLoad { path, source } => match source {
            ImageSourceError::Io(io_err) if io_err.kind() == std::io::ErrorKind::NotFound => {
                HumanError {
                    message: format!("Image not found: {}", path.display()),
                    suggestion: "Check the path and try again.".into(),
                    severity: Severity::ActionRequired,
                }
            }
            ImageSourceError::Io(io_err)
                if io_err.kind() == std::io::ErrorKind::PermissionDenied =>
            {
                HumanError {
                    message: format!("Permission denied reading {}", path.display()),
                    suggestion: "Check the file permissions.".into(),
                    severity: Severity::ActionRequired,
                }
            }
            ImageSourceError::Io(_) => HumanError {
                message: format!("Could not read {}", path.display()),
                suggestion: "The file may be locked or on an unavailable drive.".into(),
                severity: Severity::Transient,
            },
            ImageSourceError::Decode(_) => HumanError {
                message: format!("{} is not a readable image", path.display()),
                suggestion: "The file may be damaged or in an unsupported format. Try saving it as PNG."
                    .into(),
                severity: Severity::Permanent,
            },
        },

        SentryError::ImageError(detail) => HumanError {
            message: "Image preprocessing failed.".into(),
            suggestion: format!("Try a different image or pass --no-binarize. ({detail})"),
            severity: Severity::Permanent,
        },

        SentryError::Ocr(detail) => humanize_ocr_error(detail),

        SentryError::EngineUnavailable(engine) => HumanError {
            message: format!("The {engine} engine is not included in this build."),
            suggestion: "Rebuild with the `ocr` feature, or choose --engine tesseract.".into(),
            severity: Severity::ActionRequired,
        },

        SentryError::InvalidPattern(detail) => HumanError {
            message: "The keyword list could not be compiled.".into(),
            suggestion: format!("Check the configured keywords. ({detail})"),
            severity: Severity::ActionRequired,
        },

        SentryError::Config(detail) => HumanError {
            message: "The configuration could not be used.".into(),
            suggestion: format!("Fix or remove the config file. ({detail})"),
            severity: Severity::ActionRequired,
        },

        SentryError::Io(_) => HumanError {
            message: "There was a problem reading or writing a file.".into(),
            suggestion: "If this keeps happening, check free disk space.".into(),
            severity: Severity::Transient,
        },

        SentryError::Serialization(_) => HumanError {
            message: "A JSON document could not be read or written.".into(),
            suggestion: "Check the config file is valid JSON.".into(),
            severity: Severity::ActionRequired,
        },
    }
}

/// Parse engine-specific failure details into human-readable messages.
fn humanize_ocr_error(detail: &str) -> HumanError {
    let lower = detail.to_ascii_lowercase();

    if lower.contains("model not found") {
        HumanError {
            message: "OCR models are missing.".into(),
            suggestion: "Run `ocrs` once to download the models, or pass --model-dir.".into(),
            severity: Severity::ActionRequired,
        }
    } else if lower.contains("could not start") {
        HumanError {
            message: "The tesseract executable could not be started.".into(),
            suggestion: "Install Tesseract or point --tesseract-cmd at tesseract(.exe).".into(),
            severity: Severity::ActionRequired,
        }
    } else {
        HumanError {
            message: "Text recognition failed on this image.".into(),
            suggestion: format!("Try a different engine. (Detail: {detail})"),
            severity: Severity::Transient,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_image_is_action_required() {
        let err = SentryError::image_io(
            "shot.png",
            std::io::Error::new(std::io::ErrorKind::NotFound, "gone"),
        );
        let human = humanize_error(&err);
        assert_eq!(human.severity, Severity::ActionRequired);
        assert!(human.message.contains("shot.png"));
    }

    #[test]
    fn corrupt_image_is_permanent() {
        let err = SentryError::image_decode("shot.png", "invalid signature");
        assert_eq!(humanize_error(&err).severity, Severity::Permanent);
    }

    #[test]
    fn missing_models_mention_model_dir() {
        let err = SentryError::Ocr("detection model not found at /x/text-detection.rten".into());
        let human = humanize_error(&err);
        assert_eq!(human.severity, Severity::ActionRequired);
        assert!(human.suggestion.contains("--model-dir"));
    }

    #[test]
    fn unstartable_tesseract_mentions_flag() {
        let err = SentryError::Ocr("could not start `tesseract`: No such file".into());
        assert!(humanize_error(&err).suggestion.contains("--tesseract-cmd"));
    }

    #[test]
    fn only_transient_errors_are_retryable() {
        let failed = humanize_error(&SentryError::Ocr("engine crashed".into()));
        assert_eq!(failed.severity, Severity::Transient);
        assert!(failed.is_retryable());

        let missing = humanize_error(&SentryError::image_io(
            "shot.png",
            std::io::Error::new(std::io::ErrorKind::NotFound, "gone"),
        ));
        assert!(!missing.is_retryable());
    }

    #[test]
    fn display_includes_hint() {
        let human = humanize_error(&SentryError::EngineUnavailable("ocrs".into()));
        assert!(human.to_string().contains("hint:"));
    }
}

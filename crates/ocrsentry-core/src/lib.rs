// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// ocrsentry — Core types, errors, configuration and the keyword scanner shared
// across all crates.

pub mod config;
pub mod error;
pub mod human_errors;
pub mod scanner;
pub mod types;

pub use config::SentryConfig;
pub use error::SentryError;
pub use scanner::{BoundaryMode, KeywordScanner};
pub use types::*;

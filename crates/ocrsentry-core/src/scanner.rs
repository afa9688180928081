// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Keyword scanner — case-insensitive search of recognised text for a fixed
// list of sensitive words, compiled into a single regex alternation.

use std::collections::BTreeSet;
use std::fmt;

use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use crate::error::{Result, SentryError};
use crate::types::Recognition;

/// Keywords scanned for when no list is configured.
pub const DEFAULT_KEYWORDS: &[&str] = &["password", "secret", "credentials", "passwd", "pwd"];

/// How a keyword must be delimited to count as a match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum BoundaryMode {
    /// A word boundary is required before the keyword only, so `secret123`
    /// and `Password123` both match.
    #[default]
    Prefix,
    /// Word boundaries are required on both sides, so `Password123` does not
    /// match `password`.
    WholeWord,
}

impl BoundaryMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Prefix => "prefix",
            Self::WholeWord => "whole-word",
        }
    }
}

impl fmt::Display for BoundaryMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for BoundaryMode {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "prefix" => Ok(Self::Prefix),
            "whole-word" | "whole_word" | "wholeword" => Ok(Self::WholeWord),
            other => Err(format!(
                "unknown boundary mode '{other}' (expected prefix or whole-word)"
            )),
        }
    }
}

/// Compiled matcher for a set of sensitive keywords.
///
/// The scanner is immutable once built. Matches are lower-cased and
/// de-duplicated, so `scan` returns each keyword at most once regardless of how
/// often or in which case it appears.
#[derive(Debug, Clone)]
pub struct KeywordScanner {
    keywords: Vec<String>,
    boundary: BoundaryMode,
    /// `None` when the keyword list is empty; such a scanner never matches.
    pattern: Option<Regex>,
}

impl KeywordScanner {
    /// Build a scanner for `keywords`.
    ///
    /// Keywords are trimmed, lower-cased and de-duplicated; blank entries are
    /// ignored. Keywords are matched literally (regex metacharacters are
    /// escaped).
    pub fn new<I, S>(keywords: I, boundary: BoundaryMode) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut normalized: Vec<String> = Vec::new();
        for word in keywords {
            let word = word.as_ref().trim().to_lowercase();
            if !word.is_empty() && !normalized.contains(&word) {
                normalized.push(word);
            }
        }

        let pattern = if normalized.is_empty() {
            None
        } else {
            Some(compile(&normalized, boundary)?)
        };

        debug!(
            keywords = normalized.len(),
            boundary = %boundary,
            "Keyword scanner compiled"
        );

        Ok(Self {
            keywords: normalized,
            boundary,
            pattern,
        })
    }

    /// Scanner for [`DEFAULT_KEYWORDS`].
    pub fn with_defaults(boundary: BoundaryMode) -> Result<Self> {
        Self::new(DEFAULT_KEYWORDS.iter().copied(), boundary)
    }

    pub fn keywords(&self) -> &[String] {
        &self.keywords
    }

    pub fn boundary(&self) -> BoundaryMode {
        self.boundary
    }

    /// Return the distinct keywords that occur in `text`, lower-cased.
    #[instrument(skip_all, fields(text_len = text.len()))]
    pub fn scan(&self, text: &str) -> BTreeSet<String> {
        let Some(pattern) = &self.pattern else {
            return BTreeSet::new();
        };

        let found: BTreeSet<String> = pattern
            .find_iter(text)
            .map(|m| m.as_str().to_lowercase())
            .collect();

        debug!(matches = found.len(), "Keyword scan complete");
        found
    }

    /// Scan the newline-joined text of an OCR result.
    pub fn scan_fragments(&self, recognition: &Recognition) -> BTreeSet<String> {
        self.scan(&recognition.joined_text())
    }
}

/// Build the `(?i)\b(?:a|b|c)` alternation (with a trailing `\b` for
/// [`BoundaryMode::WholeWord`]).
///
/// Longer keywords are tried first so that a keyword which is a prefix of
/// another (`pass` / `password`) does not shadow it in prefix mode.
fn compile(keywords: &[String], boundary: BoundaryMode) -> Result<Regex> {
    let mut ordered: Vec<&String> = keywords.iter().collect();
    ordered.sort_by(|a, b| b.chars().count().cmp(&a.chars().count()));

    let alternation = ordered
        .iter()
        .map(|w| regex::escape(w))
        .collect::<Vec<_>>()
        .join("|");

    let source = match boundary {
        BoundaryMode::Prefix => format!(r"(?i)\b(?:{alternation})"),
        BoundaryMode::WholeWord => format!(r"(?i)\b(?:{alternation})\b"),
    };

    Regex::new(&source).map_err(|err| SentryError::InvalidPattern(err.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::TextFragment;

    fn set(words: &[&str]) -> BTreeSet<String> {
        words.iter().map(|w| w.to_string()).collect()
    }

    fn defaults(boundary: BoundaryMode) -> KeywordScanner {
        KeywordScanner::with_defaults(boundary).unwrap()
    }

    #[test]
    fn finds_password_and_secret_with_prefix_boundary() {
        let found = defaults(BoundaryMode::Prefix).scan("My password is secret123");
        assert_eq!(found, set(&["password", "secret"]));
    }

    #[test]
    fn whole_word_rejects_trailing_alphanumerics() {
        let found = defaults(BoundaryMode::WholeWord).scan("My password is secret123");
        assert_eq!(found, set(&["password"]));
    }

    #[test]
    fn password123_depends_on_boundary_mode() {
        assert_eq!(
            defaults(BoundaryMode::Prefix).scan("Password123"),
            set(&["password"])
        );
        assert!(defaults(BoundaryMode::WholeWord).scan("Password123").is_empty());
    }

    #[test]
    fn leading_boundary_is_always_enforced() {
        assert!(defaults(BoundaryMode::Prefix).scan("mypassword").is_empty());
        assert!(defaults(BoundaryMode::Prefix).scan("topsecret").is_empty());
    }

    #[test]
    fn no_keywords_yields_empty_set() {
        let found = defaults(BoundaryMode::Prefix).scan("user: admin, role: viewer");
        assert!(found.is_empty());
    }

    #[test]
    fn matches_are_lowercased_and_deduplicated() {
        let found = defaults(BoundaryMode::WholeWord)
            .scan("PASSWORD: x\nPassword: y\npassword: z\nSECRET");
        assert_eq!(found, set(&["password", "secret"]));
    }

    #[test]
    fn prefix_keywords_do_not_shadow_each_other() {
        let scanner = KeywordScanner::new(["pwd", "passwd"], BoundaryMode::WholeWord).unwrap();
        assert_eq!(scanner.scan("pwd=1 passwd=2"), set(&["passwd", "pwd"]));

        let scanner = KeywordScanner::new(["pass", "password"], BoundaryMode::Prefix).unwrap();
        assert_eq!(scanner.scan("password"), set(&["password"]));
    }

    #[test]
    fn keywords_are_matched_literally() {
        let scanner = KeywordScanner::new(["api.key"], BoundaryMode::WholeWord).unwrap();
        assert!(scanner.scan("apixkey").is_empty());
        assert_eq!(scanner.scan("export api.key=abc"), set(&["api.key"]));
    }

    #[test]
    fn keyword_list_is_normalized() {
        let scanner =
            KeywordScanner::new(["  Secret ", "secret", "", "TOKEN"], BoundaryMode::Prefix)
                .unwrap();
        assert_eq!(scanner.keywords(), &["secret".to_string(), "token".to_string()]);
    }

    #[test]
    fn empty_keyword_list_never_matches() {
        let scanner = KeywordScanner::new(Vec::<String>::new(), BoundaryMode::Prefix).unwrap();
        assert!(scanner.keywords().is_empty());
        assert!(scanner.scan("password secret").is_empty());
    }

    #[test]
    fn scans_joined_recognition_text() {
        let rec = Recognition::new(vec![
            TextFragment::plain("user: admin"),
            TextFragment::plain("password: hunter2"),
        ]);
        let found = defaults(BoundaryMode::WholeWord).scan_fragments(&rec);
        assert_eq!(found, set(&["password"]));
    }

    #[test]
    fn boundary_mode_parses() {
        assert_eq!("whole-word".parse::<BoundaryMode>(), Ok(BoundaryMode::WholeWord));
        assert_eq!("Prefix".parse::<BoundaryMode>(), Ok(BoundaryMode::Prefix));
        assert!("suffix".parse::<BoundaryMode>().is_err());
    }
}

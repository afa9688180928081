// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Rendering of analysis reports for people (text) and tools (JSON).

use std::fmt::Write as _;

use ocrsentry_core::error::Result;
use ocrsentry_core::types::{AnalysisReport, Outcome};

/// How reports are written to stdout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

/// Render one report in the requested format.
pub fn render(report: &AnalysisReport, format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Text => Ok(render_text(report)),
        OutputFormat::Json => render_json(report),
    }
}

/// Human-readable report: the recognised text followed by a verdict line.
pub fn render_text(report: &AnalysisReport) -> String {
    let source = report.source.display();
    let mut out = String::new();

    if report.outcome == Outcome::NoText {
        let _ = writeln!(out, "No text recognized in image {source}.");
        return out;
    }

    let _ = writeln!(out, "=== Image: {source} ===");
    let _ = writeln!(out, "[OCR text]:");
    let _ = writeln!(out, "{}", report.text);

    if report.has_findings() {
        let words: Vec<&str> = report.findings.iter().map(String::as_str).collect();
        let _ = writeln!(out, "WARNING: sensitive keywords found: {}", words.join(", "));
    } else {
        let _ = writeln!(out, "OK: no sensitive keywords found.");
    }
    out
}

/// Pretty-printed JSON of the full report.
pub fn render_json(report: &AnalysisReport) -> Result<String> {
    Ok(serde_json::to_string_pretty(report)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use ocrsentry_core::types::TextFragment;
    use std::collections::BTreeSet;
    use std::path::PathBuf;

    fn report(text: &str, findings: &[&str], outcome: Outcome) -> AnalysisReport {
        AnalysisReport {
            source: PathBuf::from("shot.png"),
            fingerprint: Some("abc123".into()),
            engine: "static".into(),
            width: 10,
            height: 10,
            fragments: text.lines().map(TextFragment::plain).collect(),
            text: text.into(),
            findings: findings.iter().map(|f| f.to_string()).collect::<BTreeSet<_>>(),
            outcome,
            analyzed_at: Utc::now(),
        }
    }

    #[test]
    fn text_report_lists_findings() {
        let r = report(
            "My password is secret123",
            &["secret", "password"],
            Outcome::SensitiveFound,
        );
        let out = render_text(&r);
        assert!(out.starts_with("=== Image: shot.png ==="));
        assert!(out.contains("My password is secret123"));
        assert!(out.contains("WARNING: sensitive keywords found: password, secret"));
    }

    #[test]
    fn text_report_for_clean_image() {
        let out = render_text(&report("hello", &[], Outcome::Clean));
        assert!(out.contains("OK: no sensitive keywords found."));
        assert!(!out.contains("WARNING"));
    }

    #[test]
    fn text_report_for_no_text_is_a_single_line() {
        let out = render_text(&report("", &[], Outcome::NoText));
        assert_eq!(out, "No text recognized in image shot.png.\n");
    }

    #[test]
    fn json_report_is_parseable() {
        let r = report("password: x", &["password"], Outcome::SensitiveFound);
        let json = render(&r, OutputFormat::Json).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["outcome"], "sensitive_found");
        assert_eq!(value["findings"][0], "password");
        assert_eq!(value["fingerprint"], "abc123");
    }
}

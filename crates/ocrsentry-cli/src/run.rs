// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// One invocation: resolve configuration, build the pipeline, analyse each
// image in turn and write the reports.

use std::io::Write;

use ocrsentry_core::config::SentryConfig;
use ocrsentry_core::error::{Result, SentryError};
use ocrsentry_core::human_errors::humanize_error;
use ocrsentry_vision::{OutputFormat, Pipeline, report};
use tracing::{error, info};

use crate::args::Cli;

/// Overall result of a run, mapped to the process exit status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunStatus {
    /// Every image was analysed; findings (if any) were only reported.
    Completed,
    /// Findings were present and `--fail-on-match` was given.
    Matched,
    /// At least one image could not be analysed.
    Failed,
}

impl RunStatus {
    pub fn exit_code(self) -> u8 {
        match self {
            Self::Completed => 0,
            Self::Failed => 1,
            Self::Matched => 2,
        }
    }
}

/// Execute `cli`, writing reports to `out` and per-image errors to `err`.
pub fn run(cli: &Cli, out: &mut impl Write, err: &mut impl Write) -> Result<RunStatus> {
    let mut config = SentryConfig::load_or_default(cli.config.as_deref())?;
    cli.apply(&mut config);

    if cli.print_config {
        writeln!(out, "{}", serde_json::to_string_pretty(&config)?)?;
        return Ok(RunStatus::Completed);
    }

    let pipeline = Pipeline::from_config(&config)?;
    info!(
        engine = pipeline.engine_name(),
        keywords = pipeline.scanner().keywords().len(),
        images = cli.images.len(),
        "Pipeline ready"
    );

    let format = OutputFormat::from(cli.format);
    let mut reports = Vec::new();
    let mut failures = 0usize;
    let mut matched = false;

    for path in &cli.images {
        match pipeline.analyze(path) {
            Ok(analysis) => {
                matched |= analysis.has_findings();
                if format == OutputFormat::Text {
                    write!(out, "{}", report::render_text(&analysis))?;
                }
                reports.push(analysis);
            }
            Err(e) => {
                failures += 1;
                error!(path = %path.display(), error = %e, "Image analysis failed");
                report_error(err, &e)?;
            }
        }
    }

    if format == OutputFormat::Json {
        writeln!(out, "{}", serde_json::to_string_pretty(&reports)?)?;
    }

    Ok(if failures > 0 {
        RunStatus::Failed
    } else if matched && cli.fail_on_match {
        RunStatus::Matched
    } else {
        RunStatus::Completed
    })
}

/// Write `e` in plain English. Transient failures get a retry note.
pub fn report_error(out: &mut impl Write, e: &SentryError) -> std::io::Result<()> {
    let human = humanize_error(e);
    writeln!(out, "error: {human}")?;
    if human.is_retryable() {
        writeln!(out, "  note: this may be temporary; running again may succeed")?;
    }
    Ok(())
}

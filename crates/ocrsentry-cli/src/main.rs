// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// ocrsentry — flag passwords and secrets visible in screenshots.
//
// Entry point. Parses arguments, initialises logging (stderr), runs the scan
// pipeline over each image, and maps the outcome to an exit status.

mod args;
mod run;

use std::process::ExitCode;

use clap::Parser;

use args::Cli;

fn main() -> ExitCode {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(cli.log_level())),
        )
        .with_writer(std::io::stderr)
        .init();

    tracing::info!("ocrsentry starting");

    let stdout = std::io::stdout();
    let stderr = std::io::stderr();
    match run::run(&cli, &mut stdout.lock(), &mut stderr.lock()) {
        Ok(status) => ExitCode::from(status.exit_code()),
        Err(err) => {
            tracing::error!(error = %err, "ocrsentry failed");
            let _ = run::report_error(&mut std::io::stderr().lock(), &err);
            ExitCode::from(1)
        }
    }
}

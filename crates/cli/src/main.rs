// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! simfork binary entry point.

use clap::Parser;

use simfork::cli::Cli;
use simfork::config::RunSettings;
use simfork::output::{print_error, write_summary, RunStatus};
use simfork::platform::Platform;
use simfork::runner::{RunError, Runner};

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let settings = match RunSettings::from_cli(&cli) {
        Ok(settings) => settings,
        Err(e) => {
            print_error(e);
            std::process::exit(1);
        }
    };
    let output_format = settings.output_format.clone();
    let platform = Platform::current();

    match Runner::new(settings, platform).run().await {
        Ok(summary) => {
            let mut stdout = std::io::stdout();
            if let Err(e) = write_summary(&mut stdout, &output_format, &summary) {
                print_error(e);
                std::process::exit(1);
            }
            match summary.status {
                RunStatus::Success => {}
                RunStatus::AssertionsFailed => std::process::exit(2),
                RunStatus::Failed => std::process::exit(1),
            }
        }
        Err(RunError::Interrupted) => std::process::exit(130),
        Err(e) => {
            print_error(e);
            std::process::exit(1);
        }
    }
}

// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Diagnostic output helpers and the machine-readable run summary.
//!
//! Diagnostics go to stderr with ANSI color when it is a terminal, plain
//! text otherwise. The run summary goes to stdout as human-readable lines or
//! as a single JSON document, selected by `--output-format`.

use std::io::{self, IsTerminal, Write};

use serde::{Deserialize, Serialize};

use crate::cli::OutputFormat;
use crate::fork::ForkOutcome;

/// Print an error message to stderr.
pub fn print_error(msg: impl std::fmt::Display) {
    let is_tty = io::stderr().is_terminal();
    write_error(&mut io::stderr(), msg, is_tty);
}

fn write_error<W: Write>(writer: &mut W, msg: impl std::fmt::Display, is_terminal: bool) {
    if is_terminal {
        let _ = writeln!(writer, "\x1b[31mError: {}\x1b[0m", msg);
    } else {
        let _ = writeln!(writer, "Error: {}", msg);
    }
}

/// Print a warning message to stderr.
pub fn print_warning(msg: impl std::fmt::Display) {
    let is_tty = io::stderr().is_terminal();
    write_warning(&mut io::stderr(), msg, is_tty);
}

fn write_warning<W: Write>(writer: &mut W, msg: impl std::fmt::Display, is_terminal: bool) {
    if is_terminal {
        let _ = writeln!(writer, "\x1b[33mWarning: {}\x1b[0m", msg);
    } else {
        let _ = writeln!(writer, "Warning: {}", msg);
    }
}

/// Print an informational message to stderr.
pub fn print_info(msg: impl std::fmt::Display) {
    let _ = writeln!(io::stderr(), "{}", msg);
}

/// Aggregate status of a whole run.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RunStatus {
    /// Every executed simulation succeeded (or the run was skipped).
    Success,
    /// At least one simulation completed with failed assertions and nothing
    /// failed harder.
    AssertionsFailed,
    /// A simulation or the launcher itself failed abnormally.
    Failed,
}

/// Outcome of one simulation, flattened for reporting.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SimulationReport {
    pub simulation: String,
    pub outcome: String,
    pub exit_code: i32,
}

impl SimulationReport {
    pub fn new(simulation: impl Into<String>, outcome: &ForkOutcome) -> Self {
        let (label, exit_code) = match outcome {
            ForkOutcome::Success => ("success", 0),
            ForkOutcome::AssertionFailure { exit_code } => ("assertions_failed", *exit_code),
            ForkOutcome::HardFailure { exit_code, .. } => ("failed", *exit_code),
        };
        Self {
            simulation: simulation.into(),
            outcome: label.to_string(),
            exit_code,
        }
    }
}

/// Summary of a full `simfork` invocation.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RunSummary {
    pub status: RunStatus,
    pub simulations: Vec<SimulationReport>,
    /// Run directories created under the results directory by this run.
    pub new_run_directories: Vec<String>,
}

impl RunSummary {
    pub fn skipped() -> Self {
        Self {
            status: RunStatus::Success,
            simulations: Vec::new(),
            new_run_directories: Vec::new(),
        }
    }
}

/// Write the summary in the selected format.
pub fn write_summary<W: Write>(
    writer: &mut W,
    format: &OutputFormat,
    summary: &RunSummary,
) -> io::Result<()> {
    match format {
        OutputFormat::Text => {
            for report in &summary.simulations {
                writeln!(
                    writer,
                    "{}: {} (exit code {})",
                    report.simulation, report.outcome, report.exit_code
                )?;
            }
            Ok(())
        }
        OutputFormat::Json => {
            let json = serde_json::to_string_pretty(summary)
                .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
            writeln!(writer, "{}", json)
        }
    }
}

#[cfg(test)]
#[path = "output_tests.rs"]
mod tests;

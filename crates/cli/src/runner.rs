// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Run orchestration.
//!
//! Scan, select, then fork each selected simulation one at a time; two
//! concurrent load tests would contend for the machine they are both trying
//! to measure. Aggregation rules: an assertion failure stops the batch
//! unless continue-on-assertion-failure is set, in which case the remaining
//! simulations still run and the overall run reports assertion failure at
//! the end; a hard failure always stops the batch.
//!
//! Each run also maintains `lastRun.txt` in the results directory, listing
//! the run directories this invocation created plus an `ExecutionError: `
//! line when the launcher itself failed.

use std::collections::BTreeSet;
use std::path::PathBuf;

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use thiserror::Error;

use crate::config::RunSettings;
use crate::fork::{Fork, ForkError, ForkOutcome, ForkSpec};
use crate::output::{print_info, print_warning, RunStatus, RunSummary, SimulationReport};
use crate::platform::Platform;
use crate::select::{select, SelectionError};
use simfork_scanner::ScanError;

const LAST_RUN_FILE: &str = "lastRun.txt";
const LAST_RUN_ERROR_PREFIX: &str = "ExecutionError: ";

/// Executes one full `simfork` invocation against resolved settings.
pub struct Runner {
    settings: RunSettings,
    platform: Platform,
}

/// Why the run as a whole did not succeed.
enum RunFailure {
    AssertionsFailed,
    HardFailure { simulation: String, exit_code: i32 },
    Error(RunError),
}

impl Runner {
    pub fn new(settings: RunSettings, platform: Platform) -> Self {
        Self { settings, platform }
    }

    /// Execute the run and produce the summary.
    ///
    /// Launcher-level failures come back as `Err` unless `fail_on_error` is
    /// off, in which case they are demoted to a warning and the run reports
    /// success. Interruption is never demoted.
    pub async fn run(&self) -> Result<RunSummary, RunError> {
        if self.settings.skip {
            print_info("Skipping simulation execution");
            return Ok(RunSummary::skipped());
        }

        std::fs::create_dir_all(&self.settings.results_dir).map_err(|e| {
            RunError::ResultsDir {
                path: self.settings.results_dir.clone(),
                source: e,
            }
        })?;
        let existing_run_directories = self.run_directories();

        let (simulations, failure) = self.execute_all().await;

        let error_line = match &failure {
            Some(RunFailure::HardFailure {
                simulation,
                exit_code,
            }) => Some(format!(
                "simulation {} returned non-zero value {}",
                simulation, exit_code
            )),
            // Assertion failures are a first-class outcome, not an
            // execution error; interruption never reaches the file.
            Some(RunFailure::Error(RunError::Interrupted)) => None,
            Some(RunFailure::Error(error)) => Some(recursive_causes(error)),
            Some(RunFailure::AssertionsFailed) | None => None,
        };
        let new_run_directories =
            self.save_last_run(&existing_run_directories, error_line.as_deref())?;

        match failure {
            None => Ok(RunSummary {
                status: RunStatus::Success,
                simulations,
                new_run_directories,
            }),
            Some(RunFailure::Error(RunError::Interrupted)) => Err(RunError::Interrupted),
            Some(failure) if !self.settings.fail_on_error => {
                if let RunFailure::Error(error) = &failure {
                    print_warning(error);
                }
                print_warning(
                    "there were errors while running the simulations, but --no-fail-on-error was set; reporting success",
                );
                Ok(RunSummary {
                    status: RunStatus::Success,
                    simulations,
                    new_run_directories,
                })
            }
            Some(RunFailure::Error(error)) => Err(error),
            Some(RunFailure::AssertionsFailed) => Ok(RunSummary {
                status: RunStatus::AssertionsFailed,
                simulations,
                new_run_directories,
            }),
            Some(RunFailure::HardFailure { .. }) => Ok(RunSummary {
                status: RunStatus::Failed,
                simulations,
                new_run_directories,
            }),
        }
    }

    async fn execute_all(&self) -> (Vec<SimulationReport>, Option<RunFailure>) {
        let mut reports = Vec::new();

        if let Some(run_dir) = self.settings.reports_only.clone() {
            print_info(format_args!("Generating reports for {}.", run_dir));
            return match self.fork(None).await {
                Ok(outcome) => {
                    reports.push(SimulationReport::new(run_dir.clone(), &outcome));
                    let failure = match outcome {
                        ForkOutcome::Success => None,
                        ForkOutcome::AssertionFailure { .. } => {
                            Some(RunFailure::AssertionsFailed)
                        }
                        ForkOutcome::HardFailure { exit_code, .. } => {
                            Some(RunFailure::HardFailure {
                                simulation: run_dir,
                                exit_code,
                            })
                        }
                    };
                    (reports, failure)
                }
                Err(error) => (reports, Some(self.fork_failure(run_dir, error))),
            };
        }

        let scan = match simfork_scanner::scan(
            &self.settings.class_directories,
            &self.settings.dependency_archives,
        ) {
            Ok(scan) => scan,
            Err(error) => return (reports, Some(RunFailure::Error(RunError::Scan(error)))),
        };
        let candidates = scan.simulation_classes();

        let stdin = std::io::stdin();
        let mut input = stdin.lock();
        let mut output = std::io::stdout();
        let simulations = match select(
            self.settings.simulation.as_deref(),
            &candidates,
            &self.settings.includes,
            &self.settings.excludes,
            self.settings.run_multiple,
            self.settings.interactive,
            &mut input,
            &mut output,
        ) {
            Ok(simulations) => simulations,
            Err(error) => {
                return (reports, Some(RunFailure::Error(RunError::Selection(error))))
            }
        };

        let mut assertions_failed = false;
        for simulation in &simulations {
            print_info(format_args!("Running simulation {}.", simulation));
            match self.fork(Some(simulation.as_str())).await {
                Ok(outcome) => {
                    reports.push(SimulationReport::new(simulation.clone(), &outcome));
                    match outcome {
                        ForkOutcome::Success => {}
                        ForkOutcome::AssertionFailure { .. } => {
                            assertions_failed = true;
                            if !self.settings.continue_on_assertion_failure {
                                return (reports, Some(RunFailure::AssertionsFailed));
                            }
                            print_warning(format_args!(
                                "simulation {} failed its assertions; continuing with the remaining simulations",
                                simulation
                            ));
                        }
                        ForkOutcome::HardFailure { exit_code, .. } => {
                            return (
                                reports,
                                Some(RunFailure::HardFailure {
                                    simulation: simulation.clone(),
                                    exit_code,
                                }),
                            );
                        }
                    }
                }
                Err(error) => {
                    return (reports, Some(self.fork_failure(simulation.clone(), error)))
                }
            }
        }

        let failure = assertions_failed.then_some(RunFailure::AssertionsFailed);
        (reports, failure)
    }

    async fn fork(&self, simulation: Option<&str>) -> Result<ForkOutcome, ForkError> {
        let spec = ForkSpec::new(
            self.settings.main_class.clone(),
            self.settings.bootstrap_class.clone(),
            self.settings.classpath.clone(),
        )
        .with_jvm_args(self.settings.jvm_args.clone())
        .with_program_args(self.engine_args(simulation))
        .with_working_dir(self.settings.working_dir.clone())
        .with_propagation(self.settings.propagate_props)
        .with_properties(self.settings.properties.clone())
        .with_java_override(self.settings.java_override.clone());

        Fork::new(spec, self.platform)
            .with_verbose(self.settings.verbose)
            .run()
            .await
    }

    fn fork_failure(&self, simulation: String, error: ForkError) -> RunFailure {
        match error {
            ForkError::Interrupted => RunFailure::Error(RunError::Interrupted),
            source => RunFailure::Error(RunError::Fork { simulation, source }),
        }
    }

    /// Engine command-line arguments, delivered through the argument file.
    fn engine_args(&self, simulation: Option<&str>) -> Vec<String> {
        let mut args = Vec::new();
        if let Some(simulation) = simulation {
            args.push("-s".to_string());
            args.push(simulation.to_string());
        }
        args.push("-rf".to_string());
        args.push(self.settings.results_dir.to_string_lossy().into_owned());
        if let Some(run_dir) = &self.settings.reports_only {
            args.push("-ro".to_string());
            args.push(run_dir.clone());
        }
        if let Some(description) = &self.settings.run_description {
            // Free text; base64 keeps it to a single clean line in the file.
            args.push("-rd".to_string());
            args.push(BASE64.encode(description.as_bytes()));
        }
        if self.settings.no_reports {
            args.push("-nr".to_string());
        }
        args
    }

    /// Names of the run directories currently under the results directory.
    fn run_directories(&self) -> BTreeSet<String> {
        let mut directories = BTreeSet::new();
        if let Ok(entries) = std::fs::read_dir(&self.settings.results_dir) {
            for entry in entries.flatten() {
                if entry.path().is_dir() {
                    directories.insert(entry.file_name().to_string_lossy().into_owned());
                }
            }
        }
        directories
    }

    /// Record the run directories this invocation created, plus the error
    /// line when the launcher failed. Returns the new directory names.
    fn save_last_run(
        &self,
        existing: &BTreeSet<String>,
        error_line: Option<&str>,
    ) -> Result<Vec<String>, RunError> {
        let new_directories: Vec<String> = self
            .run_directories()
            .difference(existing)
            .cloned()
            .collect();

        let mut contents = String::new();
        for directory in &new_directories {
            contents.push_str(directory);
            contents.push('\n');
        }
        if let Some(error_line) = error_line {
            contents.push_str(LAST_RUN_ERROR_PREFIX);
            contents.push_str(error_line);
            contents.push('\n');
        }
        std::fs::write(self.settings.results_dir.join(LAST_RUN_FILE), contents)
            .map_err(RunError::RecordResults)?;
        Ok(new_directories)
    }
}

/// Join an error with its source chain, outermost first.
fn recursive_causes(error: &dyn std::error::Error) -> String {
    let mut parts = vec![error.to_string()];
    let mut current = error.source();
    while let Some(cause) = current {
        parts.push(cause.to_string());
        current = cause.source();
    }
    parts.join(" | ")
}

#[derive(Debug, Error)]
pub enum RunError {
    #[error("could not create results directory {path}: {source}")]
    ResultsDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("simulation scan failed: {0}")]
    Scan(#[from] ScanError),

    #[error(transparent)]
    Selection(#[from] SelectionError),

    #[error("simulation {simulation} could not be launched: {source}")]
    Fork {
        simulation: String,
        #[source]
        source: ForkError,
    },

    #[error("could not record simulation results: {0}")]
    RecordResults(#[source] std::io::Error),

    #[error("interrupted")]
    Interrupted,
}

#[cfg(test)]
#[path = "runner_tests.rs"]
mod tests;

// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! CLI argument parsing.

use clap::{Parser, ValueEnum};

/// Default entry point of the load-test engine.
pub const DEFAULT_MAIN_CLASS: &str = "io.gatling.app.Gatling";

/// Default in-child bootstrap that re-expands the argument file. Must be
/// present on the supplied classpath.
pub const DEFAULT_BOOTSTRAP_CLASS: &str = "io.gatling.plugin.util.MainWithArgsInFile";

/// Launch Gatling simulations as forked JVM processes
#[derive(Parser, Clone, Debug)]
#[command(name = "simfork", version, about = "Gatling simulation launcher")]
pub struct Cli {
    /// Fully qualified name of a single simulation class to run
    #[arg(short = 's', long, env = "SIMFORK_SIMULATION")]
    pub simulation: Option<String>,

    /// Run all matching simulations sequentially instead of failing on
    /// ambiguity
    #[arg(long, env = "SIMFORK_RUN_MULTIPLE")]
    pub run_multiple: bool,

    /// Include pattern for simulation class names (repeatable; `*` stays
    /// within a package segment, `**` crosses segments)
    #[arg(long = "include", value_name = "GLOB")]
    pub includes: Vec<String>,

    /// Exclude pattern for simulation class names (repeatable)
    #[arg(long = "exclude", value_name = "GLOB")]
    pub excludes: Vec<String>,

    /// Classpath entry: a compiled-classes directory or a dependency archive
    /// (repeatable; supplied by the build tool)
    #[arg(short = 'c', long = "classpath", value_name = "PATH")]
    pub classpath: Vec<String>,

    /// Directory where the engine writes run results
    #[arg(long, default_value = "results", env = "SIMFORK_RESULTS_DIR")]
    pub results_dir: String,

    /// Run simulations but skip report generation
    #[arg(long)]
    pub no_reports: bool,

    /// Only regenerate reports from the named run directory, skip execution
    #[arg(long, value_name = "RUN_DIR")]
    pub reports_only: Option<String>,

    /// Short description of the run, included in the report
    #[arg(long)]
    pub run_description: Option<String>,

    /// Extra JVM argument for the forked engine (repeatable; replaces the
    /// default JVM options)
    #[arg(long = "jvm-arg", value_name = "ARG", allow_hyphen_values = true)]
    pub jvm_args: Vec<String>,

    /// Append the default JVM options after the user-supplied ones instead
    /// of replacing them
    #[arg(long)]
    pub merge_default_jvm_args: bool,

    /// Extra system property for the forked engine, `name=value` (repeatable)
    #[arg(short = 'D', value_name = "NAME=VALUE", value_parser = parse_property)]
    pub properties: Vec<(String, String)>,

    /// Do not propagate host environment properties to the forked engine
    #[arg(long)]
    pub no_propagate_props: bool,

    /// Report success even when simulations fail
    #[arg(long)]
    pub no_fail_on_error: bool,

    /// Keep running remaining simulations after one fails its assertions
    #[arg(long)]
    pub continue_on_assertion_failure: bool,

    /// Working directory for the forked engine
    #[arg(long, value_name = "DIR")]
    pub working_dir: Option<String>,

    /// Explicit path to the `java` executable, bypassing discovery
    #[arg(long, value_name = "PATH", env = "SIMFORK_JAVA")]
    pub java: Option<String>,

    /// Entry point class of the engine
    #[arg(long, default_value = DEFAULT_MAIN_CLASS, value_name = "CLASS")]
    pub main_class: String,

    /// Bootstrap class named in the booter jar manifest
    #[arg(long, default_value = DEFAULT_BOOTSTRAP_CLASS, value_name = "CLASS")]
    pub bootstrap_class: String,

    /// Force batch mode: never prompt, fail on ambiguity
    #[arg(long, env = "SIMFORK_BATCH")]
    pub batch: bool,

    /// Skip execution entirely
    #[arg(long, env = "SIMFORK_SKIP")]
    pub skip: bool,

    /// Verbose output (classpath and command-line dumps)
    #[arg(long, short = 'v')]
    pub verbose: bool,

    /// Output format for the final run summary
    #[arg(long, value_enum, default_value = "text")]
    pub output_format: OutputFormat,
}

impl Cli {
    /// Interactive prompting is allowed only when stdin is a terminal and
    /// batch mode was not forced.
    pub fn interactive(&self) -> bool {
        use std::io::IsTerminal;
        !self.batch && std::io::stdin().is_terminal()
    }
}

/// Output format for the run summary
#[derive(Clone, Debug, ValueEnum, Default, PartialEq, Eq)]
pub enum OutputFormat {
    /// One line per simulation
    #[default]
    Text,
    /// JSON document
    Json,
}

fn parse_property(s: &str) -> Result<(String, String), String> {
    match s.split_once('=') {
        Some((name, value)) if !name.is_empty() => Ok((name.to_string(), value.to_string())),
        _ => Err(format!("expected NAME=VALUE, got '{}'", s)),
    }
}

#[cfg(test)]
#[path = "cli_tests.rs"]
mod tests;

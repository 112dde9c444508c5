// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Resolved run settings.
//!
//! The CLI layer parses flags; this layer turns them into validated values
//! the core consumes. Nothing below this point re-reads configuration.

use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::cli::{Cli, OutputFormat};

/// JVM options applied when the user supplies none. Derived from the
/// engine's own launcher defaults, minus options modern JVMs removed.
pub const DEFAULT_JVM_OPTIONS: [&str; 4] = [
    "-server",
    "-Xms512M",
    "-Xmx512M",
    "-XX:+HeapDumpOnOutOfMemoryError",
];

/// Validated configuration for one invocation. Immutable once constructed.
#[derive(Clone, Debug)]
pub struct RunSettings {
    pub simulation: Option<String>,
    pub run_multiple: bool,
    pub includes: Vec<String>,
    pub excludes: Vec<String>,
    /// Full classpath in precedence order, absolute paths.
    pub classpath: Vec<PathBuf>,
    /// Classpath entries that are directories: the scan targets.
    pub class_directories: Vec<PathBuf>,
    /// Classpath entries that are files: hierarchy sources for scanning.
    pub dependency_archives: Vec<PathBuf>,
    pub results_dir: PathBuf,
    pub no_reports: bool,
    pub reports_only: Option<String>,
    pub run_description: Option<String>,
    pub jvm_args: Vec<String>,
    pub properties: Vec<(String, String)>,
    pub propagate_props: bool,
    pub fail_on_error: bool,
    pub continue_on_assertion_failure: bool,
    pub working_dir: Option<PathBuf>,
    pub java_override: Option<PathBuf>,
    pub main_class: String,
    pub bootstrap_class: String,
    pub interactive: bool,
    pub skip: bool,
    pub verbose: bool,
    pub output_format: OutputFormat,
}

impl RunSettings {
    /// Resolve and validate CLI values.
    pub fn from_cli(cli: &Cli) -> Result<Self, ConfigError> {
        let interactive = cli.interactive();
        Self::resolve(cli, interactive)
    }

    /// Resolution with interactivity supplied by the caller (testable
    /// without a terminal).
    pub fn resolve(cli: &Cli, interactive: bool) -> Result<Self, ConfigError> {
        let cwd = std::env::current_dir().map_err(ConfigError::CurrentDir)?;

        let mut classpath = Vec::with_capacity(cli.classpath.len());
        for entry in &cli.classpath {
            if entry.is_empty() {
                return Err(ConfigError::EmptyClasspathEntry);
            }
            classpath.push(absolutize(&cwd, Path::new(entry)));
        }

        let class_directories: Vec<PathBuf> =
            classpath.iter().filter(|p| p.is_dir()).cloned().collect();
        let dependency_archives: Vec<PathBuf> =
            classpath.iter().filter(|p| p.is_file()).cloned().collect();

        let working_dir = match &cli.working_dir {
            Some(dir) => {
                let dir = absolutize(&cwd, Path::new(dir));
                if !dir.is_dir() {
                    return Err(ConfigError::WorkingDirMissing(dir));
                }
                Some(dir)
            }
            None => None,
        };

        Ok(Self {
            simulation: cli.simulation.clone(),
            run_multiple: cli.run_multiple,
            includes: cli.includes.clone(),
            excludes: cli.excludes.clone(),
            classpath,
            class_directories,
            dependency_archives,
            results_dir: absolutize(&cwd, Path::new(&cli.results_dir)),
            no_reports: cli.no_reports,
            reports_only: cli.reports_only.clone(),
            run_description: cli.run_description.clone(),
            jvm_args: effective_jvm_args(&cli.jvm_args, cli.merge_default_jvm_args),
            properties: cli.properties.clone(),
            propagate_props: !cli.no_propagate_props,
            fail_on_error: !cli.no_fail_on_error,
            continue_on_assertion_failure: cli.continue_on_assertion_failure,
            working_dir,
            java_override: cli.java.as_ref().map(PathBuf::from),
            main_class: cli.main_class.clone(),
            bootstrap_class: cli.bootstrap_class.clone(),
            interactive,
            skip: cli.skip,
            verbose: cli.verbose,
            output_format: cli.output_format.clone(),
        })
    }
}

fn effective_jvm_args(user: &[String], merge_defaults: bool) -> Vec<String> {
    if user.is_empty() {
        return DEFAULT_JVM_OPTIONS.iter().map(|s| s.to_string()).collect();
    }
    let mut args: Vec<String> = user.to_vec();
    if merge_defaults {
        args.extend(DEFAULT_JVM_OPTIONS.iter().map(|s| s.to_string()));
    }
    args
}

fn absolutize(cwd: &Path, path: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        cwd.join(path)
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("classpath entries must not be empty strings")]
    EmptyClasspathEntry,

    #[error("working directory {0} does not exist")]
    WorkingDirMissing(PathBuf),

    #[error("cannot determine current directory: {0}")]
    CurrentDir(#[source] std::io::Error),
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;

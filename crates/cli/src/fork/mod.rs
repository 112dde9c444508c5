// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Forked execution of the load-test engine.
//!
//! One fork is one spawn-and-wait cycle: validate the classpath, assemble
//! the propagated `-D` flags, materialize the booter jar and the argument
//! file, spawn the JVM, and map its exit code to a typed outcome. The host
//! blocks until the child exits; a load test is meant to own the machine it
//! measures, so nothing else runs concurrently on the host side.

pub mod argfile;
pub mod booter;
pub mod java;
pub mod props;

use std::collections::BTreeMap;
use std::path::PathBuf;
use std::process::Stdio;

use thiserror::Error;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::process::{Child, Command};

use crate::output::{print_info, print_warning};
use crate::platform::Platform;
use argfile::{ArgFile, ArgFileError};
use booter::{BooterDescriptor, BooterError};
use java::{JavaError, JavaExecutable};
use props::PropagatedProperty;

/// Exit code convention for "the simulation ran to completion but one or
/// more assertions failed", distinct from tool crashes.
pub const ASSERTION_FAILURE_EXIT_CODE: i32 = 2;

/// Bytes of child stderr retained for diagnostics on a hard failure.
const STDERR_TAIL_LIMIT: usize = 8 * 1024;

/// Immutable description of a single launch. Built once per fork and owned
/// by the caller; classpath order is classloading precedence.
#[derive(Clone, Debug)]
pub struct ForkSpec {
    main_class: String,
    bootstrap_class: String,
    classpath: Vec<PathBuf>,
    jvm_args: Vec<String>,
    program_args: Vec<String>,
    working_dir: Option<PathBuf>,
    propagate_host_properties: bool,
    properties: Vec<(String, String)>,
    java_override: Option<PathBuf>,
}

impl ForkSpec {
    /// Create a spec for launching `main_class` through `bootstrap_class`
    /// with the given classpath.
    pub fn new(
        main_class: impl Into<String>,
        bootstrap_class: impl Into<String>,
        classpath: Vec<PathBuf>,
    ) -> Self {
        Self {
            main_class: main_class.into(),
            bootstrap_class: bootstrap_class.into(),
            classpath,
            jvm_args: Vec::new(),
            program_args: Vec::new(),
            working_dir: None,
            propagate_host_properties: false,
            properties: Vec::new(),
            java_override: None,
        }
    }

    /// Set the JVM options, in order.
    pub fn with_jvm_args(mut self, jvm_args: Vec<String>) -> Self {
        self.jvm_args = jvm_args;
        self
    }

    /// Set the program arguments delivered through the argument file.
    pub fn with_program_args(mut self, program_args: Vec<String>) -> Self {
        self.program_args = program_args;
        self
    }

    /// Set the child working directory.
    pub fn with_working_dir(mut self, working_dir: Option<PathBuf>) -> Self {
        self.working_dir = working_dir;
        self
    }

    /// Propagate the host property set to the child as `-D` flags.
    pub fn with_propagation(mut self, propagate: bool) -> Self {
        self.propagate_host_properties = propagate;
        self
    }

    /// Extra `name=value` properties for the child. These win over the
    /// inherited host set but still pass through the denylist.
    pub fn with_properties(mut self, properties: Vec<(String, String)>) -> Self {
        self.properties = properties;
        self
    }

    /// Explicit launcher path, bypassing discovery.
    pub fn with_java_override(mut self, java_override: Option<PathBuf>) -> Self {
        self.java_override = java_override;
        self
    }

    pub fn main_class(&self) -> &str {
        &self.main_class
    }

    pub fn classpath(&self) -> &[PathBuf] {
        &self.classpath
    }
}

/// Outcome of one fork. Produced exactly once per [`Fork::run`] call.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ForkOutcome {
    /// The child exited 0.
    Success,
    /// The child exited with the assertion-failure convention: the
    /// simulation ran, its correctness assertions did not hold.
    AssertionFailure { exit_code: i32 },
    /// Any other non-zero exit.
    HardFailure { exit_code: i32, stderr_tail: String },
}

impl ForkOutcome {
    /// Map a raw exit code to the three-way outcome contract.
    pub fn from_exit_code(exit_code: i32, stderr_tail: String) -> Self {
        match exit_code {
            0 => ForkOutcome::Success,
            ASSERTION_FAILURE_EXIT_CODE => ForkOutcome::AssertionFailure { exit_code },
            _ => ForkOutcome::HardFailure {
                exit_code,
                stderr_tail,
            },
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, ForkOutcome::Success)
    }
}

/// One spawn-and-wait cycle of the engine.
#[derive(Debug)]
pub struct Fork {
    spec: ForkSpec,
    platform: Platform,
    verbose: bool,
}

impl Fork {
    pub fn new(spec: ForkSpec, platform: Platform) -> Self {
        Self {
            spec,
            platform,
            verbose: false,
        }
    }

    /// Dump the classpath and the assembled command line before spawning.
    pub fn with_verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    /// Launch the child and block until it exits.
    ///
    /// Fails before spawning if a classpath entry is missing, the launcher
    /// cannot be located, or the temporary artifacts cannot be written; none
    /// of these are retried. The booter jar and the argument file live until
    /// this call returns, so the child can read them at any point.
    pub async fn run(&self) -> Result<ForkOutcome, ForkError> {
        for entry in &self.spec.classpath {
            if !entry.exists() {
                return Err(ForkError::ClasspathEntryMissing(entry.clone()));
            }
        }

        let java = JavaExecutable::locate(self.spec.java_override.as_deref(), self.platform)?;
        let booter = booter::materialize(
            &self.spec.classpath,
            &self.spec.bootstrap_class,
            self.platform,
        )?;
        let arg_file = ArgFile::write(&self.spec.program_args)?;
        let args = self.command_args(&booter, &arg_file);

        if self.verbose {
            print_info(format_args!(
                "Classpath:\n{}",
                self.spec
                    .classpath
                    .iter()
                    .map(|p| p.to_string_lossy().into_owned())
                    .collect::<Vec<_>>()
                    .join(",\n")
            ));
            print_info(format_args!(
                "Executing: {} {}",
                java.path().display(),
                args.join(" ")
            ));
        }

        self.spawn_and_wait(&java, &args).await
    }

    /// Full child argument vector:
    /// `[jvm args] [-Dname=value]* -jar <booter> <main class> <arg file>`.
    /// Only the booter path crosses the OS argv natively; the classpath
    /// travels in its manifest and the program arguments in the file.
    fn command_args(&self, booter: &BooterDescriptor, arg_file: &ArgFile) -> Vec<String> {
        let mut args = self.spec.jvm_args.clone();
        for property in self.propagated_properties() {
            args.push(property.as_jvm_flag());
        }
        args.push("-jar".to_string());
        args.push(booter.path().to_string_lossy().into_owned());
        args.push(self.spec.main_class.clone());
        args.push(arg_file.path().to_string_lossy().into_owned());
        args
    }

    /// The host property set (when propagation is on) merged with the
    /// explicit definitions, filtered through the denylist. Explicit
    /// definitions win over inherited values; the merge is name-sorted so
    /// the flag order is deterministic.
    fn propagated_properties(&self) -> Vec<PropagatedProperty> {
        let mut merged: BTreeMap<String, String> = BTreeMap::new();
        if self.spec.propagate_host_properties {
            merged.extend(std::env::vars());
        }
        merged.extend(self.spec.properties.iter().cloned());
        props::collect(merged, self.platform, |message| print_warning(message))
    }

    async fn spawn_and_wait(
        &self,
        java: &JavaExecutable,
        args: &[String],
    ) -> Result<ForkOutcome, ForkError> {
        let mut command = Command::new(java.path());
        command
            .args(args)
            .stdin(Stdio::inherit())
            .stdout(Stdio::inherit())
            .stderr(Stdio::piped())
            .kill_on_drop(true);
        if let Some(dir) = &self.spec.working_dir {
            command.current_dir(dir);
        }

        let mut child = command.spawn().map_err(|e| ForkError::Spawn {
            executable: java.path().to_path_buf(),
            source: e,
        })?;

        // Tee child stderr through to the host live, keeping a bounded tail
        // for the hard-failure diagnostic.
        let tail_task = child.stderr.take().map(|stderr| tokio::spawn(tee_stderr(stderr)));

        let status = wait_or_interrupt(&mut child).await?;

        let stderr_tail = match tail_task {
            Some(task) => task.await.unwrap_or_default(),
            None => String::new(),
        };

        // A signal-killed child has no exit code.
        let exit_code = status.code().unwrap_or(-1);
        Ok(ForkOutcome::from_exit_code(exit_code, stderr_tail))
    }
}

async fn tee_stderr(mut stderr: tokio::process::ChildStderr) -> String {
    let mut host = tokio::io::stderr();
    let mut tail: Vec<u8> = Vec::new();
    let mut buf = [0u8; 4096];
    loop {
        match stderr.read(&mut buf).await {
            Ok(0) | Err(_) => break,
            Ok(n) => {
                let _ = host.write_all(&buf[..n]).await;
                let _ = host.flush().await;
                tail.extend_from_slice(&buf[..n]);
                if tail.len() > STDERR_TAIL_LIMIT {
                    tail.drain(..tail.len() - STDERR_TAIL_LIMIT);
                }
            }
        }
    }
    String::from_utf8_lossy(&tail).into_owned()
}

/// Wait for the child, racing against SIGINT/SIGTERM so the child is never
/// orphaned when the host is killed mid-run. This is shutdown cleanup, not a
/// cancellation protocol: the fork itself has no cancel API.
#[cfg(unix)]
async fn wait_or_interrupt(child: &mut Child) -> Result<std::process::ExitStatus, ForkError> {
    use tokio::signal::unix::{signal, SignalKind};

    let mut sigint = signal(SignalKind::interrupt()).map_err(ForkError::Signal)?;
    let mut sigterm = signal(SignalKind::terminate()).map_err(ForkError::Signal)?;
    tokio::select! {
        status = child.wait() => status.map_err(ForkError::Wait),
        _ = sigint.recv() => {
            let _ = child.kill().await;
            Err(ForkError::Interrupted)
        }
        _ = sigterm.recv() => {
            let _ = child.kill().await;
            Err(ForkError::Interrupted)
        }
    }
}

#[cfg(not(unix))]
async fn wait_or_interrupt(child: &mut Child) -> Result<std::process::ExitStatus, ForkError> {
    tokio::select! {
        status = child.wait() => status.map_err(ForkError::Wait),
        _ = tokio::signal::ctrl_c() => {
            let _ = child.kill().await;
            Err(ForkError::Interrupted)
        }
    }
}

#[derive(Debug, Error)]
pub enum ForkError {
    #[error("classpath entry {0} does not exist")]
    ClasspathEntryMissing(PathBuf),

    #[error(transparent)]
    Java(#[from] JavaError),

    #[error(transparent)]
    ArgFile(#[from] ArgFileError),

    #[error(transparent)]
    Booter(#[from] BooterError),

    #[error("failed to spawn {executable}: {source}")]
    Spawn {
        executable: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to wait for the forked engine: {0}")]
    Wait(#[source] std::io::Error),

    #[error("failed to install a signal handler: {0}")]
    Signal(#[source] std::io::Error),

    #[error("interrupted")]
    Interrupted,
}

#[cfg(test)]
#[path = "fork_tests.rs"]
mod tests;

// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Simulation selection.
//!
//! Applies include/exclude filtering and a selection policy to the scanned
//! candidates, producing either a definitive list of simulations to run or a
//! typed error. Filtering uses one glob dialect: `*` and `?` stay within a
//! `.`-delimited package segment, `**` as its own segment crosses any number
//! of segments.

use std::io::{BufRead, Write};

use glob::{MatchOptions, Pattern};
use thiserror::Error;

/// Upper bound on interactive selection attempts, so a build misconfigured
/// as interactive cannot loop forever.
pub const MAX_INTERACTIVE_ATTEMPTS: u32 = 5;

/// How the final simulation list is derived from the candidates.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SelectionPolicy {
    /// Explicit configuration always wins; candidates are not consulted.
    ExplicitName(String),
    /// Exactly one match is required.
    Unique,
    /// Every match runs, one at a time.
    RunAllSequentially,
    /// Ask the user to pick from the matches.
    InteractivePrompt,
}

impl SelectionPolicy {
    /// Derive the policy from user configuration and execution mode.
    pub fn resolve(explicit: Option<&str>, allow_multiple: bool, interactive: bool) -> Self {
        match explicit {
            Some(name) => SelectionPolicy::ExplicitName(name.to_string()),
            None if allow_multiple => SelectionPolicy::RunAllSequentially,
            None if interactive => SelectionPolicy::InteractivePrompt,
            None => SelectionPolicy::Unique,
        }
    }
}

/// Select the simulations to run.
///
/// `input`/`output` are only touched under the interactive policy.
pub fn select<R: BufRead, W: Write>(
    explicit: Option<&str>,
    candidates: &[String],
    includes: &[String],
    excludes: &[String],
    allow_multiple: bool,
    interactive: bool,
    input: &mut R,
    output: &mut W,
) -> Result<Vec<String>, SelectionError> {
    let policy = SelectionPolicy::resolve(explicit, allow_multiple, interactive);

    if let SelectionPolicy::ExplicitName(name) = policy {
        return Ok(vec![name]);
    }

    let filtered = filter_candidates(candidates, includes, excludes);

    if filtered.is_empty() {
        return Err(SelectionError::NoCandidates);
    }
    if filtered.len() == 1 {
        return Ok(filtered);
    }

    match policy {
        SelectionPolicy::RunAllSequentially => Ok(filtered),
        SelectionPolicy::InteractivePrompt => {
            prompt_for_simulation(&filtered, input, output).map(|s| vec![s])
        }
        SelectionPolicy::Unique => Err(SelectionError::AmbiguousInNonInteractiveMode),
        SelectionPolicy::ExplicitName(_) => unreachable!("handled above"),
    }
}

/// Keep candidates matching at least one include (all, when none are given)
/// and matching no exclude. Set-based; candidate order is preserved.
fn filter_candidates(candidates: &[String], includes: &[String], excludes: &[String]) -> Vec<String> {
    let includes = compile_patterns(includes);
    let excludes = compile_patterns(excludes);

    candidates
        .iter()
        .filter(|name| {
            let included = includes.is_empty() || matches_any(&includes, name);
            let excluded = matches_any(&excludes, name);
            included && !excluded
        })
        .cloned()
        .collect()
}

/// Compile class-name globs. Package dots map to path separators so the glob
/// engine's segment rules give `*` its non-crossing semantics; unparseable
/// patterns are dropped.
fn compile_patterns(patterns: &[String]) -> Vec<Pattern> {
    patterns
        .iter()
        .filter_map(|p| Pattern::new(&p.replace('.', "/")).ok())
        .collect()
}

fn matches_any(patterns: &[Pattern], class_name: &str) -> bool {
    let options = MatchOptions {
        case_sensitive: true,
        require_literal_separator: true,
        require_literal_leading_dot: false,
    };
    let segmented = class_name.replace('.', "/");
    patterns.iter().any(|p| p.matches_with(&segmented, options))
}

fn prompt_for_simulation<R: BufRead, W: Write>(
    simulations: &[String],
    input: &mut R,
    output: &mut W,
) -> Result<String, SelectionError> {
    for _ in 0..MAX_INTERACTIVE_ATTEMPTS {
        let _ = writeln!(output, "Choose a simulation number:");
        for (i, simulation) in simulations.iter().enumerate() {
            let _ = writeln!(output, "     [{}] {}", i, simulation);
        }
        let _ = output.flush();

        let mut line = String::new();
        match input.read_line(&mut line) {
            // EOF: the attended policy was a misconfiguration, stop now.
            Ok(0) | Err(_) => break,
            Ok(_) => {}
        }
        match line.trim().parse::<usize>() {
            Ok(selected) if selected < simulations.len() => {
                return Ok(simulations[selected].clone());
            }
            Ok(_) => {
                let _ = writeln!(output, "Invalid selection. Please try again.");
            }
            Err(_) => {
                let _ = writeln!(output, "Invalid number. Please try again.");
            }
        }
    }
    Err(SelectionError::InteractiveAttemptsExhausted {
        attempts: MAX_INTERACTIVE_ATTEMPTS,
    })
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SelectionError {
    #[error("no simulations to run; add a simulation class to the classpath or check the include/exclude patterns")]
    NoCandidates,

    #[error("more than one simulation is available in batch mode; specify one with --simulation <class> or run them all sequentially with --run-multiple")]
    AmbiguousInNonInteractiveMode,

    #[error("max attempts ({attempts}) of reading the simulation number reached, aborting")]
    InteractiveAttemptsExhausted { attempts: u32 },
}

#[cfg(test)]
#[path = "select_tests.rs"]
mod tests;

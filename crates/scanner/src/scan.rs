// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Simulation discovery over compiled classes.

use std::path::PathBuf;

use thiserror::Error;
use walkdir::WalkDir;

use crate::classfile::{ClassFileError, ClassInfo};
use crate::resolver::ClassIndex;

/// The simulation contract types, one per source-ecosystem generation.
pub const SIMULATION_MARKERS: [&str; 2] = [
    "io.gatling.core.scenario.Simulation",
    "io.gatling.javaapi.core.Simulation",
];

/// One scanned class and its classification.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ScenarioCandidate {
    /// Fully qualified class name, dotted.
    pub class_name: String,
    /// Instantiable: not abstract, not an interface.
    pub is_concrete: bool,
    /// Derives (transitively) from one of the simulation contracts.
    pub extends_marker: bool,
}

/// Result of one scan pass. Recomputed fresh on every call; compiled classes
/// may change between runs.
#[derive(Debug, Default)]
pub struct ScanResult {
    candidates: Vec<ScenarioCandidate>,
    skipped: Vec<(PathBuf, ClassFileError)>,
}

impl ScanResult {
    /// All scanned classes with their classification, sorted by name.
    pub fn candidates(&self) -> &[ScenarioCandidate] {
        &self.candidates
    }

    /// Classes that satisfy both predicates, in deterministic lexicographic
    /// order so downstream selection is reproducible on unchanged inputs.
    pub fn simulation_classes(&self) -> Vec<String> {
        self.candidates
            .iter()
            .filter(|c| c.is_concrete && c.extends_marker)
            .map(|c| c.class_name.clone())
            .collect()
    }

    /// Files that were not parseable classfiles, with the reason.
    pub fn skipped(&self) -> &[(PathBuf, ClassFileError)] {
        &self.skipped
    }
}

/// Scan the class directories for simulation classes.
///
/// Only classes found under `class_directories` are scan targets; the
/// `dependency_archives` feed hierarchy resolution so candidates whose base
/// classes live in a library jar still classify correctly.
pub fn scan(
    class_directories: &[PathBuf],
    dependency_archives: &[PathBuf],
) -> Result<ScanResult, ScanError> {
    let mut index = ClassIndex::new(class_directories, dependency_archives, SIMULATION_MARKERS);
    let mut result = ScanResult::default();

    for dir in class_directories {
        if !dir.is_dir() {
            continue;
        }
        for entry in WalkDir::new(dir).sort_by_file_name() {
            let entry = entry.map_err(|e| ScanError::Walk {
                dir: dir.clone(),
                source: e,
            })?;
            if !entry.file_type().is_file()
                || entry.path().extension().is_none_or(|ext| ext != "class")
            {
                continue;
            }
            let bytes = std::fs::read(entry.path()).map_err(|e| ScanError::Io {
                path: entry.path().to_path_buf(),
                source: e,
            })?;
            let info = match ClassInfo::parse(&bytes) {
                Ok(info) => info,
                Err(e) => {
                    result.skipped.push((entry.path().to_path_buf(), e));
                    continue;
                }
            };
            if info.is_module() {
                continue;
            }
            let extends_marker = index.derives_from_marker(&info);
            result.candidates.push(ScenarioCandidate {
                is_concrete: info.is_concrete(),
                extends_marker,
                class_name: info.name,
            });
        }
    }

    result.candidates.sort_by(|a, b| a.class_name.cmp(&b.class_name));
    result.candidates.dedup_by(|a, b| a.class_name == b.class_name);
    Ok(result)
}

#[derive(Debug, Error)]
pub enum ScanError {
    #[error("failed to walk class directory {dir}: {source}")]
    Walk {
        dir: PathBuf,
        #[source]
        source: walkdir::Error,
    },

    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

#[cfg(test)]
#[path = "scan_tests.rs"]
mod tests;

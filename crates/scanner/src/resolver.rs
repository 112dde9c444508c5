// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Class lookup across class directories and dependency archives.
//!
//! Plays the role of an isolated classloading context: lookups are served
//! from an explicit set of sources in classpath order, never from anything
//! the host process happens to have loaded. Verdicts are memoized because a
//! project's simulations usually share most of their ancestry.

use std::collections::{HashMap, HashSet};
use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};

use zip::ZipArchive;

use crate::classfile::ClassInfo;

pub(crate) struct ClassIndex {
    sources: Vec<Source>,
    markers: HashSet<String>,
    parsed: HashMap<String, Option<ClassInfo>>,
    verdicts: HashMap<String, bool>,
}

enum Source {
    Directory(PathBuf),
    Archive(ZipArchive<File>),
}

impl ClassIndex {
    /// Build an index over class directories (searched first) and jar
    /// archives. Entries that do not exist or are not readable archives are
    /// skipped: a classpath routinely carries non-jar files.
    pub(crate) fn new<M>(class_directories: &[PathBuf], archives: &[PathBuf], markers: M) -> Self
    where
        M: IntoIterator,
        M::Item: Into<String>,
    {
        let mut sources: Vec<Source> = class_directories
            .iter()
            .filter(|d| d.is_dir())
            .map(|d| Source::Directory(d.clone()))
            .collect();
        for archive in archives {
            if let Some(zip) = open_archive(archive) {
                sources.push(Source::Archive(zip));
            }
        }
        Self {
            sources,
            markers: markers.into_iter().map(Into::into).collect(),
            parsed: HashMap::new(),
            verdicts: HashMap::new(),
        }
    }

    /// Does `class` derive, directly or transitively, from one of the marker
    /// contracts? Both the superclass chain and interface hierarchy are
    /// walked; unresolvable parents terminate their branch.
    pub(crate) fn derives_from_marker(&mut self, class: &ClassInfo) -> bool {
        let mut seen = HashSet::new();
        parents(class).any(|p| {
            let p = p.to_string();
            self.name_derives(&p, &mut seen)
        })
    }

    fn name_derives(&mut self, name: &str, seen: &mut HashSet<String>) -> bool {
        if self.markers.contains(name) {
            return true;
        }
        if let Some(verdict) = self.verdicts.get(name) {
            return *verdict;
        }
        if !seen.insert(name.to_string()) {
            // Cycle in a corrupt hierarchy; treat as not derived.
            return false;
        }
        let parent_names: Vec<String> = match self.lookup(name) {
            Some(info) => parents(&info).map(str::to_string).collect(),
            None => Vec::new(),
        };
        let verdict = parent_names.iter().any(|p| self.name_derives(p, seen));
        self.verdicts.insert(name.to_string(), verdict);
        verdict
    }

    fn lookup(&mut self, name: &str) -> Option<ClassInfo> {
        if let Some(cached) = self.parsed.get(name) {
            return cached.clone();
        }
        let rel = format!("{}.class", name.replace('.', "/"));
        let info = self
            .load_bytes(&rel)
            .and_then(|bytes| ClassInfo::parse(&bytes).ok());
        self.parsed.insert(name.to_string(), info.clone());
        info
    }

    fn load_bytes(&mut self, rel: &str) -> Option<Vec<u8>> {
        for source in &mut self.sources {
            match source {
                Source::Directory(dir) => {
                    let path = dir.join(rel);
                    if let Ok(bytes) = std::fs::read(&path) {
                        return Some(bytes);
                    }
                }
                Source::Archive(zip) => {
                    if let Ok(mut entry) = zip.by_name(rel) {
                        let mut bytes = Vec::with_capacity(entry.size() as usize);
                        if entry.read_to_end(&mut bytes).is_ok() {
                            return Some(bytes);
                        }
                    }
                }
            }
        }
        None
    }
}

fn open_archive(path: &Path) -> Option<ZipArchive<File>> {
    let file = File::open(path).ok()?;
    ZipArchive::new(file).ok()
}

fn parents(class: &ClassInfo) -> impl Iterator<Item = &str> {
    class
        .super_name
        .as_deref()
        .into_iter()
        .chain(class.interfaces.iter().map(String::as_str))
}

#[cfg(test)]
#[path = "resolver_tests.rs"]
mod tests;

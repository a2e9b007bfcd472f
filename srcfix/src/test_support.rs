//! Test-only helpers: rule builders, a temp source tree, a write spy and a
//! recording reporter.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use regex::Regex;
use tempfile::TempDir;

use crate::core::guard::Guard;
use crate::core::rule::Rule;
use crate::core::rule_set::RuleSet;
use crate::core::template::Template;
use crate::core::types::{FileEvent, ProcessingResult, Summary};
use crate::io::report::Reporter;
use crate::io::writer::ContentWriter;

/// Literal substring rule.
pub fn literal(find: &str, replace: &str) -> Rule {
    Rule::Literal {
        find: find.to_string(),
        replace: replace.to_string(),
    }
}

/// Regex rule. Panics on an invalid pattern or template.
pub fn pattern(pattern: &str, replace: &str) -> Rule {
    let regex = Regex::new(pattern).expect("valid test pattern");
    let template = Template::compile(replace, &regex).expect("valid test template");
    Rule::Pattern { regex, template }
}

pub fn rule_set(name: &str, rules: Vec<Rule>) -> RuleSet {
    RuleSet::new(name, rules)
}

pub fn contains_guard(markers: &[&str]) -> Guard {
    Guard::Contains(markers.iter().map(|marker| marker.to_string()).collect())
}

/// Temporary directory holding a throwaway source tree.
pub struct SourceTree {
    dir: TempDir,
}

impl SourceTree {
    pub fn new() -> io::Result<Self> {
        Ok(Self {
            dir: tempfile::tempdir()?,
        })
    }

    pub fn root(&self) -> &Path {
        self.dir.path()
    }

    /// Absolute path of `relative` inside the tree.
    pub fn path(&self, relative: &str) -> PathBuf {
        self.dir.path().join(relative)
    }

    /// Write `contents` at `relative`, creating parent directories.
    pub fn write(&self, relative: &str, contents: &str) -> io::Result<PathBuf> {
        let path = self.path(relative);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, contents)?;
        Ok(path)
    }

    pub fn read(&self, relative: &str) -> io::Result<String> {
        fs::read_to_string(self.path(relative))
    }
}

/// Writer that records writes instead of performing them.
#[derive(Default)]
pub struct SpyWriter {
    written: Mutex<Vec<(PathBuf, String)>>,
}

impl SpyWriter {
    pub fn writes(&self) -> usize {
        self.written.lock().expect("spy lock").len()
    }

    pub fn written(&self) -> Vec<(PathBuf, String)> {
        self.written.lock().expect("spy lock").clone()
    }
}

impl ContentWriter for SpyWriter {
    fn write(&self, path: &Path, contents: &str) -> io::Result<()> {
        self.written
            .lock()
            .expect("spy lock")
            .push((path.to_path_buf(), contents.to_string()));
        Ok(())
    }
}

/// Reporter that keeps every event and the final summary.
#[derive(Default)]
pub struct RecordingReporter {
    pub events: Vec<FileEvent>,
    pub summary: Option<Summary>,
}

impl RecordingReporter {
    pub fn paths(&self) -> Vec<PathBuf> {
        self.events.iter().map(|event| event.path.clone()).collect()
    }

    pub fn failed_paths(&self) -> Vec<PathBuf> {
        self.events
            .iter()
            .filter(|event| matches!(event.result, ProcessingResult::Failed(_)))
            .map(|event| event.path.clone())
            .collect()
    }
}

impl Reporter for RecordingReporter {
    fn report(&mut self, event: &FileEvent) {
        self.events.push(FileEvent {
            path: event.path.clone(),
            result: clone_result(&event.result),
            applied: event.applied.clone(),
            unstable: event.unstable.clone(),
        });
    }

    fn finish(&mut self, summary: &Summary) {
        self.summary = Some(*summary);
    }
}

/// `FileError` holds `io::Error`, which is not `Clone`; keep kind and message.
fn clone_result(result: &ProcessingResult) -> ProcessingResult {
    use crate::error::FileError;

    match result {
        ProcessingResult::Unchanged => ProcessingResult::Unchanged,
        ProcessingResult::Changed => ProcessingResult::Changed,
        ProcessingResult::Failed(err) => ProcessingResult::Failed(match err {
            FileError::Read { path, source } => FileError::Read {
                path: path.clone(),
                source: io::Error::new(source.kind(), source.to_string()),
            },
            FileError::Encoding { path, source } => FileError::Encoding {
                path: path.clone(),
                source: source.clone(),
            },
            FileError::Write { path, source } => FileError::Write {
                path: path.clone(),
                source: io::Error::new(source.kind(), source.to_string()),
            },
        }),
    }
}

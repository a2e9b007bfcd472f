//! Shared per-file types passed between the engine, writer and driver.

use std::path::PathBuf;

use crate::error::FileError;

/// One file in flight: read once, rewritten in memory, then committed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileUnit {
    pub path: PathBuf,
    pub original: String,
    pub current: String,
}

impl FileUnit {
    pub fn new(path: PathBuf, content: String) -> Self {
        Self {
            path,
            current: content.clone(),
            original: content,
        }
    }

    pub fn is_changed(&self) -> bool {
        self.current != self.original
    }
}

/// Outcome of committing one file.
#[derive(Debug)]
pub enum ProcessingResult {
    Unchanged,
    /// Content differed and was written (or would be, in a dry run).
    Changed,
    Failed(FileError),
}

/// Everything reported about one processed file.
#[derive(Debug)]
pub struct FileEvent {
    pub path: PathBuf,
    pub result: ProcessingResult,
    /// Rule sets that changed the content, in execution order.
    pub applied: Vec<String>,
    /// Rule sets that changed the content again when re-applied.
    pub unstable: Vec<String>,
}

/// Aggregate counts for a batch.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Summary {
    pub changed: usize,
    pub unchanged: usize,
    pub failed: usize,
}

impl Summary {
    pub fn record(&mut self, result: &ProcessingResult) {
        match result {
            ProcessingResult::Unchanged => self.unchanged += 1,
            ProcessingResult::Changed => self.changed += 1,
            ProcessingResult::Failed(_) => self.failed += 1,
        }
    }

    pub fn total(&self) -> usize {
        self.changed + self.unchanged + self.failed
    }
}

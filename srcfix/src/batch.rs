//! Batch driver for `srcfix run` and `srcfix check`.
//!
//! Each file is read, rewritten and committed on its own; per-file failures
//! are recorded and the batch moves on. Results are folded into a
//! [`Summary`] here, at the driver boundary, in input order.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Result, bail};
use rayon::prelude::*;
use tracing::{debug, info};

use crate::core::engine::{rewrite_unit, unstable_rule_sets};
use crate::core::rule_set::RuleSet;
use crate::core::types::{FileEvent, FileUnit, ProcessingResult, Summary};
use crate::error::FileError;
use crate::io::report::Reporter;
use crate::io::walk::Candidates;
use crate::io::writer::{ContentWriter, commit};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BatchOptions {
    /// Process files on the rayon pool instead of sequentially.
    pub parallel: bool,
    /// Re-apply each rule set to its own output and report unstable ones.
    pub verify_idempotence: bool,
}

/// Keep only the rule sets named in `only`, preserving configured order.
///
/// An empty `only` keeps everything. Unknown names are an error.
pub fn select_rule_sets(rule_sets: Vec<RuleSet>, only: &[String]) -> Result<Vec<RuleSet>> {
    if only.is_empty() {
        return Ok(rule_sets);
    }
    for name in only {
        if !rule_sets.iter().any(|rule_set| rule_set.name() == name) {
            bail!("unknown rule set '{name}'");
        }
    }
    Ok(rule_sets
        .into_iter()
        .filter(|rule_set| only.iter().any(|name| name == rule_set.name()))
        .collect())
}

/// Read a file as UTF-8 text.
pub fn read_source(path: &Path) -> Result<String, FileError> {
    let bytes = fs::read(path).map_err(|source| FileError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    String::from_utf8(bytes).map_err(|source| FileError::Encoding {
        path: path.to_path_buf(),
        source,
    })
}

/// Read, rewrite and commit one file.
pub fn process_file<W: ContentWriter + ?Sized>(
    path: &Path,
    rule_sets: &[RuleSet],
    writer: &W,
    options: BatchOptions,
) -> FileEvent {
    let content = match read_source(path) {
        Ok(content) => content,
        Err(err) => return failed_event(path.to_path_buf(), err),
    };

    let mut unit = FileUnit::new(path.to_path_buf(), content);
    let applied = rewrite_unit(&mut unit, rule_sets);
    let unstable = if options.verify_idempotence {
        unstable_rule_sets(&unit.path, &unit.original, rule_sets)
    } else {
        Vec::new()
    };
    debug!(path = %path.display(), applied = ?applied, "rewrote file");

    let result = commit(writer, &unit.path, &unit.original, &unit.current);
    FileEvent {
        path: unit.path,
        result,
        applied,
        unstable,
    }
}

fn failed_event(path: PathBuf, err: FileError) -> FileEvent {
    FileEvent {
        path,
        result: ProcessingResult::Failed(err),
        applied: Vec::new(),
        unstable: Vec::new(),
    }
}

/// Process every path and return the folded summary.
///
/// The reporter sees events in `paths` order in both sequential and parallel
/// mode; `paths` should not contain duplicates.
pub fn run_batch<W, R>(
    paths: &[PathBuf],
    rule_sets: &[RuleSet],
    writer: &W,
    reporter: &mut R,
    options: BatchOptions,
) -> Summary
where
    W: ContentWriter + ?Sized,
    R: Reporter + ?Sized,
{
    drive(paths, Vec::new(), rule_sets, writer, reporter, options)
}

/// Like [`run_batch`] over walked candidates.
///
/// Entries the walk could not read are reported as failures ahead of the
/// files, in walk order.
pub fn run_candidates<W, R>(
    candidates: Candidates,
    rule_sets: &[RuleSet],
    writer: &W,
    reporter: &mut R,
    options: BatchOptions,
) -> Summary
where
    W: ContentWriter + ?Sized,
    R: Reporter + ?Sized,
{
    let failures = candidates
        .unreadable
        .into_iter()
        .map(|err| failed_event(err.path().to_path_buf(), err))
        .collect();
    drive(&candidates.files, failures, rule_sets, writer, reporter, options)
}

fn drive<W, R>(
    paths: &[PathBuf],
    failures: Vec<FileEvent>,
    rule_sets: &[RuleSet],
    writer: &W,
    reporter: &mut R,
    options: BatchOptions,
) -> Summary
where
    W: ContentWriter + ?Sized,
    R: Reporter + ?Sized,
{
    info!(
        files = paths.len(),
        unreadable = failures.len(),
        rule_sets = rule_sets.len(),
        parallel = options.parallel,
        "starting batch"
    );
    let mut summary = Summary::default();
    let mut tally = |event: FileEvent| {
        summary.record(&event.result);
        reporter.report(&event);
    };
    failures.into_iter().for_each(&mut tally);

    if options.parallel {
        let events: Vec<FileEvent> = paths
            .par_iter()
            .map(|path| process_file(path, rule_sets, writer, options))
            .collect();
        events.into_iter().for_each(&mut tally);
    } else {
        for path in paths {
            tally(process_file(path, rule_sets, writer, options));
        }
    }

    reporter.finish(&summary);
    info!(
        changed = summary.changed,
        unchanged = summary.unchanged,
        failed = summary.failed,
        "batch finished"
    );
    summary
}

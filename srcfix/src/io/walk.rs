//! Candidate file enumeration.

use std::collections::BTreeSet;
use std::io;
use std::path::{Path, PathBuf};

use anyhow::{Result, bail};
use tracing::{debug, warn};
use walkdir::{DirEntry, WalkDir};

use crate::core::rule_set::normalize_extension;
use crate::error::FileError;

/// Files to process plus the entries the walk could not read.
#[derive(Debug, Default)]
pub struct Candidates {
    /// Sorted and de-duplicated.
    pub files: Vec<PathBuf>,
    pub unreadable: Vec<FileError>,
}

/// Walk `roots` and collect files whose extension is in `extensions`.
///
/// Directories named in `exclude_dirs` are pruned at any depth below a root.
/// A root that is a file is kept if its extension matches. Unreadable entries
/// below a root land in [`Candidates::unreadable`]; a missing root is an
/// error.
pub fn collect_files(
    roots: &[PathBuf],
    extensions: &[String],
    exclude_dirs: &[String],
) -> Result<Candidates> {
    let extensions: BTreeSet<String> = extensions
        .iter()
        .map(|ext| normalize_extension(ext))
        .filter(|ext| !ext.is_empty())
        .collect();
    let mut files = BTreeSet::new();
    let mut unreadable = Vec::new();

    for root in roots {
        if !root.exists() {
            bail!("root {} does not exist", root.display());
        }
        let walker = WalkDir::new(root)
            .follow_links(false)
            .into_iter()
            .filter_entry(|entry| !is_excluded(entry, exclude_dirs));
        for entry in walker {
            let entry = match entry {
                Ok(entry) => entry,
                Err(err) => {
                    warn!(error = %err, "unreadable entry");
                    let path = err.path().unwrap_or(root.as_path()).to_path_buf();
                    unreadable.push(FileError::Read {
                        path,
                        source: io::Error::from(err),
                    });
                    continue;
                }
            };
            if entry.file_type().is_file() && has_extension(entry.path(), &extensions) {
                files.insert(entry.into_path());
            }
        }
    }

    debug!(
        count = files.len(),
        unreadable = unreadable.len(),
        "collected candidate files"
    );
    Ok(Candidates {
        files: files.into_iter().collect(),
        unreadable,
    })
}

fn is_excluded(entry: &DirEntry, exclude_dirs: &[String]) -> bool {
    entry.depth() > 0
        && entry.file_type().is_dir()
        && exclude_dirs
            .iter()
            .any(|name| entry.file_name() == name.as_str())
}

fn has_extension(path: &Path, extensions: &BTreeSet<String>) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| extensions.contains(&ext.to_ascii_lowercase()))
}

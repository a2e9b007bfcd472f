//! Change-gated write-back.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::core::types::ProcessingResult;
use crate::error::FileError;

/// Persists rewritten content. `Sync` so one writer can serve a worker pool.
pub trait ContentWriter: Sync {
    fn write(&self, path: &Path, contents: &str) -> io::Result<()>;
}

/// Writes through a sibling temp file and a rename, keeping permissions.
///
/// Symlinks are resolved first, so the link target is replaced and the link
/// itself is left in place. Read-only targets fail with
/// [`io::ErrorKind::PermissionDenied`] and are not touched.
pub struct FsWriter;

impl ContentWriter for FsWriter {
    fn write(&self, path: &Path, contents: &str) -> io::Result<()> {
        let target = fs::canonicalize(path)?;
        let permissions = fs::metadata(&target)?.permissions();
        if permissions.readonly() {
            return Err(io::Error::new(
                io::ErrorKind::PermissionDenied,
                "file is read-only",
            ));
        }
        let tmp_path = temp_path(&target)?;
        let result = write_then_rename(&target, &tmp_path, contents, permissions);
        if result.is_err() {
            let _ = fs::remove_file(&tmp_path);
        }
        result
    }
}

/// Reports what would change without touching the filesystem.
pub struct DryRunWriter;

impl ContentWriter for DryRunWriter {
    fn write(&self, _path: &Path, _contents: &str) -> io::Result<()> {
        Ok(())
    }
}

/// Write `rewritten` only if it differs from `original`.
///
/// I/O failures become [`ProcessingResult::Failed`]; nothing is propagated.
pub fn commit<W: ContentWriter + ?Sized>(
    writer: &W,
    path: &Path,
    original: &str,
    rewritten: &str,
) -> ProcessingResult {
    if rewritten == original {
        return ProcessingResult::Unchanged;
    }
    match writer.write(path, rewritten) {
        Ok(()) => {
            debug!(path = %path.display(), "wrote rewritten file");
            ProcessingResult::Changed
        }
        Err(source) => ProcessingResult::Failed(FileError::Write {
            path: path.to_path_buf(),
            source,
        }),
    }
}

fn temp_path(path: &Path) -> io::Result<PathBuf> {
    let name = path.file_name().ok_or_else(|| {
        io::Error::new(io::ErrorKind::InvalidInput, "path has no file name")
    })?;
    let mut tmp_name = name.to_os_string();
    tmp_name.push(".srcfix.tmp");
    Ok(path.with_file_name(tmp_name))
}

fn write_then_rename(
    path: &Path,
    tmp_path: &Path,
    contents: &str,
    permissions: fs::Permissions,
) -> io::Result<()> {
    fs::write(tmp_path, contents)?;
    fs::set_permissions(tmp_path, permissions)?;
    fs::rename(tmp_path, path)
}

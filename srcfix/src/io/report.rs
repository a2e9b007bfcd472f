//! Reporting sinks for per-file events and the final summary.

use std::io::{self, Write};

use tracing::{debug, warn};

use crate::core::types::{FileEvent, ProcessingResult, Summary};

pub trait Reporter {
    /// Called once per processed file, in input order.
    fn report(&mut self, event: &FileEvent);
    /// Called once after the last file.
    fn finish(&mut self, summary: &Summary);
}

/// Line-oriented reporter. Unchanged files only show up in debug tracing.
pub struct ConsoleReporter<W: Write> {
    out: W,
    dry_run: bool,
}

impl ConsoleReporter<io::Stdout> {
    pub fn stdout(dry_run: bool) -> Self {
        Self::new(io::stdout(), dry_run)
    }
}

impl<W: Write> ConsoleReporter<W> {
    pub fn new(out: W, dry_run: bool) -> Self {
        Self { out, dry_run }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> Reporter for ConsoleReporter<W> {
    fn report(&mut self, event: &FileEvent) {
        let path = event.path.display();
        // Write errors on `out` are ignored.
        let _ = match &event.result {
            ProcessingResult::Unchanged => {
                debug!(path = %path, "unchanged");
                Ok(())
            }
            ProcessingResult::Changed => {
                let verb = if self.dry_run { "would change" } else { "changed" };
                writeln!(self.out, "{verb}: {path} ({})", event.applied.join(", "))
            }
            ProcessingResult::Failed(err) => writeln!(self.out, "failed: {err}"),
        };
        if !event.unstable.is_empty() {
            warn!(path = %path, rule_sets = ?event.unstable, "rule sets are not idempotent");
            let _ = writeln!(
                self.out,
                "unstable: {path} ({})",
                event.unstable.join(", ")
            );
        }
    }

    fn finish(&mut self, summary: &Summary) {
        let _ = writeln!(
            self.out,
            "summary: changed={} unchanged={} failed={}",
            summary.changed, summary.unchanged, summary.failed
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::FileError;
    use std::path::PathBuf;

    fn event(path: &str, result: ProcessingResult, applied: &[&str]) -> FileEvent {
        FileEvent {
            path: PathBuf::from(path),
            result,
            applied: applied.iter().map(|name| name.to_string()).collect(),
            unstable: Vec::new(),
        }
    }

    fn render(dry_run: bool, events: Vec<FileEvent>) -> String {
        let mut reporter = ConsoleReporter::new(Vec::new(), dry_run);
        let mut summary = Summary::default();
        for event in &events {
            summary.record(&event.result);
            reporter.report(event);
        }
        reporter.finish(&summary);
        String::from_utf8(reporter.into_inner()).expect("utf8")
    }

    #[test]
    fn lists_changed_and_failed_files_then_summary() {
        let output = render(
            false,
            vec![
                event("src/a.ts", ProcessingResult::Changed, &["ui-import-casing"]),
                event("src/b.ts", ProcessingResult::Unchanged, &[]),
                event(
                    "src/c.ts",
                    ProcessingResult::Failed(FileError::Read {
                        path: PathBuf::from("src/c.ts"),
                        source: io::Error::from(io::ErrorKind::PermissionDenied),
                    }),
                    &[],
                ),
            ],
        );
        let lines: Vec<&str> = output.lines().collect();
        assert_eq!(lines[0], "changed: src/a.ts (ui-import-casing)");
        assert!(lines[1].starts_with("failed: read src/c.ts: "));
        assert_eq!(lines[2], "summary: changed=1 unchanged=1 failed=1");
        assert_eq!(lines.len(), 3);
    }

    #[test]
    fn dry_run_uses_would_change_and_lists_unstable() {
        let mut changed = event("src/a.tsx", ProcessingResult::Changed, &["x"]);
        changed.unstable = vec!["x".to_string()];
        let output = render(true, vec![changed]);
        assert!(output.contains("would change: src/a.tsx (x)\n"));
        assert!(output.contains("unstable: src/a.tsx (x)\n"));
    }
}

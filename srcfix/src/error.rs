//! Error taxonomy.
//!
//! - [`FileError`]: per-file conditions. Converted to a `Failed` outcome by the
//!   batch driver; never fatal to the batch.
//! - [`PatternError`]: configuration defects found while compiling the rule
//!   catalog. Fatal before any file is read.

use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

/// Per-file read/decode/write failure.
#[derive(Debug, Error)]
pub enum FileError {
    #[error("read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("decode {}: not valid UTF-8 ({source})", path.display())]
    Encoding {
        path: PathBuf,
        #[source]
        source: std::string::FromUtf8Error,
    },
    #[error("write {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl FileError {
    pub fn path(&self) -> &Path {
        match self {
            Self::Read { path, .. }
            | Self::Encoding { path, .. }
            | Self::Write { path, .. } => path,
        }
    }
}

/// Replacement template could not be parsed or does not fit its pattern.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TemplateError {
    #[error("unterminated `${{` at byte {0}")]
    Unterminated(usize),
    #[error("empty group reference at byte {0}")]
    EmptyGroup(usize),
    #[error("invalid group name '{0}'")]
    InvalidGroupName(String),
    #[error("unknown transform '{0}' (expected lower, upper or html_quotes)")]
    UnknownTransform(String),
    #[error("group '{0}' does not exist in pattern")]
    UnknownGroup(String),
}

/// Rule catalog defect. Reported once, at startup.
#[derive(Debug, Error)]
pub enum PatternError {
    #[error("rule set name must not be empty")]
    EmptyName,
    #[error("duplicate rule set '{0}'")]
    DuplicateRuleSet(String),
    #[error("rule set '{0}' has no rules")]
    NoRules(String),
    #[error("rule set '{0}' has an empty extensions list")]
    EmptyExtensions(String),
    #[error("rule set '{rule_set}' guard: invalid pattern: {source}")]
    InvalidGuard {
        rule_set: String,
        #[source]
        source: regex::Error,
    },
    #[error("rule set '{rule_set}' guard: {message}")]
    MalformedGuard {
        rule_set: String,
        message: &'static str,
    },
    #[error("rule set '{rule_set}' rules[{rule}]: invalid pattern: {source}")]
    InvalidPattern {
        rule_set: String,
        rule: usize,
        #[source]
        source: regex::Error,
    },
    #[error("rule set '{rule_set}' rules[{rule}]: invalid replacement: {source}")]
    InvalidTemplate {
        rule_set: String,
        rule: usize,
        #[source]
        source: TemplateError,
    },
    #[error("rule set '{rule_set}' rules[{rule}]: {message}")]
    MalformedRule {
        rule_set: String,
        rule: usize,
        message: &'static str,
    },
}

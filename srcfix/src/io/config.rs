//! srcfix configuration stored in `srcfix.toml`.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, anyhow};
use serde::Deserialize;

use crate::core::catalog::{RuleSetDef, compile_catalog};
use crate::core::rule_set::RuleSet;
use crate::error::PatternError;

/// File name looked up in the working directory when `--config` is absent.
pub const CONFIG_FILE: &str = "srcfix.toml";

/// Catalog used when no `srcfix.toml` exists.
pub const DEFAULT_CATALOG: &str = include_str!("../../rules/default.toml");

/// Top-level configuration (TOML).
///
/// `rule_sets` is ordered: rule sets run in the order they are listed.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct SrcfixConfig {
    #[serde(default)]
    pub files: FilesConfig,
    pub rule_sets: Vec<RuleSetDef>,
}

/// Which files the batch considers.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(default, deny_unknown_fields)]
pub struct FilesConfig {
    /// Directories (or single files) to walk.
    pub roots: Vec<PathBuf>,

    /// File extensions to rewrite, without the leading dot.
    pub extensions: Vec<String>,

    /// Directory names skipped at any depth.
    pub exclude_dirs: Vec<String>,
}

impl Default for FilesConfig {
    fn default() -> Self {
        Self {
            roots: vec![PathBuf::from("src")],
            extensions: ["ts", "tsx", "js", "jsx"].map(String::from).to_vec(),
            exclude_dirs: ["node_modules", ".git", ".next", "dist", "build"]
                .map(String::from)
                .to_vec(),
        }
    }
}

impl SrcfixConfig {
    /// The embedded default catalog.
    pub fn builtin() -> Result<Self> {
        parse_config(DEFAULT_CATALOG, "built-in catalog")
    }

    pub fn validate(&self) -> Result<()> {
        if self.files.roots.is_empty() {
            return Err(anyhow!("files.roots must not be empty"));
        }
        if self
            .files
            .extensions
            .iter()
            .all(|ext| ext.trim().trim_start_matches('.').is_empty())
        {
            return Err(anyhow!("files.extensions must list at least one extension"));
        }
        if self.rule_sets.is_empty() {
            return Err(anyhow!("rule_sets must not be empty"));
        }
        Ok(())
    }

    /// Compile the catalog. Any defect here aborts the run.
    pub fn compile(&self) -> Result<Vec<RuleSet>, PatternError> {
        compile_catalog(&self.rule_sets)
    }
}

/// Parse and validate configuration text. `origin` labels errors.
pub fn parse_config(contents: &str, origin: &str) -> Result<SrcfixConfig> {
    let cfg: SrcfixConfig = toml::from_str(contents).with_context(|| format!("parse {origin}"))?;
    cfg.validate().with_context(|| format!("validate {origin}"))?;
    Ok(cfg)
}

/// Load configuration.
///
/// An explicit path must exist. Otherwise `srcfix.toml` in `dir` is used if
/// present, falling back to [`SrcfixConfig::builtin`].
pub fn load_config(explicit: Option<&Path>, dir: &Path) -> Result<SrcfixConfig> {
    if let Some(path) = explicit {
        return read_config(path);
    }
    let discovered = dir.join(CONFIG_FILE);
    if discovered.exists() {
        return read_config(&discovered);
    }
    SrcfixConfig::builtin()
}

fn read_config(path: &Path) -> Result<SrcfixConfig> {
    let contents = fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
    parse_config(&contents, &path.display().to_string())
}

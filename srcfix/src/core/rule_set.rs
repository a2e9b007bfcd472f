//! Named, ordered groups of rules sharing one guard.

use std::borrow::Cow;
use std::collections::BTreeSet;
use std::path::Path;

use crate::core::guard::Guard;
use crate::core::rule::Rule;

#[derive(Debug, Clone)]
pub struct RuleSet {
    name: String,
    guard: Option<Guard>,
    /// Lowercase extensions without the leading dot. `None` means any file.
    extensions: Option<BTreeSet<String>>,
    rules: Vec<Rule>,
}

impl RuleSet {
    pub fn new(name: impl Into<String>, rules: Vec<Rule>) -> Self {
        Self {
            name: name.into(),
            guard: None,
            extensions: None,
            rules,
        }
    }

    pub fn with_guard(mut self, guard: Guard) -> Self {
        self.guard = Some(guard);
        self
    }

    pub fn with_extensions<I, S>(mut self, extensions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.extensions = Some(
            extensions
                .into_iter()
                .map(|ext| normalize_extension(ext.as_ref()))
                .collect(),
        );
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn guard(&self) -> Option<&Guard> {
        self.guard.as_ref()
    }

    pub fn extensions(&self) -> Option<&BTreeSet<String>> {
        self.extensions.as_ref()
    }

    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    /// Guard check. A rule set without a guard always applies.
    pub fn applies(&self, content: &str) -> bool {
        self.guard.as_ref().is_none_or(|guard| guard.applies(content))
    }

    /// Extension scope check. Only looks at the path, never the filesystem.
    pub fn accepts_path(&self, path: &Path) -> bool {
        let Some(extensions) = &self.extensions else {
            return true;
        };
        path.extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| extensions.contains(&ext.to_ascii_lowercase()))
    }

    /// Run every rule in declaration order; each sees the previous output.
    ///
    /// Does not consult the guard; callers gate with [`RuleSet::applies`].
    pub fn apply(&self, content: &str) -> String {
        let mut current = content.to_string();
        for rule in &self.rules {
            if let Cow::Owned(next) = rule.apply(&current) {
                current = next;
            }
        }
        current
    }
}

pub(crate) fn normalize_extension(ext: &str) -> String {
    ext.trim().trim_start_matches('.').to_ascii_lowercase()
}

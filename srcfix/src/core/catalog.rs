//! Rule catalog definitions and their compilation into [`RuleSet`]s.
//!
//! Definitions are plain data deserialized from TOML. Compilation validates
//! every pattern, guard and template up front so that a broken catalog fails
//! the run before any file is touched.

use std::collections::HashSet;

use regex::Regex;
use serde::Deserialize;

use crate::core::guard::Guard;
use crate::core::rule::Rule;
use crate::core::rule_set::{RuleSet, normalize_extension};
use crate::core::template::Template;
use crate::error::PatternError;

/// One `[[rule_sets]]` entry.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct RuleSetDef {
    pub name: String,
    pub guard: Option<GuardDef>,
    pub extensions: Option<Vec<String>>,
    pub rules: Vec<RuleDef>,
}

/// `guard = { contains = [...] }` or `guard = { pattern = "..." }`.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum GuardDef {
    Contains(Vec<String>),
    Pattern(String),
}

/// One rule: exactly one of `find` (literal) or `pattern` (regex).
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct RuleDef {
    pub find: Option<String>,
    pub pattern: Option<String>,
    pub replace: String,
}

/// Compile definitions in order, failing on the first defect.
pub fn compile_catalog(defs: &[RuleSetDef]) -> Result<Vec<RuleSet>, PatternError> {
    let mut seen = HashSet::new();
    let mut rule_sets = Vec::with_capacity(defs.len());
    for def in defs {
        let name = def.name.trim();
        if name.is_empty() {
            return Err(PatternError::EmptyName);
        }
        if !seen.insert(name.to_string()) {
            return Err(PatternError::DuplicateRuleSet(name.to_string()));
        }
        rule_sets.push(compile_rule_set(name, def)?);
    }
    Ok(rule_sets)
}

fn compile_rule_set(name: &str, def: &RuleSetDef) -> Result<RuleSet, PatternError> {
    if def.rules.is_empty() {
        return Err(PatternError::NoRules(name.to_string()));
    }
    let rules = def
        .rules
        .iter()
        .enumerate()
        .map(|(index, rule)| compile_rule(name, index, rule))
        .collect::<Result<Vec<_>, _>>()?;

    let mut rule_set = RuleSet::new(name, rules);
    if let Some(guard) = &def.guard {
        rule_set = rule_set.with_guard(compile_guard(name, guard)?);
    }
    if let Some(extensions) = &def.extensions {
        let normalized: Vec<String> = extensions
            .iter()
            .map(|ext| normalize_extension(ext))
            .filter(|ext| !ext.is_empty())
            .collect();
        if normalized.is_empty() {
            return Err(PatternError::EmptyExtensions(name.to_string()));
        }
        rule_set = rule_set.with_extensions(normalized);
    }
    Ok(rule_set)
}

fn compile_guard(rule_set: &str, def: &GuardDef) -> Result<Guard, PatternError> {
    match def {
        GuardDef::Contains(markers) => {
            if markers.is_empty() || markers.iter().any(|marker| marker.is_empty()) {
                return Err(PatternError::MalformedGuard {
                    rule_set: rule_set.to_string(),
                    message: "`contains` needs at least one non-empty marker",
                });
            }
            Ok(Guard::Contains(markers.clone()))
        }
        GuardDef::Pattern(pattern) => {
            let regex = Regex::new(pattern).map_err(|source| PatternError::InvalidGuard {
                rule_set: rule_set.to_string(),
                source,
            })?;
            Ok(Guard::Pattern(regex))
        }
    }
}

fn compile_rule(rule_set: &str, index: usize, def: &RuleDef) -> Result<Rule, PatternError> {
    let malformed = |message| PatternError::MalformedRule {
        rule_set: rule_set.to_string(),
        rule: index,
        message,
    };
    match (&def.find, &def.pattern) {
        (Some(find), None) => {
            if find.is_empty() {
                return Err(malformed("`find` must not be empty"));
            }
            Ok(Rule::Literal {
                find: find.clone(),
                replace: def.replace.clone(),
            })
        }
        (None, Some(pattern)) => {
            let regex = Regex::new(pattern).map_err(|source| PatternError::InvalidPattern {
                rule_set: rule_set.to_string(),
                rule: index,
                source,
            })?;
            let template = Template::compile(&def.replace, &regex).map_err(|source| {
                PatternError::InvalidTemplate {
                    rule_set: rule_set.to_string(),
                    rule: index,
                    source,
                }
            })?;
            Ok(Rule::Pattern { regex, template })
        }
        _ => Err(malformed("set exactly one of `find` or `pattern`")),
    }
}

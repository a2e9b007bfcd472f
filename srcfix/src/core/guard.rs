//! Applicability guards: cheap pre-checks deciding whether a rule set runs.

use regex::Regex;

/// Predicate over raw file content.
///
/// Both variants are a single linear scan (`regex` never backtracks).
#[derive(Debug, Clone)]
pub enum Guard {
    /// Any of the markers occurs literally.
    Contains(Vec<String>),
    /// The pattern matches somewhere in the content.
    Pattern(Regex),
}

impl Guard {
    pub fn applies(&self, content: &str) -> bool {
        match self {
            Self::Contains(markers) => markers
                .iter()
                .any(|marker| content.contains(marker.as_str())),
            Self::Pattern(regex) => regex.is_match(content),
        }
    }

    /// Short human-readable description for `srcfix rules`.
    pub fn describe(&self) -> String {
        match self {
            Self::Contains(markers) => format!("contains {}", markers.join(" | ")),
            Self::Pattern(regex) => format!("pattern {}", regex.as_str()),
        }
    }
}

//! Single text rewrite rules.

use std::borrow::Cow;

use regex::{Captures, Regex, Replacer};

use crate::core::template::Template;

/// A pure text-to-text rewrite.
///
/// Matches are leftmost-first and non-overlapping; every match in the input
/// is replaced in one pass. No match means the input is returned unchanged.
#[derive(Debug, Clone)]
pub enum Rule {
    /// Exact substring replacement.
    Literal { find: String, replace: String },
    /// Regular expression with a capture-aware replacement template.
    Pattern { regex: Regex, template: Template },
}

impl Rule {
    /// Apply the rule, borrowing the input when nothing matched.
    pub fn apply<'a>(&self, content: &'a str) -> Cow<'a, str> {
        match self {
            Self::Literal { find, replace } => {
                if content.contains(find.as_str()) {
                    Cow::Owned(content.replace(find.as_str(), replace))
                } else {
                    Cow::Borrowed(content)
                }
            }
            Self::Pattern { regex, template } => regex.replace_all(content, template),
        }
    }
}

impl Replacer for &Template {
    fn replace_append(&mut self, caps: &Captures<'_>, dst: &mut String) {
        self.expand(caps, dst);
    }
}

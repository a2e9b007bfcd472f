//! Replacement templates for pattern rules.
//!
//! Syntax follows the `regex` crate (`$1`, `${1}`, `$name`, `${name}`, `$$`)
//! with one extension: `${group:transform}` rewrites the captured text before
//! it is inserted. Templates are parsed once and checked against the pattern's
//! capture groups, so expansion itself cannot fail.

use regex::{Captures, Regex};

use crate::error::TemplateError;

/// Text transform applied to a captured group.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transform {
    Lower,
    Upper,
    /// Replace `"` with `&quot;`.
    HtmlQuotes,
}

impl Transform {
    fn parse(name: &str) -> Result<Self, TemplateError> {
        match name {
            "lower" => Ok(Self::Lower),
            "upper" => Ok(Self::Upper),
            "html_quotes" => Ok(Self::HtmlQuotes),
            other => Err(TemplateError::UnknownTransform(other.to_string())),
        }
    }

    fn apply(self, text: &str, out: &mut String) {
        match self {
            Self::Lower => out.push_str(&text.to_lowercase()),
            Self::Upper => out.push_str(&text.to_uppercase()),
            Self::HtmlQuotes => out.push_str(&text.replace('"', "&quot;")),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum GroupRef {
    Index(usize),
    Name(String),
}

impl GroupRef {
    fn parse(raw: &str) -> Result<Self, TemplateError> {
        if !raw.chars().all(is_group_char) {
            return Err(TemplateError::InvalidGroupName(raw.to_string()));
        }
        match raw.parse::<usize>() {
            Ok(index) => Ok(Self::Index(index)),
            Err(_) => Ok(Self::Name(raw.to_string())),
        }
    }

    fn resolve<'h>(&self, caps: &Captures<'h>) -> &'h str {
        let found = match self {
            Self::Index(index) => caps.get(*index),
            Self::Name(name) => caps.name(name),
        };
        found.map_or("", |m| m.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Literal(String),
    Group {
        group: GroupRef,
        transform: Option<Transform>,
    },
}

/// Parsed replacement template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Template {
    segments: Vec<Segment>,
}

fn is_group_char(c: char) -> bool {
    c == '_' || c.is_ascii_alphanumeric()
}

impl Template {
    /// Parse `raw` and verify every group reference exists in `regex`.
    pub fn compile(raw: &str, regex: &Regex) -> Result<Self, TemplateError> {
        let template = Self::parse(raw)?;
        template.check_groups(regex)?;
        Ok(template)
    }

    fn parse(raw: &str) -> Result<Self, TemplateError> {
        let mut segments = Vec::new();
        let mut literal = String::new();
        let mut rest = raw;
        let mut offset = 0;

        while let Some(pos) = rest.find('$') {
            literal.push_str(&rest[..pos]);
            let after = &rest[pos + 1..];
            let start = offset + pos;

            let consumed = if after.starts_with('$') {
                literal.push('$');
                2
            } else if let Some(body) = after.strip_prefix('{') {
                let end = body.find('}').ok_or(TemplateError::Unterminated(start))?;
                let inner = &body[..end];
                let (name, transform) = match inner.split_once(':') {
                    Some((name, transform)) => (name, Some(Transform::parse(transform)?)),
                    None => (inner, None),
                };
                if name.is_empty() {
                    return Err(TemplateError::EmptyGroup(start));
                }
                flush(&mut literal, &mut segments);
                segments.push(Segment::Group {
                    group: GroupRef::parse(name)?,
                    transform,
                });
                end + 3
            } else {
                let len = after
                    .char_indices()
                    .find(|(_, c)| !is_group_char(*c))
                    .map_or(after.len(), |(idx, _)| idx);
                if len == 0 {
                    // A lone `$` is kept literally, as in `regex`.
                    literal.push('$');
                } else {
                    flush(&mut literal, &mut segments);
                    segments.push(Segment::Group {
                        group: GroupRef::parse(&after[..len])?,
                        transform: None,
                    });
                }
                len + 1
            };

            rest = &rest[pos + consumed..];
            offset += pos + consumed;
        }
        literal.push_str(rest);
        flush(&mut literal, &mut segments);
        Ok(Self { segments })
    }

    fn check_groups(&self, regex: &Regex) -> Result<(), TemplateError> {
        for segment in &self.segments {
            let Segment::Group { group, .. } = segment else {
                continue;
            };
            let known = match group {
                GroupRef::Index(index) => *index < regex.captures_len(),
                GroupRef::Name(name) => regex.capture_names().flatten().any(|n| n == name),
            };
            if !known {
                let label = match group {
                    GroupRef::Index(index) => index.to_string(),
                    GroupRef::Name(name) => name.clone(),
                };
                return Err(TemplateError::UnknownGroup(label));
            }
        }
        Ok(())
    }

    /// Expand the template for one match, appending to `out`.
    pub fn expand(&self, caps: &Captures<'_>, out: &mut String) {
        for segment in &self.segments {
            match segment {
                Segment::Literal(text) => out.push_str(text),
                Segment::Group { group, transform } => {
                    let text = group.resolve(caps);
                    match transform {
                        Some(transform) => transform.apply(text, out),
                        None => out.push_str(text),
                    }
                }
            }
        }
    }

    /// True when the template contains no group references.
    pub fn is_literal(&self) -> bool {
        self.segments
            .iter()
            .all(|segment| matches!(segment, Segment::Literal(_)))
    }
}

fn flush(literal: &mut String, segments: &mut Vec<Segment>) {
    if !literal.is_empty() {
        segments.push(Segment::Literal(std::mem::take(literal)));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn render(pattern: &str, template: &str, haystack: &str) -> String {
        let regex = Regex::new(pattern).expect("regex");
        let template = Template::compile(template, &regex).expect("template");
        let caps = regex.captures(haystack).expect("match");
        let mut out = String::new();
        template.expand(&caps, &mut out);
        out
    }

    #[test]
    fn expands_numbered_and_named_groups() {
        assert_eq!(render(r"(\w+)-(\w+)", "$2-$1", "left-right"), "right-left");
        assert_eq!(
            render(r"(?P<head>\w+)\.(?P<tail>\w+)", "${tail}_${head}", "a.b"),
            "b_a"
        );
    }

    #[test]
    fn braces_delimit_group_names() {
        assert_eq!(render(r"(\w+)", "${1}x", "ab"), "abx");
        // Without braces the name runs on, producing an unknown group.
        let regex = Regex::new(r"(\w+)").expect("regex");
        assert_eq!(
            Template::compile("$1x", &regex),
            Err(TemplateError::UnknownGroup("1x".to_string()))
        );
    }

    #[test]
    fn applies_transforms() {
        assert_eq!(render(r"ui/(\w+)", "ui/${1:lower}", "ui/Badge"), "ui/badge");
        assert_eq!(render(r"(\w+)", "${1:upper}", "env"), "ENV");
        assert_eq!(
            render(r">[^<]*<", "${0:html_quotes}", r#">say "hi"<"#),
            ">say &quot;hi&quot;<"
        );
    }

    #[test]
    fn dollar_escapes_and_lone_dollar_stay_literal() {
        assert_eq!(render(r"(\d+)", "$$$1", "42"), "$42");
        assert_eq!(render(r"(\d+)", "cost: $ $1", "7"), "cost: $ 7");
    }

    #[test]
    fn rejects_malformed_templates() {
        let regex = Regex::new(r"(\w+)").expect("regex");
        assert_eq!(
            Template::compile("${1", &regex),
            Err(TemplateError::Unterminated(0))
        );
        assert_eq!(
            Template::compile("a${}", &regex),
            Err(TemplateError::EmptyGroup(1))
        );
        assert_eq!(
            Template::compile("${1:title}", &regex),
            Err(TemplateError::UnknownTransform("title".to_string()))
        );
        assert_eq!(
            Template::compile("${a-b}", &regex),
            Err(TemplateError::InvalidGroupName("a-b".to_string()))
        );
        assert_eq!(
            Template::compile("$2", &regex),
            Err(TemplateError::UnknownGroup("2".to_string()))
        );
    }

    #[test]
    fn literal_templates_have_no_groups() {
        let regex = Regex::new(r"(\w+)").expect("regex");
        assert!(Template::compile("plain $$", &regex).expect("t").is_literal());
        assert!(!Template::compile("$1", &regex).expect("t").is_literal());
    }
}

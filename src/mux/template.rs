//! Path template compilation.
//!
//! Splits a pattern path into typed segments: literals, `{name}` parameters
//! and a final rest segment (`{name...}` or a bare trailing `/`). `{$}`
//! compiles to an empty literal, which only the empty segment after a
//! trailing slash can match.

use percent_encoding::percent_decode_str;

use crate::mux::MuxError;
use crate::routing::Pattern;

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Segment {
    /// Matches one request segment equal to the (decoded) text.
    Literal(String),
    /// Matches one non-empty request segment.
    Param(String),
    /// Matches every remaining segment; `None` for an anonymous subtree.
    Rest(Option<String>),
}

/// A compiled path template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Template {
    pub(crate) segments: Vec<Segment>,
}

impl Template {
    /// Capture names in match order; `None` marks an anonymous subtree capture.
    pub(crate) fn captures(&self) -> Vec<Option<String>> {
        self.segments
            .iter()
            .filter_map(|segment| match segment {
                Segment::Literal(_) => None,
                Segment::Param(name) => Some(Some(name.clone())),
                Segment::Rest(name) => Some(name.clone()),
            })
            .collect()
    }
}

pub(crate) fn compile(pattern: &Pattern) -> Result<Template, MuxError> {
    let path = pattern.path();
    let rest = path
        .strip_prefix('/')
        .ok_or_else(|| MuxError::MissingLeadingSlash {
            pattern: pattern.to_string(),
        })?;

    let raw: Vec<&str> = rest.split('/').collect();
    let last = raw.len() - 1;
    let mut segments = Vec::with_capacity(raw.len());
    let mut names: Vec<&str> = Vec::new();

    for (i, segment) in raw.iter().copied().enumerate() {
        let is_last = i == last;

        if segment.is_empty() {
            // A trailing slash matches the whole subtree.
            segments.push(if is_last {
                Segment::Rest(None)
            } else {
                Segment::Literal(String::new())
            });
            continue;
        }

        if !segment.contains(['{', '}']) {
            segments.push(Segment::Literal(decode(segment)));
            continue;
        }

        let inner = segment
            .strip_prefix('{')
            .and_then(|s| s.strip_suffix('}'))
            .filter(|s| !s.contains(['{', '}']))
            .ok_or_else(|| MuxError::MalformedWildcard {
                pattern: pattern.to_string(),
                segment: segment.to_string(),
            })?;

        if (inner == "$" || inner.ends_with("...")) && !is_last {
            return Err(MuxError::WildcardNotLast {
                pattern: pattern.to_string(),
                segment: segment.to_string(),
            });
        }
        if inner == "$" {
            segments.push(Segment::Literal(String::new()));
            continue;
        }

        let (name, rest) = match inner.strip_suffix("...") {
            Some(name) => (name, true),
            None => (inner, false),
        };
        check_name(pattern, name, &names)?;
        names.push(name);

        segments.push(if rest {
            Segment::Rest(Some(name.to_string()))
        } else {
            Segment::Param(name.to_string())
        });
    }

    Ok(Template { segments })
}

/// Percent-decode one path segment. Invalid UTF-8 is replaced, not rejected.
pub(crate) fn decode(segment: &str) -> String {
    percent_decode_str(segment).decode_utf8_lossy().into_owned()
}

fn check_name(pattern: &Pattern, name: &str, seen: &[&str]) -> Result<(), MuxError> {
    let mut chars = name.chars();
    let valid = chars
        .next()
        .is_some_and(|c| c.is_alphabetic() || c == '_')
        && chars.all(|c| c.is_alphanumeric() || c == '_');
    if !valid {
        return Err(MuxError::InvalidWildcardName {
            pattern: pattern.to_string(),
            name: name.to_string(),
        });
    }

    if seen.contains(&name) {
        return Err(MuxError::DuplicateWildcard {
            pattern: pattern.to_string(),
            name: name.to_string(),
        });
    }
    Ok(())
}

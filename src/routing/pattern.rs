//! Route patterns and prefix joining.
//!
//! A pattern is an optional method token plus a path template, written
//! `"GET /users/{id}"` or just `"/users/{id}"`. The path template is opaque
//! here; only the multiplexer interprets `{name}` and `{name...}`.

use std::fmt;

use serde::Serialize;

/// Method token and path template of one route.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Pattern {
    method: Option<String>,
    path: String,
}

impl Pattern {
    pub fn new(method: Option<impl Into<String>>, path: impl Into<String>) -> Self {
        Self {
            method: method.map(Into::into),
            path: path.into(),
        }
    }

    /// Split `raw` at its first space into method token and path.
    ///
    /// Without a space the whole input is the path. Only the first space is
    /// significant; anything after it belongs to the path verbatim.
    pub fn parse(raw: &str) -> Self {
        match raw.split_once(' ') {
            Some((method, path)) => Self::new(Some(method), path),
            None => Self::new(None::<String>, raw),
        }
    }

    pub fn method(&self) -> Option<&str> {
        self.method.as_deref()
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    /// The same pattern with its path placed under `prefix`.
    pub fn with_prefix(&self, prefix: &str) -> Self {
        Self {
            method: self.method.clone(),
            path: join_segments(prefix, &self.path),
        }
    }
}

impl fmt::Display for Pattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.method {
            Some(method) => write!(f, "{} {}", method, self.path),
            None => f.write_str(&self.path),
        }
    }
}

/// Join `prefix` and `pattern`, keeping any method token on `pattern`.
///
/// ```ignore
/// assert_eq!(join_path("/api/", "POST /users"), "POST /api/users");
/// ```
pub fn join_path(prefix: &str, pattern: &str) -> String {
    Pattern::parse(pattern).with_prefix(prefix).to_string()
}

/// `prefix` without trailing slashes, one `/`, `path` without leading slashes.
pub(crate) fn join_segments(prefix: &str, path: &str) -> String {
    let head = prefix.trim_end_matches('/');
    let tail = path.trim_start_matches('/');
    let mut joined = String::with_capacity(head.len() + tail.len() + 1);
    joined.push_str(head);
    joined.push('/');
    joined.push_str(tail);
    joined
}

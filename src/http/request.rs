//! Per-request routing data.
//!
//! # Responsibilities
//! - Carry named path parameters extracted by the multiplexer
//! - Carry the pattern that matched the request
//! - Give handlers a small extension trait to read both
//!
//! # Design Decisions
//! - Stored as request extensions so middleware and handlers see the same data
//! - Values are the raw (still percent-encoded) path segments

use std::sync::Arc;

use axum::http::Request;

/// Named path parameters captured for the matched route, in pattern order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PathParams {
    entries: Vec<(String, String)>,
}

impl PathParams {
    pub(crate) fn from_entries(entries: Vec<(String, String)>) -> Self {
        Self { entries }
    }

    /// Value bound to `name`, if the matched pattern declares it.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// The registered pattern (method token included) that served the request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchedPattern(Arc<str>);

impl MatchedPattern {
    pub(crate) fn new(pattern: Arc<str>) -> Self {
        Self(pattern)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Accessors for routing data on a request.
pub trait RequestExt {
    /// Value of the path parameter `name`.
    ///
    /// A wildcard that matched nothing yields `Some("")`.
    fn path_value(&self, name: &str) -> Option<&str>;

    fn path_params(&self) -> Option<&PathParams>;

    fn matched_pattern(&self) -> Option<&str>;
}

impl<B> RequestExt for Request<B> {
    fn path_value(&self, name: &str) -> Option<&str> {
        self.path_params().and_then(|params| params.get(name))
    }

    fn path_params(&self) -> Option<&PathParams> {
        self.extensions().get::<PathParams>()
    }

    fn matched_pattern(&self) -> Option<&str> {
        self.extensions()
            .get::<MatchedPattern>()
            .map(MatchedPattern::as_str)
    }
}

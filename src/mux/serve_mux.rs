//! Default multiplexer: a segment tree with per-node method tables.
//!
//! # Responsibilities
//! - Own the segment tree and the per-node method tables
//! - Reject malformed or conflicting patterns
//! - Resolve requests: path params, method selection, 404 / 405 / 301
//!
//! # Design Decisions
//! - Search order at every node is literal, then parameter, then rest; a
//!   branch whose tables do not accept the method is abandoned and the next
//!   less specific branch is tried
//! - 405 only when some pattern matched the path and none accepted the method
//! - Request segments are percent-decoded before matching, so captured values
//!   are decoded too
//! - Children sit behind `Arc`: a cloned mux shares every subtree a new
//!   registration does not touch

use std::collections::HashMap;
use std::sync::Arc;

use axum::extract::Request;
use axum::http::Method;

use crate::config::MuxConfig;
use crate::http::{response, Handler, IntoHandler, MatchedPattern, PathParams};
use crate::mux::template::{self, Segment};
use crate::mux::{Multiplexer, MuxError};
use crate::routing::Pattern;

#[derive(Debug, Clone)]
struct Endpoint {
    handler: Handler,
    pattern: Arc<str>,
    captures: Arc<[Option<String>]>,
}

impl Endpoint {
    fn bind(&self, values: &[String]) -> PathParams {
        let entries = self
            .captures
            .iter()
            .zip(values)
            .filter_map(|(name, value)| name.as_ref().map(|n| (n.clone(), value.clone())))
            .collect();
        PathParams::from_entries(entries)
    }
}

#[derive(Debug, Clone, Default)]
struct MethodTable {
    methods: Vec<(Method, Endpoint)>,
    any: Option<Endpoint>,
}

impl MethodTable {
    fn exact(&self, method: Option<&Method>) -> Option<&Endpoint> {
        match method {
            Some(method) => self
                .methods
                .iter()
                .find(|(m, _)| m == method)
                .map(|(_, endpoint)| endpoint),
            None => self.any.as_ref(),
        }
    }

    fn insert(&mut self, method: Option<Method>, endpoint: Endpoint) {
        match method {
            Some(method) => self.methods.push((method, endpoint)),
            None => self.any = Some(endpoint),
        }
    }

    fn select(&self, method: &Method, head_uses_get: bool) -> Option<&Endpoint> {
        self.exact(Some(method))
            .or_else(|| {
                if head_uses_get && method == Method::HEAD {
                    self.exact(Some(&Method::GET))
                } else {
                    None
                }
            })
            .or(self.any.as_ref())
    }

    fn is_empty(&self) -> bool {
        self.methods.is_empty() && self.any.is_none()
    }

    fn collect_allowed(&self, head_uses_get: bool, out: &mut Vec<Method>) {
        for (method, _) in &self.methods {
            if !out.contains(method) {
                out.push(method.clone());
            }
            if head_uses_get && method == Method::GET && !out.contains(&Method::HEAD) {
                out.push(Method::HEAD);
            }
        }
    }
}

/// One position in the segment tree.
#[derive(Debug, Clone, Default)]
struct Node {
    literals: HashMap<String, Arc<Node>>,
    param: Option<Arc<Node>>,
    /// Patterns ending exactly here.
    exact: MethodTable,
    /// Patterns whose rest segment starts here.
    rest: MethodTable,
}

impl Node {
    fn table(&self, segments: &[Segment]) -> Option<&MethodTable> {
        let mut node = self;
        for segment in segments {
            node = match segment {
                Segment::Literal(text) => node.literals.get(text.as_str()).map(Arc::as_ref)?,
                Segment::Param(_) => node.param.as_deref()?,
                Segment::Rest(_) => return Some(&node.rest),
            };
        }
        Some(&node.exact)
    }

    fn table_mut(&mut self, segments: &[Segment]) -> &mut MethodTable {
        let mut node = self;
        for segment in segments {
            node = match segment {
                Segment::Literal(text) => {
                    Arc::make_mut(node.literals.entry(text.clone()).or_default())
                }
                Segment::Param(_) => Arc::make_mut(node.param.get_or_insert_with(Default::default)),
                Segment::Rest(_) => return &mut node.rest,
            };
        }
        &mut node.exact
    }
}

/// State of one depth-first search through the tree.
struct Search<'m> {
    method: &'m Method,
    head_uses_get: bool,
    captured: Vec<String>,
    /// Set once any table matched the path, whatever the method.
    path_matched: bool,
    allowed: Vec<Method>,
}

impl<'m> Search<'m> {
    fn new(method: &'m Method, head_uses_get: bool) -> Self {
        Self {
            method,
            head_uses_get,
            captured: Vec::new(),
            path_matched: false,
            allowed: Vec::new(),
        }
    }

    fn find<'n>(&mut self, node: &'n Node, segments: &[String]) -> Option<&'n Endpoint> {
        let Some((first, tail)) = segments.split_first() else {
            return self.accept(&node.exact);
        };

        if let Some(child) = node.literals.get(first.as_str()) {
            if let Some(hit) = self.find(child, tail) {
                return Some(hit);
            }
        }

        if let Some(child) = node.param.as_deref().filter(|_| !first.is_empty()) {
            self.captured.push(first.clone());
            if let Some(hit) = self.find(child, tail) {
                return Some(hit);
            }
            self.captured.pop();
        }

        if !node.rest.is_empty() {
            self.captured.push(segments.join("/"));
            if let Some(hit) = self.accept(&node.rest) {
                return Some(hit);
            }
            self.captured.pop();
        }
        None
    }

    fn accept<'n>(&mut self, table: &'n MethodTable) -> Option<&'n Endpoint> {
        if table.is_empty() {
            return None;
        }
        let hit = table.select(self.method, self.head_uses_get);
        if hit.is_none() {
            self.path_matched = true;
            table.collect_allowed(self.head_uses_get, &mut self.allowed);
        }
        hit
    }
}

/// Decoded request segments, or `None` for a path not starting with `/`.
fn request_segments(path: &str) -> Option<Vec<String>> {
    let rest = path.strip_prefix('/')?;
    Some(rest.split('/').map(template::decode).collect())
}

/// Segment-tree multiplexer with per-method dispatch.
#[derive(Debug, Clone)]
pub struct ServeMux {
    root: Node,
    registered: Vec<Pattern>,
    config: MuxConfig,
    not_found: Handler,
}

impl ServeMux {
    pub fn new() -> Self {
        Self::with_config(MuxConfig::default())
    }

    pub fn with_config(config: MuxConfig) -> Self {
        Self {
            root: Node::default(),
            registered: Vec::new(),
            config,
            not_found: response::not_found(),
        }
    }

    /// Replace the default `404 page not found` response.
    pub fn with_not_found(mut self, handler: impl IntoHandler) -> Self {
        self.not_found = handler.into_handler();
        self
    }

    pub fn config(&self) -> &MuxConfig {
        &self.config
    }

    /// Number of registered patterns.
    pub fn len(&self) -> usize {
        self.registered.len()
    }

    pub fn is_empty(&self) -> bool {
        self.registered.is_empty()
    }

    fn subtree_redirect(&self, path: &str, segments: &[String], req: &Request) -> Option<String> {
        if !self.config.redirect_trailing_slash || path.ends_with('/') {
            return None;
        }
        let mut with_slash = segments.to_vec();
        with_slash.push(String::new());
        Search::new(req.method(), self.config.head_uses_get).find(&self.root, &with_slash)?;

        Some(match req.uri().query() {
            Some(query) => format!("{path}/?{query}"),
            None => format!("{path}/"),
        })
    }
}

impl Default for ServeMux {
    fn default() -> Self {
        Self::new()
    }
}

impl Multiplexer for ServeMux {
    fn register(&mut self, pattern: &Pattern, handler: Handler) -> Result<(), MuxError> {
        let method = pattern
            .method()
            .map(|token| {
                Method::from_bytes(token.as_bytes()).map_err(|_| MuxError::InvalidMethod {
                    pattern: pattern.to_string(),
                    method: token.to_string(),
                })
            })
            .transpose()?;

        let template = template::compile(pattern)?;

        if let Some(existing) = self
            .root
            .table(&template.segments)
            .and_then(|table| table.exact(method.as_ref()))
        {
            return Err(MuxError::Conflict {
                pattern: pattern.to_string(),
                existing: existing.pattern.to_string(),
            });
        }

        let endpoint = Endpoint {
            handler,
            pattern: Arc::from(pattern.to_string()),
            captures: Arc::from(template.captures()),
        };
        self.root.table_mut(&template.segments).insert(method, endpoint);
        self.registered.push(pattern.clone());

        tracing::debug!(pattern = %pattern, segments = template.segments.len(), "route registered");
        Ok(())
    }

    fn resolve(&self, req: &mut Request) -> Handler {
        let path = req.uri().path().to_owned();
        let Some(segments) = request_segments(&path) else {
            tracing::trace!(method = %req.method(), path = %path, "path without leading slash");
            return self.not_found.clone();
        };

        let method = req.method().clone();
        let mut search = Search::new(&method, self.config.head_uses_get);
        if let Some(endpoint) = search.find(&self.root, &segments) {
            let params = endpoint.bind(&search.captured);
            req.extensions_mut().insert(params);
            req.extensions_mut()
                .insert(MatchedPattern::new(Arc::clone(&endpoint.pattern)));
            return endpoint.handler.clone();
        }

        if search.path_matched {
            if self.config.method_not_allowed {
                let mut allowed = search.allowed;
                allowed.sort_by(|a, b| a.as_str().cmp(b.as_str()));
                tracing::trace!(method = %method, path = %path, "method not allowed");
                return response::method_not_allowed(&allowed);
            }
            return self.not_found.clone();
        }

        if let Some(location) = self.subtree_redirect(&path, &segments, req) {
            tracing::trace!(path = %path, location = %location, "redirecting to subtree root");
            return response::redirect(location);
        }

        tracing::trace!(method = %req.method(), path = %path, "no route matched");
        self.not_found.clone()
    }

    fn routes(&self) -> Vec<Pattern> {
        self.registered.clone()
    }
}

//! Router nodes and route groups.
//!
//! # Responsibilities
//! - Hold one node of the prefix tree: prefix + middleware chain
//! - Share a single registration table across every node of a tree
//! - Compose full patterns and wrapped handlers at registration time
//! - Serve requests by delegating to the shared multiplexer
//!
//! # Design Decisions
//! - `group()` copies the parent's middleware, so later `use_middleware`
//!   calls on parent or child never leak into the other
//! - The table sits behind `ArcSwap`: registration swaps in an updated copy,
//!   requests read the current one without locking
//! - Registration failures are fatal at setup (`handle` panics);
//!   `try_handle` returns them instead

use std::convert::Infallible;
use std::fmt;
use std::sync::{Arc, Mutex, PoisonError};
use std::task::{Context, Poll};

use arc_swap::ArcSwap;
use axum::extract::Request;
use axum::http::Method;
use axum::response::Response;
use tower::make::Shared;
use tower::Service;

use crate::config::MuxConfig;
use crate::http::{IntoHandler, ResponseFuture};
use crate::middleware::{self, BoxMiddleware, Middleware};
use crate::mux::{Multiplexer, MuxError, ServeMux};
use crate::routing::pattern::{join_segments, Pattern};

/// The table shared by all nodes of one router tree.
struct SharedMux<M> {
    current: ArcSwap<M>,
    writer: Mutex<()>,
}

impl<M: Multiplexer> SharedMux<M> {
    fn new(mux: M) -> Self {
        Self {
            current: ArcSwap::from_pointee(mux),
            writer: Mutex::new(()),
        }
    }

    fn register(&self, pattern: &Pattern, handler: crate::http::Handler) -> Result<(), MuxError> {
        let _writer = self.writer.lock().unwrap_or_else(PoisonError::into_inner);
        let mut next = M::clone(&self.current.load_full());
        next.register(pattern, handler)?;
        self.current.store(Arc::new(next));
        Ok(())
    }
}

/// A node in a tree of route groups.
///
/// Cloning yields another handle to the same node state (same prefix, a copy
/// of the chain, same table); use [`Router::group`] for a child scope.
pub struct Router<M: Multiplexer = ServeMux> {
    prefix: String,
    middleware: Vec<BoxMiddleware>,
    mux: Arc<SharedMux<M>>,
}

impl Router<ServeMux> {
    /// Root router over a fresh [`ServeMux`].
    pub fn new() -> Self {
        Self::with_mux(ServeMux::new())
    }

    /// Root router over a [`ServeMux`] configured by `config`.
    pub fn from_config(config: &MuxConfig) -> Self {
        Self::with_mux(ServeMux::with_config(config.clone()))
    }
}

impl Default for Router<ServeMux> {
    fn default() -> Self {
        Self::new()
    }
}

impl<M: Multiplexer> Router<M> {
    /// Root router over a caller-supplied multiplexer.
    pub fn with_mux(mux: M) -> Self {
        Self {
            prefix: String::new(),
            middleware: Vec::new(),
            mux: Arc::new(SharedMux::new(mux)),
        }
    }

    /// Cumulative prefix of this node; empty at the root.
    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    pub fn middleware_len(&self) -> usize {
        self.middleware.len()
    }

    /// Append a middleware to this node's chain.
    ///
    /// Routes already registered on this node keep the chain they were
    /// registered with.
    pub fn use_middleware<T: Middleware>(&mut self, middleware: T) -> &mut Self {
        self.middleware.push(Arc::new(middleware));
        self
    }

    /// Append several middleware, in iteration order.
    pub fn use_all<I>(&mut self, middleware: I) -> &mut Self
    where
        I: IntoIterator<Item = BoxMiddleware>,
    {
        self.middleware.extend(middleware);
        self
    }

    /// Child node under `prefix`, sharing this node's table and starting from
    /// a copy of its middleware chain.
    pub fn group(&self, prefix: &str) -> Self {
        Self {
            prefix: join_segments(&self.prefix, prefix),
            middleware: self.middleware.clone(),
            mux: Arc::clone(&self.mux),
        }
    }

    /// Register `handler` under `pattern` (`"METHOD /path"` or `"/path"`).
    pub fn try_handle(&self, pattern: &str, handler: impl IntoHandler) -> Result<(), MuxError> {
        self.register(Pattern::parse(pattern), handler)
    }

    /// Register `handler` under `pattern`.
    ///
    /// # Panics
    ///
    /// Panics if the multiplexer rejects the pattern (malformed, or already
    /// registered for the same method).
    pub fn handle(&self, pattern: &str, handler: impl IntoHandler) {
        if let Err(err) = self.try_handle(pattern, handler) {
            panic!("{err}");
        }
    }

    /// Register `handler` for `method` on `path`.
    pub fn try_method(&self, method: Method, path: &str, handler: impl IntoHandler) -> Result<(), MuxError> {
        self.register(Pattern::new(Some(method.as_str()), path), handler)
    }

    /// Register `handler` for `method` on `path`.
    ///
    /// # Panics
    ///
    /// Same conditions as [`Router::handle`].
    pub fn method(&self, method: Method, path: &str, handler: impl IntoHandler) {
        if let Err(err) = self.try_method(method, path, handler) {
            panic!("{err}");
        }
    }

    pub fn get(&self, path: &str, handler: impl IntoHandler) {
        self.method(Method::GET, path, handler);
    }

    pub fn post(&self, path: &str, handler: impl IntoHandler) {
        self.method(Method::POST, path, handler);
    }

    pub fn put(&self, path: &str, handler: impl IntoHandler) {
        self.method(Method::PUT, path, handler);
    }

    pub fn delete(&self, path: &str, handler: impl IntoHandler) {
        self.method(Method::DELETE, path, handler);
    }

    pub fn patch(&self, path: &str, handler: impl IntoHandler) {
        self.method(Method::PATCH, path, handler);
    }

    pub fn head(&self, path: &str, handler: impl IntoHandler) {
        self.method(Method::HEAD, path, handler);
    }

    pub fn options(&self, path: &str, handler: impl IntoHandler) {
        self.method(Method::OPTIONS, path, handler);
    }

    pub fn connect(&self, path: &str, handler: impl IntoHandler) {
        self.method(Method::CONNECT, path, handler);
    }

    pub fn trace(&self, path: &str, handler: impl IntoHandler) {
        self.method(Method::TRACE, path, handler);
    }

    fn register(&self, pattern: Pattern, handler: impl IntoHandler) -> Result<(), MuxError> {
        let full = pattern.with_prefix(&self.prefix);
        let wrapped = middleware::apply(&self.middleware, handler.into_handler());

        tracing::debug!(
            pattern = %full,
            middleware = self.middleware.len(),
            "registering route"
        );

        self.mux.register(&full, wrapped).inspect_err(|err| {
            tracing::error!(pattern = %full, error = %err, "route registration failed");
        })
    }

    /// Patterns registered anywhere in this router tree.
    pub fn routes(&self) -> Vec<Pattern> {
        self.mux.current.load().routes()
    }

    /// Serve one request through the shared table.
    pub async fn dispatch(&self, req: Request) -> Response {
        self.resolve(req).await
    }

    fn resolve(&self, mut req: Request) -> crate::http::BoxResponseFuture {
        let handler = self.mux.current.load().resolve(&mut req);
        handler.serve(req)
    }

    /// Make-service for `axum::serve`.
    pub fn into_make_service(self) -> Shared<Self> {
        Shared::new(self)
    }
}

impl<M: Multiplexer> Clone for Router<M> {
    fn clone(&self) -> Self {
        Self {
            prefix: self.prefix.clone(),
            middleware: self.middleware.clone(),
            mux: Arc::clone(&self.mux),
        }
    }
}

impl<M: Multiplexer> fmt::Debug for Router<M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Router")
            .field("prefix", &self.prefix)
            .field("middleware", &self.middleware.len())
            .finish_non_exhaustive()
    }
}

impl<M: Multiplexer> Service<Request> for Router<M> {
    type Response = Response;
    type Error = Infallible;
    type Future = ResponseFuture;

    fn poll_ready(&mut self, _cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        Poll::Ready(Ok(()))
    }

    fn call(&mut self, req: Request) -> Self::Future {
        ResponseFuture::new(self.resolve(req))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::StatusCode;

    fn ok() -> impl IntoHandler {
        |_req: Request| async { StatusCode::OK }
    }

    #[test]
    fn test_new_router() {
        let router = Router::new();
        assert_eq!(router.prefix(), "");
        assert_eq!(router.middleware_len(), 0);
        assert!(router.routes().is_empty());
    }

    #[test]
    fn test_group_prefixes() {
        let root = Router::new();
        assert_eq!(root.group("/api").prefix(), "/api");
        assert_eq!(root.group("/api/").group("/v1").prefix(), "/api/v1");
        assert_eq!(root.group("/api").group("v1").prefix(), "/api/v1");
        assert_eq!(root.group("").prefix(), "/");
    }

    #[test]
    fn test_groups_share_one_table() {
        let root = Router::new();
        let api = root.group("/api");
        let v1 = api.group("/v1");

        root.get("/health", ok());
        v1.post("users", ok());
        api.handle("/status", ok());

        let routes: Vec<String> = v1.routes().iter().map(ToString::to_string).collect();
        assert_eq!(routes, vec!["GET /health", "POST /api/v1/users", "/api/status"]);
    }

    #[test]
    fn test_group_copies_middleware() {
        let mut root = Router::new();
        root.use_middleware(middleware::TraceRequests);

        let mut child = root.group("/api");
        assert_eq!(child.middleware_len(), 1);

        child.use_middleware(middleware::RecordMetrics);
        root.use_middleware(middleware::RecordMetrics)
            .use_middleware(middleware::TraceRequests);

        assert_eq!(child.middleware_len(), 2);
        assert_eq!(root.middleware_len(), 3);
    }

    #[test]
    fn test_conflict_from_sibling_groups() {
        let root = Router::new();
        root.group("/api").get("/users", ok());

        let err = root.group("/api/").try_method(Method::GET, "users", ok()).unwrap_err();
        assert!(matches!(err, MuxError::Conflict { .. }));
        assert_eq!(root.routes().len(), 1);
    }

    #[test]
    #[should_panic(expected = "conflicts with")]
    fn test_handle_panics_on_duplicate() {
        let root = Router::new();
        root.get("/users", ok());
        root.get("/users", ok());
    }

    #[tokio::test]
    async fn test_service_impl() {
        use tower::ServiceExt;

        let root = Router::new();
        root.get("/ping", |_req: Request| async { "pong" });

        let req = Request::builder().uri("/ping").body(Body::empty()).unwrap();
        let response = root.clone().oneshot(req).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let req = Request::builder().uri("/missing").body(Body::empty()).unwrap();
        assert_eq!(root.dispatch(req).await.status(), StatusCode::NOT_FOUND);
    }
}

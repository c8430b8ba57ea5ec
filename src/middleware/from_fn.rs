//! Middleware from async functions.

use std::fmt;
use std::future::Future;
use std::sync::Arc;

use axum::extract::Request;
use axum::response::{IntoResponse, Response};

use crate::http::Handler;
use crate::middleware::Middleware;

/// The rest of the chain, handed to a [`from_fn`] middleware.
#[derive(Debug, Clone)]
pub struct Next {
    inner: Handler,
}

impl Next {
    /// Pass the request on and wait for the response.
    pub async fn run(self, req: Request) -> Response {
        self.inner.serve(req).await
    }
}

/// Middleware built with [`from_fn`].
pub struct FromFn<F> {
    f: Arc<F>,
}

impl<F> Clone for FromFn<F> {
    fn clone(&self) -> Self {
        Self { f: Arc::clone(&self.f) }
    }
}

impl<F> fmt::Debug for FromFn<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FromFn").finish_non_exhaustive()
    }
}

/// Turn `async fn(Request, Next) -> impl IntoResponse` into a middleware.
///
/// ```ignore
/// router.use_middleware(from_fn(|req: Request, next: Next| async move {
///     if req.headers().contains_key("x-api-key") {
///         next.run(req).await
///     } else {
///         StatusCode::UNAUTHORIZED.into_response()
///     }
/// }));
/// ```
pub fn from_fn<F, Fut, R>(f: F) -> FromFn<F>
where
    F: Fn(Request, Next) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = R> + Send + 'static,
    R: IntoResponse,
{
    FromFn { f: Arc::new(f) }
}

impl<F, Fut, R> Middleware for FromFn<F>
where
    F: Fn(Request, Next) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = R> + Send + 'static,
    R: IntoResponse,
{
    fn wrap(&self, next: Handler) -> Handler {
        let f = Arc::clone(&self.f);
        Handler::new(move |req: Request| {
            let next = Next {
                inner: next.clone(),
            };
            (*f)(req, next)
        })
    }
}

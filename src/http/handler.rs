//! Type-erased request handlers.
//!
//! # Responsibilities
//! - Hold any async `Request -> Response` function behind one cloneable type
//! - Adapt existing `tower` services into handlers
//! - Expose handlers as `tower::Service` so they plug into axum and hyper
//!
//! # Design Decisions
//! - A handler is an `Arc`'d closure: cloning is a refcount bump, so the
//!   multiplexer can hand out the frozen wrapped handler per request
//! - Handlers cannot fail; error responses are ordinary responses

use std::convert::Infallible;
use std::fmt;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};

use axum::extract::Request;
use axum::response::{IntoResponse, Response};
use futures_util::future::BoxFuture;
use tower::{Service, ServiceExt};

/// Boxed future produced by [`Handler::serve`].
pub type BoxResponseFuture = BoxFuture<'static, Response>;

type HandlerFn = dyn Fn(Request) -> BoxResponseFuture + Send + Sync;

/// A cloneable, type-erased request handler.
#[derive(Clone)]
pub struct Handler {
    inner: Arc<HandlerFn>,
}

impl Handler {
    /// Build a handler from an async function.
    ///
    /// ```ignore
    /// let hello = Handler::new(|_req: Request| async { "hello" });
    /// ```
    pub fn new<F, Fut, R>(f: F) -> Self
    where
        F: Fn(Request) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = R> + Send + 'static,
        R: IntoResponse,
    {
        Self {
            inner: Arc::new(move |req: Request| -> BoxResponseFuture {
                let fut = f(req);
                Box::pin(async move { fut.await.into_response() })
            }),
        }
    }

    /// Adapt an infallible `tower` service.
    pub fn from_service<S>(service: S) -> Self
    where
        S: Service<Request, Error = Infallible> + Clone + Send + Sync + 'static,
        S::Response: IntoResponse,
        S::Future: Send + 'static,
    {
        Self::new(move |req: Request| {
            let fut = service.clone().oneshot(req);
            async move {
                match fut.await {
                    Ok(response) => response,
                    Err(never) => match never {},
                }
            }
        })
    }

    /// Run the handler for one request.
    pub fn serve(&self, req: Request) -> BoxResponseFuture {
        (self.inner)(req)
    }
}

impl fmt::Debug for Handler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Handler").finish_non_exhaustive()
    }
}

impl Service<Request> for Handler {
    type Response = Response;
    type Error = Infallible;
    type Future = ResponseFuture;

    fn poll_ready(&mut self, _cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        Poll::Ready(Ok(()))
    }

    fn call(&mut self, req: Request) -> Self::Future {
        ResponseFuture::new(self.serve(req))
    }
}

/// Response future returned by the `tower::Service` impls in this crate.
pub struct ResponseFuture {
    inner: BoxResponseFuture,
}

impl ResponseFuture {
    pub(crate) fn new(inner: BoxResponseFuture) -> Self {
        Self { inner }
    }
}

impl Future for ResponseFuture {
    type Output = Result<Response, Infallible>;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        self.inner.as_mut().poll(cx).map(Ok)
    }
}

impl fmt::Debug for ResponseFuture {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResponseFuture").finish_non_exhaustive()
    }
}

/// Conversion into a [`Handler`], accepted by every registration method.
pub trait IntoHandler {
    fn into_handler(self) -> Handler;
}

impl IntoHandler for Handler {
    fn into_handler(self) -> Handler {
        self
    }
}

impl<F, Fut, R> IntoHandler for F
where
    F: Fn(Request) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = R> + Send + 'static,
    R: IntoResponse,
{
    fn into_handler(self) -> Handler {
        Handler::new(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::StatusCode;
    use tower::service_fn;

    #[tokio::test]
    async fn test_closure_handler() {
        let handler = Handler::new(|_req: Request| async { StatusCode::CREATED });
        let response = handler.serve(Request::new(Body::empty())).await;
        assert_eq!(response.status(), StatusCode::CREATED);
    }

    #[tokio::test]
    async fn test_from_service() {
        let svc = service_fn(|_req: Request| async { Ok::<_, Infallible>(StatusCode::ACCEPTED) });
        let handler = Handler::from_service(svc);
        let response = handler.oneshot(Request::new(Body::empty())).await.unwrap();
        assert_eq!(response.status(), StatusCode::ACCEPTED);
    }
}

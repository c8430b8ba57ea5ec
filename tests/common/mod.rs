//! Shared utilities for integration testing.

use std::net::SocketAddr;
use std::sync::{Arc, Mutex};

use axum::body::Body;
use axum::http::{Method, StatusCode};
use groute::middleware::{from_fn, Middleware, Next};
use groute::{Request, RequestExt, Response, Router};
use tokio::net::TcpListener;
use tower::ServiceExt;

/// Execution order shared between middleware and handlers under test.
pub type Trail = Arc<Mutex<Vec<&'static str>>>;

#[allow(dead_code)]
pub fn trail() -> Trail {
    Arc::new(Mutex::new(Vec::new()))
}

#[allow(dead_code)]
pub fn entries(trail: &Trail) -> Vec<&'static str> {
    trail.lock().unwrap().clone()
}

/// Middleware that appends `name` to `trail` before passing the request on.
#[allow(dead_code)]
pub fn mark(trail: &Trail, name: &'static str) -> impl Middleware + Clone {
    let trail = Arc::clone(trail);
    from_fn(move |req: Request, next: Next| {
        trail.lock().unwrap().push(name);
        next.run(req)
    })
}

/// Handler that records `name` and answers with `status`.
#[allow(dead_code)]
pub fn recorded(
    trail: &Trail,
    name: &'static str,
    status: StatusCode,
) -> impl Fn(Request) -> std::future::Ready<StatusCode> + Send + Sync + 'static {
    let trail = Arc::clone(trail);
    move |_req: Request| {
        trail.lock().unwrap().push(name);
        std::future::ready(status)
    }
}

/// Handler that answers with the value of path parameter `name`.
#[allow(dead_code)]
pub fn echo_param(name: &'static str) -> impl Fn(Request) -> std::future::Ready<String> + Send + Sync + 'static {
    move |req: Request| {
        let value = req.path_value(name).map(str::to_owned);
        std::future::ready(value.unwrap_or_else(|| "<unset>".to_string()))
    }
}

#[allow(dead_code)]
/// Drive one request through `router` in process.
pub async fn send(router: &Router, method: Method, uri: &str) -> Response {
    let req = Request::builder()
        .method(method)
        .uri(uri)
        .body(Body::empty())
        .unwrap();
    router.clone().oneshot(req).await.unwrap()
}

#[allow(dead_code)]
pub async fn body_string(response: Response) -> String {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}

/// Serve `router` on an ephemeral local port.
#[allow(dead_code)]
pub async fn spawn_server(router: Router) -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        let _ = axum::serve(listener, router.into_make_service()).await;
    });
    addr
}

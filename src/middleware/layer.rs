//! `tower::Layer` adapter.
//!
//! Only layers that keep the `Request -> Response` shape and stay infallible
//! fit here (request id, header setters). Layers that rewrap the response
//! body belong around the whole router instead.

use std::convert::Infallible;

use axum::extract::Request;
use axum::response::Response;
use tower::{Layer, Service};

use crate::http::Handler;
use crate::middleware::Middleware;

/// Middleware backed by a `tower::Layer`.
#[derive(Debug, Clone)]
pub struct LayerMiddleware<L> {
    layer: L,
}

pub fn from_layer<L>(layer: L) -> LayerMiddleware<L> {
    LayerMiddleware { layer }
}

impl<L> Middleware for LayerMiddleware<L>
where
    L: Layer<Handler> + Send + Sync + 'static,
    L::Service: Service<Request, Response = Response, Error = Infallible> + Clone + Send + Sync + 'static,
    <L::Service as Service<Request>>::Future: Send + 'static,
{
    fn wrap(&self, next: Handler) -> Handler {
        Handler::from_service(self.layer.layer(next))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{HeaderName, HeaderValue, StatusCode};
    use tower_http::set_header::SetResponseHeaderLayer;

    #[tokio::test]
    async fn test_header_layer() {
        let middleware = from_layer(SetResponseHeaderLayer::overriding(
            HeaderName::from_static("x-powered-by"),
            HeaderValue::from_static("groute"),
        ));
        let handler = middleware.wrap(Handler::new(|_req: Request| async { StatusCode::OK }));

        let response = handler.serve(Request::new(Body::empty())).await;
        assert_eq!(response.headers()["x-powered-by"], "groute");
    }
}

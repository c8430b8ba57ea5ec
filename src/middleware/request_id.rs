//! `x-request-id` generation and propagation.
//!
//! A request without the header gets a UUID v4. The id is echoed on the
//! response so callers can correlate logs.

use tower::ServiceBuilder;
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};

use crate::middleware::{from_layer, Middleware};

pub const X_REQUEST_ID: &str = "x-request-id";

pub fn request_id() -> impl Middleware + Clone {
    from_layer(
        ServiceBuilder::new()
            .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
            .layer(PropagateRequestIdLayer::x_request_id()),
    )
}

//! Responses the multiplexer produces on its own.
//!
//! # Responsibilities
//! - 404 when no pattern matches
//! - 405 with an `Allow` header when the path matches but the method does not
//! - 301 towards the trailing-slash form of a subtree root

use axum::http::{header, HeaderValue, Method, StatusCode};
use axum::extract::Request;
use axum::response::IntoResponse;

use crate::http::Handler;

pub(crate) fn not_found() -> Handler {
    Handler::new(|_req: Request| async { (StatusCode::NOT_FOUND, "404 page not found\n") })
}

pub(crate) fn method_not_allowed(allowed: &[Method]) -> Handler {
    let allow = allowed
        .iter()
        .map(Method::as_str)
        .collect::<Vec<_>>()
        .join(", ");
    let allow = HeaderValue::from_str(&allow).unwrap_or_else(|_| HeaderValue::from_static(""));

    Handler::new(move |_req: Request| {
        let allow = allow.clone();
        async move {
            (
                StatusCode::METHOD_NOT_ALLOWED,
                [(header::ALLOW, allow)],
                "Method Not Allowed\n",
            )
                .into_response()
        }
    })
}

pub(crate) fn redirect(location: String) -> Handler {
    let location = HeaderValue::from_str(&location).unwrap_or_else(|_| HeaderValue::from_static("/"));

    Handler::new(move |_req: Request| {
        let location = location.clone();
        async move { (StatusCode::MOVED_PERMANENTLY, [(header::LOCATION, location)]).into_response() }
    })
}

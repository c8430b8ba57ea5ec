//! Middleware: `Handler -> Handler` transformations.
//!
//! # Data Flow
//! ```text
//! Router node chain [m1, m2, ..., mn] + terminal handler h
//!     → apply() folds from the inside out
//!     → m1(m2(...mn(h)...))
//!     → frozen into the multiplexer at registration time
//! ```
//!
//! # Design Decisions
//! - First middleware added is outermost: runs first on the way in, last on
//!   the way out
//! - Wrapping happens once per route registration, never per request
//! - Any `Fn(Handler) -> Handler`, `from_fn` closure or compatible
//!   `tower::Layer` is a middleware

use std::sync::Arc;

use crate::http::Handler;

pub mod from_fn;
pub mod layer;
pub mod metrics;
pub mod request_id;
pub mod trace;

pub use from_fn::{from_fn, FromFn, Next};
pub use layer::{from_layer, LayerMiddleware};
pub use metrics::RecordMetrics;
pub use request_id::request_id;
pub use trace::TraceRequests;

/// Wraps the next handler in the chain.
pub trait Middleware: Send + Sync + 'static {
    fn wrap(&self, next: Handler) -> Handler;
}

impl<F> Middleware for F
where
    F: Fn(Handler) -> Handler + Send + Sync + 'static,
{
    fn wrap(&self, next: Handler) -> Handler {
        self(next)
    }
}

/// Shared, type-erased middleware as stored in a router node's chain.
pub type BoxMiddleware = Arc<dyn Middleware>;

/// Wrap `handler` so that `chain[0]` is the outermost layer.
pub fn apply(chain: &[BoxMiddleware], handler: Handler) -> Handler {
    chain
        .iter()
        .rev()
        .fold(handler, |next, middleware| middleware.wrap(next))
}

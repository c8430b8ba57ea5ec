//! HTTP handler plumbing.
//!
//! # Data Flow
//! ```text
//! Incoming request
//!     → multiplexer resolves a Handler (handler.rs)
//!     → path params + matched pattern attached (request.rs)
//!     → wrapped handler runs
//!     → or a built-in 404 / 405 / 301 response (response.rs)
//! ```

pub mod handler;
pub mod request;
pub(crate) mod response;

pub use handler::{BoxResponseFuture, Handler, IntoHandler, ResponseFuture};
pub use request::{MatchedPattern, PathParams, RequestExt};

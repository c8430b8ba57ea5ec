//! Request multiplexing: the registration table behind every router tree.
//!
//! # Data Flow
//! ```text
//! Registration (setup phase):
//!     Pattern ("GET /api/user/{id}") + wrapped Handler
//!     → template.rs (validate, split into literal / param / rest segments)
//!     → serve_mux.rs (tree node → per-method endpoints)
//!
//! Dispatch (serving phase):
//!     request path → decoded segments → tree search (literal > param > rest,
//!       backtracking when a branch does not accept the method)
//!     → method selection → PathParams + MatchedPattern extensions
//!     → stored Handler, or 404 / 405 / 301
//! ```
//!
//! # Design Decisions
//! - The router layer only depends on the `Multiplexer` trait
//! - Malformed and duplicate patterns are rejected at registration time
//! - Path and method are matched together: 405 only when no pattern for
//!   the path accepts the method

use axum::extract::Request;
use thiserror::Error;

use crate::http::Handler;
use crate::routing::Pattern;

pub mod serve_mux;
pub(crate) mod template;

pub use serve_mux::ServeMux;

/// A registration table that can resolve requests to handlers.
///
/// Implementations are cloned on every registration (copy-on-write), and
/// resolved concurrently from many requests.
pub trait Multiplexer: Clone + Send + Sync + 'static {
    /// Add `handler` under `pattern`.
    fn register(&mut self, pattern: &Pattern, handler: Handler) -> Result<(), MuxError>;

    /// Pick the handler for `req`, attaching any routing data to its extensions.
    ///
    /// Never fails: unmatched requests get the implementation's fallback.
    fn resolve(&self, req: &mut Request) -> Handler;

    /// Registered patterns in registration order.
    fn routes(&self) -> Vec<Pattern> {
        Vec::new()
    }
}

/// Registration failures.
#[derive(Debug, Error)]
pub enum MuxError {
    #[error("pattern {pattern:?}: path must begin with '/'")]
    MissingLeadingSlash { pattern: String },

    #[error("pattern {pattern:?}: invalid method token {method:?}")]
    InvalidMethod { pattern: String, method: String },

    #[error("pattern {pattern:?}: segment {segment:?} must be a whole-segment wildcard or contain no braces")]
    MalformedWildcard { pattern: String, segment: String },

    #[error("pattern {pattern:?}: {name:?} is not a valid wildcard name")]
    InvalidWildcardName { pattern: String, name: String },

    #[error("pattern {pattern:?}: wildcard {name:?} appears more than once")]
    DuplicateWildcard { pattern: String, name: String },

    #[error("pattern {pattern:?}: {segment:?} must be the final segment")]
    WildcardNotLast { pattern: String, segment: String },

    #[error("pattern {pattern:?} conflicts with already registered {existing:?}")]
    Conflict { pattern: String, existing: String },
}

//! Routing subsystem.
//!
//! # Data Flow
//! ```text
//! Setup:
//!     Router::new() (root: empty prefix, empty chain, fresh multiplexer)
//!     → group("/api") (prefix joined, chain copied, multiplexer shared)
//!     → use_middleware(m) (appended to this node only)
//!     → get("/users/{id}", h)
//!         → pattern.rs: "GET /api/users/{id}"
//!         → middleware::apply(chain, h)
//!         → Multiplexer::register
//!
//! Serving:
//!     any node (or a clone of it) → Multiplexer::resolve → handler
//! ```
//!
//! # Design Decisions
//! - Prefix and chain are fixed into the route at registration time
//! - Every node of a tree serves the same table

pub mod pattern;
pub mod router;

pub use pattern::{join_path, Pattern};
pub use router::Router;

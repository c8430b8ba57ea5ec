//! Route groups over a shared HTTP multiplexer.
//!
//! A [`Router`] is one node of a tree: a path prefix, an ordered middleware
//! chain and a handle to the registration table shared by the whole tree.
//! `group()` makes child nodes; registering a route on any node stores the
//! fully prefixed pattern and the middleware-wrapped handler in that table.

pub mod config;
pub mod http;
pub mod middleware;
pub mod mux;
pub mod observability;
pub mod routing;

pub use axum::body::Body;
pub use axum::extract::Request;
pub use axum::response::Response;

pub use config::{GrouteConfig, MuxConfig};
pub use http::{Handler, IntoHandler, RequestExt};
pub use middleware::{from_fn, Middleware, Next};
pub use mux::{Multiplexer, MuxError, ServeMux};
pub use routing::{join_path, Pattern, Router};

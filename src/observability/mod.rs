//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! Router / ServeMux produce:
//!     → tracing events (registration, unmatched requests)
//! Middleware produce:
//!     → TraceRequests spans and completion events
//!     → RecordMetrics counters and histograms (metrics facade)
//!
//! Consumers:
//!     → logging.rs subscriber (stdout, pretty / compact / JSON)
//!     → whatever metrics recorder the embedding process installs
//! ```

pub mod logging;

pub use logging::{init_logging, LoggingError};

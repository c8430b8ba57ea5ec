//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML)
//!     → loader.rs (parse & deserialize)
//!     → validation.rs (semantic checks)
//!     → GrouteConfig (validated, immutable)
//!     → MuxConfig handed to ServeMux, LoggingConfig to observability
//! ```
//!
//! # Design Decisions
//! - Config is read once at setup; the router tree is built from it
//! - All fields have defaults to allow minimal configs
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{from_toml_str, load_config, ConfigError};
pub use schema::{GrouteConfig, LogFormat, LoggingConfig, MuxConfig};
pub use validation::{validate_config, ValidationError};

//! Configuration schema definitions.
//!
//! All types derive Serde traits for deserialization from TOML files, and
//! every field has a default so an empty file is a valid configuration.

use serde::{Deserialize, Serialize};

/// Root configuration.
#[derive(Debug, Clone, Deserialize, Serialize, Default, PartialEq, Eq)]
#[serde(default)]
pub struct GrouteConfig {
    /// Multiplexer behaviour.
    pub mux: MuxConfig,

    /// Log output settings.
    pub logging: LoggingConfig,
}

/// Behaviour of the default multiplexer on requests that do not hit a
/// registered method exactly.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
#[serde(default)]
pub struct MuxConfig {
    /// Redirect `/dir` to `/dir/` (301) when only the subtree is registered.
    pub redirect_trailing_slash: bool,

    /// Answer 405 with an `Allow` header when the path matches but the method
    /// does not. When off, such requests get the not-found response.
    pub method_not_allowed: bool,

    /// Serve `HEAD` with the `GET` handler when no `HEAD` route exists.
    pub head_uses_get: bool,
}

impl Default for MuxConfig {
    fn default() -> Self {
        Self {
            redirect_trailing_slash: true,
            method_not_allowed: true,
            head_uses_get: true,
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
#[serde(default)]
pub struct LoggingConfig {
    /// `tracing_subscriber::EnvFilter` directives; `RUST_LOG` overrides.
    pub filter: String,

    /// Output format.
    pub format: LogFormat,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: "groute=info".to_string(),
            format: LogFormat::Pretty,
        }
    }
}

/// Log line format.
#[derive(Debug, Clone, Copy, Deserialize, Serialize, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Multi-line human readable output for development.
    #[default]
    Pretty,
    /// Single-line human readable output.
    Compact,
    /// JSON objects for log aggregation.
    Json,
}

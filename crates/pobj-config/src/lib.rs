//! Configuration management for parameter-object extraction
//!
//! This crate provides configuration types, loading logic (defaults, TOML
//! files, environment overrides) and the tracing subscriber setup.

pub mod config;
pub mod error;
pub mod logging;

// Re-export commonly used types at the crate root for convenience
pub use config::{
    AppConfig, CollisionPolicy, DiagnosticCodesConfig, ExtractConfig, LogFormat, LoggingConfig,
    DEFAULT_CLASS_NAME,
};
pub use error::{ConfigError, ConfigResult};

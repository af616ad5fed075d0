//! Centralized logging initialization with environment variable support

use crate::{AppConfig, LogFormat};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Initialize tracing subscriber with environment variable support
///
/// Environment variables (in priority order):
/// - `RUST_LOG`: Standard Rust log filter (takes precedence over all)
/// - `LOG_FORMAT`: Override format (json, pretty)
///
/// Logs go to stderr so a host reading the refactoring result on stdout is
/// never disturbed. Calling this more than once is harmless; only the first
/// subscriber is installed.
///
/// # Examples
///
/// ```bash
/// # Trace the pruner only
/// RUST_LOG=pobj_refactor::pruner=trace my-host
/// ```
pub fn initialize(config: &AppConfig) {
    let log_level = config
        .logging
        .level
        .parse()
        .unwrap_or(tracing::Level::INFO);

    let env_filter = EnvFilter::from_default_env().add_directive(log_level.into());

    let format = std::env::var("LOG_FORMAT")
        .ok()
        .and_then(|f| match f.to_lowercase().as_str() {
            "json" => Some(LogFormat::Json),
            "pretty" | "human" => Some(LogFormat::Pretty),
            _ => None,
        })
        .unwrap_or_else(|| config.logging.format.clone());

    let result = match format {
        LogFormat::Json => tracing_subscriber::registry()
            .with(env_filter)
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .try_init(),
        LogFormat::Pretty => tracing_subscriber::registry()
            .with(env_filter)
            .with(fmt::layer().pretty().with_writer(std::io::stderr))
            .try_init(),
    };

    if result.is_err() {
        tracing::debug!("Tracing subscriber already installed; keeping the existing one");
    }
}

/// Span wrapping one refactoring invocation
///
/// Every event logged by the pipeline while the span is entered carries the
/// invocation id and the name of the method being refactored.
pub fn refactoring_span(invocation_id: &str, method: &str) -> tracing::Span {
    tracing::info_span!(
        "extract_parameter_object",
        invocation_id = %invocation_id,
        method = %method
    )
}

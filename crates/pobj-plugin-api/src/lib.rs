//! Core Plugin API for language backends
//!
//! The extraction pipeline is language-agnostic. Everything that depends on a
//! concrete language or toolchain is reached through the capability traits
//! defined here:
//!
//! - [`LanguageSyntax`]: printing and re-parsing generated units, locating and
//!   removing import directives
//! - [`SemanticAnalyzer`]: producing diagnostics for one document of a solution
//! - [`ImportDiagnosticClassifier`]: deciding which diagnostics mean
//!   "this import is unused" or "this import is a duplicate"

pub mod capabilities;
pub mod classifier;

pub use capabilities::{ImportDirective, LanguageSyntax, SemanticAnalyzer};
pub use classifier::{CodeListClassifier, ImportDiagnosticClassifier};

use pobj_foundation::RefactorError;

// ============================================================================
// Error Types
// ============================================================================

/// Result type for plugin operations
pub type PluginResult<T> = Result<T, PluginApiError>;

/// Errors that can occur during plugin API operations
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum PluginApiError {
    /// Failed to parse source code
    #[error("Parse error: {message}")]
    Parse { message: String },

    /// The backend could not produce a semantic model for the request
    #[error("Analysis unavailable: {message}")]
    AnalysisUnavailable { message: String },

    /// The caller cancelled while the backend was working
    #[error("Cancelled")]
    Cancelled,

    /// Operation not supported by this backend
    #[error("Operation not supported: {operation}")]
    NotSupported { operation: String },

    /// Invalid input provided to the backend
    #[error("Invalid input: {message}")]
    InvalidInput { message: String },

    /// Internal backend error
    #[error("Internal error: {message}")]
    Internal { message: String },
}

impl PluginApiError {
    /// Create a parse error
    pub fn parse(message: impl Into<String>) -> Self {
        Self::Parse {
            message: message.into(),
        }
    }

    /// Create an analysis unavailable error
    pub fn analysis_unavailable(message: impl Into<String>) -> Self {
        Self::AnalysisUnavailable {
            message: message.into(),
        }
    }

    /// Create a not supported error
    pub fn not_supported(operation: impl Into<String>) -> Self {
        Self::NotSupported {
            operation: operation.into(),
        }
    }

    /// Create an invalid input error
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput {
            message: message.into(),
        }
    }

    /// Create an internal error
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }
}

impl From<PluginApiError> for RefactorError {
    fn from(err: PluginApiError) -> Self {
        match err {
            PluginApiError::Parse { message } => RefactorError::parse(message),
            PluginApiError::AnalysisUnavailable { message } => {
                RefactorError::analysis_unavailable(message)
            }
            PluginApiError::Cancelled => RefactorError::cancelled("backend"),
            PluginApiError::NotSupported { operation } => {
                RefactorError::invalid_input(format!("Operation not supported: {}", operation))
            }
            PluginApiError::InvalidInput { message } => RefactorError::invalid_input(message),
            PluginApiError::Internal { message } => RefactorError::internal(message),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_conversion_keeps_category() {
        let err: RefactorError = PluginApiError::analysis_unavailable("no model").into();
        assert!(matches!(err, RefactorError::AnalysisUnavailable { .. }));

        let err: RefactorError = PluginApiError::Cancelled.into();
        assert!(err.is_cancelled());
    }
}

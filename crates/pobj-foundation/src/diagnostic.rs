//! Compiler-style diagnostics produced by a semantic analyzer

use crate::text::TextSpan;
use serde::{Deserialize, Serialize};

/// Diagnostic severity level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DiagnosticSeverity {
    Hidden,
    Info,
    Warning,
    Error,
}

/// A single diagnostic: identifying code plus the span it points at
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostic {
    /// Toolchain-specific identifier, e.g. `CS8019`
    pub code: String,
    pub message: String,
    pub severity: DiagnosticSeverity,
    pub span: TextSpan,
}

impl Diagnostic {
    pub fn new(
        code: impl Into<String>,
        message: impl Into<String>,
        severity: DiagnosticSeverity,
        span: TextSpan,
    ) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            severity,
            span,
        }
    }

    /// Hidden diagnostics never surface to the user; they feed code fixes
    pub fn hidden(code: impl Into<String>, message: impl Into<String>, span: TextSpan) -> Self {
        Self::new(code, message, DiagnosticSeverity::Hidden, span)
    }
}

impl std::fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}: {}", self.code, self.span, self.message)
    }
}

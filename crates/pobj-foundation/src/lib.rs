//! Foundation Layer - Core types shared by every pobj crate
//!
//! This crate provides the building blocks the refactoring pipeline and the
//! language backends agree on:
//! - Error taxonomy ([`RefactorError`])
//! - Byte spans and compiler-style diagnostics
//! - The language-agnostic declaration model (parameters, synthesized types)
//! - Immutable, versioned solution snapshots
//! - Cancellation helpers

pub mod cancel;
pub mod diagnostic;
pub mod error;
pub mod model;
pub mod snapshot;
pub mod text;

// Re-export commonly used types for convenience
pub use cancel::{ensure_not_cancelled, CancellationToken};
pub use diagnostic::{Diagnostic, DiagnosticSeverity};
pub use error::*;
pub use model::*;
pub use snapshot::{Document, DocumentId, Project, ProjectId, Solution};
pub use text::TextSpan;

//! Capability traits for language backends
//!
//! # Design Principles
//!
//! - **Trait-based dispatch**: the pipeline holds `Arc<dyn Trait>` values and
//!   never downcasts to a concrete backend
//! - **Model in, model out**: syntax capabilities speak the declaration model
//!   from `pobj-foundation`; only the backend ever sees raw syntax trees

use crate::PluginResult;
use async_trait::async_trait;
use pobj_foundation::{
    CancellationToken, CompilationUnitDraft, Diagnostic, DocumentId, MethodDeclaration,
    ObjectInitializer, Solution, TextSpan,
};
use serde::{Deserialize, Serialize};

// ============================================================================
// Import Directives
// ============================================================================

/// An import directive physically present in a unit
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ImportDirective {
    /// Span of the whole directive node, terminator included
    pub span: TextSpan,
    /// Imported namespace or type, whitespace-normalized
    pub target: String,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub alias: Option<String>,
    #[serde(default)]
    pub is_static: bool,
    #[serde(default)]
    pub is_global: bool,
    /// Enclosing namespace when the directive is declared inside one
    ///
    /// Targets of scoped directives may be relative to that namespace.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub scope: Option<String>,
}

// ============================================================================
// Syntax Capability
// ============================================================================

/// Language-specific syntax services used by the extraction pipeline
///
/// # Example
///
/// ```rust,ignore
/// let text = syntax.render_unit(&draft);
/// assert_eq!(syntax.parse_unit_draft(&text)?, draft);
/// ```
pub trait LanguageSyntax: Send + Sync {
    /// Human-readable language name, used in logs
    fn language_name(&self) -> &'static str;

    /// Extension of a compilation unit file, without the dot
    fn unit_extension(&self) -> &'static str;

    /// Render a draft as normalized source text
    ///
    /// Rendering the same draft twice must produce byte-identical text.
    fn render_unit(&self, draft: &CompilationUnitDraft) -> String;

    /// Parse a generated unit back into a draft
    ///
    /// Used to check that rendered text round-trips before it is committed.
    fn parse_unit_draft(&self, source: &str) -> PluginResult<CompilationUnitDraft>;

    /// List the import directives of a unit in source order
    fn import_directives(&self, source: &str) -> PluginResult<Vec<ImportDirective>>;

    /// Remove exactly the given directives, keeping every other byte of syntax
    fn remove_imports(&self, source: &str, directives: &[ImportDirective])
        -> PluginResult<String>;

    /// Render a method signature (modifiers, return type, name, parameters)
    fn render_method_signature(&self, method: &MethodDeclaration) -> String;

    /// Render an object-creation expression with property assignments
    fn render_object_initializer(&self, initializer: &ObjectInitializer) -> String;

    /// Turn a project's canonical name into a legal namespace name
    ///
    /// Assembly names may contain characters a namespace cannot (`My-App`).
    fn sanitize_namespace(&self, name: &str) -> String;
}

// ============================================================================
// Semantic Analysis Capability
// ============================================================================

/// Produces compiler-style diagnostics for one document of a solution
///
/// Implementations may be slow on large projects and should check `cancel`
/// between units of work, returning [`crate::PluginApiError::Cancelled`].
/// When no semantic model can be built (for instance the project does not
/// compile), return [`crate::PluginApiError::AnalysisUnavailable`].
#[async_trait]
pub trait SemanticAnalyzer: Send + Sync {
    async fn diagnostics(
        &self,
        solution: &Solution,
        document: DocumentId,
        cancel: &CancellationToken,
    ) -> PluginResult<Vec<Diagnostic>>;
}

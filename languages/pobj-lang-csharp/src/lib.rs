//! C# language backend
//!
//! Provides the C# implementations of the capability traits:
//! - [`CsharpSyntax`]: rendering, re-parsing and import editing via tree-sitter
//! - [`CsharpImportAnalyzer`]: `CS8019` / `CS0105` diagnostics for using directives
//!
//! Plus project loading from `*.csproj` files.

pub mod analyzer;
pub mod draft;
pub mod imports;
pub mod manifest;
pub mod parser;
pub mod printer;
pub mod workspace;

pub use analyzer::{CsharpImportAnalyzer, DUPLICATE_USING, UNUSED_USING};
pub use manifest::{load_manifest, parse_manifest, ProjectManifest};
pub use parser::{find_method, method_at, node_at, parse_unit, CsharpUnit};
pub use workspace::load_project;

use pobj_foundation::{CompilationUnitDraft, MethodDeclaration, ObjectInitializer};
use pobj_plugin_api::{ImportDirective, LanguageSyntax, PluginResult};

/// File extension of C# compilation units
pub const EXTENSION: &str = "cs";

/// C# syntax services
#[derive(Debug, Default, Clone, Copy)]
pub struct CsharpSyntax;

impl CsharpSyntax {
    pub fn new() -> Self {
        Self
    }
}

impl LanguageSyntax for CsharpSyntax {
    fn language_name(&self) -> &'static str {
        "C#"
    }

    fn unit_extension(&self) -> &'static str {
        EXTENSION
    }

    fn render_unit(&self, draft: &CompilationUnitDraft) -> String {
        printer::render_unit(draft)
    }

    fn parse_unit_draft(&self, source: &str) -> PluginResult<CompilationUnitDraft> {
        draft::parse_unit_draft(source)
    }

    fn import_directives(&self, source: &str) -> PluginResult<Vec<ImportDirective>> {
        imports::import_directives(source)
    }

    fn remove_imports(
        &self,
        source: &str,
        directives: &[ImportDirective],
    ) -> PluginResult<String> {
        imports::remove_imports(source, directives)
    }

    fn render_method_signature(&self, method: &MethodDeclaration) -> String {
        printer::render_method_signature(method)
    }

    fn render_object_initializer(&self, initializer: &ObjectInitializer) -> String {
        printer::render_object_initializer(initializer)
    }

    fn sanitize_namespace(&self, name: &str) -> String {
        printer::sanitize_namespace(name)
    }
}

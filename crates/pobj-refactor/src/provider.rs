//! The "Extract Parameter Object" refactoring
//!
//! Two entry points, matching how an editor drives a refactoring:
//!
//! 1. [`ExtractParameterObjectProvider::compute_refactorings`] decides whether
//!    the selected node gets an action at all
//! 2. [`ExtractParameterObjectProvider::extract`] runs the pipeline when the
//!    user picks the action
//!
//! Pipeline: resolve the class name, synthesize the type, render it into a new
//! unit, check the text round-trips, add the unit next to the originating
//! document, then prune its imports.

use crate::mutator::{add_unit, resolve_class_name, unit_file_name};
use crate::pruner::{prune, PruneOutcome, PruneStatus};
use crate::synthesizer::synthesize;
use pobj_config::logging::refactoring_span;
use pobj_config::{DiagnosticCodesConfig, ExtractConfig};
use pobj_foundation::{
    ensure_not_cancelled, CancellationToken, CompilationUnitDraft, Document, DocumentId,
    ImportSpec, MethodDeclaration, RefactorError, RefactorResult, SelectedNode, Solution,
    SynthesizedType,
};
use pobj_plugin_api::{
    CodeListClassifier, ImportDiagnosticClassifier, ImportDirective, LanguageSyntax,
    SemanticAnalyzer,
};
use serde::Serialize;
use std::sync::Arc;
use tracing::{debug, info, warn, Instrument};
use uuid::Uuid;

/// Title of the offered action
pub const ACTION_TITLE: &str = "Extract Parameter Object";

/// An action offered to the user for the current selection
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CodeAction {
    pub title: String,
    /// Name of the method the action applies to
    pub method: String,
    pub parameter_count: usize,
}

/// Everything a host needs to preview or apply an extraction
#[derive(Debug, Clone)]
pub struct ExtractOutcome {
    /// Snapshot containing the new unit; the input snapshot is unchanged
    pub solution: Solution,
    /// The new document
    pub document: DocumentId,
    pub class_name: String,
    pub file_name: String,
    /// The generated type, for the signature rewrite stage
    pub declaration: SynthesizedType,
    pub removed_imports: Vec<ImportDirective>,
    pub prune_status: PruneStatus,
}

/// Build the import classifier described by the configured code lists
pub fn classifier_from_config(codes: &DiagnosticCodesConfig) -> CodeListClassifier {
    CodeListClassifier::new(
        codes.unused_import_codes.iter().cloned(),
        codes.duplicate_import_codes.iter().cloned(),
    )
}

/// Language-agnostic "Extract Parameter Object" refactoring
pub struct ExtractParameterObjectProvider {
    syntax: Arc<dyn LanguageSyntax>,
    analyzer: Arc<dyn SemanticAnalyzer>,
    classifier: Arc<dyn ImportDiagnosticClassifier>,
    config: ExtractConfig,
}

impl ExtractParameterObjectProvider {
    pub fn new(
        syntax: Arc<dyn LanguageSyntax>,
        analyzer: Arc<dyn SemanticAnalyzer>,
        config: ExtractConfig,
    ) -> Self {
        let classifier = Arc::new(classifier_from_config(&config.diagnostics));
        Self {
            syntax,
            analyzer,
            classifier,
            config,
        }
    }

    /// Replace the classifier built from the configured diagnostic codes
    pub fn with_classifier(mut self, classifier: Arc<dyn ImportDiagnosticClassifier>) -> Self {
        self.classifier = classifier;
        self
    }

    pub fn config(&self) -> &ExtractConfig {
        &self.config
    }

    /// Offer the action for method declarations, nothing for anything else
    pub fn compute_refactorings(&self, node: &SelectedNode) -> Option<CodeAction> {
        let method = node.as_method()?;
        Some(CodeAction {
            title: ACTION_TITLE.to_string(),
            method: method.name.to_string(),
            parameter_count: method.parameters.len(),
        })
    }

    /// Extract `method`'s parameters into a new type next to `document`
    ///
    /// The returned snapshot holds exactly one new document. The method
    /// itself and its callers are not touched.
    ///
    /// # Errors
    ///
    /// - [`RefactorError::NameCollision`] when the target file already exists
    ///   (with the default abort policy)
    /// - [`RefactorError::Cancelled`] when `cancel` fires before the result is
    ///   complete; `solution` is never modified in any case
    pub async fn extract(
        &self,
        solution: &Solution,
        document: DocumentId,
        method: &MethodDeclaration,
        cancel: &CancellationToken,
    ) -> RefactorResult<ExtractOutcome> {
        let invocation_id = Uuid::new_v4().to_string();
        let span = refactoring_span(&invocation_id, method.name.as_str());
        self.run(solution, document, method, cancel)
            .instrument(span)
            .await
    }

    async fn run(
        &self,
        solution: &Solution,
        document: DocumentId,
        method: &MethodDeclaration,
        cancel: &CancellationToken,
    ) -> RefactorResult<ExtractOutcome> {
        info!(
            language = self.syntax.language_name(),
            parameters = method.parameters.len(),
            "Starting parameter object extraction"
        );
        ensure_not_cancelled(cancel, "start")?;

        let doc = solution
            .document(document)
            .ok_or_else(|| RefactorError::document_not_found(document))?;
        let project = solution
            .project(doc.project_id)
            .ok_or_else(|| RefactorError::project_not_found(doc.project_id))?;

        let namespace = self.syntax.sanitize_namespace(project.canonical_name());
        if namespace.is_empty() {
            return Err(RefactorError::invalid_input(format!(
                "Project '{}' has no canonical name usable as a namespace",
                project.name
            )));
        }

        let extension = self.syntax.unit_extension();
        let class_name = resolve_class_name(
            project,
            &self.config.class_name,
            extension,
            &doc.folders,
            self.config.on_collision,
        )?;
        let file_name = unit_file_name(&class_name, extension);

        let declaration = synthesize(&method.parameters, &class_name, &namespace);
        let draft = CompilationUnitDraft::new(declaration.clone())
            .with_imports(self.carried_imports(doc));
        let text = self.render_checked(&draft)?;

        let (solution, new_document) =
            add_unit(solution, project.id, &file_name, &text, &doc.folders, cancel)?;

        let pruned = if self.config.prune_imports {
            prune(
                &solution,
                new_document,
                self.syntax.as_ref(),
                self.analyzer.as_ref(),
                self.classifier.as_ref(),
                cancel,
            )
            .await?
        } else {
            PruneOutcome {
                solution,
                removed: Vec::new(),
                skipped_diagnostics: 0,
                status: PruneStatus::Disabled,
            }
        };

        info!(
            file = %file_name,
            class_name = %class_name,
            removed_imports = pruned.removed.len(),
            prune_status = ?pruned.status,
            "Parameter object extracted"
        );

        Ok(ExtractOutcome {
            solution: pruned.solution,
            document: new_document,
            class_name,
            file_name,
            declaration,
            removed_imports: pruned.removed,
            prune_status: pruned.status,
        })
    }

    /// File-level imports of the originating document, to be pruned in the new unit
    ///
    /// Directives inside a namespace block may name namespaces relative to
    /// it, so they would not resolve at the top of the new unit.
    fn carried_imports(&self, doc: &Document) -> Vec<ImportSpec> {
        if !self.config.carry_imports {
            return Vec::new();
        }
        match self.syntax.import_directives(&doc.text) {
            Ok(directives) => directives
                .into_iter()
                // Global imports already apply to every unit of the project
                .filter(|d| !d.is_global && d.scope.is_none())
                .map(|d| ImportSpec {
                    target: d.target,
                    alias: d.alias,
                    is_static: d.is_static,
                })
                .collect(),
            Err(e) => {
                warn!(
                    document = %doc.file_path(),
                    error = %e,
                    "Could not read imports of the originating document"
                );
                Vec::new()
            }
        }
    }

    /// Render the draft and make sure the text parses back to the same draft
    fn render_checked(&self, draft: &CompilationUnitDraft) -> RefactorResult<String> {
        let text = self.syntax.render_unit(draft);
        let reparsed = self.syntax.parse_unit_draft(&text)?;
        if &reparsed != draft {
            return Err(RefactorError::internal(format!(
                "Generated unit for '{}' does not parse back to the same declaration",
                draft.declaration.name
            )));
        }
        debug!(bytes = text.len(), "Rendered compilation unit");
        Ok(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pobj_foundation::{Diagnostic, TextSpan};

    #[test]
    fn test_classifier_follows_configured_codes() {
        let codes = DiagnosticCodesConfig {
            unused_import_codes: vec!["IDE0005".to_string()],
            duplicate_import_codes: Vec::new(),
        };
        let classifier = classifier_from_config(&codes);
        let span = TextSpan::new(0, 1);
        assert!(classifier.is_unused_import(&Diagnostic::hidden("IDE0005", "", span)));
        assert!(!classifier.is_removable_import(&Diagnostic::hidden("CS8019", "", span)));
    }

    #[test]
    fn test_code_action_serializes_camel_case() {
        let action = CodeAction {
            title: ACTION_TITLE.to_string(),
            method: "Foo".to_string(),
            parameter_count: 2,
        };
        assert_eq!(
            serde_json::to_value(&action).unwrap(),
            serde_json::json!({
                "title": "Extract Parameter Object",
                "method": "Foo",
                "parameterCount": 2
            })
        );
    }
}

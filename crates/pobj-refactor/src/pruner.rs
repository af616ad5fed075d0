//! Diagnostic-driven removal of unused and duplicate import directives
//!
//! The pruner never decides on its own that an import is unused. It asks
//! the [`SemanticAnalyzer`] for diagnostics, keeps those the
//! [`ImportDiagnosticClassifier`] recognizes, maps each one back to the import
//! directive it points into and removes exactly those directives.
//!
//! When analysis is unavailable the unit is left as it is: the generated
//! type still exists, only with a few superfluous imports.

use pobj_foundation::{
    ensure_not_cancelled, CancellationToken, DocumentId, RefactorError, RefactorResult, Solution,
};
use pobj_plugin_api::{
    ImportDiagnosticClassifier, ImportDirective, LanguageSyntax, PluginApiError, SemanticAnalyzer,
};
use serde::Serialize;
use tracing::{debug, warn};

/// How a prune pass ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum PruneStatus {
    /// At least one directive was removed
    Pruned,
    /// Analysis ran and nothing was removable
    NothingToPrune,
    /// No diagnostics could be obtained; the unit is unchanged
    AnalysisUnavailable,
    /// Pruning was switched off by configuration
    Disabled,
}

/// Result of a prune pass
#[derive(Debug, Clone)]
pub struct PruneOutcome {
    /// Snapshot after pruning; equal to the input when nothing was removed
    pub solution: Solution,
    /// Removed directives, in source order, with their pre-removal spans
    pub removed: Vec<ImportDirective>,
    /// Removable diagnostics that did not point into any import directive
    pub skipped_diagnostics: usize,
    pub status: PruneStatus,
}

impl PruneOutcome {
    fn unchanged(solution: &Solution, status: PruneStatus) -> Self {
        Self {
            solution: solution.clone(),
            removed: Vec::new(),
            skipped_diagnostics: 0,
            status,
        }
    }
}

/// Remove the import directives of `document` that diagnostics flag as removable
///
/// Only cancellation and unknown ids are errors. Analysis failures degrade
/// to [`PruneStatus::AnalysisUnavailable`].
pub async fn prune(
    solution: &Solution,
    document: DocumentId,
    syntax: &dyn LanguageSyntax,
    analyzer: &dyn SemanticAnalyzer,
    classifier: &dyn ImportDiagnosticClassifier,
    cancel: &CancellationToken,
) -> RefactorResult<PruneOutcome> {
    ensure_not_cancelled(cancel, "analyze")?;

    let doc = solution
        .document(document)
        .ok_or_else(|| RefactorError::document_not_found(document))?;

    let diagnostics = match analyzer.diagnostics(solution, document, cancel).await {
        Ok(diagnostics) => diagnostics,
        Err(PluginApiError::Cancelled) => return Err(RefactorError::cancelled("analyze")),
        Err(e) => {
            warn!(
                document = %doc.file_path(),
                error = %e,
                "Semantic analysis unavailable, keeping all imports"
            );
            return Ok(PruneOutcome::unchanged(
                solution,
                PruneStatus::AnalysisUnavailable,
            ));
        }
    };
    ensure_not_cancelled(cancel, "analyze")?;

    let directives = match syntax.import_directives(&doc.text) {
        Ok(directives) => directives,
        Err(e) => {
            warn!(document = %doc.file_path(), error = %e, "Could not list import directives");
            return Ok(PruneOutcome::unchanged(
                solution,
                PruneStatus::AnalysisUnavailable,
            ));
        }
    };

    let mut selected = vec![false; directives.len()];
    let mut skipped = 0;
    for diagnostic in diagnostics
        .iter()
        .filter(|d| classifier.is_removable_import(d))
    {
        match enclosing_directive(&directives, diagnostic.span) {
            Some(index) => selected[index] = true,
            None => {
                skipped += 1;
                debug!(
                    code = %diagnostic.code,
                    span = %diagnostic.span,
                    "Diagnostic does not point into an import directive, skipping"
                );
            }
        }
    }

    let removed: Vec<ImportDirective> = directives
        .into_iter()
        .zip(selected)
        .filter_map(|(directive, keep)| keep.then_some(directive))
        .collect();

    if removed.is_empty() {
        let mut outcome = PruneOutcome::unchanged(solution, PruneStatus::NothingToPrune);
        outcome.skipped_diagnostics = skipped;
        return Ok(outcome);
    }

    let text = syntax.remove_imports(&doc.text, &removed)?;

    ensure_not_cancelled(cancel, "prune")?;
    let solution = solution.with_document_text(document, text)?;

    debug!(
        document = %doc.file_path(),
        removed = removed.len(),
        skipped,
        "Pruned import directives"
    );

    Ok(PruneOutcome {
        solution,
        removed,
        skipped_diagnostics: skipped,
        status: PruneStatus::Pruned,
    })
}

/// Index of the innermost directive whose span covers `span`
fn enclosing_directive(
    directives: &[ImportDirective],
    span: pobj_foundation::TextSpan,
) -> Option<usize> {
    directives
        .iter()
        .enumerate()
        .filter(|(_, d)| d.span.contains_span(&span))
        .min_by_key(|(_, d)| d.span.len())
        .map(|(index, _)| index)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pobj_foundation::TextSpan;

    fn directive(start: usize, end: usize) -> ImportDirective {
        ImportDirective {
            span: TextSpan::new(start, end),
            target: "System".to_string(),
            alias: None,
            is_static: false,
            is_global: false,
            scope: None,
        }
    }

    #[test]
    fn test_enclosing_directive_resolution() {
        let directives = vec![directive(0, 13), directive(14, 30)];
        assert_eq!(enclosing_directive(&directives, TextSpan::new(0, 13)), Some(0));
        assert_eq!(enclosing_directive(&directives, TextSpan::new(20, 25)), Some(1));
        assert_eq!(enclosing_directive(&directives, TextSpan::new(10, 20)), None);
        assert_eq!(enclosing_directive(&directives, TextSpan::new(40, 41)), None);
    }
}

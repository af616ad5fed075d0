//! Mapping toolchain diagnostics to "removable import" decisions

use pobj_foundation::Diagnostic;
use std::collections::BTreeSet;

/// Decides whether a diagnostic flags an import directive as removable
///
/// Each toolchain reports unused and duplicate imports under its own codes;
/// implement this trait to teach the pruner a new toolchain.
pub trait ImportDiagnosticClassifier: Send + Sync {
    /// The diagnostic says the import is not needed by anything in the unit
    fn is_unused_import(&self, diagnostic: &Diagnostic) -> bool;

    /// The diagnostic says the import repeats an earlier one
    fn is_duplicate_import(&self, diagnostic: &Diagnostic) -> bool;

    fn is_removable_import(&self, diagnostic: &Diagnostic) -> bool {
        self.is_unused_import(diagnostic) || self.is_duplicate_import(diagnostic)
    }
}

/// Classifier driven by two fixed lists of diagnostic codes
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CodeListClassifier {
    unused: BTreeSet<String>,
    duplicate: BTreeSet<String>,
}

impl CodeListClassifier {
    pub fn new<U, D>(unused: U, duplicate: D) -> Self
    where
        U: IntoIterator,
        U::Item: Into<String>,
        D: IntoIterator,
        D::Item: Into<String>,
    {
        Self {
            unused: unused.into_iter().map(Into::into).collect(),
            duplicate: duplicate.into_iter().map(Into::into).collect(),
        }
    }

    /// C# compiler codes: CS8019 (unnecessary using), CS0105 (duplicate using)
    pub fn csharp() -> Self {
        Self::new(["CS8019"], ["CS0105"])
    }

    pub fn is_empty(&self) -> bool {
        self.unused.is_empty() && self.duplicate.is_empty()
    }
}

impl ImportDiagnosticClassifier for CodeListClassifier {
    fn is_unused_import(&self, diagnostic: &Diagnostic) -> bool {
        self.unused.contains(&diagnostic.code)
    }

    fn is_duplicate_import(&self, diagnostic: &Diagnostic) -> bool {
        self.duplicate.contains(&diagnostic.code)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pobj_foundation::TextSpan;

    fn diag(code: &str) -> Diagnostic {
        Diagnostic::hidden(code, "", TextSpan::new(0, 1))
    }

    #[test]
    fn test_csharp_codes() {
        let classifier = CodeListClassifier::csharp();
        assert!(classifier.is_unused_import(&diag("CS8019")));
        assert!(classifier.is_duplicate_import(&diag("CS0105")));
        assert!(!classifier.is_removable_import(&diag("CS0246")));
    }

    #[test]
    fn test_custom_toolchain_mapping() {
        let classifier = CodeListClassifier::new(["IDE0005"], Vec::<String>::new());
        assert!(classifier.is_removable_import(&diag("IDE0005")));
        assert!(!classifier.is_removable_import(&diag("CS8019")));
    }

    #[test]
    fn test_directive_serializes_without_empty_alias() {
        let directive = crate::ImportDirective {
            span: TextSpan::new(0, 13),
            target: "System".to_string(),
            alias: None,
            is_static: false,
            is_global: false,
            scope: None,
        };
        let json = serde_json::to_value(&directive).unwrap();
        assert!(json.get("alias").is_none());
    }
}

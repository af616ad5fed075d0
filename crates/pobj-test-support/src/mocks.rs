//! Mock implementations for testing

use async_trait::async_trait;
use mockall::mock;
use pobj_foundation::{CancellationToken, Diagnostic, DocumentId, Solution};
use pobj_plugin_api::{PluginResult, SemanticAnalyzer};

mock! {
    pub SemanticAnalyzer {}

    #[async_trait]
    impl SemanticAnalyzer for SemanticAnalyzer {
        async fn diagnostics(
            &self,
            solution: &Solution,
            document: DocumentId,
            cancel: &CancellationToken,
        ) -> PluginResult<Vec<Diagnostic>>;
    }
}

/// Create a mock semantic analyzer for testing
pub fn mock_semantic_analyzer() -> MockSemanticAnalyzer {
    MockSemanticAnalyzer::new()
}

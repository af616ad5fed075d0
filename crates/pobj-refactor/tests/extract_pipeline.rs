//! End-to-end extraction against the C# backend

use pobj_config::{CollisionPolicy, ExtractConfig};
use pobj_foundation::{CancellationToken, RefactorError, SelectedNode, Solution};
use pobj_lang_csharp::{find_method, parse_unit, CsharpImportAnalyzer, CsharpSyntax};
use pobj_refactor::{
    ExtractParameterObjectProvider, PruneStatus, ACTION_TITLE,
};
use pobj_test_support::{BuiltFixture, SolutionFixture, ORDER_SERVICE};
use pretty_assertions::assert_eq;
use std::sync::Arc;

const FOO: &str = "namespace MyApp\n{\n    public class Widget\n    {\n        public void Foo(int x, string y)\n        {\n        }\n    }\n}\n";

fn provider(config: ExtractConfig) -> ExtractParameterObjectProvider {
    ExtractParameterObjectProvider::new(
        Arc::new(CsharpSyntax::new()),
        Arc::new(CsharpImportAnalyzer::new()),
        config,
    )
}

/// Default config with the originating document's imports carried over
fn carrying() -> ExtractConfig {
    ExtractConfig {
        carry_imports: true,
        ..ExtractConfig::default()
    }
}

fn fixture(folder: &[&str], name: &str, text: &str) -> BuiltFixture {
    SolutionFixture::new("MyApp").document(folder, name, text).build()
}

fn generated_text(solution: &Solution, outcome: &pobj_refactor::ExtractOutcome) -> String {
    solution
        .document(outcome.document)
        .expect("generated document exists")
        .text
        .to_string()
}

#[tokio::test]
async fn test_foo_example_scenario() {
    let fx = fixture(&["Widgets"], "Widget.cs", FOO);
    let doc = fx.document_id("Widget.cs");
    let method = find_method(FOO, "Foo").unwrap().unwrap();

    let outcome = provider(ExtractConfig::default())
        .extract(&fx.solution, doc, &method, &CancellationToken::new())
        .await
        .unwrap();

    assert_eq!(outcome.file_name, "ParameterObject.cs");
    assert_eq!(outcome.class_name, "ParameterObject");

    let new_doc = outcome.solution.document(outcome.document).unwrap();
    assert_eq!(new_doc.folders, vec!["Widgets".to_string()]);

    let unit = parse_unit(&new_doc.text).unwrap();
    let ns = unit.namespace("MyApp").unwrap();
    assert_eq!(ns.types.len(), 1);
    let ty = &ns.types[0];
    assert_eq!(ty.name, "ParameterObject");
    assert_eq!(ty.modifiers, vec!["public"]);

    let props: Vec<(&str, &str)> = ty
        .properties
        .iter()
        .map(|p| (p.ty.as_str(), p.name.as_str()))
        .collect();
    assert_eq!(props, vec![("int", "x"), ("string", "y")]);
    assert_eq!(ty.constructors.len(), 1);
    assert!(ty.constructors[0].parameters.is_empty());
    assert!(ty.constructors[0].body_is_empty);

    // The originating document is untouched in both snapshots
    assert_eq!(&*outcome.solution.document(doc).unwrap().text, FOO);
    assert_eq!(&*fx.solution.document(doc).unwrap().text, FOO);
    assert!(fx.solution.document(outcome.document).is_none());
    assert_eq!(
        outcome
            .solution
            .project(fx.project_id)
            .unwrap()
            .document_count(),
        2
    );
}

#[tokio::test]
async fn test_zero_parameters_still_get_constructor() {
    let fx = fixture(&["Services"], "OrderService.cs", ORDER_SERVICE);
    let doc = fx.document_id("OrderService.cs");
    let method = find_method(ORDER_SERVICE, "Ping").unwrap().unwrap();

    let outcome = provider(ExtractConfig::default())
        .extract(&fx.solution, doc, &method, &CancellationToken::new())
        .await
        .unwrap();

    let unit = parse_unit(&generated_text(&outcome.solution, &outcome)).unwrap();
    let ty = &unit.namespace("MyApp").unwrap().types[0];
    assert!(ty.properties.is_empty());
    assert_eq!(ty.constructors.len(), 1);
    assert!(outcome.declaration.has_default_constructor());
}

#[tokio::test]
async fn test_unused_imports_are_pruned_and_used_ones_kept() {
    let fx = fixture(&["Services"], "OrderService.cs", ORDER_SERVICE);
    let doc = fx.document_id("OrderService.cs");
    let method = find_method(ORDER_SERVICE, "PlaceOrder").unwrap().unwrap();

    let outcome = provider(carrying())
        .extract(&fx.solution, doc, &method, &CancellationToken::new())
        .await
        .unwrap();

    assert_eq!(outcome.prune_status, PruneStatus::Pruned);
    let removed: Vec<&str> = outcome
        .removed_imports
        .iter()
        .map(|d| d.target.as_str())
        .collect();
    assert_eq!(removed, vec!["System", "System.Text"]);

    let expected = "\
using System.Collections.Generic;

namespace MyApp
{
    public class ParameterObject
    {
        public int quantity { get; set; }
        public string sku { get; set; }
        public List<string> tags { get; set; }

        public ParameterObject()
        {
        }
    }
}
";
    assert_eq!(generated_text(&outcome.solution, &outcome), expected);
}

#[tokio::test]
async fn test_duplicate_carried_imports_are_collapsed() {
    let source = "using System.Collections.Generic;\nusing System.Collections.Generic;\nnamespace MyApp\n{\n    class A { void F(List<int> xs) { } }\n}\n";
    let fx = fixture(&[], "A.cs", source);
    let doc = fx.document_id("A.cs");
    let method = find_method(source, "F").unwrap().unwrap();

    let outcome = provider(carrying())
        .extract(&fx.solution, doc, &method, &CancellationToken::new())
        .await
        .unwrap();

    let text = generated_text(&outcome.solution, &outcome);
    assert_eq!(text.matches("using System.Collections.Generic;").count(), 1);
    assert_eq!(outcome.removed_imports.len(), 1);
}

#[tokio::test]
async fn test_collision_aborts_without_mutation() {
    let fx = SolutionFixture::new("MyApp")
        .document(&["Widgets"], "Widget.cs", FOO)
        .document(&["Widgets"], "ParameterObject.cs", "class Existing { }")
        .build();
    let doc = fx.document_id("Widget.cs");
    let method = find_method(FOO, "Foo").unwrap().unwrap();
    let version = fx.solution.version();

    let err = provider(ExtractConfig::default())
        .extract(&fx.solution, doc, &method, &CancellationToken::new())
        .await
        .unwrap_err();

    assert_eq!(
        err,
        RefactorError::name_collision("ParameterObject.cs", "Widgets")
    );
    assert_eq!(fx.solution.version(), version);
    assert_eq!(
        fx.solution.project(fx.project_id).unwrap().document_count(),
        2
    );
}

#[tokio::test]
async fn test_rename_policy_avoids_collision() {
    let fx = SolutionFixture::new("MyApp")
        .document(&["Widgets"], "Widget.cs", FOO)
        .document(&["Widgets"], "ParameterObject.cs", "class Existing { }")
        .build();
    let doc = fx.document_id("Widget.cs");
    let method = find_method(FOO, "Foo").unwrap().unwrap();

    let config = ExtractConfig {
        on_collision: CollisionPolicy::Rename,
        ..ExtractConfig::default()
    };
    let outcome = provider(config)
        .extract(&fx.solution, doc, &method, &CancellationToken::new())
        .await
        .unwrap();

    assert_eq!(outcome.class_name, "ParameterObject1");
    assert_eq!(outcome.file_name, "ParameterObject1.cs");
    assert!(generated_text(&outcome.solution, &outcome).contains("public ParameterObject1()"));
}

#[tokio::test]
async fn test_configured_class_name() {
    let fx = fixture(&[], "Widget.cs", FOO);
    let doc = fx.document_id("Widget.cs");
    let method = find_method(FOO, "Foo").unwrap().unwrap();

    let outcome = provider(ExtractConfig::with_class_name("FooArgs"))
        .extract(&fx.solution, doc, &method, &CancellationToken::new())
        .await
        .unwrap();

    assert_eq!(outcome.file_name, "FooArgs.cs");
    assert!(generated_text(&outcome.solution, &outcome).contains("public class FooArgs"));
}

#[tokio::test]
async fn test_cancellation_leaves_snapshot_untouched() {
    let fx = fixture(&[], "Widget.cs", FOO);
    let doc = fx.document_id("Widget.cs");
    let method = find_method(FOO, "Foo").unwrap().unwrap();
    let version = fx.solution.version();

    let cancel = CancellationToken::new();
    cancel.cancel();
    let err = provider(ExtractConfig::default())
        .extract(&fx.solution, doc, &method, &cancel)
        .await
        .unwrap_err();

    assert!(err.is_cancelled());
    assert_eq!(fx.solution.version(), version);
    assert_eq!(
        fx.solution.project(fx.project_id).unwrap().document_count(),
        1
    );
}

#[tokio::test]
async fn test_broken_project_degrades_pruning() {
    let fx = SolutionFixture::new("MyApp")
        .document(&["Services"], "OrderService.cs", ORDER_SERVICE)
        .document(&[], "Broken.cs", "namespace X { public class { }")
        .build();
    let doc = fx.document_id("OrderService.cs");
    let method = find_method(ORDER_SERVICE, "PlaceOrder").unwrap().unwrap();

    let outcome = provider(carrying())
        .extract(&fx.solution, doc, &method, &CancellationToken::new())
        .await
        .unwrap();

    assert_eq!(outcome.prune_status, PruneStatus::AnalysisUnavailable);
    assert!(outcome.removed_imports.is_empty());
    let text = generated_text(&outcome.solution, &outcome);
    assert!(text.starts_with("using System;\nusing System.Collections.Generic;\nusing System.Text;\n"));
    assert!(parse_unit(&text).map(|u| !u.has_errors).unwrap());
}

#[tokio::test]
async fn test_import_options() {
    let fx = fixture(&["Services"], "OrderService.cs", ORDER_SERVICE);
    let doc = fx.document_id("OrderService.cs");
    let method = find_method(ORDER_SERVICE, "PlaceOrder").unwrap().unwrap();

    let no_prune = ExtractConfig {
        prune_imports: false,
        ..carrying()
    };
    let outcome = provider(no_prune)
        .extract(&fx.solution, doc, &method, &CancellationToken::new())
        .await
        .unwrap();
    assert_eq!(outcome.prune_status, PruneStatus::Disabled);
    assert_eq!(
        generated_text(&outcome.solution, &outcome)
            .matches("using ")
            .count(),
        3
    );

    // Nothing is inherited unless asked for
    let outcome = provider(ExtractConfig::default())
        .extract(&fx.solution, doc, &method, &CancellationToken::new())
        .await
        .unwrap();
    assert_eq!(outcome.prune_status, PruneStatus::NothingToPrune);
    assert!(generated_text(&outcome.solution, &outcome).starts_with("namespace MyApp\n"));
}

#[tokio::test]
async fn test_needed_import_outside_library_table_is_kept() {
    let cases = [
        ("System", "DayOfWeek"),
        ("System.Collections.Generic", "IAsyncEnumerable<int>"),
    ];
    for (namespace, ty) in cases {
        let source = format!(
            "using {};\nnamespace MyApp\n{{\n    class W {{ void Foo({} day) {{ }} }}\n}}\n",
            namespace, ty
        );
        let fx = fixture(&[], "W.cs", &source);
        let doc = fx.document_id("W.cs");
        let method = find_method(&source, "Foo").unwrap().unwrap();

        let outcome = provider(carrying())
            .extract(&fx.solution, doc, &method, &CancellationToken::new())
            .await
            .unwrap();

        let text = generated_text(&outcome.solution, &outcome);
        assert!(
            text.starts_with(&format!("using {};\n", namespace)),
            "import of {} was dropped:\n{}",
            namespace,
            text
        );
        assert!(text.contains(&format!("public {} day {{ get; set; }}", ty)));
        assert_eq!(outcome.prune_status, PruneStatus::NothingToPrune);
    }
}

#[tokio::test]
async fn test_namespace_scoped_imports_are_not_carried() {
    let source = "using System.Text;\nnamespace MyApp.Services\n{\n    using Models;\n    class W { void Foo(int x) { } }\n}\n";
    let fx = fixture(&["Services"], "W.cs", source);
    let doc = fx.document_id("W.cs");
    let method = find_method(source, "Foo").unwrap().unwrap();

    let config = ExtractConfig {
        prune_imports: false,
        ..carrying()
    };
    let outcome = provider(config)
        .extract(&fx.solution, doc, &method, &CancellationToken::new())
        .await
        .unwrap();

    let text = generated_text(&outcome.solution, &outcome);
    assert!(text.starts_with("using System.Text;\n\nnamespace MyApp\n"));
    assert!(!text.contains("using Models;"));
}

#[tokio::test]
async fn test_assembly_name_is_sanitized() {
    let fx = SolutionFixture::new("my-app")
        .assembly_name("My-App.Core")
        .document(&[], "Widget.cs", FOO)
        .build();
    let doc = fx.document_id("Widget.cs");
    let method = find_method(FOO, "Foo").unwrap().unwrap();

    let outcome = provider(ExtractConfig::default())
        .extract(&fx.solution, doc, &method, &CancellationToken::new())
        .await
        .unwrap();

    let unit = parse_unit(&generated_text(&outcome.solution, &outcome)).unwrap();
    assert!(unit.namespace("My_App.Core").is_some());
}

#[tokio::test]
async fn test_unknown_document_is_an_error() {
    let fx = fixture(&[], "Widget.cs", FOO);
    let method = find_method(FOO, "Foo").unwrap().unwrap();
    let err = provider(ExtractConfig::default())
        .extract(
            &fx.solution,
            pobj_foundation::DocumentId::new(),
            &method,
            &CancellationToken::new(),
        )
        .await
        .unwrap_err();
    assert!(matches!(err, RefactorError::DocumentNotFound { .. }));
}

#[test]
fn test_action_offered_only_for_methods() {
    let provider = provider(ExtractConfig::default());
    let offset = FOO.find("Foo").unwrap();
    let node = pobj_lang_csharp::node_at(FOO, offset).unwrap();

    let action = provider.compute_refactorings(&node).unwrap();
    assert_eq!(action.title, ACTION_TITLE);
    assert_eq!(action.method, "Foo");
    assert_eq!(action.parameter_count, 2);

    let other = SelectedNode::Other {
        kind: "class_declaration".to_string(),
    };
    assert!(provider.compute_refactorings(&other).is_none());
}

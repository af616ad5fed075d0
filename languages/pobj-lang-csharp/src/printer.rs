//! Normalized C# text for generated declarations
//!
//! Output is fully determined by the input model: four-space indentation,
//! `\n` line endings, Allman braces, one trailing newline.

use pobj_foundation::{
    CompilationUnitDraft, ConstructorSpec, ImportSpec, MethodDeclaration, ObjectInitializer,
    PropertySpec, SynthesizedType,
};
use std::fmt::Write;

const INDENT: &str = "    ";

/// Render a whole compilation unit
pub fn render_unit(draft: &CompilationUnitDraft) -> String {
    let mut out = String::new();

    for import in &draft.imports {
        out.push_str(&render_using(import));
        out.push('\n');
    }
    if !draft.imports.is_empty() {
        out.push('\n');
    }

    let namespace = draft.namespace();
    if namespace.is_empty() {
        render_type(&mut out, &draft.declaration, 0);
    } else {
        let _ = writeln!(out, "namespace {}", namespace);
        out.push_str("{\n");
        render_type(&mut out, &draft.declaration, 1);
        out.push_str("}\n");
    }

    out
}

pub fn render_using(import: &ImportSpec) -> String {
    match (&import.alias, import.is_static) {
        (Some(alias), _) => format!("using {} = {};", alias, import.target),
        (None, true) => format!("using static {};", import.target),
        (None, false) => format!("using {};", import.target),
    }
}

fn render_type(out: &mut String, ty: &SynthesizedType, depth: usize) {
    let indent = INDENT.repeat(depth);
    let _ = writeln!(out, "{}{} class {}", indent, ty.visibility.keyword(), ty.name);
    let _ = writeln!(out, "{}{{", indent);

    for property in &ty.properties {
        let _ = writeln!(out, "{}{}{}", indent, INDENT, render_property(property));
    }

    for (i, ctor) in ty.constructors.iter().enumerate() {
        if i > 0 || !ty.properties.is_empty() {
            out.push('\n');
        }
        render_constructor(out, &ty.name.to_string(), ctor, depth + 1);
    }

    let _ = writeln!(out, "{}}}", indent);
}

fn render_property(property: &PropertySpec) -> String {
    let mut accessors = String::new();
    if property.has_getter {
        accessors.push_str(" get;");
    }
    if property.has_setter {
        accessors.push_str(" set;");
    }
    format!(
        "{} {} {} {{{} }}",
        property.visibility.keyword(),
        property.ty,
        property.name,
        accessors
    )
}

fn render_constructor(out: &mut String, type_name: &str, ctor: &ConstructorSpec, depth: usize) {
    let indent = INDENT.repeat(depth);
    let params: Vec<String> = ctor
        .parameters
        .iter()
        .map(|p| format!("{} {}", p.ty, p.name))
        .collect();
    let _ = writeln!(
        out,
        "{}{} {}({})",
        indent,
        ctor.visibility.keyword(),
        type_name,
        params.join(", ")
    );
    let _ = writeln!(out, "{}{{", indent);
    let _ = writeln!(out, "{}}}", indent);
}

/// `public void Name(T a, U b)` without a body
pub fn render_method_signature(method: &MethodDeclaration) -> String {
    let params: Vec<String> = method
        .parameters
        .iter()
        .map(|p| format!("{} {}", p.ty, p.name))
        .collect();

    let mut out = String::new();
    for modifier in &method.modifiers {
        out.push_str(modifier);
        out.push(' ');
    }
    let _ = write!(
        out,
        "{} {}({})",
        method.return_type,
        method.name,
        params.join(", ")
    );
    out
}

/// `new T { A = a, B = b }`, or `new T()` with no assignments
pub fn render_object_initializer(initializer: &ObjectInitializer) -> String {
    if initializer.assignments.is_empty() {
        return format!("new {}()", initializer.type_name);
    }
    let assignments: Vec<String> = initializer
        .assignments
        .iter()
        .map(|a| format!("{} = {}", a.property, a.value))
        .collect();
    format!(
        "new {} {{ {} }}",
        initializer.type_name,
        assignments.join(", ")
    )
}

/// Map an assembly name onto a legal dotted namespace
///
/// Illegal characters become `_`, segments starting with a digit get a `_`
/// prefix and empty segments are dropped.
pub fn sanitize_namespace(name: &str) -> String {
    name.split('.')
        .map(|segment| {
            let mut cleaned: String = segment
                .trim()
                .chars()
                .map(|c| if c.is_alphanumeric() || c == '_' { c } else { '_' })
                .collect();
            if cleaned.starts_with(|c: char| c.is_ascii_digit()) {
                cleaned.insert(0, '_');
            }
            cleaned
        })
        .filter(|segment| !segment.is_empty())
        .collect::<Vec<_>>()
        .join(".")
}

#[cfg(test)]
mod tests {
    use super::*;
    use pobj_foundation::{Parameter, PropertyAssignment, TypeReference, Visibility};
    use pretty_assertions::assert_eq;

    fn property(ty: &str, name: &str) -> PropertySpec {
        PropertySpec {
            ty: TypeReference::new(ty),
            name: name.into(),
            visibility: Visibility::Public,
            has_getter: true,
            has_setter: true,
        }
    }

    fn draft(namespace: &str, properties: Vec<PropertySpec>) -> CompilationUnitDraft {
        CompilationUnitDraft::new(SynthesizedType {
            name: "ParameterObject".into(),
            namespace: namespace.to_string(),
            visibility: Visibility::Public,
            properties,
            constructors: vec![ConstructorSpec::public_empty()],
        })
    }

    #[test]
    fn test_render_full_unit() {
        let unit = draft(
            "MyApp",
            vec![property("int", "quantity"), property("string", "sku")],
        )
        .with_imports(vec![
            ImportSpec::namespace("System"),
            ImportSpec::namespace("System.Collections.Generic"),
        ]);

        let expected = "\
using System;
using System.Collections.Generic;

namespace MyApp
{
    public class ParameterObject
    {
        public int quantity { get; set; }
        public string sku { get; set; }

        public ParameterObject()
        {
        }
    }
}
";
        assert_eq!(render_unit(&unit), expected);
    }

    #[test]
    fn test_render_without_properties_or_imports() {
        let expected = "\
namespace MyApp
{
    public class ParameterObject
    {
        public ParameterObject()
        {
        }
    }
}
";
        assert_eq!(render_unit(&draft("MyApp", Vec::new())), expected);
    }

    #[test]
    fn test_empty_namespace_renders_top_level_class() {
        let text = render_unit(&draft("", vec![property("int", "x")]));
        assert!(text.starts_with("public class ParameterObject\n{\n"));
        assert!(!text.contains("namespace"));
    }

    #[test]
    fn test_render_is_deterministic() {
        let unit = draft("MyApp", vec![property("List<string>", "tags")]);
        assert_eq!(render_unit(&unit), render_unit(&unit));
    }

    #[test]
    fn test_render_using_forms() {
        let alias = ImportSpec {
            target: "Newtonsoft.Json".to_string(),
            alias: Some("Json".to_string()),
            is_static: false,
        };
        let stat = ImportSpec {
            target: "System.Math".to_string(),
            alias: None,
            is_static: true,
        };
        assert_eq!(render_using(&alias), "using Json = Newtonsoft.Json;");
        assert_eq!(render_using(&stat), "using static System.Math;");
    }

    #[test]
    fn test_render_signature_and_initializer() {
        let method = MethodDeclaration {
            name: "PlaceOrder".into(),
            return_type: "void".into(),
            modifiers: vec!["public".to_string(), "static".to_string()],
            parameters: vec![Parameter::new("ParameterObject", "parameterObject")].into(),
            span: None,
        };
        assert_eq!(
            render_method_signature(&method),
            "public static void PlaceOrder(ParameterObject parameterObject)"
        );

        let init = ObjectInitializer {
            type_name: "ParameterObject".into(),
            assignments: vec![
                PropertyAssignment {
                    property: "quantity".into(),
                    value: "5".to_string(),
                },
                PropertyAssignment {
                    property: "sku".into(),
                    value: "\"A-1\"".to_string(),
                },
            ],
        };
        assert_eq!(
            render_object_initializer(&init),
            "new ParameterObject { quantity = 5, sku = \"A-1\" }"
        );
    }

    #[test]
    fn test_sanitize_namespace() {
        assert_eq!(sanitize_namespace("MyApp"), "MyApp");
        assert_eq!(sanitize_namespace("My-App.Core"), "My_App.Core");
        assert_eq!(sanitize_namespace("1st.Tools"), "_1st.Tools");
        assert_eq!(sanitize_namespace("Acme..Web"), "Acme.Web");
        assert_eq!(sanitize_namespace(""), "");
    }
}

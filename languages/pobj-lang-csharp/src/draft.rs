//! Reading a generated unit back into a [`CompilationUnitDraft`]

use crate::parser::{parse_unit, ConstructorDecl, PropertyDecl, TypeKind};
use pobj_foundation::{
    CompilationUnitDraft, ConstructorSpec, ImportSpec, PropertySpec, SynthesizedType,
    TypeReference, Visibility,
};
use pobj_plugin_api::{PluginApiError, PluginResult};

/// Parse a unit holding exactly one class, optionally inside one namespace
pub fn parse_unit_draft(source: &str) -> PluginResult<CompilationUnitDraft> {
    let unit = parse_unit(source)?;
    if unit.has_errors {
        return Err(PluginApiError::parse("Generated unit contains syntax errors"));
    }

    let mut declared = unit
        .namespaces
        .iter()
        .flat_map(|ns| ns.types.iter().map(move |ty| (ns.name.as_str(), ty)));
    let (namespace, ty) = match (declared.next(), declared.next()) {
        (Some(only), None) => only,
        (None, _) => return Err(PluginApiError::parse("Unit declares no type")),
        (Some(_), Some(_)) => {
            return Err(PluginApiError::parse("Unit declares more than one type"))
        }
    };
    if ty.kind != TypeKind::Class {
        return Err(PluginApiError::parse(format!(
            "Expected a class declaration, found {:?} '{}'",
            ty.kind, ty.name
        )));
    }

    let imports = unit
        .usings
        .iter()
        .filter(|u| u.scope.is_empty() && !u.directive.is_global)
        .map(|u| ImportSpec {
            target: u.directive.target.clone(),
            alias: u.directive.alias.clone(),
            is_static: u.directive.is_static,
        })
        .collect();

    let declaration = SynthesizedType {
        name: ty.name.as_str().into(),
        namespace: namespace.to_string(),
        visibility: visibility(&ty.modifiers, Visibility::Internal),
        properties: ty.properties.iter().map(property_spec).collect(),
        constructors: ty.constructors.iter().map(constructor_spec).collect(),
    };

    Ok(CompilationUnitDraft::new(declaration).with_imports(imports))
}

fn property_spec(property: &PropertyDecl) -> PropertySpec {
    PropertySpec {
        ty: TypeReference::new(property.ty.as_str()),
        name: property.name.as_str().into(),
        visibility: visibility(&property.modifiers, Visibility::Private),
        has_getter: property.has_getter,
        has_setter: property.has_setter,
    }
}

fn constructor_spec(ctor: &ConstructorDecl) -> ConstructorSpec {
    ConstructorSpec {
        visibility: visibility(&ctor.modifiers, Visibility::Private),
        parameters: ctor
            .parameters
            .iter()
            .cloned()
            .map(|mut p| {
                p.span = None;
                p
            })
            .collect(),
        body_is_empty: ctor.body_is_empty,
    }
}

fn visibility(modifiers: &[String], default: Visibility) -> Visibility {
    modifiers
        .iter()
        .find_map(|m| Visibility::from_keyword(m))
        .unwrap_or(default)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::printer::render_unit;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_generated_unit_reads_back() {
        let draft = CompilationUnitDraft::new(SynthesizedType {
            name: "ParameterObject".into(),
            namespace: "MyApp".to_string(),
            visibility: Visibility::Public,
            properties: vec![PropertySpec {
                ty: TypeReference::new("Dictionary<string, int>"),
                name: "counts".into(),
                visibility: Visibility::Public,
                has_getter: true,
                has_setter: true,
            }],
            constructors: vec![ConstructorSpec::public_empty()],
        })
        .with_imports(vec![ImportSpec::namespace("System.Collections.Generic")]);

        let parsed = parse_unit_draft(&render_unit(&draft)).unwrap();
        assert_eq!(parsed, draft);
    }

    #[test]
    fn test_rejects_two_types() {
        let err = parse_unit_draft("namespace A { class B {} class C {} }").unwrap_err();
        assert!(matches!(err, PluginApiError::Parse { .. }));
    }

    #[test]
    fn test_rejects_non_class() {
        assert!(parse_unit_draft("namespace A { interface IB {} }").is_err());
    }

    #[test]
    fn test_rejects_broken_text() {
        assert!(parse_unit_draft("namespace A { public class {").is_err());
    }

    #[test]
    fn test_member_visibility_defaults_to_private() {
        let draft = parse_unit_draft("class A { int X { get; set; } A() { } }").unwrap();
        assert_eq!(draft.declaration.visibility, Visibility::Internal);
        assert_eq!(draft.declaration.properties[0].visibility, Visibility::Private);
        assert!(!draft.declaration.has_default_constructor());
        assert_eq!(draft.namespace(), "");
    }
}

//! Signature and call-site rewrite stage
//!
//! Runs after extraction, on the model only: given the synthesized type it
//! computes the method's new signature and turns a call's flat argument
//! list into an object initializer. Applying the results to documents is
//! left to the host; the extraction pipeline does not call this stage.

use pobj_foundation::{
    Identifier, MethodDeclaration, ObjectInitializer, Parameter, ParameterSpec,
    PropertyAssignment, RefactorError, RefactorResult, SynthesizedType, TypeReference,
};
use serde::Serialize;

/// A method before and after replacing its parameters with the parameter object
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SignatureRewrite {
    pub original: MethodDeclaration,
    pub rewritten: MethodDeclaration,
}

/// Replace the method's parameter list with one parameter of the synthesized type
///
/// The synthesized type must have been produced from this method's
/// parameters: same count, same names, same order.
pub fn rewrite_signature(
    method: &MethodDeclaration,
    synthesized: &SynthesizedType,
    parameter_name: &str,
) -> RefactorResult<SignatureRewrite> {
    let matches = method.parameters.len() == synthesized.properties.len()
        && method
            .parameters
            .iter()
            .zip(&synthesized.properties)
            .all(|(param, prop)| param.name == prop.name && param.ty == prop.ty);
    if !matches {
        return Err(RefactorError::invalid_input(format!(
            "Type '{}' was not synthesized from the parameters of '{}'",
            synthesized.name, method.name
        )));
    }

    let parameter = Parameter::new(
        TypeReference::new(synthesized.name.as_str()),
        Identifier::new(parameter_name),
    );
    let rewritten = MethodDeclaration {
        parameters: ParameterSpec::new(vec![parameter]),
        span: None,
        ..method.clone()
    };

    Ok(SignatureRewrite {
        original: method.clone(),
        rewritten,
    })
}

/// Bind a call's positional arguments to the synthesized type's properties
pub fn object_initializer(
    synthesized: &SynthesizedType,
    arguments: &[String],
) -> RefactorResult<ObjectInitializer> {
    if arguments.len() != synthesized.properties.len() {
        return Err(RefactorError::invalid_input(format!(
            "'{}' has {} properties but the call passes {} arguments",
            synthesized.name,
            synthesized.properties.len(),
            arguments.len()
        )));
    }

    Ok(ObjectInitializer {
        type_name: synthesized.name.clone(),
        assignments: synthesized
            .properties
            .iter()
            .zip(arguments)
            .map(|(property, value)| PropertyAssignment {
                property: property.name.clone(),
                value: value.clone(),
            })
            .collect(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::synthesizer::synthesize;
    use pretty_assertions::assert_eq;

    fn method() -> MethodDeclaration {
        MethodDeclaration {
            name: "Foo".into(),
            return_type: "void".into(),
            modifiers: vec!["public".to_string()],
            parameters: ParameterSpec::new(vec![
                Parameter::new("int", "x"),
                Parameter::new("string", "y"),
            ]),
            span: None,
        }
    }

    #[test]
    fn test_signature_gets_single_parameter() {
        let method = method();
        let ty = synthesize(&method.parameters, "ParameterObject", "MyApp");
        let rewrite = rewrite_signature(&method, &ty, "parameterObject").unwrap();

        assert_eq!(rewrite.original, method);
        assert_eq!(rewrite.rewritten.parameters.len(), 1);
        let param = rewrite.rewritten.parameters.get(0).unwrap();
        assert_eq!(param.ty.as_str(), "ParameterObject");
        assert_eq!(param.name.as_str(), "parameterObject");
        assert_eq!(rewrite.rewritten.modifiers, method.modifiers);
    }

    #[test]
    fn test_signature_rejects_foreign_type() {
        let method = method();
        let other = synthesize(&ParameterSpec::default(), "ParameterObject", "MyApp");
        assert!(rewrite_signature(&method, &other, "p").is_err());
    }

    #[test]
    fn test_initializer_binds_in_order() {
        let ty = synthesize(&method().parameters, "ParameterObject", "MyApp");
        let init = object_initializer(&ty, &["1".to_string(), "\"a\"".to_string()]).unwrap();
        let pairs: Vec<(&str, &str)> = init
            .assignments
            .iter()
            .map(|a| (a.property.as_str(), a.value.as_str()))
            .collect();
        assert_eq!(pairs, vec![("x", "1"), ("y", "\"a\"")]);
    }

    #[test]
    fn test_initializer_rejects_count_mismatch() {
        let ty = synthesize(&method().parameters, "ParameterObject", "MyApp");
        let err = object_initializer(&ty, &["1".to_string()]).unwrap_err();
        assert!(matches!(err, RefactorError::InvalidInput { .. }));
    }
}

//! Parameter list → parameter-object type

use pobj_foundation::{
    ConstructorSpec, ParameterSpec, PropertySpec, SynthesizedType, Visibility,
};
use tracing::debug;

/// Build the parameter-object type for a parameter list
///
/// One public get/set property per parameter, with the parameter's type and
/// identifier copied verbatim and in the same order, plus a single public
/// parameterless constructor with an empty body. Callers populate the object
/// through its properties.
///
/// Names are not checked against reserved words and repeated parameter names
/// are not deduplicated.
pub fn synthesize(
    parameters: &ParameterSpec,
    class_name: &str,
    namespace: &str,
) -> SynthesizedType {
    let properties = parameters
        .iter()
        .map(|parameter| PropertySpec {
            ty: parameter.ty.clone(),
            name: parameter.name.clone(),
            visibility: Visibility::Public,
            has_getter: true,
            has_setter: true,
        })
        .collect::<Vec<_>>();

    debug!(
        class_name = %class_name,
        namespace = %namespace,
        properties = properties.len(),
        "Synthesized parameter object"
    );

    SynthesizedType {
        name: class_name.into(),
        namespace: namespace.to_string(),
        visibility: Visibility::Public,
        properties,
        constructors: vec![ConstructorSpec::public_empty()],
    }
}

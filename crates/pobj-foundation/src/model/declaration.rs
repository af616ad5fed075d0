//! Declarations: parameters, methods and synthesized parameter-object types

use crate::text::TextSpan;
use serde::{Deserialize, Serialize};

/// Verbatim text of a declared type, e.g. `int`, `List<string>`, `int[]?`
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TypeReference(String);

impl TypeReference {
    pub fn new(text: impl Into<String>) -> Self {
        Self(text.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for TypeReference {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for TypeReference {
    fn from(text: &str) -> Self {
        Self::new(text)
    }
}

/// Verbatim identifier text, including any escape prefix such as `@`
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Identifier(String);

impl Identifier {
    pub fn new(text: impl Into<String>) -> Self {
        Self(text.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for Identifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Identifier {
    fn from(text: &str) -> Self {
        Self::new(text)
    }
}

/// One entry of a method's parameter list
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Parameter {
    pub ty: TypeReference,
    pub name: Identifier,
    /// Location in the originating document, when parsed from source
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub span: Option<TextSpan>,
}

impl Parameter {
    pub fn new(ty: impl Into<TypeReference>, name: impl Into<Identifier>) -> Self {
        Self {
            ty: ty.into(),
            name: name.into(),
            span: None,
        }
    }

    pub fn with_span(mut self, span: TextSpan) -> Self {
        self.span = Some(span);
        self
    }
}

/// Ordered, immutable parameter list captured from a method declaration
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ParameterSpec {
    parameters: Vec<Parameter>,
}

impl ParameterSpec {
    pub fn new(parameters: Vec<Parameter>) -> Self {
        Self { parameters }
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Parameter> {
        self.parameters.iter()
    }

    pub fn len(&self) -> usize {
        self.parameters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.parameters.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Parameter> {
        self.parameters.get(index)
    }

    pub fn as_slice(&self) -> &[Parameter] {
        &self.parameters
    }
}

impl From<Vec<Parameter>> for ParameterSpec {
    fn from(parameters: Vec<Parameter>) -> Self {
        Self::new(parameters)
    }
}

impl<'a> IntoIterator for &'a ParameterSpec {
    type Item = &'a Parameter;
    type IntoIter = std::slice::Iter<'a, Parameter>;

    fn into_iter(self) -> Self::IntoIter {
        self.parameters.iter()
    }
}

/// A method declaration as handed over by the host
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MethodDeclaration {
    pub name: Identifier,
    pub return_type: TypeReference,
    /// Modifier keywords in source order (`public`, `static`, ...)
    pub modifiers: Vec<String>,
    pub parameters: ParameterSpec,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub span: Option<TextSpan>,
}

/// The syntax node found at the user's selection
///
/// Only method declarations can be turned into a parameter object; anything
/// else makes the refactoring decline silently.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SelectedNode {
    Method(MethodDeclaration),
    Other { kind: String },
}

impl SelectedNode {
    pub fn as_method(&self) -> Option<&MethodDeclaration> {
        match self {
            Self::Method(method) => Some(method),
            Self::Other { .. } => None,
        }
    }
}

/// Accessibility of a generated member
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Visibility {
    Public,
    Internal,
    Protected,
    Private,
}

impl Visibility {
    pub fn keyword(&self) -> &'static str {
        match self {
            Self::Public => "public",
            Self::Internal => "internal",
            Self::Protected => "protected",
            Self::Private => "private",
        }
    }

    pub fn from_keyword(keyword: &str) -> Option<Self> {
        match keyword {
            "public" => Some(Self::Public),
            "internal" => Some(Self::Internal),
            "protected" => Some(Self::Protected),
            "private" => Some(Self::Private),
            _ => None,
        }
    }
}

/// A get/set property of the synthesized type
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PropertySpec {
    pub ty: TypeReference,
    pub name: Identifier,
    pub visibility: Visibility,
    pub has_getter: bool,
    pub has_setter: bool,
}

/// A constructor of the synthesized type
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConstructorSpec {
    pub visibility: Visibility,
    pub parameters: Vec<Parameter>,
    pub body_is_empty: bool,
}

impl ConstructorSpec {
    /// `public T() { }`
    pub fn public_empty() -> Self {
        Self {
            visibility: Visibility::Public,
            parameters: Vec::new(),
            body_is_empty: true,
        }
    }

    pub fn is_public_empty(&self) -> bool {
        self.visibility == Visibility::Public && self.parameters.is_empty() && self.body_is_empty
    }
}

/// The parameter-object type produced from a parameter list
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SynthesizedType {
    pub name: Identifier,
    pub namespace: String,
    pub visibility: Visibility,
    /// One per parameter, in parameter order
    pub properties: Vec<PropertySpec>,
    pub constructors: Vec<ConstructorSpec>,
}

impl SynthesizedType {
    /// Exactly one constructor, public, no parameters, empty body
    pub fn has_default_constructor(&self) -> bool {
        matches!(self.constructors.as_slice(), [ctor] if ctor.is_public_empty())
    }

    pub fn property(&self, name: &str) -> Option<&PropertySpec> {
        self.properties.iter().find(|p| p.name.as_str() == name)
    }
}

/// An import directive to emit at the top of a generated unit
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ImportSpec {
    /// Imported namespace or type, e.g. `System.Collections.Generic`
    pub target: String,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub alias: Option<String>,
    #[serde(default)]
    pub is_static: bool,
}

impl ImportSpec {
    pub fn namespace(target: impl Into<String>) -> Self {
        Self {
            target: target.into(),
            alias: None,
            is_static: false,
        }
    }
}

/// A brand-new compilation unit: imports plus one namespaced declaration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompilationUnitDraft {
    pub imports: Vec<ImportSpec>,
    pub declaration: SynthesizedType,
}

impl CompilationUnitDraft {
    pub fn new(declaration: SynthesizedType) -> Self {
        Self {
            imports: Vec::new(),
            declaration,
        }
    }

    pub fn with_imports(mut self, imports: Vec<ImportSpec>) -> Self {
        self.imports = imports;
        self
    }

    pub fn namespace(&self) -> &str {
        &self.declaration.namespace
    }
}

/// `property = value` inside an object initializer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PropertyAssignment {
    pub property: Identifier,
    /// Argument expression, verbatim
    pub value: String,
}

/// Construction of a parameter object from a flat argument list
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ObjectInitializer {
    pub type_name: Identifier,
    pub assignments: Vec<PropertyAssignment>,
}

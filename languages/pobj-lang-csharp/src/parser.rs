//! C# source parsing into the declaration model
//!
//! tree-sitter does the heavy lifting; this module walks the concrete tree
//! once and keeps only what extraction needs: using directives, namespaces,
//! type declarations with their properties, constructors and methods.

use pobj_foundation::{
    Identifier, MethodDeclaration, Parameter, ParameterSpec, SelectedNode, TextSpan,
    TypeReference,
};
use pobj_plugin_api::{ImportDirective, PluginApiError, PluginResult};
use tree_sitter::{Node, Parser, Tree};

/// Get the C# language for tree-sitter
pub(crate) fn get_language() -> tree_sitter::Language {
    tree_sitter_c_sharp::LANGUAGE.into()
}

pub(crate) fn parse_tree(source: &str) -> PluginResult<Tree> {
    let mut parser = Parser::new();
    parser
        .set_language(&get_language())
        .map_err(|e| PluginApiError::parse(format!("Failed to load C# grammar: {}", e)))?;
    parser
        .parse(source, None)
        .ok_or_else(|| PluginApiError::parse("Failed to parse C# source"))
}

const TYPE_DECLARATION_KINDS: [&str; 6] = [
    "class_declaration",
    "struct_declaration",
    "record_declaration",
    "record_struct_declaration",
    "interface_declaration",
    "enum_declaration",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TypeKind {
    Class,
    Struct,
    Record,
    Interface,
    Enum,
}

impl TypeKind {
    fn from_node_kind(kind: &str) -> Option<Self> {
        match kind {
            "class_declaration" => Some(Self::Class),
            "struct_declaration" => Some(Self::Struct),
            "record_declaration" | "record_struct_declaration" => Some(Self::Record),
            "interface_declaration" => Some(Self::Interface),
            "enum_declaration" => Some(Self::Enum),
            _ => None,
        }
    }
}

/// A parsed C# compilation unit
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CsharpUnit {
    /// Every using directive in the unit, in source order
    pub usings: Vec<UsingDirective>,
    /// Namespaces with their types; blocks with the same name are merged and
    /// types outside any namespace live under the empty name
    pub namespaces: Vec<NamespaceDecl>,
    /// tree-sitter had to recover from syntax errors somewhere
    pub has_errors: bool,
}

/// A using directive plus the namespace it is declared in
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UsingDirective {
    pub directive: ImportDirective,
    /// Enclosing namespace, empty at the top of the file
    pub scope: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NamespaceDecl {
    pub name: String,
    pub types: Vec<TypeDecl>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeDecl {
    pub kind: TypeKind,
    pub name: String,
    pub modifiers: Vec<String>,
    pub properties: Vec<PropertyDecl>,
    pub constructors: Vec<ConstructorDecl>,
    pub methods: Vec<MethodDeclaration>,
    pub nested: Vec<TypeDecl>,
    pub span: TextSpan,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PropertyDecl {
    pub ty: String,
    pub name: String,
    pub modifiers: Vec<String>,
    pub has_getter: bool,
    pub has_setter: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConstructorDecl {
    pub name: String,
    pub modifiers: Vec<String>,
    pub parameters: Vec<Parameter>,
    pub body_is_empty: bool,
}

impl CsharpUnit {
    /// All methods of all types (nested ones included), in source order
    pub fn methods(&self) -> Vec<&MethodDeclaration> {
        fn collect<'a>(ty: &'a TypeDecl, out: &mut Vec<&'a MethodDeclaration>) {
            out.extend(ty.methods.iter());
            for nested in &ty.nested {
                collect(nested, out);
            }
        }
        let mut out = Vec::new();
        for ty in self.namespaces.iter().flat_map(|ns| &ns.types) {
            collect(ty, &mut out);
        }
        out
    }

    /// First method with the given name
    pub fn find_method(&self, name: &str) -> Option<&MethodDeclaration> {
        self.methods().into_iter().find(|m| m.name.as_str() == name)
    }

    pub fn namespace(&self, name: &str) -> Option<&NamespaceDecl> {
        self.namespaces.iter().find(|ns| ns.name == name)
    }

    pub fn imports(&self) -> impl Iterator<Item = &ImportDirective> {
        self.usings.iter().map(|u| &u.directive)
    }
}

/// Parse C# source into a [`CsharpUnit`]
pub fn parse_unit(source: &str) -> PluginResult<CsharpUnit> {
    let tree = parse_tree(source)?;
    let root = tree.root_node();

    let mut walker = UnitWalker {
        source,
        usings: Vec::new(),
        namespaces: Vec::new(),
    };
    walker.visit_container(root, "");

    Ok(CsharpUnit {
        usings: walker.usings,
        namespaces: walker.namespaces,
        has_errors: root.has_error(),
    })
}

/// Resolve the node under a byte offset, the way an editor selection would
///
/// Leaf tokens (identifiers, keywords) stand for their parent, so a caret on
/// a method's name selects the method declaration itself. Anything else is
/// reported as [`SelectedNode::Other`].
pub fn node_at(source: &str, offset: usize) -> PluginResult<SelectedNode> {
    if offset > source.len() {
        return Err(PluginApiError::invalid_input(format!(
            "Offset {} is past the end of the source ({} bytes)",
            offset,
            source.len()
        )));
    }
    let tree = parse_tree(source)?;
    let root = tree.root_node();

    let mut node = root
        .descendant_for_byte_range(offset, offset)
        .unwrap_or(root);
    if node.child_count() == 0 {
        if let Some(parent) = node.parent() {
            node = parent;
        }
    }

    if node.kind() == "method_declaration" {
        Ok(SelectedNode::Method(parse_method(node, source)))
    } else {
        Ok(SelectedNode::Other {
            kind: node.kind().to_string(),
        })
    }
}

/// Innermost method declaration enclosing a byte offset
pub fn method_at(source: &str, offset: usize) -> PluginResult<Option<MethodDeclaration>> {
    if offset > source.len() {
        return Err(PluginApiError::invalid_input(format!(
            "Offset {} is past the end of the source ({} bytes)",
            offset,
            source.len()
        )));
    }
    let tree = parse_tree(source)?;
    let mut current = tree.root_node().descendant_for_byte_range(offset, offset);
    while let Some(node) = current {
        if node.kind() == "method_declaration" {
            return Ok(Some(parse_method(node, source)));
        }
        current = node.parent();
    }
    Ok(None)
}

/// Find the first method named `name`
pub fn find_method(source: &str, name: &str) -> PluginResult<Option<MethodDeclaration>> {
    Ok(parse_unit(source)?.find_method(name).cloned())
}

/// Only the using directives of a unit, in source order
pub fn parse_using_directives(source: &str) -> PluginResult<Vec<UsingDirective>> {
    let tree = parse_tree(source)?;
    let mut usings = Vec::new();
    collect_usings(tree.root_node(), source, "", &mut usings);
    Ok(usings)
}

// ============================================================================
// Tree walking
// ============================================================================

struct UnitWalker<'s> {
    source: &'s str,
    usings: Vec<UsingDirective>,
    namespaces: Vec<NamespaceDecl>,
}

impl<'s> UnitWalker<'s> {
    /// Visit a compilation unit, declaration list or file-scoped namespace
    fn visit_container(&mut self, container: Node, namespace: &str) {
        // A file-scoped namespace applies to every sibling that follows it
        let mut current = namespace.to_string();
        let mut cursor = container.walk();
        let children: Vec<Node> = container.named_children(&mut cursor).collect();

        for child in children {
            match child.kind() {
                "using_directive" => {
                    self.usings
                        .push(parse_using(child, self.source, &current));
                }
                "namespace_declaration" => {
                    let name = qualify(&current, &namespace_name(child, self.source));
                    self.namespace_entry(&name);
                    if let Some(body) = field_or_kind(child, "body", "declaration_list") {
                        self.visit_container(body, &name);
                    }
                }
                "file_scoped_namespace_declaration" => {
                    current = qualify(namespace, &namespace_name(child, self.source));
                    self.namespace_entry(&current);
                    self.visit_container(child, &current);
                }
                kind if TYPE_DECLARATION_KINDS.contains(&kind) => {
                    if let Some(ty) = parse_type(child, self.source) {
                        self.namespace_entry(&current).types.push(ty);
                    }
                }
                _ => {}
            }
        }
    }

    fn namespace_entry(&mut self, name: &str) -> &mut NamespaceDecl {
        let index = match self.namespaces.iter().position(|ns| ns.name == name) {
            Some(index) => index,
            None => {
                self.namespaces.push(NamespaceDecl {
                    name: name.to_string(),
                    types: Vec::new(),
                });
                self.namespaces.len() - 1
            }
        };
        &mut self.namespaces[index]
    }
}

fn collect_usings(node: Node, source: &str, scope: &str, out: &mut Vec<UsingDirective>) {
    let mut cursor = node.walk();
    let children: Vec<Node> = node.named_children(&mut cursor).collect();
    let mut current = scope.to_string();
    for child in children {
        match child.kind() {
            "using_directive" => out.push(parse_using(child, source, &current)),
            "namespace_declaration" => {
                let name = qualify(&current, &namespace_name(child, source));
                if let Some(body) = field_or_kind(child, "body", "declaration_list") {
                    collect_usings(body, source, &name, out);
                }
            }
            "file_scoped_namespace_declaration" => {
                current = qualify(scope, &namespace_name(child, source));
                collect_usings(child, source, &current, out);
            }
            _ => {}
        }
    }
}

fn parse_using(node: Node, source: &str, scope: &str) -> UsingDirective {
    let mut body = node_text(node, source).trim();
    body = body.strip_suffix(';').unwrap_or(body).trim();

    let mut is_global = false;
    if let Some(rest) = strip_keyword(body, "global") {
        is_global = true;
        body = rest;
    }
    body = strip_keyword(body, "using").unwrap_or(body);

    let mut is_static = false;
    if let Some(rest) = strip_keyword(body, "static") {
        is_static = true;
        body = rest;
    }
    body = strip_keyword(body, "unsafe").unwrap_or(body);

    let (alias, target) = match body.split_once('=') {
        Some((alias, target)) => (Some(alias.trim().to_string()), target),
        None => (None, body),
    };

    UsingDirective {
        directive: ImportDirective {
            span: node_span(node),
            target: strip_whitespace(target),
            alias,
            is_static,
            is_global,
            scope: (!scope.is_empty()).then(|| scope.to_string()),
        },
        scope: scope.to_string(),
    }
}

fn parse_type(node: Node, source: &str) -> Option<TypeDecl> {
    let kind = TypeKind::from_node_kind(node.kind())?;
    let name = node
        .child_by_field_name("name")
        .map(|n| node_text(n, source).to_string())?;

    let mut ty = TypeDecl {
        kind,
        name,
        modifiers: modifiers(node, source),
        properties: Vec::new(),
        constructors: Vec::new(),
        methods: Vec::new(),
        nested: Vec::new(),
        span: node_span(node),
    };

    let body = match field_or_kind(node, "body", "declaration_list") {
        Some(body) => body,
        None => return Some(ty),
    };

    let mut cursor = body.walk();
    for member in body.named_children(&mut cursor) {
        match member.kind() {
            "property_declaration" => {
                if let Some(property) = parse_property(member, source) {
                    ty.properties.push(property);
                }
            }
            "constructor_declaration" => ty.constructors.push(parse_constructor(member, source)),
            "method_declaration" => ty.methods.push(parse_method(member, source)),
            kind if TYPE_DECLARATION_KINDS.contains(&kind) => {
                if let Some(nested) = parse_type(member, source) {
                    ty.nested.push(nested);
                }
            }
            _ => {}
        }
    }

    Some(ty)
}

fn parse_property(node: Node, source: &str) -> Option<PropertyDecl> {
    let ty = node.child_by_field_name("type")?;
    let name = node.child_by_field_name("name")?;

    let (has_getter, has_setter) = match field_or_kind(node, "accessors", "accessor_list") {
        Some(accessors) => {
            let mut getter = false;
            let mut setter = false;
            let mut cursor = accessors.walk();
            for accessor in accessors.named_children(&mut cursor) {
                if accessor.kind() != "accessor_declaration" {
                    continue;
                }
                let mut inner = accessor.walk();
                for token in accessor.children(&mut inner) {
                    match token.kind() {
                        "get" => getter = true,
                        "set" | "init" => setter = true,
                        _ => {}
                    }
                }
            }
            (getter, setter)
        }
        // Expression-bodied property: `public int X => 1;`
        None => (true, false),
    };

    Some(PropertyDecl {
        ty: node_text(ty, source).to_string(),
        name: node_text(name, source).to_string(),
        modifiers: modifiers(node, source),
        has_getter,
        has_setter,
    })
}

fn parse_constructor(node: Node, source: &str) -> ConstructorDecl {
    let body_is_empty = match node.child_by_field_name("body") {
        Some(body) if body.kind() == "block" => {
            let mut cursor = body.walk();
            let empty = body
                .named_children(&mut cursor)
                .all(|child| child.kind() == "comment");
            empty
        }
        Some(_) => false,
        // `extern` constructors have no body at all
        None => true,
    };

    ConstructorDecl {
        name: node
            .child_by_field_name("name")
            .map(|n| node_text(n, source).to_string())
            .unwrap_or_default(),
        modifiers: modifiers(node, source),
        parameters: parameters(node, source),
        body_is_empty,
    }
}

pub(crate) fn parse_method(node: Node, source: &str) -> MethodDeclaration {
    let return_type = node
        .child_by_field_name("returns")
        .or_else(|| node.child_by_field_name("type"))
        .map(|n| node_text(n, source))
        .unwrap_or("void");

    MethodDeclaration {
        name: Identifier::new(
            node.child_by_field_name("name")
                .map(|n| node_text(n, source))
                .unwrap_or_default(),
        ),
        return_type: TypeReference::new(return_type),
        modifiers: modifiers(node, source),
        parameters: ParameterSpec::new(parameters(node, source)),
        span: Some(node_span(node)),
    }
}

fn parameters(owner: Node, source: &str) -> Vec<Parameter> {
    let list = match field_or_kind(owner, "parameters", "parameter_list") {
        Some(list) => list,
        None => return Vec::new(),
    };

    let mut cursor = list.walk();
    let nodes: Vec<Node> = list
        .named_children(&mut cursor)
        .filter(|n| n.kind() == "parameter")
        .collect();
    nodes
        .into_iter()
        .filter_map(|node| parse_parameter(node, source))
        .collect()
}

fn parse_parameter(node: Node, source: &str) -> Option<Parameter> {
    let name = node.child_by_field_name("name").or_else(|| {
        let mut cursor = node.walk();
        let last = node
            .named_children(&mut cursor)
            .filter(|n| n.kind() == "identifier")
            .last();
        last
    })?;

    let ty = match node.child_by_field_name("type") {
        Some(ty) => node_text(ty, source).to_string(),
        None => {
            // Everything between the leading attributes/modifiers and the name
            let mut cursor = node.walk();
            let start = node
                .children(&mut cursor)
                .find(|n| {
                    !matches!(n.kind(), "attribute_list" | "modifier")
                        && n.start_byte() < name.start_byte()
                })
                .map(|n| n.start_byte())
                .unwrap_or(name.start_byte());
            source
                .get(start..name.start_byte())
                .unwrap_or_default()
                .trim()
                .to_string()
        }
    };

    Some(
        Parameter::new(ty.as_str(), node_text(name, source))
            .with_span(node_span(node)),
    )
}

// ============================================================================
// Helpers
// ============================================================================

fn field_or_kind<'t>(node: Node<'t>, field: &str, kind: &str) -> Option<Node<'t>> {
    node.child_by_field_name(field).or_else(|| {
        let mut cursor = node.walk();
        let found = node.named_children(&mut cursor).find(|n| n.kind() == kind);
        found
    })
}

fn modifiers(node: Node, source: &str) -> Vec<String> {
    let mut cursor = node.walk();
    let found = node
        .named_children(&mut cursor)
        .filter(|n| n.kind() == "modifier")
        .map(|n| node_text(n, source).to_string())
        .collect();
    found
}

fn namespace_name(node: Node, source: &str) -> String {
    node.child_by_field_name("name")
        .map(|n| strip_whitespace(node_text(n, source)))
        .unwrap_or_default()
}

fn qualify(outer: &str, inner: &str) -> String {
    match (outer.is_empty(), inner.is_empty()) {
        (true, _) => inner.to_string(),
        (false, true) => outer.to_string(),
        (false, false) => format!("{}.{}", outer, inner),
    }
}

/// `keyword` followed by whitespace at the start of `text`
fn strip_keyword<'a>(text: &'a str, keyword: &str) -> Option<&'a str> {
    let rest = text.strip_prefix(keyword)?;
    if rest.starts_with(char::is_whitespace) {
        Some(rest.trim_start())
    } else {
        None
    }
}

fn strip_whitespace(text: &str) -> String {
    text.split_whitespace().collect()
}

pub(crate) fn node_text<'s>(node: Node, source: &'s str) -> &'s str {
    source.get(node.start_byte()..node.end_byte()).unwrap_or_default()
}

pub(crate) fn node_span(node: Node) -> TextSpan {
    TextSpan::new(node.start_byte(), node.end_byte())
}

//! Lightweight import analysis for C# projects
//!
//! Reports the two diagnostics the pruner cares about:
//!
//! - `CS0105`: a using directive repeats an earlier one in the same scope
//! - `CS8019`: a using directive is not needed by anything in the unit
//!
//! This is not a compiler. Name binding is approximated from identifiers
//! and from the types each namespace is known to contain (the project's own
//! declarations plus a table of common base-library namespaces). The table
//! is incomplete, so two rules keep the analysis on the safe side:
//!
//! - a directive whose namespace is unknown is always assumed to be needed
//! - if any name in a type position cannot be bound, no namespace import of
//!   the unit is reported unused
//!
//! The analysis can miss unused imports but never reports a needed one.

use crate::parser::{node_text, parse_tree, parse_unit, CsharpUnit, UsingDirective};
use async_trait::async_trait;
use once_cell::sync::Lazy;
use pobj_foundation::{
    CancellationToken, Diagnostic, DiagnosticSeverity, DocumentId, Project, Solution,
};
use pobj_plugin_api::{PluginApiError, PluginResult, SemanticAnalyzer};
use std::collections::{HashMap, HashSet};
use tracing::{debug, warn};
use tree_sitter::Node;

pub const UNUSED_USING: &str = "CS8019";
pub const DUPLICATE_USING: &str = "CS0105";

/// Names bound in type positions without any import
const CONTEXTUAL_TYPE_NAMES: [&str; 4] = ["var", "dynamic", "nint", "nuint"];

/// Types (and extension methods) of frequently imported library namespaces
static KNOWN_NAMESPACES: Lazy<HashMap<&'static str, HashSet<&'static str>>> = Lazy::new(|| {
    let table: &[(&str, &[&str])] = &[
        (
            "System",
            &[
                "Action", "Activator", "ArgumentException", "ArgumentNullException",
                "ArgumentOutOfRangeException", "Array", "Attribute", "Boolean", "Byte", "Char",
                "Console", "Convert", "DateOnly", "DateTime", "DateTimeOffset", "Decimal",
                "Delegate", "Double", "Enum", "Environment", "EventArgs", "EventHandler",
                "Exception", "FlagsAttribute", "Func", "GC", "Guid", "IComparable",
                "IDisposable", "IEquatable", "IFormattable", "Int16", "Int32", "Int64",
                "IntPtr", "InvalidCastException", "InvalidOperationException", "Lazy", "Math",
                "NotImplementedException", "NotSupportedException", "Nullable",
                "NullReferenceException", "Object", "ObsoleteAttribute",
                "OperationCanceledException", "Predicate", "Random", "ReadOnlyMemory",
                "ReadOnlySpan", "SerializableAttribute", "Single", "Span", "String",
                "StringComparison", "TimeOnly", "TimeSpan", "TimeoutException", "Tuple",
                "Type", "UInt32", "UInt64", "Uri", "ValueTuple", "Version",
            ],
        ),
        (
            "System.Collections",
            &[
                "ArrayList", "Hashtable", "ICollection", "IComparer", "IDictionary",
                "IEnumerable", "IEnumerator", "IList", "Queue", "Stack",
            ],
        ),
        (
            "System.Collections.Generic",
            &[
                "Comparer", "Dictionary", "EqualityComparer", "HashSet", "ICollection",
                "IComparer", "IDictionary", "IEnumerable", "IEnumerator", "IEqualityComparer",
                "IList", "IReadOnlyCollection", "IReadOnlyDictionary", "IReadOnlyList",
                "ISet", "KeyNotFoundException", "KeyValuePair", "LinkedList", "List",
                "PriorityQueue", "Queue", "SortedDictionary", "SortedList", "SortedSet",
                "Stack",
            ],
        ),
        (
            "System.Linq",
            &[
                "Enumerable", "IGrouping", "ILookup", "IOrderedEnumerable", "IQueryable",
                "Queryable", "Aggregate", "All", "Any", "Average", "Cast", "Concat",
                "Contains", "Count", "DefaultIfEmpty", "Distinct", "ElementAt", "Except",
                "First", "FirstOrDefault", "GroupBy", "Intersect", "Join", "Last",
                "LastOrDefault", "Max", "Min", "OfType", "OrderBy", "OrderByDescending",
                "Reverse", "Select", "SelectMany", "SequenceEqual", "Single",
                "SingleOrDefault", "Skip", "Sum", "Take", "ThenBy", "ThenByDescending",
                "ToArray", "ToDictionary", "ToHashSet", "ToList", "ToLookup", "Union",
                "Where", "Zip",
            ],
        ),
        (
            "System.Text",
            &["Encoding", "StringBuilder", "UTF8Encoding", "UnicodeEncoding"],
        ),
        (
            "System.Text.RegularExpressions",
            &["Capture", "Group", "Match", "MatchCollection", "Regex", "RegexOptions"],
        ),
        (
            "System.Threading",
            &[
                "CancellationToken", "CancellationTokenSource", "Interlocked", "Monitor",
                "Mutex", "SemaphoreSlim", "Thread", "ThreadLocal", "Timer", "Volatile",
            ],
        ),
        (
            "System.Threading.Tasks",
            &["Parallel", "Task", "TaskCompletionSource", "TaskScheduler", "ValueTask"],
        ),
        (
            "System.IO",
            &[
                "BinaryReader", "BinaryWriter", "Directory", "DirectoryInfo", "File",
                "FileInfo", "FileMode", "FileStream", "IOException", "MemoryStream", "Path",
                "Stream", "StreamReader", "StreamWriter", "StringReader", "StringWriter",
                "TextReader", "TextWriter",
            ],
        ),
        (
            "System.Diagnostics",
            &[
                "ConditionalAttribute", "Debug", "DebuggerDisplayAttribute",
                "DebuggerStepThroughAttribute", "Process", "Stopwatch", "Trace",
            ],
        ),
        ("System.Globalization", &["CultureInfo", "NumberStyles"]),
        (
            "System.ComponentModel",
            &[
                "DescriptionAttribute", "DisplayNameAttribute", "INotifyPropertyChanged",
                "PropertyChangedEventArgs", "PropertyChangedEventHandler",
            ],
        ),
    ];

    table
        .iter()
        .map(|(ns, types)| (*ns, types.iter().copied().collect()))
        .collect()
});

/// [`SemanticAnalyzer`] backed by tree-sitter and a namespace table
#[derive(Debug, Default, Clone)]
pub struct CsharpImportAnalyzer;

impl CsharpImportAnalyzer {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl SemanticAnalyzer for CsharpImportAnalyzer {
    async fn diagnostics(
        &self,
        solution: &Solution,
        document: DocumentId,
        cancel: &CancellationToken,
    ) -> PluginResult<Vec<Diagnostic>> {
        let doc = solution.document(document).ok_or_else(|| {
            PluginApiError::invalid_input(format!("Document {} is not in the solution", document))
        })?;
        let project = solution.project(doc.project_id).ok_or_else(|| {
            PluginApiError::invalid_input(format!("Project {} is not in the solution", doc.project_id))
        })?;

        let namespaces = project_namespaces(project, cancel).await?;

        if cancel.is_cancelled() {
            return Err(PluginApiError::Cancelled);
        }

        let diagnostics = analyze_document(&doc.text, &namespaces)?;
        debug!(
            document = %doc.file_path(),
            count = diagnostics.len(),
            "Import analysis finished"
        );
        Ok(diagnostics)
    }
}

/// Namespace name to the simple names it makes visible, from the project's own sources
///
/// Fails with `AnalysisUnavailable` when any document of the project does not parse cleanly.
async fn project_namespaces(
    project: &Project,
    cancel: &CancellationToken,
) -> PluginResult<HashMap<String, HashSet<String>>> {
    let mut namespaces: HashMap<String, HashSet<String>> = HashMap::new();

    for doc in project.documents() {
        if cancel.is_cancelled() {
            return Err(PluginApiError::Cancelled);
        }

        let unit = parse_unit(&doc.text)?;
        if unit.has_errors {
            warn!(document = %doc.file_path(), "Document has syntax errors, skipping import analysis");
            return Err(PluginApiError::analysis_unavailable(format!(
                "'{}' does not compile",
                doc.file_path()
            )));
        }
        register_declarations(&unit, &mut namespaces);

        tokio::task::yield_now().await;
    }

    Ok(namespaces)
}

fn register_declarations(unit: &CsharpUnit, namespaces: &mut HashMap<String, HashSet<String>>) {
    for ns in &unit.namespaces {
        let entry = namespaces.entry(ns.name.clone()).or_default();
        entry.extend(ns.types.iter().map(|ty| ty.name.clone()));

        // A parent namespace makes its child namespaces visible by simple name
        let segments: Vec<&str> = ns.name.split('.').collect();
        for i in 1..segments.len() {
            namespaces
                .entry(segments[..i].join("."))
                .or_default()
                .insert(segments[i].to_string());
        }
    }
}

/// Diagnostics for one document given the project's namespace table
pub fn analyze_document(
    source: &str,
    project_namespaces: &HashMap<String, HashSet<String>>,
) -> PluginResult<Vec<Diagnostic>> {
    let unit = parse_unit(source)?;
    if unit.has_errors {
        return Err(PluginApiError::analysis_unavailable(
            "Document has syntax errors",
        ));
    }
    let used = used_identifiers(source)?;
    let references = type_references(source)?;
    let unbound: Vec<&String> = references
        .referenced
        .iter()
        .filter(|name| !is_bound(name, &unit, &references.declared, project_namespaces))
        .collect();
    if !unbound.is_empty() {
        debug!(
            unbound = ?unbound,
            "Unbound type names, keeping every namespace import"
        );
    }

    let mut diagnostics = Vec::new();
    let mut seen: HashSet<(&str, Option<&str>, bool, &str)> = HashSet::new();

    for using in &unit.usings {
        let directive = &using.directive;
        let key = (
            using.scope.as_str(),
            directive.alias.as_deref(),
            directive.is_static,
            directive.target.as_str(),
        );
        if !seen.insert(key) {
            diagnostics.push(Diagnostic::new(
                DUPLICATE_USING,
                format!(
                    "The using directive for '{}' appeared previously in this namespace",
                    directive.target
                ),
                DiagnosticSeverity::Warning,
                directive.span,
            ));
            continue;
        }

        if is_unused(using, &used, project_namespaces, unbound.is_empty()) {
            diagnostics.push(Diagnostic::hidden(
                UNUSED_USING,
                "Unnecessary using directive.",
                directive.span,
            ));
        }
    }

    Ok(diagnostics)
}

fn is_unused(
    using: &UsingDirective,
    used: &HashSet<String>,
    project_namespaces: &HashMap<String, HashSet<String>>,
    all_types_bound: bool,
) -> bool {
    let directive = &using.directive;
    // Global usings serve the whole project; static imports bring members we do not track
    if directive.is_global || directive.is_static {
        return false;
    }
    if let Some(alias) = &directive.alias {
        return !used.contains(alias);
    }
    // An unbound type may come from any of the imports
    if !all_types_bound {
        return false;
    }

    let library = KNOWN_NAMESPACES.get(directive.target.as_str());
    let local = project_namespaces.get(&directive.target);
    if library.is_none() && local.is_none() {
        return false;
    }

    let visible = |name: &str| {
        library.is_some_and(|types| types.contains(name))
            || local.is_some_and(|types| types.contains(name))
    };
    !used
        .iter()
        .any(|name| visible(name) || visible(&format!("{}Attribute", name)))
}

/// Whether a type-position name binds without guessing
///
/// `name` binds when it is contextual, declared in the unit, declared in an
/// enclosing namespace of the project, or exported by one of the unit's
/// non-static imports (through the library table or the project).
fn is_bound(
    name: &str,
    unit: &CsharpUnit,
    declared: &HashSet<String>,
    project_namespaces: &HashMap<String, HashSet<String>>,
) -> bool {
    if CONTEXTUAL_TYPE_NAMES.contains(&name) || declared.contains(name) {
        return true;
    }
    let attribute = format!("{}Attribute", name);
    let exports = |namespace: &str| {
        let contains = |types: &HashSet<&'static str>| {
            types.contains(name) || types.contains(attribute.as_str())
        };
        KNOWN_NAMESPACES.get(namespace).is_some_and(contains)
            || project_namespaces
                .get(namespace)
                .is_some_and(|types| types.contains(name) || types.contains(&attribute))
    };

    if enclosing_namespaces(unit).iter().any(|ns| exports(ns.as_str())) {
        return true;
    }
    unit.imports()
        .filter(|directive| !directive.is_static)
        .any(|directive| match &directive.alias {
            Some(alias) => alias == name,
            None => exports(directive.target.as_str()),
        })
}

/// Namespaces declared in the unit, their parents, and the global namespace
fn enclosing_namespaces(unit: &CsharpUnit) -> HashSet<String> {
    let mut out: HashSet<String> = HashSet::new();
    out.insert(String::new());
    for ns in &unit.namespaces {
        let segments: Vec<&str> = ns.name.split('.').collect();
        for i in 1..=segments.len() {
            out.insert(segments[..i].join("."));
        }
    }
    out
}

/// Names a unit uses as types, and the names it declares itself
#[derive(Debug, Default)]
struct TypeReferences {
    referenced: HashSet<String>,
    declared: HashSet<String>,
}

fn type_references(source: &str) -> PluginResult<TypeReferences> {
    let tree = parse_tree(source)?;
    let mut references = TypeReferences::default();
    scan_references(tree.root_node(), source, &mut references);
    Ok(references)
}

fn is_declaration(kind: &str) -> bool {
    match kind {
        "namespace_declaration" | "file_scoped_namespace_declaration" => false,
        "variable_declarator" | "parameter" | "type_parameter" | "local_function_statement"
        | "catch_declaration" | "enum_member_declaration" => true,
        kind => kind.ends_with("_declaration"),
    }
}

fn scan_references(node: Node, source: &str, refs: &mut TypeReferences) {
    let kind = node.kind();
    if matches!(kind, "using_directive" | "comment") {
        return;
    }

    if is_declaration(kind) {
        if let Some(name) = node.child_by_field_name("name") {
            if name.kind() == "identifier" {
                refs.declared.insert(identifier_text(name, source));
            }
        }
    }
    for field in ["type", "returns"] {
        if let Some(ty) = node.child_by_field_name(field) {
            collect_type_names(ty, source, false, &mut refs.referenced);
        }
    }
    match kind {
        "base_list" | "type_argument_list" | "type_parameter_constraint" => {
            collect_type_names(node, source, false, &mut refs.referenced);
        }
        "attribute" => {
            if let Some(name) = node.child_by_field_name("name") {
                collect_type_names(name, source, false, &mut refs.referenced);
            }
        }
        // `DayOfWeek.Monday`, `StringComparer.Ordinal`
        "member_access_expression" => {
            if let Some(receiver) = node.child_by_field_name("expression") {
                let text = identifier_text(receiver, source);
                if receiver.kind() == "identifier"
                    && text.starts_with(|c: char| c.is_ascii_uppercase())
                {
                    refs.referenced.insert(text);
                }
            }
        }
        _ => {}
    }

    let mut cursor = node.walk();
    for child in node.named_children(&mut cursor) {
        scan_references(child, source, refs);
    }
}

/// Simple names inside a type; qualified names bind on their own
fn collect_type_names(node: Node, source: &str, qualified: bool, out: &mut HashSet<String>) {
    match node.kind() {
        "identifier" => {
            if !qualified {
                out.insert(identifier_text(node, source));
            }
            return;
        }
        "qualified_name" | "alias_qualified_name" => {
            let mut cursor = node.walk();
            for child in node.named_children(&mut cursor) {
                collect_type_names(child, source, true, out);
            }
            return;
        }
        "type_argument_list" => {
            let mut cursor = node.walk();
            for child in node.named_children(&mut cursor) {
                collect_type_names(child, source, false, out);
            }
            return;
        }
        "tuple_element" => {
            if let Some(ty) = node.child_by_field_name("type") {
                collect_type_names(ty, source, qualified, out);
            }
            return;
        }
        "array_rank_specifier" | "argument_list" => return,
        _ => {}
    }

    let mut cursor = node.walk();
    for child in node.named_children(&mut cursor) {
        collect_type_names(child, source, qualified, out);
    }
}

fn identifier_text(node: Node, source: &str) -> String {
    node_text(node, source).trim_start_matches('@').to_string()
}

/// Every identifier outside using directives and namespace names
fn used_identifiers(source: &str) -> PluginResult<HashSet<String>> {
    let tree = parse_tree(source)?;
    let mut used = HashSet::new();
    collect_identifiers(tree.root_node(), source, &mut used);
    Ok(used)
}

fn collect_identifiers(node: Node, source: &str, used: &mut HashSet<String>) {
    match node.kind() {
        "using_directive" | "comment" => return,
        "identifier" => {
            used.insert(identifier_text(node, source));
            return;
        }
        "namespace_declaration" | "file_scoped_namespace_declaration" => {
            let name = node.child_by_field_name("name");
            let mut cursor = node.walk();
            for child in node.named_children(&mut cursor) {
                if Some(child) != name {
                    collect_identifiers(child, source, used);
                }
            }
            return;
        }
        _ => {}
    }

    let mut cursor = node.walk();
    for child in node.named_children(&mut cursor) {
        collect_identifiers(child, source, used);
    }
}

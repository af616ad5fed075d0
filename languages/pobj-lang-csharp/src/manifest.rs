//! C# project file parsing
//!
//! Reads the few `*.csproj` properties generated code depends on.
use pobj_plugin_api::{PluginApiError, PluginResult};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tokio::fs;

// Structs for deserializing .csproj XML
#[derive(Debug, Deserialize, Serialize, PartialEq, Default)]
struct ProjectXml {
    #[serde(rename = "@Sdk", default)]
    sdk: Option<String>,
    #[serde(rename = "PropertyGroup", default)]
    property_groups: Vec<PropertyGroup>,
}

#[derive(Debug, Deserialize, Serialize, PartialEq, Default)]
struct PropertyGroup {
    #[serde(rename = "AssemblyName", default)]
    assembly_name: Option<String>,
    #[serde(rename = "RootNamespace", default)]
    root_namespace: Option<String>,
    #[serde(rename = "TargetFramework", default)]
    target_framework: Option<String>,
}

/// What a project file says about its build output
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectManifest {
    /// File stem of the project file
    pub name: String,
    /// `AssemblyName`, falling back to the file stem like MSBuild does
    pub assembly_name: String,
    pub root_namespace: Option<String>,
    pub target_framework: Option<String>,
    /// `Sdk` attribute of the root element, absent for legacy project files
    pub sdk: Option<String>,
}

/// Parse project file contents; `path` supplies the fallback name
pub fn parse_manifest(content: &str, path: &Path) -> PluginResult<ProjectManifest> {
    let project: ProjectXml = quick_xml::de::from_str(content)
        .map_err(|e| PluginApiError::invalid_input(format!("Invalid XML in .csproj file: {}", e)))?;

    let name = path
        .file_stem()
        .and_then(|s| s.to_str())
        .map(|s| s.to_string())
        .ok_or_else(|| {
            PluginApiError::invalid_input("Could not determine project name from file path")
        })?;

    let groups = &project.property_groups;
    Ok(ProjectManifest {
        assembly_name: first_property(groups, |p| p.assembly_name.as_ref())
            .unwrap_or_else(|| name.clone()),
        root_namespace: first_property(groups, |p| p.root_namespace.as_ref()),
        target_framework: first_property(groups, |p| p.target_framework.as_ref()),
        sdk: project.sdk.clone(),
        name,
    })
}

/// First non-blank value of a property across all property groups
fn first_property<F>(groups: &[PropertyGroup], get: F) -> Option<String>
where
    F: Fn(&PropertyGroup) -> Option<&String>,
{
    groups
        .iter()
        .find_map(|p| get(p).map(|v| v.trim().to_string()).filter(|v| !v.is_empty()))
}

/// Read and parse a `*.csproj` file
pub async fn load_manifest(path: &Path) -> PluginResult<ProjectManifest> {
    let content = fs::read_to_string(path)
        .await
        .map_err(|e| PluginApiError::internal(format!("Failed to read manifest file: {}", e)))?;
    parse_manifest(&content, path)
}

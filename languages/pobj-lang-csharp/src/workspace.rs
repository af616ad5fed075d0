//! Loading a C# project from disk into a [`Solution`] snapshot

use crate::manifest::load_manifest;
use pobj_foundation::{Project, ProjectId, Solution};
use pobj_plugin_api::{PluginApiError, PluginResult};
use std::path::{Component, Path};
use tokio::fs;
use std::io::ErrorKind;
use tracing::{debug, warn};
use walkdir::WalkDir;

/// Directories that never hold project sources
const SKIPPED_DIRS: [&str; 3] = ["bin", "obj", "node_modules"];

/// Load every `*.cs` file under the project file's directory
///
/// The project's assembly name and root namespace come from the `*.csproj`;
/// each document's folders are its directory relative to the project root.
pub async fn load_project(csproj: &Path) -> PluginResult<(Solution, ProjectId)> {
    let manifest = load_manifest(csproj).await?;
    let root = csproj
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));

    let mut project = Project::new(manifest.name.clone(), manifest.assembly_name.clone());
    if let Some(namespace) = &manifest.root_namespace {
        project = project.with_default_namespace(namespace.clone());
    }
    let project_id = project.id;
    let mut solution = Solution::new().with_project(project);

    let mut sources: Vec<_> = WalkDir::new(root)
        .follow_links(false)
        .into_iter()
        .filter_entry(|e| {
            if e.depth() == 0 {
                return true;
            }
            let name = e.file_name().to_string_lossy();
            !(e.file_type().is_dir()
                && (name.starts_with('.') || SKIPPED_DIRS.contains(&&*name)))
        })
        .filter_map(|entry| match entry {
            Ok(entry) => Some(entry),
            Err(e) => {
                warn!(
                    path = ?e.path(),
                    error = %e,
                    "Skipping unreadable entry while loading project"
                );
                None
            }
        })
        .filter(|e| {
            e.file_type().is_file() && e.path().extension().is_some_and(|ext| ext == "cs")
        })
        .map(|e| e.into_path())
        .collect();
    sources.sort();

    for path in sources {
        let relative = path
            .strip_prefix(root)
            .map_err(|e| PluginApiError::internal(format!("Path outside project root: {}", e)))?;
        let folders = relative
            .parent()
            .map(|dir| {
                dir.components()
                    .filter_map(|c| match c {
                        Component::Normal(segment) => Some(segment.to_string_lossy().into_owned()),
                        _ => None,
                    })
                    .collect()
            })
            .unwrap_or_default();
        let name = relative
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .ok_or_else(|| PluginApiError::internal("Source file without a file name"))?;

        let text = match fs::read_to_string(&path).await {
            Ok(text) => text,
            Err(e) if e.kind() == ErrorKind::InvalidData => {
                warn!(path = %path.display(), "Skipping source file that is not valid UTF-8");
                continue;
            }
            Err(e) => {
                return Err(PluginApiError::internal(format!(
                    "Failed to read {}: {}",
                    path.display(),
                    e
                )))
            }
        };

        let (next, _) = solution
            .with_new_document(project_id, name, text, folders)
            .map_err(|e| PluginApiError::internal(e.to_string()))?;
        solution = next;
    }

    debug!(
        project = %manifest.name,
        assembly = %manifest.assembly_name,
        documents = solution.project(project_id).map_or(0, |p| p.document_count()),
        "Loaded C# project"
    );

    Ok((solution, project_id))
}

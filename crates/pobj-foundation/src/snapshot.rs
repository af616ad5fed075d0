//! Immutable, versioned solution snapshots
//!
//! A [`Solution`] is a persistent value: every mutation returns a new
//! snapshot and leaves the receiver untouched, so a caller that abandons an
//! operation half-way simply keeps using the snapshot it started from.
//! Structural sharing (`im::OrdMap` + `Arc`) keeps copies cheap.

use crate::error::{RefactorError, RefactorResult};
use im::OrdMap;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use uuid::Uuid;

/// Identifier of a document, unique across the whole solution
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct DocumentId(Uuid);

impl DocumentId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for DocumentId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for DocumentId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "doc:{}", self.0)
    }
}

/// Identifier of a project inside a solution
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ProjectId(Uuid);

impl ProjectId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for ProjectId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for ProjectId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "project:{}", self.0)
    }
}

/// One source file of a project
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    pub id: DocumentId,
    pub project_id: ProjectId,
    /// File name including extension, e.g. `ParameterObject.cs`
    pub name: String,
    /// Folder segments relative to the project root
    pub folders: Vec<String>,
    pub text: Arc<str>,
    /// Bumped every time the text is replaced
    pub version: u32,
}

impl Document {
    /// Folder segments joined with `/`; empty for the project root
    pub fn folder_path(&self) -> String {
        self.folders.join("/")
    }

    /// Project-relative path of the file
    pub fn file_path(&self) -> String {
        if self.folders.is_empty() {
            self.name.clone()
        } else {
            format!("{}/{}", self.folder_path(), self.name)
        }
    }

    /// Same folder and same file name, ignoring ASCII case like the file system does
    pub fn occupies(&self, name: &str, folders: &[String]) -> bool {
        self.folders.len() == folders.len()
            && self
                .folders
                .iter()
                .zip(folders)
                .all(|(a, b)| a.eq_ignore_ascii_case(b))
            && self.name.eq_ignore_ascii_case(name)
    }
}

/// A project: named set of documents plus the metadata generated code needs
#[derive(Debug, Clone)]
pub struct Project {
    pub id: ProjectId,
    pub name: String,
    /// Canonical name of the build output; generated namespaces use it
    pub assembly_name: String,
    pub default_namespace: Option<String>,
    documents: OrdMap<DocumentId, Arc<Document>>,
}

impl Project {
    pub fn new(name: impl Into<String>, assembly_name: impl Into<String>) -> Self {
        Self {
            id: ProjectId::new(),
            name: name.into(),
            assembly_name: assembly_name.into(),
            default_namespace: None,
            documents: OrdMap::new(),
        }
    }

    pub fn with_default_namespace(mut self, namespace: impl Into<String>) -> Self {
        self.default_namespace = Some(namespace.into());
        self
    }

    /// The project's canonical name (its assembly name)
    pub fn canonical_name(&self) -> &str {
        &self.assembly_name
    }

    pub fn document(&self, id: DocumentId) -> Option<&Arc<Document>> {
        self.documents.get(&id)
    }

    pub fn documents(&self) -> impl Iterator<Item = &Arc<Document>> {
        self.documents.values()
    }

    pub fn document_count(&self) -> usize {
        self.documents.len()
    }

    /// Find a document by file name and folder
    pub fn find_document(&self, name: &str, folders: &[String]) -> Option<&Arc<Document>> {
        self.documents().find(|doc| doc.occupies(name, folders))
    }
}

/// An immutable view of every project and document
#[derive(Debug, Clone, Default)]
pub struct Solution {
    projects: OrdMap<ProjectId, Arc<Project>>,
    version: u64,
}

impl Solution {
    pub fn new() -> Self {
        Self::default()
    }

    /// Monotonic counter; every derived snapshot has a higher version
    pub fn version(&self) -> u64 {
        self.version
    }

    pub fn project(&self, id: ProjectId) -> Option<&Arc<Project>> {
        self.projects.get(&id)
    }

    pub fn projects(&self) -> impl Iterator<Item = &Arc<Project>> {
        self.projects.values()
    }

    pub fn document(&self, id: DocumentId) -> Option<&Arc<Document>> {
        self.projects.values().find_map(|project| project.document(id))
    }

    /// Insert or replace a project, returning the new snapshot
    pub fn with_project(&self, project: Project) -> Solution {
        let mut projects = self.projects.clone();
        projects.insert(project.id, Arc::new(project));
        Solution {
            projects,
            version: self.version + 1,
        }
    }

    /// Add a document to a project, returning the new snapshot and the document id
    ///
    /// No collision check happens here; callers that must not shadow an
    /// existing file check with [`Project::find_document`] first.
    pub fn with_new_document(
        &self,
        project_id: ProjectId,
        name: impl Into<String>,
        text: impl Into<Arc<str>>,
        folders: Vec<String>,
    ) -> RefactorResult<(Solution, DocumentId)> {
        let project = self
            .project(project_id)
            .ok_or_else(|| RefactorError::project_not_found(project_id))?;

        let document = Document {
            id: DocumentId::new(),
            project_id,
            name: name.into(),
            folders,
            text: text.into(),
            version: 0,
        };
        let id = document.id;

        let mut updated = Project::clone(project);
        updated.documents.insert(id, Arc::new(document));
        Ok((self.with_project(updated), id))
    }

    /// Replace a document's text, returning the new snapshot
    pub fn with_document_text(
        &self,
        document_id: DocumentId,
        text: impl Into<Arc<str>>,
    ) -> RefactorResult<Solution> {
        let document = self
            .document(document_id)
            .ok_or_else(|| RefactorError::document_not_found(document_id))?;
        let project = self
            .project(document.project_id)
            .ok_or_else(|| RefactorError::project_not_found(document.project_id))?;

        let replaced = Document {
            text: text.into(),
            version: document.version + 1,
            ..Document::clone(document)
        };

        let mut updated = Project::clone(project);
        updated.documents.insert(document_id, Arc::new(replaced));
        Ok(self.with_project(updated))
    }
}

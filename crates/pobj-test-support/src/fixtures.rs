//! In-memory solution fixtures

use pobj_foundation::{DocumentId, Project, ProjectId, Solution};

/// A small service class with usings that are partly needed
pub const ORDER_SERVICE: &str = r#"using System;
using System.Collections.Generic;
using System.Text;

namespace MyApp.Services
{
    public class OrderService
    {
        public void PlaceOrder(int quantity, string sku, List<string> tags)
        {
            Console.WriteLine(sku);
        }

        public void Ping()
        {
        }
    }
}
"#;

/// Builder for a one-project [`Solution`]
///
/// ```rust,ignore
/// let fixture = SolutionFixture::new("MyApp")
///     .document(&["Services"], "OrderService.cs", ORDER_SERVICE)
///     .build();
/// let doc = fixture.document_id("OrderService.cs");
/// ```
#[derive(Debug, Clone)]
pub struct SolutionFixture {
    project_name: String,
    assembly_name: String,
    documents: Vec<(Vec<String>, String, String)>,
}

/// A built fixture: the snapshot plus the ids tests need
#[derive(Debug, Clone)]
pub struct BuiltFixture {
    pub solution: Solution,
    pub project_id: ProjectId,
    /// `(file name, id)` in insertion order
    pub documents: Vec<(String, DocumentId)>,
}

impl SolutionFixture {
    pub fn new(name: &str) -> Self {
        Self {
            project_name: name.to_string(),
            assembly_name: name.to_string(),
            documents: Vec::new(),
        }
    }

    pub fn assembly_name(mut self, assembly_name: &str) -> Self {
        self.assembly_name = assembly_name.to_string();
        self
    }

    pub fn document(mut self, folders: &[&str], name: &str, text: &str) -> Self {
        self.documents.push((
            folders.iter().map(|s| s.to_string()).collect(),
            name.to_string(),
            text.to_string(),
        ));
        self
    }

    pub fn build(self) -> BuiltFixture {
        let project = Project::new(self.project_name, self.assembly_name);
        let project_id = project.id;
        let mut solution = Solution::new().with_project(project);
        let mut documents = Vec::new();

        for (folders, name, text) in self.documents {
            let (next, id) = solution
                .with_new_document(project_id, name.clone(), text, folders)
                .expect("fixture project exists");
            solution = next;
            documents.push((name, id));
        }

        BuiltFixture {
            solution,
            project_id,
            documents,
        }
    }
}

impl BuiltFixture {
    /// Id of the first document called `name`
    pub fn document_id(&self, name: &str) -> DocumentId {
        self.documents
            .iter()
            .find(|(doc_name, _)| doc_name == name)
            .map(|(_, id)| *id)
            .unwrap_or_else(|| panic!("fixture has no document named {}", name))
    }
}

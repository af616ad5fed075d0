//! Error handling for the extract-parameter-object pipeline

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Core error type used throughout the refactoring pipeline
#[derive(Error, Debug, Clone, PartialEq)]
#[non_exhaustive]
pub enum RefactorError {
    #[error("A file named '{file_name}' already exists in folder '{folder}'")]
    NameCollision { file_name: String, folder: String },

    #[error("Operation cancelled during: {stage}")]
    Cancelled { stage: String },

    #[error("Document not found: {document}")]
    DocumentNotFound { document: String },

    #[error("Project not found: {project}")]
    ProjectNotFound { project: String },

    #[error("Invalid input: {message}")]
    InvalidInput { message: String },

    #[error("Parse error: {message}")]
    Parse { message: String },

    #[error("Semantic analysis unavailable: {message}")]
    AnalysisUnavailable { message: String },

    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Internal error: {message}")]
    Internal { message: String },
}

impl RefactorError {
    /// Create a new name collision error
    pub fn name_collision(file_name: impl Into<String>, folder: impl Into<String>) -> Self {
        Self::NameCollision {
            file_name: file_name.into(),
            folder: folder.into(),
        }
    }

    /// Create a new cancellation error for the given pipeline stage
    pub fn cancelled(stage: impl Into<String>) -> Self {
        Self::Cancelled {
            stage: stage.into(),
        }
    }

    /// Create a new document not found error
    pub fn document_not_found(document: impl ToString) -> Self {
        Self::DocumentNotFound {
            document: document.to_string(),
        }
    }

    /// Create a new project not found error
    pub fn project_not_found(project: impl ToString) -> Self {
        Self::ProjectNotFound {
            project: project.to_string(),
        }
    }

    /// Create a new invalid input error
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput {
            message: message.into(),
        }
    }

    /// Create a new parse error
    pub fn parse(message: impl Into<String>) -> Self {
        Self::Parse {
            message: message.into(),
        }
    }

    /// Create a new analysis unavailable error
    pub fn analysis_unavailable(message: impl Into<String>) -> Self {
        Self::AnalysisUnavailable {
            message: message.into(),
        }
    }

    /// Create a new configuration error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create a new internal error
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    /// Whether this error means the caller asked us to stop
    pub fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled { .. })
    }

    /// Machine-readable code for reporting to the host
    pub fn code(&self) -> &'static str {
        use error_codes::*;
        match self {
            Self::NameCollision { .. } => E2001_NAME_COLLISION,
            Self::Cancelled { .. } => E2002_CANCELLED,
            Self::DocumentNotFound { .. } | Self::ProjectNotFound { .. } => {
                E2003_RESOURCE_NOT_FOUND
            }
            Self::InvalidInput { .. } => E2004_INVALID_INPUT,
            Self::Parse { .. } => E2005_PARSE,
            Self::AnalysisUnavailable { .. } => E2006_ANALYSIS_UNAVAILABLE,
            Self::Config { .. } => E2007_CONFIG,
            Self::Internal { .. } => E2000_INTERNAL,
        }
    }
}

/// Result type alias for convenience
pub type RefactorResult<T> = Result<T, RefactorError>;

/// Standardized error codes reported alongside [`ErrorReport`]
pub mod error_codes {
    pub const E2000_INTERNAL: &str = "E2000";
    pub const E2001_NAME_COLLISION: &str = "E2001";
    pub const E2002_CANCELLED: &str = "E2002";
    pub const E2003_RESOURCE_NOT_FOUND: &str = "E2003";
    pub const E2004_INVALID_INPUT: &str = "E2004";
    pub const E2005_PARSE: &str = "E2005";
    pub const E2006_ANALYSIS_UNAVAILABLE: &str = "E2006";
    pub const E2007_CONFIG: &str = "E2007";
}

/// Serializable error structure handed back to the host editor
///
/// # Example
/// ```rust
/// use pobj_foundation::error::{ErrorReport, RefactorError};
///
/// let report = ErrorReport::from(RefactorError::name_collision("ParameterObject.cs", "Models"));
/// assert_eq!(report.code, "E2001");
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ErrorReport {
    /// Machine-readable error code
    pub code: String,
    /// Human-readable error message
    pub message: String,
    /// Optional actionable suggestion for fixing the error
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suggestion: Option<String>,
}

impl From<RefactorError> for ErrorReport {
    fn from(err: RefactorError) -> Self {
        let suggestion = match &err {
            RefactorError::NameCollision { .. } => Some(
                "Choose another class name or set `onCollision = \"rename\"`".to_string(),
            ),
            RefactorError::Config { .. } => {
                Some("Check pobj.toml and POBJ__* environment variables".to_string())
            }
            _ => None,
        };
        Self {
            code: err.code().to_string(),
            message: err.to_string(),
            suggestion,
        }
    }
}

impl std::fmt::Display for ErrorReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] {}", self.code, self.message)?;
        if let Some(suggestion) = &self.suggestion {
            write!(f, "\nSuggestion: {}", suggestion)?;
        }
        Ok(())
    }
}

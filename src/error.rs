//! Error types for the MDT workspace engine
//!
//! This module defines every error a workspace operation can surface. Errors
//! fall in two groups:
//!
//! - **Blocking input errors** (`EmptyName`, `InvalidName`, `DuplicateName`):
//!   the caller must reject the input locally; the workspace was not changed.
//! - **Per-item storage errors** (`MalformedProject`, `FileWrite`,
//!   `FileDelete`, `CreateDir`, `Io`): bulk operations record these in their
//!   reports and keep going.

use std::path::PathBuf;
use thiserror::Error;

/// Type alias for Results in the workspace library
pub type Result<T> = std::result::Result<T, WorkspaceError>;

/// Main error type for all workspace operations
#[derive(Debug, Error)]
pub enum WorkspaceError {
    /// I/O errors during file operations
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Errors during JSON serialization/deserialization
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Project name was empty
    #[error("Project name must not be empty")]
    EmptyName,

    /// Project name cannot be used as a file name
    #[error("Project name is not a valid file name: {0:?}")]
    InvalidName(String),

    /// A project with the same name (ignoring case) already exists
    #[error("Project already exists: {0}")]
    DuplicateName(String),

    /// Project document is missing keys or has the wrong shape
    #[error("Malformed project {path:?}: {reason}")]
    MalformedProject {
        /// File the document was read from (empty for in-memory streams)
        path: PathBuf,
        /// What was wrong with it
        reason: String,
    },

    /// Creating a layout directory or marker file failed
    #[error("Failed to create {path:?}: {source}")]
    CreateDir {
        /// Path that could not be created
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// Writing a project file failed
    #[error("Failed to write project file {path:?}: {source}")]
    FileWrite {
        /// Project file path
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// Deleting a project file failed
    #[error("Failed to delete project file {path:?}: {source}")]
    FileDelete {
        /// Project file path
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// No project with this name in the workspace
    #[error("Project not found: {0}")]
    ProjectNotFound(String),

    /// Positional index past the end of the collection
    #[error("Index {index} out of range for {len} items")]
    IndexOutOfRange {
        /// Requested index
        index: usize,
        /// Current collection length
        len: usize,
    },

    /// Invalid configuration
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// Generic error for unexpected conditions
    #[error("Internal error: {0}")]
    Internal(String),
}

impl WorkspaceError {
    /// Create a malformed-project error for a file
    pub fn malformed(path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        WorkspaceError::MalformedProject {
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// Create an invalid-configuration error with a custom message
    pub fn invalid_config(msg: impl Into<String>) -> Self {
        WorkspaceError::InvalidConfiguration(msg.into())
    }

    /// Create an internal error with a custom message
    pub fn internal(msg: impl Into<String>) -> Self {
        WorkspaceError::Internal(msg.into())
    }

    /// Check if this error must be handled by rejecting the caller's input
    pub fn is_blocking(&self) -> bool {
        matches!(
            self,
            WorkspaceError::EmptyName
                | WorkspaceError::InvalidName(_)
                | WorkspaceError::DuplicateName(_)
        )
    }

    /// Check if this error came from the filesystem
    pub fn is_io(&self) -> bool {
        matches!(
            self,
            WorkspaceError::Io(_)
                | WorkspaceError::CreateDir { .. }
                | WorkspaceError::FileWrite { .. }
                | WorkspaceError::FileDelete { .. }
        )
    }

    /// Get a user-friendly error message
    pub fn user_message(&self) -> String {
        match self {
            WorkspaceError::EmptyName => "Please enter a project name.".to_string(),
            WorkspaceError::InvalidName(name) => {
                format!("'{}' cannot be used as a project name. Avoid '/' and '..'.", name)
            }
            WorkspaceError::DuplicateName(name) => {
                format!("A project named '{}' already exists. Choose another name.", name)
            }
            WorkspaceError::MalformedProject { path, .. } => {
                format!("Project file {:?} is damaged and was skipped.", path)
            }
            WorkspaceError::FileDelete { path, .. } => {
                format!("Could not delete {:?}. Check storage permissions.", path)
            }
            WorkspaceError::ProjectNotFound(name) => {
                format!("Project '{}' not found. Use 'mdt list' to see available projects.", name)
            }
            _ => self.to_string(),
        }
    }
}

//! Common types and data structures
//!
//! Configuration for a workspace and the reports returned by its bulk
//! operations. Bulk operations never stop at the first failing item; each
//! report lists what went wrong so callers (and tests) can inspect partial
//! failure instead of scraping logs.

use crate::error::WorkspaceError;
use crate::project::{Project, DEFAULT_AUTHOR};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Configuration for a workspace instance
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkspaceConfig {
    /// Root directory of the workspace tree
    pub root_path: PathBuf,
    /// Project directory name under the root
    pub projects_dir: String,
    /// Export directory name under the root
    pub export_dir: String,
    /// Sentinel file created under the root to keep media scanners out
    pub marker_file: String,
    /// Extension of project files, including the leading dot
    pub project_extension: String,
    /// Author recorded for projects created without one
    pub default_author: String,
    /// Whether project files are written pretty-printed
    pub pretty_json: bool,
}

impl WorkspaceConfig {
    /// Default configuration rooted at `root_path`
    pub fn new(root_path: impl Into<PathBuf>) -> Self {
        Self {
            root_path: root_path.into(),
            projects_dir: "projects".to_string(),
            export_dir: "export".to_string(),
            marker_file: ".nomedia".to_string(),
            project_extension: ".json".to_string(),
            default_author: DEFAULT_AUTHOR.to_string(),
            pretty_json: true,
        }
    }

    /// Absolute path of the project directory
    pub fn projects_path(&self) -> PathBuf {
        self.root_path.join(&self.projects_dir)
    }

    /// Absolute path of the export directory
    pub fn export_path(&self) -> PathBuf {
        self.root_path.join(&self.export_dir)
    }

    /// Absolute path of the sentinel marker file
    pub fn marker_path(&self) -> PathBuf {
        self.root_path.join(&self.marker_file)
    }
}

/// Outcome of [`DirectoryLayout::ensure_layout`](crate::layout::DirectoryLayout::ensure_layout)
#[derive(Debug, Default)]
pub struct LayoutReport {
    /// Paths that did not exist and were created
    pub created: Vec<PathBuf>,
    /// Paths that could not be created
    pub failures: Vec<WorkspaceError>,
}

impl LayoutReport {
    /// Whether anything was created; informational only
    pub fn created_any(&self) -> bool {
        !self.created.is_empty()
    }

    /// Whether every item exists or was created
    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }
}

/// A project file that could not be loaded during discovery
#[derive(Debug)]
pub struct LoadFailure {
    /// File that was skipped
    pub path: PathBuf,
    /// Why it was skipped
    pub error: WorkspaceError,
}

/// Result of scanning the project directory
#[derive(Debug, Default)]
pub struct Discovery {
    /// Loaded projects in file-name order (case-insensitive)
    pub projects: Vec<Project>,
    /// File each project was loaded from, parallel to `projects`
    pub paths: Vec<PathBuf>,
    /// Files that were skipped
    pub failures: Vec<LoadFailure>,
}

impl Discovery {
    /// Whether every listed file loaded
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }
}

/// A project that could not be written during a persist pass
#[derive(Debug)]
pub struct PersistFailure {
    /// Project name
    pub name: String,
    /// Target file
    pub path: PathBuf,
    /// Why the write failed
    pub error: WorkspaceError,
}

/// Outcome of a persist-all pass
#[derive(Debug)]
pub struct PersistReport {
    /// Names of projects written, in collection order
    pub written: Vec<String>,
    /// Projects that failed, in collection order
    pub failures: Vec<PersistFailure>,
    /// When the pass finished
    pub completed_at: DateTime<Utc>,
}

impl PersistReport {
    /// Whether every project was written
    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }

    /// Total number of projects attempted
    pub fn attempted(&self) -> usize {
        self.written.len() + self.failures.len()
    }
}

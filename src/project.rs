//! Project definitions and JSON round-trip
//!
//! A project is a named, authored, ordered list of [`Patch`]es. Each project
//! is stored as one JSON document:
//!
//! ```text
//! {
//!   "name": "Infinite Items",
//!   "author": "Unknown",
//!   "patches": [
//!     {"offset": 4096, "value": "90 90"}
//!   ]
//! }
//! ```
//!
//! Patch order is significant and survives every round-trip.
//!
//! ## Examples
//!
//! ```rust
//! use mdt_workspace::{Patch, Project};
//!
//! let mut project = Project::new("Infinite Items", "")?;
//! assert_eq!(project.author(), "Unknown");
//!
//! project.add_patch(Patch::new(0x1000, "90 90"));
//! let json = project.to_json()?;
//! assert_eq!(Project::from_json(&json)?, project);
//! # Ok::<(), mdt_workspace::WorkspaceError>(())
//! ```

use crate::error::{Result, WorkspaceError};
use crate::patch::Patch;
use crate::utils::is_plain_name;
use serde::{Deserialize, Serialize};
use std::io::{Read, Write};
use std::path::Path;

/// Author recorded when none was given
pub const DEFAULT_AUTHOR: &str = "Unknown";

/// A named collection of patches
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Project {
    name: String,
    author: String,
    patches: Vec<Patch>,
}

impl Project {
    /// Create an empty project, falling back to [`DEFAULT_AUTHOR`]
    ///
    /// # Errors
    ///
    /// - [`WorkspaceError::EmptyName`] if `name` is empty
    pub fn new(name: impl Into<String>, author: impl Into<String>) -> Result<Self> {
        Self::with_default_author(name, author, DEFAULT_AUTHOR)
    }

    /// Create an empty project, falling back to `default_author` when
    /// `author` is empty
    pub fn with_default_author(
        name: impl Into<String>,
        author: impl Into<String>,
        default_author: &str,
    ) -> Result<Self> {
        let name = name.into();
        if name.is_empty() {
            return Err(WorkspaceError::EmptyName);
        }

        let mut author = author.into();
        if author.is_empty() {
            author = default_author.to_string();
        }

        Ok(Self {
            name,
            author,
            patches: Vec::new(),
        })
    }

    /// Parse a project document from a string
    pub fn from_json(json: &str) -> Result<Self> {
        let project = serde_json::from_str(json).map_err(|e| classify(e, Path::new("")))?;
        validate(project, Path::new(""))
    }

    /// Parse a project document from a stream
    ///
    /// # Errors
    ///
    /// - [`WorkspaceError::MalformedProject`] if a key is missing, has the
    ///   wrong shape, or `name` is empty
    /// - [`WorkspaceError::Io`] if the stream itself fails
    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        Self::from_reader_at(reader, Path::new(""))
    }

    /// Like [`Project::from_reader`], tagging errors with the source file
    pub(crate) fn from_reader_at<R: Read>(reader: R, path: &Path) -> Result<Self> {
        let project = serde_json::from_reader(reader).map_err(|e| classify(e, path))?;
        validate(project, path)
    }

    /// Serialize to a pretty-printed JSON document
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Serialize to a JSON value
    pub fn to_json_value(&self) -> Result<serde_json::Value> {
        Ok(serde_json::to_value(self)?)
    }

    /// Write the JSON document to `writer`
    ///
    /// A failing writer surfaces as [`WorkspaceError::Io`].
    pub fn write_json<W: Write>(&self, writer: W, pretty: bool) -> Result<()> {
        let written = if pretty {
            serde_json::to_writer_pretty(writer, self)
        } else {
            serde_json::to_writer(writer, self)
        };
        written.map_err(|e| {
            if e.is_io() {
                WorkspaceError::Io(e.into())
            } else {
                WorkspaceError::Json(e)
            }
        })
    }

    /// Project name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Project author
    pub fn author(&self) -> &str {
        &self.author
    }

    /// Patches in application order
    pub fn patches(&self) -> &[Patch] {
        &self.patches
    }

    /// Append a patch
    ///
    /// Several patches may share an offset; which one wins is decided by
    /// whatever applies them.
    pub fn add_patch(&mut self, patch: Patch) {
        self.patches.push(patch);
    }

    /// Remove and return the patch at `index`
    pub fn remove_patch(&mut self, index: usize) -> Result<Patch> {
        if index >= self.patches.len() {
            return Err(WorkspaceError::IndexOutOfRange {
                index,
                len: self.patches.len(),
            });
        }
        Ok(self.patches.remove(index))
    }

    /// Number of patches
    pub fn len(&self) -> usize {
        self.patches.len()
    }

    /// Whether the project has no patches
    pub fn is_empty(&self) -> bool {
        self.patches.is_empty()
    }
}

fn classify(err: serde_json::Error, path: &Path) -> WorkspaceError {
    if err.is_io() {
        WorkspaceError::Io(err.into())
    } else {
        WorkspaceError::malformed(path, err.to_string())
    }
}

fn validate(project: Project, path: &Path) -> Result<Project> {
    if project.name.is_empty() {
        return Err(WorkspaceError::malformed(path, "project name is empty"));
    }
    if !is_plain_name(&project.name) {
        return Err(WorkspaceError::malformed(
            path,
            format!("project name {:?} is not a plain file name", project.name),
        ));
    }
    Ok(project)
}

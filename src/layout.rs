//! On-disk workspace layout
//!
//! ```text
//! root/
//! ├── .nomedia        # keeps media scanners out of the tree
//! ├── projects/       # one <name>.json per project
//! └── export/         # reserved for export tools
//! ```
//!
//! [`DirectoryLayout::ensure_layout`] creates whatever is missing. It never
//! fails as a whole: an item that cannot be created is logged and recorded,
//! and later reads or writes against it fail on their own.

use crate::error::WorkspaceError;
use crate::types::{LayoutReport, WorkspaceConfig};
use std::fs::{self, OpenOptions};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Paths making up a workspace tree
#[derive(Debug, Clone)]
pub struct DirectoryLayout {
    root: PathBuf,
    projects: PathBuf,
    export: PathBuf,
    marker: PathBuf,
}

impl DirectoryLayout {
    /// Layout described by `config`
    pub fn new(config: &WorkspaceConfig) -> Self {
        Self {
            root: config.root_path.clone(),
            projects: config.projects_path(),
            export: config.export_path(),
            marker: config.marker_path(),
        }
    }

    /// Make sure the root, project and export directories and the marker
    /// file exist
    ///
    /// Idempotent. The returned report says what was created; callers must
    /// not depend on it for correctness since a run that creates nothing is
    /// just as successful.
    pub fn ensure_layout(&self) -> LayoutReport {
        let mut report = LayoutReport::default();

        for dir in [&self.root, &self.projects, &self.export] {
            ensure_dir(dir, &mut report);
        }
        ensure_marker(&self.marker, &mut report);

        if report.created_any() {
            info!("Created workspace layout at {:?} ({} items)", self.root, report.created.len());
        }
        for failure in &report.failures {
            warn!("Workspace layout incomplete: {}", failure);
        }

        report
    }

    /// Root directory
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Project directory
    pub fn projects_dir(&self) -> &Path {
        &self.projects
    }

    /// Export directory
    pub fn export_dir(&self) -> &Path {
        &self.export
    }

    /// Sentinel marker file
    pub fn marker(&self) -> &Path {
        &self.marker
    }
}

fn ensure_dir(dir: &Path, report: &mut LayoutReport) {
    if dir.is_dir() {
        return;
    }
    match fs::create_dir_all(dir) {
        Ok(()) => {
            debug!("Created directory {:?}", dir);
            report.created.push(dir.to_path_buf());
        }
        Err(source) => report.failures.push(WorkspaceError::CreateDir {
            path: dir.to_path_buf(),
            source,
        }),
    }
}

fn ensure_marker(marker: &Path, report: &mut LayoutReport) {
    match OpenOptions::new().write(true).create_new(true).open(marker) {
        Ok(_) => {
            debug!("Created marker {:?}", marker);
            report.created.push(marker.to_path_buf());
        }
        Err(e) if e.kind() == ErrorKind::AlreadyExists => {}
        Err(source) => report.failures.push(WorkspaceError::CreateDir {
            path: marker.to_path_buf(),
            source,
        }),
    }
}

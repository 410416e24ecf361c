//! Workspace controller
//!
//! [`Workspace`] owns the live project collection for one session. It is
//! the only thing that mutates either the collection or the project
//! directory.
//!
//! ## Lifecycle
//!
//! ```text
//! open ──► ensure_layout ──► discover ──► Loaded ──► close (persist all)
//!                                          │  ▲
//!                                          └──┘ create / delete / edit
//! ```
//!
//! Opening runs the layout bootstrap once and loads every project file.
//! [`Workspace::close`] consumes the handle, so the final flush happens
//! exactly once. [`Workspace::persist_all`] may also be called mid-session.
//!
//! ## Ordering
//!
//! Projects load in case-insensitive file-name order. Created projects are
//! appended; deleted ones are removed in place, shifting later indices.
//! Positional indices are only meaningful against the snapshot the caller
//! last read.
//!
//! ## Files
//!
//! Each project remembers the file it currently lives in. Deleting removes
//! that file, even when its name differs from the project's. Persisting
//! writes `<name>.json` and moves a differently named source file there.

use crate::error::{Result, WorkspaceError};
use crate::layout::DirectoryLayout;
use crate::project::Project;
use crate::store::ProjectStore;
use crate::types::{Discovery, LayoutReport, LoadFailure, PersistReport, WorkspaceConfig};
use crate::utils::{is_plain_name, names_match};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Live project collection for one session
///
/// # Examples
///
/// ```rust,no_run
/// use mdt_workspace::{Patch, Workspace};
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let mut workspace = Workspace::open("/sdcard/MDT")?;
///
/// let index = workspace.create_project("Infinite Items", "")?;
/// workspace
///     .project_mut(index)?
///     .add_patch(Patch::new(0x1f40, "90 90"));
///
/// let report = workspace.close();
/// assert!(report.is_complete());
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct Workspace {
    config: WorkspaceConfig,
    layout: DirectoryLayout,
    store: ProjectStore,
    projects: Vec<Project>,
    // File backing each project, parallel to `projects`; `None` until written
    sources: Vec<Option<PathBuf>>,
    layout_report: LayoutReport,
    load_failures: Vec<LoadFailure>,
}

impl Workspace {
    /// Open the workspace rooted at `root` with default settings
    pub fn open(root: impl Into<PathBuf>) -> Result<Self> {
        WorkspaceBuilder::new().build(root)
    }

    /// Open a workspace from a full configuration
    pub fn with_config(config: WorkspaceConfig) -> Result<Self> {
        validate_config(&config)?;

        let layout = DirectoryLayout::new(&config);
        let layout_report = layout.ensure_layout();

        let store = ProjectStore::new(config.projects_path(), config.project_extension.clone())
            .pretty(config.pretty_json);
        let Discovery {
            projects,
            paths,
            failures,
        } = store.discover();
        let sources = paths.into_iter().map(Some).collect();

        info!(
            "Opened workspace at {:?} with {} projects",
            config.root_path,
            projects.len()
        );

        Ok(Self {
            config,
            layout,
            store,
            projects,
            sources,
            layout_report,
            load_failures: failures,
        })
    }

    /// Create a project and append it to the collection
    ///
    /// Returns the index of the new project, which is always the last one.
    ///
    /// # Errors
    ///
    /// - [`WorkspaceError::EmptyName`] if `name` is empty
    /// - [`WorkspaceError::InvalidName`] if `name` cannot be a file name,
    ///   e.g. it contains `/` or is `..`
    /// - [`WorkspaceError::DuplicateName`] if a project with the same name,
    ///   ignoring case, already exists
    ///
    /// The collection is unchanged when an error is returned.
    pub fn create_project(&mut self, name: &str, author: &str) -> Result<usize> {
        if name.is_empty() {
            return Err(WorkspaceError::EmptyName);
        }
        if !is_plain_name(name) {
            return Err(WorkspaceError::InvalidName(name.to_string()));
        }
        if let Some(existing) = self.find(name) {
            return Err(WorkspaceError::DuplicateName(existing.name().to_string()));
        }

        let project = Project::with_default_author(name, author, &self.config.default_author)?;
        debug!("Created project {:?} by {:?}", project.name(), project.author());
        self.projects.push(project);
        self.sources.push(None);
        Ok(self.projects.len() - 1)
    }

    /// Delete the project at `index`
    ///
    /// The index is resolved to the project's name first; the deletion
    /// itself is by name. See [`Workspace::delete_project`].
    pub fn delete_project_at(&mut self, index: usize) -> Result<Project> {
        let name = self.project(index)?.name().to_string();
        self.delete_project(&name)
    }

    /// Delete the project named `name` (ignoring case)
    ///
    /// The backing file is removed before the in-memory entry. If the file
    /// cannot be removed the project stays in the collection and
    /// [`WorkspaceError::FileDelete`] is returned, so the collection and the
    /// directory never disagree. A project that was never written has no
    /// file and is simply dropped.
    pub fn delete_project(&mut self, name: &str) -> Result<Project> {
        let index = self
            .index_of(name)
            .ok_or_else(|| WorkspaceError::ProjectNotFound(name.to_string()))?;

        let had_file = match &self.sources[index] {
            Some(path) => self.store.delete_project_file(path)?,
            None => false,
        };

        self.sources.remove(index);
        let project = self.projects.remove(index);
        info!(
            "Deleted project {:?}{}",
            project.name(),
            if had_file { "" } else { " (never written)" }
        );
        Ok(project)
    }

    /// Write every project in the collection to its file
    ///
    /// Files are overwritten whether or not the project changed. A failing
    /// project is recorded in the report and the rest are still written.
    pub fn persist_all(&mut self) -> PersistReport {
        self.store.persist_all(&self.projects, &mut self.sources)
    }

    /// Persist every project on a blocking worker
    ///
    /// For hosts that must not block their event loop while suspending. The
    /// writes are the same, in the same order, as [`Workspace::persist_all`];
    /// the returned report is the completion acknowledgment.
    pub async fn persist_all_async(&mut self) -> Result<PersistReport> {
        let store = self.store.clone();
        let snapshot = self.projects.clone();
        let mut sources = self.sources.clone();
        let (report, sources) = tokio::task::spawn_blocking(move || {
            let report = store.persist_all(&snapshot, &mut sources);
            (report, sources)
        })
        .await
        .map_err(|e| WorkspaceError::internal(format!("persist task failed: {}", e)))?;

        self.sources = sources;
        Ok(report)
    }

    /// End the session, writing every project
    pub fn close(mut self) -> PersistReport {
        let report = self.persist_all();
        info!(
            "Closed workspace at {:?} ({} written, {} failed)",
            self.config.root_path,
            report.written.len(),
            report.failures.len()
        );
        report
    }

    /// Project at `index`
    pub fn project(&self, index: usize) -> Result<&Project> {
        let len = self.projects.len();
        self.projects
            .get(index)
            .ok_or(WorkspaceError::IndexOutOfRange { index, len })
    }

    /// Mutable project at `index`, for editing its patch list
    pub fn project_mut(&mut self, index: usize) -> Result<&mut Project> {
        let len = self.projects.len();
        self.projects
            .get_mut(index)
            .ok_or(WorkspaceError::IndexOutOfRange { index, len })
    }

    /// Project named `name`, ignoring case
    pub fn find(&self, name: &str) -> Option<&Project> {
        self.projects.iter().find(|p| names_match(p.name(), name))
    }

    /// Current index of the project named `name`, ignoring case
    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.projects.iter().position(|p| names_match(p.name(), name))
    }

    /// Projects in collection order
    pub fn projects(&self) -> &[Project] {
        &self.projects
    }

    /// Number of projects
    pub fn len(&self) -> usize {
        self.projects.len()
    }

    /// Whether the workspace has no projects
    pub fn is_empty(&self) -> bool {
        self.projects.is_empty()
    }

    /// Re-run the layout bootstrap
    pub fn ensure_layout(&self) -> LayoutReport {
        self.layout.ensure_layout()
    }

    /// Scan the project directory again without touching the collection
    pub fn discover(&self) -> Discovery {
        self.store.discover()
    }

    /// What the layout bootstrap did when the workspace was opened
    pub fn layout_report(&self) -> &LayoutReport {
        &self.layout_report
    }

    /// Files skipped when the workspace was opened
    pub fn load_failures(&self) -> &[LoadFailure] {
        &self.load_failures
    }

    /// Configuration this workspace was opened with
    pub fn config(&self) -> &WorkspaceConfig {
        &self.config
    }

    /// Directory reserved for export tools
    pub fn export_dir(&self) -> &Path {
        self.layout.export_dir()
    }

    /// Project directory
    pub fn projects_dir(&self) -> &Path {
        self.store.dir()
    }

    /// File the project named `name` is written to on the next persist
    pub fn project_path(&self, name: &str) -> PathBuf {
        self.store.project_path(name)
    }

    /// File the project at `index` was loaded from or last written to
    ///
    /// `None` for a project created this session and not yet written.
    pub fn source_path(&self, index: usize) -> Result<Option<&Path>> {
        self.project(index)?;
        Ok(self.sources[index].as_deref())
    }
}

/// Builder for opening a [`Workspace`] with custom settings
///
/// # Examples
///
/// ```rust,no_run
/// use mdt_workspace::WorkspaceBuilder;
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let workspace = WorkspaceBuilder::new()
///     .default_author("Anonymous")
///     .pretty_json(false)
///     .build("/sdcard/MDT")?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct WorkspaceBuilder {
    projects_dir: String,
    export_dir: String,
    marker_file: String,
    project_extension: String,
    default_author: String,
    pretty_json: bool,
}

impl Default for WorkspaceBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl WorkspaceBuilder {
    /// Create a new builder with default settings
    pub fn new() -> Self {
        let defaults = WorkspaceConfig::new(PathBuf::new());
        Self {
            projects_dir: defaults.projects_dir,
            export_dir: defaults.export_dir,
            marker_file: defaults.marker_file,
            project_extension: defaults.project_extension,
            default_author: defaults.default_author,
            pretty_json: defaults.pretty_json,
        }
    }

    /// Name of the project directory under the root
    pub fn projects_dir(mut self, name: impl Into<String>) -> Self {
        self.projects_dir = name.into();
        self
    }

    /// Name of the export directory under the root
    pub fn export_dir(mut self, name: impl Into<String>) -> Self {
        self.export_dir = name.into();
        self
    }

    /// Name of the sentinel file under the root
    pub fn marker_file(mut self, name: impl Into<String>) -> Self {
        self.marker_file = name.into();
        self
    }

    /// Project file extension, including the leading dot
    pub fn project_extension(mut self, extension: impl Into<String>) -> Self {
        self.project_extension = extension.into();
        self
    }

    /// Author recorded for projects created without one
    pub fn default_author(mut self, author: impl Into<String>) -> Self {
        self.default_author = author.into();
        self
    }

    /// Whether project files are pretty-printed
    pub fn pretty_json(mut self, pretty: bool) -> Self {
        self.pretty_json = pretty;
        self
    }

    /// Configuration this builder describes for `root`
    pub fn config(&self, root: impl Into<PathBuf>) -> WorkspaceConfig {
        WorkspaceConfig {
            root_path: root.into(),
            projects_dir: self.projects_dir.clone(),
            export_dir: self.export_dir.clone(),
            marker_file: self.marker_file.clone(),
            project_extension: self.project_extension.clone(),
            default_author: self.default_author.clone(),
            pretty_json: self.pretty_json,
        }
    }

    /// Open the workspace
    ///
    /// # Errors
    ///
    /// - [`WorkspaceError::InvalidConfiguration`] for an empty default
    ///   author, an extension without a leading dot, or directory names that
    ///   are not a single plain path component
    pub fn build(self, root: impl Into<PathBuf>) -> Result<Workspace> {
        Workspace::with_config(self.config(root))
    }
}

fn validate_config(config: &WorkspaceConfig) -> Result<()> {
    if config.root_path.as_os_str().is_empty() {
        return Err(WorkspaceError::invalid_config("root path is empty"));
    }
    if config.default_author.is_empty() {
        return Err(WorkspaceError::invalid_config("default author is empty"));
    }
    let ext = &config.project_extension;
    let bad_char = |c: char| matches!(c, '.' | '/' | '\\');
    if ext.len() < 2 || !ext.starts_with('.') || ext[1..].contains(bad_char) {
        return Err(WorkspaceError::invalid_config(format!(
            "project extension must look like '.json', got {:?}",
            ext
        )));
    }
    for (what, name) in [
        ("projects directory", &config.projects_dir),
        ("export directory", &config.export_dir),
        ("marker file", &config.marker_file),
    ] {
        if !is_plain_name(name) {
            return Err(WorkspaceError::invalid_config(format!(
                "{} must be a plain name, got {:?}",
                what, name
            )));
        }
    }
    if config.projects_dir == config.export_dir {
        return Err(WorkspaceError::invalid_config(
            "projects and export directories must differ",
        ));
    }
    Ok(())
}

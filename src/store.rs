//! Project file storage
//!
//! [`ProjectStore`] owns the mapping between projects and files in the
//! project directory:
//!
//! ```text
//! projects/
//! ├── A.json
//! ├── b.json
//! └── c.JSON
//! ```
//!
//! ## Discovery
//!
//! [`ProjectStore::discover`] lists every file whose name ends with the
//! project extension (ignoring case), sorts the names ignoring case, and
//! loads each one. A file that vanished, cannot be read, or does not parse
//! is skipped and reported; one bad file never hides the rest.
//!
//! ## Writes
//!
//! Project files are written to a temporary file in the project directory
//! and renamed over the target, so a crash mid-write leaves either the old
//! or the new document, never a truncated one. Temporary files do not carry
//! the project extension and are never picked up by discovery.
//!
//! A project is always written to `<name><extension>`. One that was loaded
//! from a differently named file has that file moved into place first, so a
//! persist pass never leaves a second copy behind.

use crate::error::{Result, WorkspaceError};
use crate::project::Project;
use crate::types::{Discovery, LoadFailure, PersistFailure, PersistReport};
use crate::utils::{compare_ignore_case, has_extension_ignore_case, names_match};
use chrono::Utc;
use std::collections::HashSet;
use std::fs::{self, File};
use std::io::{BufReader, BufWriter, ErrorKind, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use tracing::{debug, info, warn};

/// Reads and writes project files in one directory
#[derive(Debug, Clone)]
pub struct ProjectStore {
    dir: PathBuf,
    extension: String,
    pretty: bool,
}

impl ProjectStore {
    /// Store over `dir`, matching files ending in `extension` (e.g. `.json`)
    pub fn new(dir: impl Into<PathBuf>, extension: impl Into<String>) -> Self {
        Self {
            dir: dir.into(),
            extension: extension.into(),
            pretty: true,
        }
    }

    /// Write compact JSON instead of pretty-printed
    pub fn pretty(mut self, pretty: bool) -> Self {
        self.pretty = pretty;
        self
    }

    /// Project directory
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// File a project named `name` is written to
    pub fn project_path(&self, name: &str) -> PathBuf {
        self.dir.join(format!("{}{}", name, self.extension))
    }

    /// Load every project file in the directory
    ///
    /// An empty or missing directory yields an empty workspace. The order of
    /// [`Discovery::projects`] is stable for a fixed directory snapshot and
    /// is what positional indices refer to.
    pub fn discover(&self) -> Discovery {
        let mut discovery = Discovery::default();

        let mut files = match self.list_project_files() {
            Ok(files) => files,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!("Project directory {:?} does not exist", self.dir);
                return discovery;
            }
            Err(e) => {
                warn!("Failed to list project directory {:?}: {}", self.dir, e);
                discovery.failures.push(LoadFailure {
                    path: self.dir.clone(),
                    error: e.into(),
                });
                return discovery;
            }
        };

        if files.is_empty() {
            return discovery;
        }

        files.sort_by(|(a, _), (b, _)| compare_ignore_case(a, b));

        discovery.projects.reserve(files.len());
        discovery.paths.reserve(files.len());
        for (_, path) in files {
            match self.load_project(&path) {
                Ok(project) => {
                    let shared = discovery
                        .projects
                        .iter()
                        .any(|p| names_match(p.name(), project.name()));
                    if shared {
                        warn!(
                            "Project {:?} in {:?} shares its name with an earlier file",
                            project.name(),
                            path
                        );
                    }
                    discovery.projects.push(project);
                    discovery.paths.push(path);
                }
                Err(error) => {
                    warn!("Skipping project file {:?}: {}", path, error);
                    discovery.failures.push(LoadFailure { path, error });
                }
            }
        }

        info!(
            "Discovered {} projects in {:?} ({} skipped)",
            discovery.projects.len(),
            self.dir,
            discovery.failures.len()
        );
        discovery
    }

    /// Load a single project file
    pub fn load_project(&self, path: &Path) -> Result<Project> {
        let file = File::open(path)?;
        let project = Project::from_reader_at(BufReader::new(file), path)?;
        debug!("Loaded project {:?} ({} patches)", project.name(), project.len());
        Ok(project)
    }

    /// Write `project` to its file, replacing any previous version
    pub fn write_project(&self, project: &Project) -> Result<PathBuf> {
        let path = self.project_path(project.name());
        let write_err = |source: std::io::Error| WorkspaceError::FileWrite {
            path: path.clone(),
            source,
        };

        let temp = NamedTempFile::new_in(&self.dir).map_err(write_err)?;
        {
            let mut writer = BufWriter::new(temp.as_file());
            project
                .write_json(&mut writer, self.pretty)
                .map_err(|e| match e {
                    WorkspaceError::Io(source) => write_err(source),
                    other => other,
                })?;
            writer.flush().map_err(write_err)?;
        }
        temp.as_file().sync_all().map_err(write_err)?;
        temp.persist(&path).map_err(|e| write_err(e.error))?;

        debug!("Wrote project {:?} to {:?}", project.name(), path);
        Ok(path)
    }

    /// Delete a project file
    ///
    /// Returns `false` if there was no file to delete.
    pub fn delete_project_file(&self, path: &Path) -> Result<bool> {
        match fs::remove_file(path) {
            Ok(()) => {
                debug!("Deleted project file {:?}", path);
                Ok(true)
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(false),
            Err(source) => Err(WorkspaceError::FileDelete {
                path: path.to_path_buf(),
                source,
            }),
        }
    }

    /// Write every project, continuing past failures
    ///
    /// `sources` holds the file each project currently lives in (`None` if
    /// it was never written) and must be as long as `projects`. Every
    /// project that ends up in its `<name>` file has its entry updated.
    pub fn persist_all(
        &self,
        projects: &[Project],
        sources: &mut [Option<PathBuf>],
    ) -> PersistReport {
        debug_assert_eq!(projects.len(), sources.len());

        let mut written = Vec::with_capacity(projects.len());
        let mut failures = Vec::new();
        let mut claimed: HashSet<PathBuf> = HashSet::new();

        for (project, source) in projects.iter().zip(sources.iter_mut()) {
            let target = self.project_path(project.name());

            // A file already rewritten in this pass belongs to another project
            let previous = source
                .as_deref()
                .filter(|old| *old != target.as_path() && !claimed.contains(*old))
                .map(Path::to_path_buf);
            if let Some(old) = previous {
                match self.relocate(&old, &target) {
                    Ok(()) => *source = Some(target.clone()),
                    Err(error) => {
                        warn!("Failed to persist project {:?}: {}", project.name(), error);
                        failures.push(PersistFailure {
                            name: project.name().to_string(),
                            path: target,
                            error,
                        });
                        continue;
                    }
                }
            }

            match self.write_project(project) {
                Ok(path) => {
                    claimed.insert(path.clone());
                    *source = Some(path);
                    written.push(project.name().to_string());
                }
                Err(error) => {
                    warn!("Failed to persist project {:?}: {}", project.name(), error);
                    failures.push(PersistFailure {
                        name: project.name().to_string(),
                        path: target,
                        error,
                    });
                }
            }
        }

        info!("Persisted {} of {} projects", written.len(), projects.len());
        PersistReport {
            written,
            failures,
            completed_at: Utc::now(),
        }
    }

    /// Move a project file to the name its project is written under
    fn relocate(&self, from: &Path, to: &Path) -> Result<()> {
        match fs::rename(from, to) {
            Ok(()) => {
                info!("Moved project file {:?} to {:?}", from, to);
                Ok(())
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(source) => Err(WorkspaceError::FileWrite {
                path: to.to_path_buf(),
                source,
            }),
        }
    }

    fn list_project_files(&self) -> std::io::Result<Vec<(String, PathBuf)>> {
        let mut files = Vec::new();
        for entry in fs::read_dir(&self.dir)? {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    warn!("Failed to read entry in {:?}: {}", self.dir, e);
                    continue;
                }
            };
            let path = entry.path();
            if has_extension_ignore_case(&path, &self.extension) {
                files.push((entry.file_name().to_string_lossy().to_string(), path));
            }
        }
        Ok(files)
    }
}

//! Multi-session integration tests
//!
//! A harness replays a log of workspace operations across several simulated
//! restarts and checks that what comes back from disk matches an in-memory
//! model of the workspace.

use ::mdt_workspace::*;
use std::path::Path;
use tempfile::TempDir;
use tracing::info;

/// Test harness for session scenarios
pub struct WorkspaceTestHarness {
    pub root_dir: TempDir,
    pub workspace: Option<Workspace>,
    pub operation_log: Vec<TestOperation>,
}

#[derive(Debug, Clone)]
pub enum TestOperation {
    Create { name: String, author: String },
    Delete { name: String },
    AddPatch { name: String, offset: u64, value: String },
    Restart,
}

impl WorkspaceTestHarness {
    /// Create a new harness over an empty root
    pub fn new() -> Self {
        let root_dir = TempDir::new().unwrap();
        let workspace = Workspace::open(root_dir.path()).unwrap();
        Self {
            root_dir,
            workspace: Some(workspace),
            operation_log: Vec::new(),
        }
    }

    pub fn root(&self) -> &Path {
        self.root_dir.path()
    }

    pub fn workspace(&mut self) -> &mut Workspace {
        self.workspace.as_mut().expect("workspace is open")
    }

    pub fn create(&mut self, name: &str, author: &str) -> anyhow::Result<usize> {
        let index = self.workspace().create_project(name, author)?;
        self.operation_log.push(TestOperation::Create {
            name: name.to_string(),
            author: author.to_string(),
        });
        Ok(index)
    }

    pub fn delete(&mut self, name: &str) -> anyhow::Result<Project> {
        let project = self.workspace().delete_project(name)?;
        self.operation_log.push(TestOperation::Delete {
            name: name.to_string(),
        });
        Ok(project)
    }

    pub fn add_patch(&mut self, name: &str, offset: u64, value: &str) -> anyhow::Result<()> {
        let index = self
            .workspace()
            .index_of(name)
            .ok_or_else(|| anyhow::anyhow!("no project {}", name))?;
        self.workspace()
            .project_mut(index)?
            .add_patch(Patch::new(offset, value));
        self.operation_log.push(TestOperation::AddPatch {
            name: name.to_string(),
            offset,
            value: value.to_string(),
        });
        Ok(())
    }

    /// Close the session and open a fresh one from disk
    pub fn restart(&mut self) -> anyhow::Result<PersistReport> {
        let workspace = self.workspace.take().expect("workspace is open");
        let report = workspace.close();
        info!("Restarting after writing {} projects", report.written.len());
        self.workspace = Some(Workspace::open(self.root_dir.path())?);
        self.operation_log.push(TestOperation::Restart);
        Ok(report)
    }

    /// Rebuild the expected workspace from the operation log
    pub fn expected_projects(&self) -> Vec<Project> {
        let mut projects: Vec<Project> = Vec::new();
        for op in &self.operation_log {
            match op {
                TestOperation::Create { name, author } => {
                    projects.push(Project::new(name.as_str(), author.as_str()).unwrap());
                }
                TestOperation::Delete { name } => {
                    projects.retain(|p| !p.name().eq_ignore_ascii_case(name));
                }
                TestOperation::AddPatch { name, offset, value } => {
                    if let Some(p) = projects.iter_mut().find(|p| p.name() == name) {
                        p.add_patch(Patch::new(*offset, value.as_str()));
                    }
                }
                TestOperation::Restart => {
                    projects.sort_by_key(|p| p.name().to_lowercase());
                }
            }
        }
        projects
    }

    pub fn verify_against_log(&mut self) {
        let expected = self.expected_projects();
        assert_eq!(self.workspace().projects(), expected.as_slice());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tracing_test::traced_test;

    #[test]
    #[traced_test]
    fn test_multi_session_history() {
        let mut harness = WorkspaceTestHarness::new();

        harness.create("Zeta", "z").unwrap();
        harness.create("alpha", "").unwrap();
        harness.add_patch("Zeta", 0x100, "00").unwrap();
        harness.add_patch("Zeta", 0x104, "01").unwrap();
        harness.verify_against_log();

        harness.restart().unwrap();
        harness.verify_against_log();
        assert_eq!(harness.workspace().project(0).unwrap().name(), "alpha");

        harness.create("Mid", "m").unwrap();
        harness.add_patch("alpha", 1, "ff").unwrap();
        harness.delete("zeta").unwrap();
        harness.verify_against_log();

        harness.restart().unwrap();
        harness.verify_against_log();
        assert!(!harness.root().join("projects").join("Zeta.json").exists());
    }

    #[test]
    fn test_indices_shift_after_delete() {
        let mut harness = WorkspaceTestHarness::new();
        for name in ["a", "b", "c", "d"] {
            harness.create(name, "").unwrap();
        }

        let workspace = harness.workspace();
        workspace.delete_project_at(1).unwrap();
        assert_eq!(workspace.project(1).unwrap().name(), "c");
        workspace.delete_project_at(1).unwrap();
        assert_eq!(workspace.project(1).unwrap().name(), "d");
        assert_eq!(workspace.len(), 2);
    }

    #[test]
    fn test_corrupt_file_does_not_block_session() {
        let mut harness = WorkspaceTestHarness::new();
        harness.create("good", "").unwrap();
        harness.restart().unwrap();

        let projects_dir = harness.root().join("projects");
        fs::write(projects_dir.join("bad.json"), "{ this is not json").unwrap();

        harness.restart().unwrap();
        let workspace = harness.workspace();
        assert_eq!(workspace.len(), 1);
        assert_eq!(workspace.load_failures().len(), 1);

        // The skipped file is left alone for the user to repair
        assert!(projects_dir.join("bad.json").exists());
    }

    #[test]
    fn test_patch_order_survives_restarts() {
        let mut harness = WorkspaceTestHarness::new();
        harness.create("p", "").unwrap();
        for offset in [5u64, 1, 9, 1, 3] {
            harness.add_patch("p", offset, "v").unwrap();
        }
        for _ in 0..3 {
            harness.restart().unwrap();
        }
        let offsets: Vec<u64> = harness
            .workspace()
            .project(0)
            .unwrap()
            .patches()
            .iter()
            .map(|p| p.offset())
            .collect();
        assert_eq!(offsets, vec![5, 1, 9, 1, 3]);
    }
}

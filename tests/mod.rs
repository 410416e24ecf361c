//! Main test module for the MDT workspace engine
//!
//! This module includes all test suites:
//! - Integration tests for multi-session scenarios
//! - Property-based tests for invariants

pub mod integration;
pub mod property;

#[cfg(test)]
mod edge_cases {
    use ::mdt_workspace::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_special_project_names() {
        let root_dir = TempDir::new().unwrap();
        let mut workspace = Workspace::open(root_dir.path()).unwrap();

        let special_names = vec![
            "name with spaces",
            "name-with-dashes",
            "name.with.dots",
            "name(with)parens",
            "한글 프로젝트",
        ];
        for name in &special_names {
            workspace.create_project(name, "").unwrap();
        }

        let report = workspace.close();
        assert!(report.is_complete(), "failures: {:?}", report.failures);

        let workspace = Workspace::open(root_dir.path()).unwrap();
        assert_eq!(workspace.len(), special_names.len());
        for name in &special_names {
            assert!(workspace.find(name).is_some(), "missing {}", name);
        }
    }

    #[test]
    fn test_name_with_separator_rejected() {
        let root_dir = TempDir::new().unwrap();
        let mut workspace = Workspace::open(root_dir.path()).unwrap();
        workspace.create_project("ok", "").unwrap();
        assert!(matches!(
            workspace.create_project("no/such/dir", ""),
            Err(WorkspaceError::InvalidName(_))
        ));
        assert!(matches!(
            workspace.create_project("../escaped", ""),
            Err(WorkspaceError::InvalidName(_))
        ));
        workspace.create_project("also ok", "").unwrap();

        let report = workspace.close();
        assert!(report.is_complete());
        assert_eq!(report.written, vec!["ok", "also ok"]);
        assert!(!root_dir.path().join("escaped.json").exists());

        let workspace = Workspace::open(root_dir.path()).unwrap();
        assert_eq!(workspace.len(), 2);
    }

    #[test]
    fn test_stored_name_with_separator_skipped() {
        let root_dir = TempDir::new().unwrap();
        let projects = root_dir.path().join("projects");
        fs::create_dir_all(&projects).unwrap();
        fs::write(
            projects.join("x.json"),
            r#"{"name":"../../x","author":"a","patches":[]}"#,
        )
        .unwrap();

        let workspace = Workspace::open(root_dir.path()).unwrap();
        assert!(workspace.is_empty());
        assert!(matches!(
            workspace.load_failures()[0].error,
            WorkspaceError::MalformedProject { .. }
        ));
    }

    #[test]
    fn test_unlisted_files_ignored() {
        let root_dir = TempDir::new().unwrap();
        let projects = root_dir.path().join("projects");
        fs::create_dir_all(&projects).unwrap();
        fs::write(projects.join("README.md"), "# notes").unwrap();
        fs::write(projects.join("backup.json.bak"), "{}").unwrap();

        let workspace = Workspace::open(root_dir.path()).unwrap();
        assert!(workspace.is_empty());
        assert!(workspace.load_failures().is_empty());
    }

    #[test]
    fn test_root_created_when_missing() {
        let root_dir = TempDir::new().unwrap();
        let root = root_dir.path().join("deep").join("MDT");

        let workspace = Workspace::open(&root).unwrap();
        assert!(workspace.layout_report().created_any());
        assert!(root.join("projects").is_dir());

        // Second open creates nothing
        drop(workspace);
        let workspace = Workspace::open(&root).unwrap();
        assert!(!workspace.layout_report().created_any());
    }

    #[test]
    fn test_duplicate_names_on_disk_both_load() {
        let root_dir = TempDir::new().unwrap();
        let projects = root_dir.path().join("projects");
        fs::create_dir_all(&projects).unwrap();
        fs::write(
            projects.join("one.json"),
            r#"{"name":"Same","author":"a","patches":[]}"#,
        )
        .unwrap();
        fs::write(
            projects.join("two.json"),
            r#"{"name":"same","author":"b","patches":[]}"#,
        )
        .unwrap();

        let mut workspace = Workspace::open(root_dir.path()).unwrap();
        assert_eq!(workspace.len(), 2);
        assert!(matches!(
            workspace.create_project("SAME", ""),
            Err(WorkspaceError::DuplicateName(_))
        ));
    }
}

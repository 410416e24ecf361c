//! Property-based testing for the workspace engine
//!
//! Uses proptest to check the JSON round-trip and the name-uniqueness rule
//! across randomly generated projects and operation sequences.

use ::mdt_workspace::*;
use proptest::prelude::*;
use tempfile::TempDir;

/// Generate a patch value, either text or a number
fn value_strategy() -> impl Strategy<Value = PatchValue> {
    prop_oneof![
        "[0-9A-F ]{0,16}".prop_map(PatchValue::from),
        any::<i64>().prop_map(PatchValue::from),
        any::<u64>().prop_map(PatchValue::from),
    ]
}

fn patch_strategy() -> impl Strategy<Value = Patch> {
    (any::<u64>(), value_strategy()).prop_map(|(offset, value)| Patch::new(offset, value))
}

/// Generate a project with a non-empty name
fn project_strategy() -> impl Strategy<Value = Project> {
    (
        "[A-Za-z0-9 _-]{1,20}",
        "[A-Za-z ]{0,12}",
        prop::collection::vec(patch_strategy(), 0..20),
    )
        .prop_map(|(name, author, patches)| {
            let mut project = Project::new(name, author).unwrap();
            for patch in patches {
                project.add_patch(patch);
            }
            project
        })
}

/// Names drawn from a small alphabet so collisions are common
fn colliding_name_strategy() -> impl Strategy<Value = String> {
    "[aAbB]{1,3}"
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn prop_json_round_trip(project in project_strategy()) {
        let json = project.to_json().unwrap();
        let loaded = Project::from_json(&json).unwrap();
        prop_assert_eq!(loaded, project);
    }

    #[test]
    fn prop_names_stay_unique(names in prop::collection::vec(colliding_name_strategy(), 1..12)) {
        let root_dir = TempDir::new().unwrap();
        let mut workspace = Workspace::open(root_dir.path()).unwrap();

        for name in &names {
            let before = workspace.len();
            match workspace.create_project(name, "") {
                Ok(index) => {
                    prop_assert_eq!(index, before);
                    prop_assert_eq!(workspace.project(index).unwrap().name(), name.as_str());
                }
                Err(WorkspaceError::DuplicateName(_)) => {
                    prop_assert_eq!(workspace.len(), before);
                }
                Err(e) => prop_assert!(false, "unexpected error: {}", e),
            }
        }

        let mut lowered: Vec<String> = workspace
            .projects()
            .iter()
            .map(|p| p.name().to_lowercase())
            .collect();
        let total = lowered.len();
        lowered.sort();
        lowered.dedup();
        prop_assert_eq!(lowered.len(), total);
    }

    #[test]
    fn prop_discovery_order_is_sorted(names in prop::collection::btree_set("[a-zA-Z]{1,8}", 1..8)) {
        let root_dir = TempDir::new().unwrap();
        let mut workspace = Workspace::open(root_dir.path()).unwrap();
        for name in &names {
            // Case-insensitive duplicates are allowed to fail here
            let _ = workspace.create_project(name, "");
        }
        workspace.close();

        let workspace = Workspace::open(root_dir.path()).unwrap();
        let loaded: Vec<String> = workspace
            .projects()
            .iter()
            .map(|p| p.name().to_string())
            .collect();
        let mut sorted = loaded.clone();
        sorted.sort_by_key(|n| n.to_lowercase());
        prop_assert_eq!(loaded, sorted);
    }
}

//! # MDT Workspace - persistence for binary patch projects
//!
//! Keeps a user's collection of patch projects on disk, one JSON document per
//! project, and enforces the workspace rules in memory.
//!
//! ## Overview
//!
//! - **Layout bootstrap**: `root/`, `root/projects/`, `root/export/` and a
//!   `.nomedia` marker are created on open if missing
//! - **Discovery**: every `*.json` file in `projects/` is loaded in
//!   case-insensitive file-name order; unreadable files are skipped and
//!   reported
//! - **Uniqueness**: project names are unique ignoring case
//! - **Persistence**: closing the workspace rewrites every project file;
//!   one failing write never stops the others
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use mdt_workspace::{Patch, Workspace};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let mut workspace = Workspace::open("/sdcard/MDT")?;
//! for failure in workspace.load_failures() {
//!     eprintln!("skipped {:?}: {}", failure.path, failure.error);
//! }
//!
//! let index = workspace.create_project("Infinite Items", "ChalkPE")?;
//! workspace.project_mut(index)?.add_patch(Patch::new(0x1f40, "90 90"));
//!
//! let report = workspace.close();
//! println!("Saved {} projects", report.written.len());
//! # Ok(())
//! # }
//! ```
//!
//! ## Error Handling
//!
//! Single-item operations return `Result<T, WorkspaceError>`. Bulk operations
//! (layout bootstrap, discovery, persist-all) always run to the end and
//! return a report listing the items that failed.
//!
//! ## Module Organization
//!
//! - [`patch`]: patch descriptors
//! - [`project`]: projects and their JSON form
//! - [`layout`]: on-disk directory bootstrap
//! - [`store`]: discovery and project file I/O
//! - [`workspace`]: the session-owned project collection
//! - [`types`]: configuration and reports
//! - [`error`]: error types

pub mod error;
pub mod layout;
pub mod patch;
pub mod project;
pub mod store;
pub mod types;
pub mod workspace;

mod utils;

pub use error::{Result, WorkspaceError};
pub use layout::DirectoryLayout;
pub use patch::{Patch, PatchValue};
pub use project::{Project, DEFAULT_AUTHOR};
pub use store::ProjectStore;
pub use types::*;
pub use workspace::{Workspace, WorkspaceBuilder};

//! # MDT CLI - manage patch projects from the terminal
//!
//! A small front end over the workspace library. Every invocation is one
//! session: the workspace is opened (creating its layout if needed), the
//! command runs, and commands that change anything close the workspace,
//! which writes every project back to disk.
//!
//! ## Usage
//! ```bash
//! # Create the workspace layout
//! mdt --root ~/MDT init
//!
//! # Create a project and add patches
//! mdt create "Infinite Items" --author ChalkPE
//! mdt add-patch "Infinite Items" 0x1f40 "90 90"
//!
//! # Inspect
//! mdt list --detailed
//! mdt show "Infinite Items"
//!
//! # Delete by name or by list position
//! mdt delete "Infinite Items"
//! mdt delete --index 0
//! ```

use clap::{Parser, Subcommand};
use colored::*;
use mdt_workspace::{
    Patch, PatchValue, PersistReport, Result, Workspace, WorkspaceBuilder, WorkspaceError,
};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// MDT CLI - binary patch project workspace
#[derive(Parser)]
#[command(name = "mdt")]
#[command(version)]
#[command(about = "Manage binary patch projects stored as JSON files")]
#[command(long_about = None)]
struct Cli {
    /// Workspace root (defaults to ./MDT)
    #[arg(short, long, global = true)]
    root: Option<PathBuf>,

    /// Author recorded for projects created without one
    #[arg(long, global = true)]
    default_author: Option<String>,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create the workspace layout
    Init,

    /// List projects
    #[command(alias = "ls")]
    List {
        /// Show author and patch count
        #[arg(short, long)]
        detailed: bool,
    },

    /// Create a project
    #[command(alias = "new")]
    Create {
        /// Project name
        name: String,

        /// Author name
        #[arg(short, long, default_value = "")]
        author: String,
    },

    /// Delete a project
    #[command(alias = "rm")]
    Delete {
        /// Project name
        #[arg(required_unless_present = "index", conflicts_with = "index")]
        name: Option<String>,

        /// Position in `mdt list`
        #[arg(short, long)]
        index: Option<usize>,
    },

    /// Show a project's patches
    Show {
        /// Project name
        name: String,
    },

    /// Append a patch to a project
    AddPatch {
        /// Project name
        name: String,

        /// Offset, decimal or 0x-prefixed hex
        #[arg(value_parser = parse_offset)]
        offset: u64,

        /// Value to write
        value: String,

        /// Store the value as a number instead of text
        #[arg(long)]
        numeric: bool,
    },

    /// Remove a patch from a project
    RemovePatch {
        /// Project name
        name: String,

        /// Position in `mdt show`
        index: usize,
    },
}

fn main() {
    let cli = Cli::parse();

    // Set up logging
    if cli.verbose {
        tracing_subscriber::fmt()
            .with_max_level(tracing::Level::DEBUG)
            .with_writer(std::io::stderr)
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(EnvFilter::from_default_env())
            .with_writer(std::io::stderr)
            .init();
    }

    // Disable colors if needed
    if std::env::var("NO_COLOR").is_ok() {
        colored::control::set_override(false);
    }

    if let Err(e) = run(cli) {
        eprintln!("{}: {}", "Error".red().bold(), e.user_message());
        std::process::exit(1);
    }
}

/// Main command runner
fn run(cli: Cli) -> Result<()> {
    let root = cli.root.unwrap_or_else(|| PathBuf::from("MDT"));
    let mut builder = WorkspaceBuilder::new();
    if let Some(author) = cli.default_author {
        builder = builder.default_author(author);
    }
    let workspace = builder.build(root)?;
    report_load_failures(&workspace);

    match cli.command {
        Commands::Init => cmd_init(workspace),
        Commands::List { detailed } => cmd_list(&workspace, detailed),
        Commands::Create { name, author } => cmd_create(workspace, name, author),
        Commands::Delete { name, index } => cmd_delete(workspace, name, index),
        Commands::Show { name } => cmd_show(&workspace, &name),
        Commands::AddPatch { name, offset, value, numeric } => {
            cmd_add_patch(workspace, name, offset, value, numeric)
        }
        Commands::RemovePatch { name, index } => cmd_remove_patch(workspace, name, index),
    }
}

fn cmd_init(workspace: Workspace) -> Result<()> {
    let report = workspace.layout_report();
    if !report.is_complete() {
        for failure in &report.failures {
            println!("{} {}", "!".yellow().bold(), failure);
        }
        return Err(WorkspaceError::internal("workspace layout is incomplete"));
    }

    if report.created_any() {
        println!("{} Initialized MDT workspace", "✓".green().bold());
    } else {
        println!("{} Workspace already initialized", "✓".green().bold());
    }
    println!("  Root: {}", workspace.config().root_path.display().to_string().cyan());
    println!("  Projects: {}", workspace.projects_dir().display().to_string().cyan());
    println!("  Export: {}", workspace.export_dir().display().to_string().cyan());
    Ok(())
}

fn cmd_list(workspace: &Workspace, detailed: bool) -> Result<()> {
    if workspace.is_empty() {
        println!("{}", "No projects found.".yellow());
        return Ok(());
    }

    println!("{}", "Projects:".blue().bold());
    for (index, project) in workspace.projects().iter().enumerate() {
        print!("{:>3}  {}", index, project.name().bold());
        if detailed {
            print!(
                "  {} | {} patches",
                project.author().dimmed(),
                project.len().to_string().dimmed()
            );
        }
        println!();
    }
    Ok(())
}

fn cmd_create(mut workspace: Workspace, name: String, author: String) -> Result<()> {
    let index = workspace.create_project(&name, &author)?;
    let author = workspace.project(index)?.author().to_string();
    finish(workspace)?;

    println!("{} Created project {} by {}", "✓".green().bold(), name.cyan(), author);
    Ok(())
}

fn cmd_delete(mut workspace: Workspace, name: Option<String>, index: Option<usize>) -> Result<()> {
    let removed = match (name, index) {
        (Some(name), _) => workspace.delete_project(&name)?,
        (None, Some(index)) => workspace.delete_project_at(index)?,
        (None, None) => {
            return Err(WorkspaceError::internal("a project name or --index is required"))
        }
    };
    finish(workspace)?;

    println!("{} Deleted project {}", "✓".green().bold(), removed.name().cyan());
    Ok(())
}

fn cmd_show(workspace: &Workspace, name: &str) -> Result<()> {
    let project = workspace
        .find(name)
        .ok_or_else(|| WorkspaceError::ProjectNotFound(name.to_string()))?;

    println!("{} by {}", project.name().blue().bold(), project.author());
    if project.is_empty() {
        println!("{}", "  No patches.".dimmed());
    }
    for (index, patch) in project.patches().iter().enumerate() {
        println!("{:>3}  {}", index, patch);
    }
    Ok(())
}

fn cmd_add_patch(
    mut workspace: Workspace,
    name: String,
    offset: u64,
    value: String,
    numeric: bool,
) -> Result<()> {
    let value = if numeric {
        let number: i64 = value
            .parse()
            .map_err(|_| WorkspaceError::internal(format!("{:?} is not a number", value)))?;
        PatchValue::from(number)
    } else {
        PatchValue::from(value)
    };
    let patch = Patch::new(offset, value);

    let index = workspace
        .index_of(&name)
        .ok_or_else(|| WorkspaceError::ProjectNotFound(name.clone()))?;
    workspace.project_mut(index)?.add_patch(patch.clone());
    finish(workspace)?;

    println!("{} Added {}", "✓".green().bold(), patch);
    Ok(())
}

fn cmd_remove_patch(mut workspace: Workspace, name: String, index: usize) -> Result<()> {
    let project_index = workspace
        .index_of(&name)
        .ok_or_else(|| WorkspaceError::ProjectNotFound(name.clone()))?;
    let patch = workspace.project_mut(project_index)?.remove_patch(index)?;
    finish(workspace)?;

    println!("{} Removed {}", "✓".green().bold(), patch);
    Ok(())
}

// Helper functions

/// Close the session, failing if any project could not be written
fn finish(workspace: Workspace) -> Result<()> {
    let report: PersistReport = workspace.close();
    for failure in &report.failures {
        eprintln!("{} {}: {}", "!".yellow().bold(), failure.name, failure.error);
    }
    if report.is_complete() {
        Ok(())
    } else {
        Err(WorkspaceError::internal(format!(
            "{} of {} projects could not be saved",
            report.failures.len(),
            report.attempted()
        )))
    }
}

fn report_load_failures(workspace: &Workspace) {
    for failure in workspace.load_failures() {
        eprintln!(
            "{} skipped {}: {}",
            "!".yellow().bold(),
            failure.path.display(),
            failure.error
        );
    }
}

fn parse_offset(s: &str) -> std::result::Result<u64, String> {
    let parsed = match s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
        Some(hex) => u64::from_str_radix(hex, 16),
        None => s.parse(),
    };
    parsed.map_err(|e| format!("invalid offset {:?}: {}", s, e))
}

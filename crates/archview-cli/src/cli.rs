//! Command-line interface for the archview utility
//!
//! Reads and writes workspace documents (a model plus its views) as JSON.

use anyhow::{anyhow, Context, Result};
use clap::{Parser, Subcommand};
use serde::Serialize;
use std::fs;
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use archview::core::logging::init_logging;
use archview::{ViewRef, Workspace};

/// Archview - generate, validate and merge architecture views
#[derive(Parser)]
#[command(name = "archview")]
#[command(about = "Generate, validate and merge views of architecture model workspaces")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(author = env!("CARGO_PKG_AUTHORS"))]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,

    /// Set log level (trace|debug|info|warn|error)
    #[arg(long, value_enum, default_value_t = LogLevel::Info)]
    pub log_level: LogLevel,

    /// Set log format (compact|pretty|json)
    #[arg(long, value_enum, default_value_t = LogFormat::Compact)]
    pub log_format: LogFormat,
}

/// Log level options
#[derive(Copy, Clone, Debug, clap::ValueEnum, PartialEq, Eq)]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

impl LogLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Trace => "trace",
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
        }
    }
}

/// Log format options
#[derive(Copy, Clone, Debug, clap::ValueEnum, PartialEq, Eq)]
pub enum LogFormat {
    Compact,
    Pretty,
    Json,
}

impl LogFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogFormat::Compact => "compact",
            LogFormat::Pretty => "pretty",
            LogFormat::Json => "json",
        }
    }
}

#[derive(Subcommand)]
pub enum Commands {
    /// Create the default views for a workspace
    Generate {
        /// Workspace JSON file (use - for stdin)
        #[arg(short, long)]
        input: Option<PathBuf>,

        /// Output file for the workspace JSON (use - for stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Write compact JSON instead of pretty-printed JSON
        #[arg(long)]
        compact: bool,
    },

    /// Check that every view refers to elements and relationships that exist
    Validate {
        /// Workspace JSON file (use - for stdin)
        #[arg(short, long)]
        input: Option<PathBuf>,
    },

    /// Copy diagram layout from a previous revision of a workspace
    Merge {
        /// Previous revision whose layout is kept
        #[arg(short, long)]
        previous: PathBuf,

        /// Current revision (use - for stdin)
        #[arg(short, long)]
        input: Option<PathBuf>,

        /// Output file for the merged workspace JSON (use - for stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Write compact JSON instead of pretty-printed JSON
        #[arg(long)]
        compact: bool,
    },

    /// List the views in a workspace
    List {
        /// Workspace JSON file (use - for stdin)
        #[arg(short, long)]
        input: Option<PathBuf>,

        /// Show in JSON format
        #[arg(long)]
        json: bool,
    },
}

/// One row of `archview list`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ViewSummary {
    pub key: String,
    pub view_type: String,
    pub order: u32,
    pub elements: usize,
    pub relationships: usize,
}

impl ViewSummary {
    fn from_view(view: ViewRef<'_>, workspace: &Workspace) -> Self {
        let (elements, relationships) = match view {
            ViewRef::Model(view) => (view.element_count(), view.relationship_count()),
            ViewRef::Filtered(filtered) => match workspace.views.model_view(filtered.base_view_key()) {
                Some(base) => (
                    filtered.element_views(base, &workspace.model).len(),
                    filtered.relationship_views(base, &workspace.model).len(),
                ),
                None => (0, 0),
            },
            ViewRef::Image(_) => (0, 0),
        };
        Self {
            key: view.key().to_string(),
            view_type: view.view_type().to_string(),
            order: view.order(),
            elements,
            relationships,
        }
    }
}

/// Main CLI application
#[derive(Debug, Default)]
pub struct ArchviewApp;

impl ArchviewApp {
    pub fn new() -> Self {
        Self
    }

    /// Run the application with the given CLI arguments
    pub fn run(&mut self, cli: Cli) -> Result<()> {
        // Environment variables take precedence over CLI flags
        let log_level = std::env::var("ARCHVIEW_LOG_LEVEL")
            .ok()
            .or_else(|| std::env::var("RUST_LOG").ok())
            .or_else(|| Some(cli.log_level.as_str().to_string()));

        let log_format = std::env::var("ARCHVIEW_LOG_FORMAT")
            .ok()
            .or_else(|| Some(cli.log_format.as_str().to_string()));

        if let Err(e) = init_logging(log_level.as_deref(), log_format.as_deref()) {
            eprintln!("Warning: Failed to initialize logging: {}", e);
        }

        if cli.verbose {
            eprintln!("Archview v{}", env!("CARGO_PKG_VERSION"));
        }

        match cli.command {
            Commands::Generate {
                input,
                output,
                compact,
            } => self.generate_command(input, output, compact, cli.verbose),
            Commands::Validate { input } => self.validate_command(input, cli.verbose),
            Commands::Merge {
                previous,
                input,
                output,
                compact,
            } => self.merge_command(&previous, input, output, compact, cli.verbose),
            Commands::List { input, json } => self.list_command(input, json),
        }
    }

    /// Handle the generate command
    fn generate_command(
        &self,
        input: Option<PathBuf>,
        output: Option<PathBuf>,
        compact: bool,
        verbose: bool,
    ) -> Result<()> {
        let mut workspace = self.load_workspace(input)?;
        let before = workspace.views.len();
        workspace
            .create_default_views()
            .context("Failed to create default views")?;

        if verbose {
            eprintln!(
                "Created {} views",
                workspace.views.len().saturating_sub(before)
            );
        }
        self.write_output(output, &to_json(&workspace, compact)?)
    }

    /// Handle the validate command
    fn validate_command(&self, input: Option<PathBuf>, verbose: bool) -> Result<()> {
        match self.load_workspace(input) {
            Ok(workspace) => {
                if verbose {
                    eprintln!(
                        "Checked {} elements and {} relationships",
                        workspace.model.element_count(),
                        workspace.model.relationship_count()
                    );
                }
                println!("✓ Valid workspace with {} views", workspace.views.len());
                Ok(())
            }
            Err(e) => {
                println!("✗ Invalid workspace: {:#}", e);
                Err(e)
            }
        }
    }

    /// Handle the merge command
    fn merge_command(
        &self,
        previous: &Path,
        input: Option<PathBuf>,
        output: Option<PathBuf>,
        compact: bool,
        verbose: bool,
    ) -> Result<()> {
        let previous = self
            .load_workspace(Some(previous.to_path_buf()))
            .context("Failed to load the previous revision")?;
        let mut workspace = self.load_workspace(input)?;

        workspace.copy_layout_information_from(&previous);
        if verbose {
            eprintln!("Merged layout from '{}'", previous.name);
        }
        self.write_output(output, &to_json(&workspace, compact)?)
    }

    /// Handle the list command
    fn list_command(&self, input: Option<PathBuf>, json: bool) -> Result<()> {
        let workspace = self.load_workspace(input)?;
        let summaries = self.summarize(&workspace);

        if json {
            println!("{}", serde_json::to_string_pretty(&summaries)?);
        } else {
            for summary in &summaries {
                println!(
                    "{:<32} {:<16} {:>4} elements {:>4} relationships",
                    summary.key, summary.view_type, summary.elements, summary.relationships
                );
            }
            println!();
            println!("Total: {} views", summaries.len());
        }
        Ok(())
    }

    /// One summary per view, in view order
    pub fn summarize(&self, workspace: &Workspace) -> Vec<ViewSummary> {
        workspace
            .views
            .all_views()
            .into_iter()
            .map(|view| ViewSummary::from_view(view, workspace))
            .collect()
    }

    /// Read, parse and hydrate a workspace
    pub fn load_workspace(&self, input: Option<PathBuf>) -> Result<Workspace> {
        let content = self.read_input(input)?;
        debug!(bytes = content.len(), "Read workspace");
        let mut workspace: Workspace =
            serde_json::from_str(&content).context("Failed to parse workspace JSON")?;
        workspace
            .hydrate()
            .context("Workspace failed validation")?;
        info!(
            workspace = %workspace.name,
            elements = workspace.model.element_count(),
            views = workspace.views.len(),
            "Loaded workspace"
        );
        Ok(workspace)
    }

    /// Read input from file or stdin
    pub fn read_input(&self, input: Option<PathBuf>) -> Result<String> {
        match input {
            Some(path) if path.to_string_lossy() != "-" => fs::read_to_string(&path)
                .map_err(|e| anyhow!("Failed to read input file '{}': {}", path.display(), e)),
            _ => {
                let mut content = String::new();
                io::stdin().read_to_string(&mut content)?;
                Ok(content)
            }
        }
    }

    /// Write output to file or stdout
    pub fn write_output(&self, output: Option<PathBuf>, content: &str) -> Result<()> {
        match output {
            Some(path) if path.to_string_lossy() != "-" => {
                fs::write(&path, content).map_err(|e| {
                    anyhow!("Failed to write output file '{}': {}", path.display(), e)
                })?;
            }
            _ => {
                let mut stdout = io::stdout();
                stdout.write_all(content.as_bytes())?;
                if !content.ends_with('\n') {
                    writeln!(stdout)?;
                }
                stdout.flush()?;
            }
        }
        Ok(())
    }
}

fn to_json(workspace: &Workspace, compact: bool) -> Result<String> {
    let json = if compact {
        serde_json::to_string(workspace)?
    } else {
        serde_json::to_string_pretty(workspace)?
    };
    Ok(json)
}

//! CLI command definitions and argument parsing.

use clap::{Parser, Subcommand};

/// Catalog CLI - Browse the product catalog and curate recommendations.
#[derive(Debug, Parser)]
#[command(name = "catalog")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Output format
    #[arg(short, long, value_enum, global = true)]
    pub format: Option<CliFormat>,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Configuration file path
    #[arg(short, long, global = true)]
    pub config: Option<String>,

    /// Profile to use
    #[arg(short, long, global = true)]
    pub profile: Option<String>,

    /// Catalog service URL (overrides the profile)
    #[arg(short, long, global = true, env = "CATALOG_URL")]
    pub url: Option<String>,

    #[command(subcommand)]
    pub command: Option<Command>,
}

/// Output format options.
#[derive(Debug, Clone, Copy, clap::ValueEnum)]
pub enum CliFormat {
    /// Table format (default)
    Table,
    /// JSON format
    Json,
    /// Quiet format (IDs only)
    Quiet,
}

/// CLI commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// List catalog products
    List,

    /// Create an empty product
    Create,

    /// Delete catalog products
    Delete(DeleteArgs),

    /// Queue a recommendation payload
    Recommend(RecommendArgs),

    /// Show the recommendation queue
    Queue,

    /// Save a queued recommendation into the catalog
    Save(SaveArgs),

    /// Empty the recommendation queue
    Clear,

    /// Manage configuration profiles
    Profile(ProfileArgs),

    /// Enter interactive REPL mode
    Repl,
}

impl Command {
    /// Name as typed by the user.
    pub fn name(&self) -> &'static str {
        match self {
            Command::List => "list",
            Command::Create => "create",
            Command::Delete(_) => "delete",
            Command::Recommend(_) => "recommend",
            Command::Queue => "queue",
            Command::Save(_) => "save",
            Command::Clear => "clear",
            Command::Profile(_) => "profile",
            Command::Repl => "repl",
        }
    }
}

/// Arguments for the delete command.
#[derive(Debug, Parser)]
pub struct DeleteArgs {
    /// Product IDs to delete
    #[arg(required = true)]
    pub ids: Vec<i64>,
}

/// Arguments for the recommend command.
#[derive(Debug, Parser)]
pub struct RecommendArgs {
    /// JSON payload, `@path` to read a file, or `-` for stdin
    pub payload: String,

    /// Save the recommendation right away and wait for it to leave the queue
    #[arg(short, long)]
    pub save: bool,
}

/// Arguments for the save command.
#[derive(Debug, Parser)]
pub struct SaveArgs {
    /// Queue row number, as shown by `queue` (starting at 1)
    pub row: usize,
}

/// Arguments for profile management.
#[derive(Debug, Parser)]
pub struct ProfileArgs {
    #[command(subcommand)]
    pub action: ProfileAction,
}

/// Profile management actions.
#[derive(Debug, Subcommand)]
pub enum ProfileAction {
    /// List all profiles
    List,

    /// Show active profile
    Show,

    /// Switch to a different profile
    Switch {
        /// Profile name
        name: String,
    },

    /// Create or update a profile
    Set {
        /// Profile name
        name: String,
        /// Catalog service URL
        #[arg(short, long)]
        url: String,
    },

    /// Delete a profile
    Delete {
        /// Profile name
        name: String,
    },
}

impl From<CliFormat> for crate::config::OutputFormat {
    fn from(format: CliFormat) -> Self {
        match format {
            CliFormat::Table => crate::config::OutputFormat::Table,
            CliFormat::Json => crate::config::OutputFormat::Json,
            CliFormat::Quiet => crate::config::OutputFormat::Quiet,
        }
    }
}

//! CLI argument definitions using clap derive

use crate::render::RenderMode;
use clap::{ArgAction, Parser, Subcommand, ValueEnum};
use clap_complete::Shell;
use std::path::PathBuf;

/// mathrender - Cached KaTeX rendering
///
/// Renders prose with $...$ and $$...$$ formulas, or bare LaTeX
/// environments, to HTML through KaTeX.
#[derive(Parser, Debug)]
#[command(name = "mathrender")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,

    /// Increase verbosity (-v info, -vv debug)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,

    /// Configuration file path
    #[arg(short, long, global = true, env = "MATHRENDER_CONFIG")]
    pub config: Option<PathBuf>,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Render content to HTML
    Render(RenderArgs),

    /// Pre-render a file of formulas and report cache statistics
    Warmup(WarmupArgs),

    /// Check the formula engine and show settings
    Status,

    /// Show or edit configuration
    Config(ConfigArgs),

    /// Generate shell completions
    Completions {
        /// Target shell
        shell: Shell,
    },
}

/// Arguments for the render command
#[derive(Parser, Debug)]
pub struct RenderArgs {
    /// Content to render (reads stdin when omitted)
    #[arg(conflicts_with = "file")]
    pub content: Option<String>,

    /// Read content from a file
    #[arg(short, long)]
    pub file: Option<PathBuf>,

    /// Render mode (default: from config)
    #[arg(short, long)]
    pub mode: Option<RenderMode>,

    /// Prefer inline rendering for single formulas
    #[arg(short, long)]
    pub inline: bool,

    /// Output format
    #[arg(short, long, default_value = "html")]
    pub output: RenderOutput,

    /// Wrap the result in a full HTML page with the KaTeX stylesheet
    #[arg(long)]
    pub standalone: bool,

    /// Embed the stylesheet instead of linking the CDN copy
    #[arg(long, requires = "standalone")]
    pub embed_css: bool,
}

/// Output format for the render command
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum RenderOutput {
    /// HTML markup
    Html,
    /// JSON fragments with render metadata
    Json,
}

/// Arguments for the warmup command
#[derive(Parser, Debug)]
pub struct WarmupArgs {
    /// File with one formula per line
    pub file: PathBuf,

    /// Warm inline renders instead of display renders
    #[arg(short, long)]
    pub inline: bool,

    /// Print the report as JSON
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the config command
#[derive(Parser, Debug)]
pub struct ConfigArgs {
    /// Subcommand for config
    #[command(subcommand)]
    pub action: Option<ConfigAction>,
}

/// Config subcommands
#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Show current configuration
    Show,

    /// Show configuration file path
    Path,

    /// Initialize default configuration
    Init {
        /// Overwrite existing configuration
        #[arg(short, long)]
        force: bool,
    },

    /// Set a configuration value
    Set {
        /// Configuration key (e.g., cache.max_size, render.macros.\RR)
        key: String,
        /// Value to set
        value: String,
    },
}

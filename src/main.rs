//! mathrender - cached KaTeX rendering
//!
//! CLI entry point that dispatches to subcommands.

use clap::Parser;
use console::style;
use mathrender::cli::{commands, Cli, Commands};
use mathrender::config::{Config, ConfigManager};
use mathrender::error::MathResult;
use std::process::ExitCode;
use tracing::debug;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> ExitCode {
    match run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{} {}", style("Error:").red().bold(), e);
            if let Some(hint) = e.hint() {
                eprintln!("{} {}", style("Hint:").yellow(), hint);
            }
            ExitCode::FAILURE
        }
    }
}

async fn run() -> MathResult<()> {
    let cli = Cli::parse();

    // Completions need neither config nor logging
    if let Commands::Completions { shell } = cli.command {
        return commands::completions(shell);
    }

    let config_manager = match cli.config {
        Some(ref path) => ConfigManager::with_path(path.clone()),
        None => ConfigManager::new(),
    };
    let config = config_manager.load().await?;

    init_logging(cli.verbose, &config);
    mathrender::ui::init_theme();
    debug!("Using config at {}", config_manager.path().display());

    match cli.command {
        Commands::Completions { .. } => unreachable!("Completions handled above"),
        Commands::Render(args) => commands::render(args, &config).await,
        Commands::Warmup(args) => commands::warmup(args, &config).await,
        Commands::Status => commands::status(&config).await,
        Commands::Config(args) => commands::config(args, &config, &config_manager).await,
    }
}

/// Log to stderr so rendered markup on stdout stays clean.
/// 0 = warn, 1 = info, 2+ = debug; `RUST_LOG` overrides.
fn init_logging(verbose: u8, config: &Config) {
    let default_level = match verbose {
        0 => "mathrender=warn",
        1 => "mathrender=info",
        _ => "mathrender=debug",
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false);

    if config.general.log_format == "json" {
        builder.json().init();
    } else {
        builder.without_time().init();
    }
}

//! Config command - show or edit configuration

use crate::cli::args::{ConfigAction, ConfigArgs};
use crate::config::{Config, ConfigManager};
use crate::engine::{Backend, OutputFormat};
use crate::error::{MathError, MathResult};
use crate::render::RenderMode;
use crate::ui::{self, UiContext};

/// Execute the config command
pub async fn execute(args: ConfigArgs, config: &Config, manager: &ConfigManager) -> MathResult<()> {
    match args.action {
        None | Some(ConfigAction::Show) => show_config(config)?,
        Some(ConfigAction::Path) => show_path(manager),
        Some(ConfigAction::Init { force }) => init_config(manager, force).await?,
        Some(ConfigAction::Set { key, value }) => set_value(manager, config, &key, &value).await?,
    }

    Ok(())
}

fn show_config(config: &Config) -> MathResult<()> {
    println!("{}", toml::to_string_pretty(config)?);
    Ok(())
}

fn show_path(manager: &ConfigManager) {
    println!("{}", manager.path().display());
}

async fn init_config(manager: &ConfigManager, force: bool) -> MathResult<()> {
    let ctx = UiContext::detect();
    let path = manager.path();

    if path.exists() && !force {
        ui::step_warn_hint(
            &ctx,
            &format!("Config already exists at {}", path.display()),
            "Use --force to overwrite",
        );
        return Ok(());
    }

    manager.save(&Config::default()).await?;

    ui::step_ok_detail(
        &ctx,
        "Configuration initialized",
        &path.display().to_string(),
    );

    Ok(())
}

async fn set_value(
    manager: &ConfigManager,
    config: &Config,
    key: &str,
    value: &str,
) -> MathResult<()> {
    let ctx = UiContext::detect();
    let mut config = config.clone();

    if let Err(e) = apply_value(&mut config, key, value) {
        ui::step_error_detail(&ctx, "Cannot set config key", &e.to_string());
        ui::remark(&ctx, "Valid keys:");
        print_valid_keys();
        return Ok(());
    }

    manager.save(&config).await?;
    ui::step_ok(&ctx, &format!("Set {} = {}", key, value));

    Ok(())
}

/// Apply a dot-separated key to the configuration
fn apply_value(config: &mut Config, key: &str, value: &str) -> MathResult<()> {
    let parts: Vec<&str> = key.split('.').collect();

    match parts.as_slice() {
        ["general", "log_format"] => config.general.log_format = parse_log_format(value)?,

        ["cache", "enabled"] => config.cache.enabled = parse_bool(value)?,
        ["cache", "max_size"] => config.cache.max_size = parse_usize(value)?,

        ["engine", "backend"] => {
            config.engine.backend = Backend::parse(value)?.name().to_string()
        }
        ["engine", "binary"] => config.engine.binary = value.to_string(),
        ["engine", "npx_binary"] => config.engine.npx_binary = value.to_string(),
        ["engine", "version"] => {
            semver::Version::parse(value)
                .map_err(|e| MathError::User(format!("Invalid version {}: {}", value, e)))?;
            config.engine.version = value.to_string()
        }
        ["engine", "timeout_secs"] => config.engine.timeout_secs = parse_timeout(value)?,

        ["render", "default_mode"] => config.render.default_mode = value.parse::<RenderMode>()?,
        ["render", "error_color"] => config.render.error_color = value.to_string(),
        ["render", "output"] => config.render.output = parse_output(value)?,
        ["render", "macros", name] if name.starts_with('\\') => {
            config
                .render
                .macros
                .insert(name.to_string(), value.to_string());
        }

        _ => return Err(MathError::User(format!("Unknown config key: {}", key))),
    }

    Ok(())
}

fn parse_log_format(value: &str) -> MathResult<String> {
    match value {
        "text" | "json" => Ok(value.to_string()),
        _ => Err(MathError::User(format!(
            "Invalid log format: {}. Use text/json",
            value
        ))),
    }
}

fn parse_output(value: &str) -> MathResult<OutputFormat> {
    match value {
        "html" => Ok(OutputFormat::Html),
        "mathml" => Ok(OutputFormat::Mathml),
        "htmlAndMathml" => Ok(OutputFormat::HtmlAndMathml),
        _ => Err(MathError::User(format!(
            "Invalid output: {}. Use html/mathml/htmlAndMathml",
            value
        ))),
    }
}

fn parse_bool(value: &str) -> MathResult<bool> {
    match value.to_lowercase().as_str() {
        "true" | "1" | "yes" => Ok(true),
        "false" | "0" | "no" => Ok(false),
        _ => Err(MathError::User(format!(
            "Invalid boolean value: {}. Use true/false",
            value
        ))),
    }
}

fn parse_usize(value: &str) -> MathResult<usize> {
    value
        .parse()
        .map_err(|_| MathError::User(format!("Invalid number: {}", value)))
}

/// Render timeout in seconds; zero would time out every formula
fn parse_timeout(value: &str) -> MathResult<u64> {
    match parse_usize(value)? {
        0 => Err(MathError::User(
            "Invalid timeout: 0. Use at least 1 second".to_string(),
        )),
        secs => Ok(secs as u64),
    }
}

fn print_valid_keys() {
    let keys = [
        "general.log_format",
        "cache.enabled",
        "cache.max_size",
        "engine.backend",
        "engine.binary",
        "engine.npx_binary",
        "engine.version",
        "engine.timeout_secs",
        "render.default_mode",
        "render.error_color",
        "render.output",
        "render.macros.\\<name>",
    ];

    for key in keys {
        eprintln!("  {}", key);
    }
}

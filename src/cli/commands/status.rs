//! Status command - check the formula engine and show settings

use crate::config::Config;
use crate::engine::{assets, create_loader};
use crate::error::MathResult;
use crate::render::MathRenderer;
use crate::ui::{self, TaskSpinner, UiContext};

/// Execute the status command
pub async fn execute(config: &Config) -> MathResult<()> {
    let ctx = UiContext::detect();
    ui::intro(&ctx, "mathrender status");

    let loader = create_loader(&config.engine)?;
    let command = loader.describe();
    let renderer = MathRenderer::new(loader, config);

    ui::section(&ctx, "Engine");
    ui::key_value(&ctx, "Backend", renderer.backend_name());
    ui::key_value(&ctx, "Command", &command);
    ui::key_value(&ctx, "Pinned version", &config.engine.version);
    ui::key_value(&ctx, "Timeout", &format!("{}s", config.engine.timeout_secs));

    let mut spinner = TaskSpinner::new(&ctx);
    spinner.start("Loading KaTeX...");
    let engine_ok = match renderer.preload().await {
        Ok(()) => {
            let ready = renderer
                .loaded_engine()
                .map(|engine| format!("{} {} ready", engine.engine_name(), engine.version()))
                .unwrap_or_else(|| "Engine ready".to_string());
            spinner.stop(&ready);
            true
        }
        Err(e) => {
            spinner.stop_error("KaTeX unavailable");
            ui::step_error_detail(&ctx, "Engine", &e.to_string());
            if let Some(hint) = e.hint() {
                ui::remark(&ctx, hint);
            }
            if e.is_retryable() {
                ui::remark(&ctx, "The failure may be transient; run status again");
            }
            false
        }
    };
    ui::key_value_status(&ctx, "State", &renderer.engine_status().to_string(), engine_ok);

    ui::section(&ctx, "Cache");
    let stats = renderer.cache_stats();
    ui::key_value_status(
        &ctx,
        "Enabled",
        &(stats.max_size > 0).to_string(),
        stats.max_size > 0,
    );
    ui::key_value(&ctx, "Capacity", &stats.max_size.to_string());

    ui::section(&ctx, "Render");
    ui::key_value(&ctx, "Default mode", config.render.default_mode.as_str());
    ui::key_value(&ctx, "Output", config.render.output.as_str());
    ui::key_value(&ctx, "User macros", &config.render.macros.len().to_string());
    ui::key_value(&ctx, "Stylesheet", &assets::stylesheet_url(&config.engine.version));

    if engine_ok {
        ui::outro_success(&ctx, "Ready to render");
    } else {
        ui::outro_warn(&ctx, "Formulas will fall back to source text");
    }

    Ok(())
}

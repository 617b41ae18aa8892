//! Warmup command - pre-render a file of formulas

use crate::cli::args::WarmupArgs;
use crate::config::Config;
use crate::error::{MathError, MathResult};
use crate::render::MathRenderer;
use crate::ui::{self, UiContext, WarmupProgress};
use serde_json::json;

/// Execute the warmup command
pub async fn execute(args: WarmupArgs, config: &Config) -> MathResult<()> {
    let content = tokio::fs::read_to_string(&args.file)
        .await
        .map_err(|e| MathError::io(format!("reading {}", args.file.display()), e))?;
    let formulas = formula_lines(&content);

    let renderer = MathRenderer::from_config(config)?;

    let ctx = if args.json {
        UiContext::non_interactive()
    } else {
        UiContext::detect()
    };
    let progress = (!args.json).then(|| WarmupProgress::new(&ctx, formulas.len()));
    let on_progress = |formula: &str| {
        if let Some(ref progress) = progress {
            progress.on_formula(formula);
        }
    };

    let report = renderer.warmup(&formulas, args.inline, &on_progress).await;
    if let Some(ref progress) = progress {
        progress.finish();
    }
    let stats = renderer.cache_stats();

    if args.json {
        let output = json!({
            "report": report,
            "cache": stats,
        });
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
    }

    ui::key_value(&ctx, "Rendered", &report.rendered.to_string());
    ui::key_value(&ctx, "Already cached", &report.cached.to_string());
    ui::key_value(&ctx, "Skipped", &report.skipped.to_string());
    ui::key_value_status(&ctx, "Failed", &report.failed.to_string(), report.failed == 0);
    ui::key_value(
        &ctx,
        "Cache",
        &format!("{}/{} entries", stats.size, stats.max_size),
    );

    if report.failed == 0 {
        ui::outro_success(&ctx, "Warmup complete");
    } else {
        ui::outro_warn(&ctx, "Warmup finished with failures");
    }

    Ok(())
}

/// One formula per line; blank lines and `%` comments are ignored
fn formula_lines(content: &str) -> Vec<&str> {
    content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('%'))
        .collect()
}

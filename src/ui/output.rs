//! Output functions for consistent CLI formatting

use super::context::UiContext;
use console::{style, Style};

/// Width keys are padded to in key/value listings
const KEY_WIDTH: usize = 16;

/// Plain-mode line: `  [TAG] message`
fn plain_step(tag: &str, tag_style: Style, message: &str) {
    println!("  {} {}", tag_style.apply_to(tag), message);
}

/// Display intro banner
pub fn intro(ctx: &UiContext, title: &str) {
    if ctx.use_fancy_output() {
        cliclack::intro(style(title).cyan().bold()).ok();
    } else {
        println!("{}", style(title).cyan().bold());
    }
}

/// Display success outro
pub fn outro_success(ctx: &UiContext, message: &str) {
    if ctx.use_fancy_output() {
        cliclack::outro(style(message).green().bold()).ok();
    } else {
        println!();
        println!("{} {}", style("[OK]").green(), message);
    }
}

/// Display warning outro
pub fn outro_warn(ctx: &UiContext, message: &str) {
    if ctx.use_fancy_output() {
        cliclack::outro(style(message).yellow().bold()).ok();
    } else {
        println!();
        println!("{} {}", style("[WARN]").yellow(), message);
    }
}

/// Display a section header
pub fn section(ctx: &UiContext, title: &str) {
    println!();
    if ctx.use_fancy_output() {
        cliclack::log::info(style(title).bold()).ok();
    } else {
        println!("{}", style(title).bold());
    }
}

/// Display a success step
pub fn step_ok(ctx: &UiContext, message: &str) {
    if ctx.use_fancy_output() {
        cliclack::log::success(message).ok();
    } else {
        plain_step("[OK]", Style::new().green(), message);
    }
}

/// Display a success step with detail, such as a written path
pub fn step_ok_detail(ctx: &UiContext, message: &str, detail: &str) {
    if ctx.use_fancy_output() {
        cliclack::log::success(format!("{} ({})", message, style(detail).dim())).ok();
    } else {
        plain_step("[OK]", Style::new().green(), &format!("{} ({})", message, detail));
    }
}

/// Display a warning step with hint
pub fn step_warn_hint(ctx: &UiContext, message: &str, hint: &str) {
    if ctx.use_fancy_output() {
        cliclack::log::warning(format!("{} - {}", message, style(hint).dim())).ok();
    } else {
        plain_step("[WARN]", Style::new().yellow(), &format!("{} - {}", message, hint));
    }
}

/// Display an error step with detail
pub fn step_error_detail(ctx: &UiContext, message: &str, detail: &str) {
    if ctx.use_fancy_output() {
        cliclack::log::error(format!("{}: {}", message, style(detail).red())).ok();
    } else {
        plain_step("[FAIL]", Style::new().red(), &format!("{}: {}", message, detail));
    }
}

/// Display a remark/hint
pub fn remark(ctx: &UiContext, message: &str) {
    if ctx.use_fancy_output() {
        cliclack::log::remark(message).ok();
    } else {
        println!("  {}", style(message).dim());
    }
}

/// Print an aligned key/value pair
pub fn key_value(ctx: &UiContext, key: &str, value: &str) {
    if ctx.use_fancy_output() {
        println!("  {:<width$} {}", style(key).dim(), value, width = KEY_WIDTH);
    } else {
        println!("  {:<width$} {}", format!("{}:", key), value, width = KEY_WIDTH);
    }
}

/// Print an aligned key/value pair colored by status
pub fn key_value_status(ctx: &UiContext, key: &str, value: &str, ok: bool) {
    let value_style = if ok {
        Style::new().green()
    } else {
        Style::new().yellow()
    };

    if ctx.use_fancy_output() {
        println!(
            "  {:<width$} {}",
            style(key).dim(),
            value_style.apply_to(value),
            width = KEY_WIDTH
        );
    } else {
        let prefix = if ok { "[OK]" } else { "[WARN]" };
        println!(
            "  {:<width$} {} {}",
            format!("{}:", key),
            value,
            prefix,
            width = KEY_WIDTH
        );
    }
}

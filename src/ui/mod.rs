//! UI module for consistent CLI output
//!
//! Uses `cliclack` for styled step output and spinners, with automatic
//! fallback to plain output in CI/non-interactive environments.
//!
//! # Example
//!
//! ```rust,ignore
//! use mathrender::ui::{self, UiContext, TaskSpinner};
//!
//! let ctx = UiContext::detect();
//!
//! ui::intro(&ctx, "mathrender status");
//!
//! let mut spinner = TaskSpinner::new(&ctx);
//! spinner.start("Loading KaTeX...");
//! // ... load the engine ...
//! spinner.stop("KaTeX 0.16.9 ready");
//!
//! ui::key_value(&ctx, "Backend", "installed");
//! ui::outro_success(&ctx, "Ready to render");
//! ```

mod context;
mod output;
mod progress;
mod theme;

pub use context::UiContext;
pub use output::{
    intro, key_value, key_value_status, outro_success, outro_warn, remark, section,
    step_error_detail, step_ok, step_ok_detail, step_warn_hint,
};
pub use progress::{TaskSpinner, WarmupProgress};
pub use theme::{init_theme, MathTheme};

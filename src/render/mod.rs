//! Math rendering service
//!
//! [`MathRenderer`] is the entry point: it picks a strategy per render mode,
//! memoizes formulas, and makes sure the engine is loaded exactly once.
//!
//! # Example
//!
//! ```rust,ignore
//! use mathrender::config::Config;
//! use mathrender::render::{MathRenderer, RenderMode};
//!
//! let renderer = MathRenderer::from_config(&Config::default())?;
//! let markup = renderer
//!     .render("Let $x \\in \\R$ be positive.", RenderMode::Auto, true)
//!     .await;
//! println!("{}", markup.to_html());
//! ```

mod markup;
mod renderer;

pub use markup::{standalone_document, Fragment, Markup, RenderedFormula, Stylesheet, FALLBACK_CLASS};
pub use renderer::{resolve_mode, MathRenderer, WarmupReport};

use serde::{Deserialize, Serialize};

/// How content is interpreted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum RenderMode {
    /// Inspect the content and pick one of the others
    #[default]
    Auto,
    /// The whole content is one formula
    Math,
    /// Prose with `$...$` / `$$...$$` formulas
    Mixed,
    /// Verbatim text
    Text,
}

impl RenderMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Auto => "auto",
            Self::Math => "math",
            Self::Mixed => "mixed",
            Self::Text => "text",
        }
    }
}

impl std::str::FromStr for RenderMode {
    type Err = crate::error::MathError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "auto" => Ok(Self::Auto),
            "math" => Ok(Self::Math),
            "mixed" => Ok(Self::Mixed),
            "text" => Ok(Self::Text),
            other => Err(crate::error::MathError::User(format!(
                "Unknown render mode: {}. Expected one of: auto, math, mixed, text",
                other
            ))),
        }
    }
}

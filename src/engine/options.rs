//! Render options and the built-in macro table

use crate::config::schema::RenderConfig;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Macros every formula can use: number sets, delimiters, derivatives and
/// implication shortcuts
pub const DEFAULT_MACROS: &[(&str, &str)] = &[
    ("\\N", "\\mathbb{N}"),
    ("\\Z", "\\mathbb{Z}"),
    ("\\Q", "\\mathbb{Q}"),
    ("\\R", "\\mathbb{R}"),
    ("\\C", "\\mathbb{C}"),
    ("\\abs", "\\left|#1\\right|"),
    ("\\norm", "\\left\\|#1\\right\\|"),
    ("\\set", "\\left\\{#1\\right\\}"),
    ("\\dd", "\\mathrm{d}"),
    ("\\dv", "\\frac{\\mathrm{d}#1}{\\mathrm{d}#2}"),
    ("\\pdv", "\\frac{\\partial #1}{\\partial #2}"),
    ("\\imp", "\\Rightarrow"),
    ("\\eqv", "\\Leftrightarrow"),
];

/// Markup language KaTeX emits
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum OutputFormat {
    #[default]
    Html,
    Mathml,
    HtmlAndMathml,
}

impl OutputFormat {
    /// Name as understood by KaTeX
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Html => "html",
            Self::Mathml => "mathml",
            Self::HtmlAndMathml => "htmlAndMathml",
        }
    }
}

/// Options passed with every formula.
///
/// The display flag travels separately since it varies per formula while
/// these stay fixed for the lifetime of a renderer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderOptions {
    /// Raise on malformed input instead of rendering error text
    pub throw_on_error: bool,
    /// Color of rendered error text (`rgb` or `rrggbb`)
    pub error_color: String,
    pub output: OutputFormat,
    pub macros: BTreeMap<String, String>,
}

impl RenderOptions {
    /// Build options from config; user macros override built-in ones
    pub fn from_config(config: &RenderConfig) -> Self {
        let mut macros: BTreeMap<String, String> = DEFAULT_MACROS
            .iter()
            .map(|(name, expansion)| (name.to_string(), expansion.to_string()))
            .collect();
        macros.extend(config.macros.clone());

        Self {
            throw_on_error: false,
            error_color: config.error_color.trim_start_matches('#').to_string(),
            output: config.output,
            macros,
        }
    }
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self::from_config(&RenderConfig::default())
    }
}

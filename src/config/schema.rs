//! Configuration schema for mathrender
//!
//! Configuration is stored at `~/.config/mathrender/config.toml`

use crate::engine::OutputFormat;
use crate::render::RenderMode;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// KaTeX release the engine and stylesheet are pinned to
pub const DEFAULT_KATEX_VERSION: &str = "0.16.9";

/// Root configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// General settings
    pub general: GeneralConfig,

    /// Render cache settings
    pub cache: CacheConfig,

    /// Formula engine settings
    pub engine: EngineConfig,

    /// Render defaults
    pub render: RenderConfig,
}

/// General application settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// Log format: "text" or "json"
    pub log_format: String,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            log_format: "text".to_string(),
        }
    }
}

/// Render cache configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    /// Memoize rendered formulas (default: true)
    pub enabled: bool,

    /// Maximum number of cached formulas
    pub max_size: usize,
}

impl CacheConfig {
    /// Capacity actually handed to the cache (0 when disabled)
    pub fn effective_capacity(&self) -> usize {
        if self.enabled {
            self.max_size
        } else {
            0
        }
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            max_size: 1000,
        }
    }
}

/// Formula engine configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Backend: "installed" (katex on PATH) or "npx" (pinned package via npx)
    pub backend: String,

    /// KaTeX CLI binary for the installed backend
    pub binary: String,

    /// npx binary for the npx backend
    pub npx_binary: String,

    /// Pinned KaTeX version
    pub version: String,

    /// Per-formula render timeout in seconds
    pub timeout_secs: u64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            backend: "installed".to_string(),
            binary: "katex".to_string(),
            npx_binary: "npx".to_string(),
            version: DEFAULT_KATEX_VERSION.to_string(),
            timeout_secs: 10,
        }
    }
}

/// Render defaults
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    /// Mode used when the CLI is not given --mode
    pub default_mode: RenderMode,

    /// Color for KaTeX error text, `rgb` or `rrggbb` without `#`
    pub error_color: String,

    /// Markup KaTeX emits
    pub output: OutputFormat,

    /// Extra macros merged over the built-in table (`"\\RR" = "\\mathbb{R}"`)
    pub macros: BTreeMap<String, String>,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            default_mode: RenderMode::Auto,
            error_color: "cc0000".to_string(),
            output: OutputFormat::Html,
            macros: BTreeMap::new(),
        }
    }
}

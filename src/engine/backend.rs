//! Formula engine abstraction
//!
//! The renderer never talks to KaTeX directly. It asks an [`EngineLoader`]
//! for an engine once, then hands sources to the resulting
//! [`FormulaEngine`]. Tests substitute both with in-process doubles.

use crate::engine::options::RenderOptions;
use crate::error::MathResult;
use async_trait::async_trait;
use std::sync::Arc;

/// A loaded formula-typesetting engine
#[async_trait]
pub trait FormulaEngine: Send + Sync {
    /// Render LaTeX source to markup.
    ///
    /// Engines run with error rendering enabled, so malformed input yields
    /// error-styled markup rather than `Err`. `Err` means the engine itself
    /// failed (crashed, timed out, could not be spawned).
    async fn render(
        &self,
        source: &str,
        display_mode: bool,
        options: &RenderOptions,
    ) -> MathResult<String>;

    /// Human-readable engine name for display
    fn engine_name(&self) -> &'static str;

    /// Engine version as reported by the engine
    fn version(&self) -> &str;
}

/// Produces a ready engine, possibly after an expensive first-time setup
#[async_trait]
pub trait EngineLoader: Send + Sync {
    /// Locate, fetch or start the engine
    async fn load(&self) -> MathResult<Arc<dyn FormulaEngine>>;

    /// Backend name for display
    fn backend_name(&self) -> &'static str;

    /// How the engine is reached, e.g. the command line it runs
    fn describe(&self) -> String {
        self.backend_name().to_string()
    }
}

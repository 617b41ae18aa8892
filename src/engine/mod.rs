//! Formula engine integration
//!
//! Provides the KaTeX backends and the load-once handle the renderer uses:
//! - installed: `katex` CLI on PATH
//! - npx: pinned `katex@<version>` package through npx

pub mod assets;
mod backend;
mod factory;
mod handle;
pub mod katex_cli;
mod options;

pub use backend::{EngineLoader, FormulaEngine};
pub use factory::{create_loader, Backend};
pub use handle::{EngineHandle, LoadStatus};
pub use katex_cli::{KatexCliLoader, KatexCommand};
pub use options::{OutputFormat, RenderOptions, DEFAULT_MACROS};

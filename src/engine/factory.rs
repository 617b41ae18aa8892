//! Loader factory for the configured engine backend

use crate::config::schema::EngineConfig;
use crate::engine::backend::EngineLoader;
use crate::engine::katex_cli::KatexCliLoader;
use crate::error::{MathError, MathResult};
use std::sync::Arc;

/// Engine backend selected in configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Backend {
    /// `katex` CLI already installed
    Installed,
    /// Pinned `katex` package run through npx
    Npx,
}

impl Backend {
    /// Parse a backend name from configuration
    pub fn parse(name: &str) -> MathResult<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "installed" | "katex" => Ok(Backend::Installed),
            "npx" => Ok(Backend::Npx),
            other => Err(MathError::UnknownBackend(other.to_string())),
        }
    }

    /// Get a human-readable backend name
    pub fn name(&self) -> &'static str {
        match self {
            Backend::Installed => "installed",
            Backend::Npx => "npx",
        }
    }
}

/// Create the engine loader for the configured backend
///
/// # Arguments
/// * `config` - The engine section of the configuration
///
/// # Returns
/// * `Ok(Arc<dyn EngineLoader>)` - A shared loader
/// * `Err` - If the backend name is unknown
pub fn create_loader(config: &EngineConfig) -> MathResult<Arc<dyn EngineLoader>> {
    match Backend::parse(&config.backend)? {
        Backend::Installed => Ok(Arc::new(KatexCliLoader::installed(config))),
        Backend::Npx => Ok(Arc::new(KatexCliLoader::npx(config))),
    }
}

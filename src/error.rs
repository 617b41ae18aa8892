//! Error types for mathrender
//!
//! All modules use `MathResult<T>` as their return type. Errors raised on the
//! render path are absorbed by the renderer and degrade to fallback markup;
//! they only reach the caller through `preload`, configuration and the CLI.

use std::path::PathBuf;
use std::sync::Arc;
use thiserror::Error;

/// Result type alias for mathrender operations
pub type MathResult<T> = Result<T, MathError>;

/// All errors that can occur in mathrender
#[derive(Error, Debug)]
pub enum MathError {
    // Engine errors
    #[error("Formula engine not found: {binary}")]
    EngineNotFound { binary: String },

    /// A shared load attempt failed; every waiter sees the same cause
    #[error("Formula engine unavailable: {0}")]
    EngineUnavailable(#[source] Arc<MathError>),

    #[error("Failed to load formula engine: {0}")]
    EngineLoad(String),

    #[error("Unknown engine backend: {0}. Expected one of: installed, npx")]
    UnknownBackend(String),

    #[error("Formula render failed: {0}")]
    RenderFailed(String),

    #[error("Formula render timed out after {secs}s")]
    RenderTimeout { secs: u64 },

    // Asset errors
    #[error("Failed to fetch {url}: {reason}")]
    AssetFetch { url: String, reason: String },

    // Configuration errors
    #[error("Invalid configuration at {path}: {reason}")]
    ConfigInvalid { path: PathBuf, reason: String },

    #[error("Failed to create config directory {path}: {source}")]
    ConfigDirCreate {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // IO errors
    #[error("IO error: {context}")]
    Io {
        context: String,
        #[source]
        source: std::io::Error,
    },

    // Process errors
    #[error("Command failed: {command}")]
    CommandFailed {
        command: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Command execution error: {command}, stderr: {stderr}")]
    CommandExecution { command: String, stderr: String },

    // Serialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML serialize error: {0}")]
    TomlSerialize(#[from] toml::ser::Error),

    // General errors
    #[error("Internal error: {0}")]
    Internal(String),

    #[error("{0}")]
    User(String),
}

impl MathError {
    /// Create an IO error with context
    pub fn io(context: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            context: context.into(),
            source,
        }
    }

    /// Create a command failed error
    pub fn command_failed(command: impl Into<String>, source: std::io::Error) -> Self {
        Self::CommandFailed {
            command: command.into(),
            source,
        }
    }

    /// Create a command execution error
    pub fn command_exec(command: impl Into<String>, stderr: impl Into<String>) -> Self {
        Self::CommandExecution {
            command: command.into(),
            stderr: stderr.into(),
        }
    }

    /// Check if a fresh `preload` may succeed where this attempt failed
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::EngineUnavailable(cause) => cause.is_retryable(),
            Self::EngineLoad(_) | Self::RenderTimeout { .. } | Self::AssetFetch { .. } => true,
            _ => false,
        }
    }

    /// Get actionable hint for the error
    pub fn hint(&self) -> Option<&'static str> {
        match self {
            Self::EngineUnavailable(cause) => cause.hint(),
            Self::EngineNotFound { .. } => {
                Some("Install KaTeX: npm install -g katex, or set engine.backend = \"npx\"")
            }
            Self::UnknownBackend(_) => Some("Run: mathrender config set engine.backend installed"),
            Self::RenderTimeout { .. } => Some("Raise engine.timeout_secs in the configuration"),
            Self::AssetFetch { .. } => Some("Drop --embed-css to link the stylesheet instead"),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display() {
        let err = MathError::EngineNotFound {
            binary: "katex".to_string(),
        };
        assert!(err.to_string().contains("Formula engine not found: katex"));
    }

    #[test]
    fn error_hint() {
        let err = MathError::RenderTimeout { secs: 5 };
        assert_eq!(
            err.hint(),
            Some("Raise engine.timeout_secs in the configuration")
        );
        assert!(MathError::Internal("x".to_string()).hint().is_none());
    }

    #[test]
    fn unavailable_delegates_to_cause() {
        let cause = Arc::new(MathError::EngineNotFound {
            binary: "katex".to_string(),
        });
        let err = MathError::EngineUnavailable(cause);
        assert!(err.to_string().contains("katex"));
        assert!(err.hint().is_some());
        assert!(!err.is_retryable());
    }

    #[test]
    fn error_retryable() {
        assert!(MathError::EngineLoad("boom".to_string()).is_retryable());
        assert!(!MathError::UnknownBackend("wasm".to_string()).is_retryable());
    }
}

//! KaTeX command-line backend
//!
//! Runs the `katex` CLI shipped with the KaTeX npm package, either from
//! `PATH` or as a pinned package through `npx`. Each formula is one process:
//! the source goes in on stdin and the markup comes back on stdout.

use crate::config::schema::EngineConfig;
use crate::engine::backend::{EngineLoader, FormulaEngine};
use crate::engine::options::RenderOptions;
use crate::error::{MathError, MathResult};
use async_trait::async_trait;
use std::process::Stdio;
use std::sync::Arc;
use std::time::Duration;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;
use tracing::{debug, info, warn};

/// How to invoke the KaTeX CLI
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KatexCommand {
    /// Program to execute
    pub program: String,
    /// Arguments placed before the KaTeX options
    pub prefix: Vec<String>,
}

impl KatexCommand {
    /// `katex` found on PATH (or an explicit binary path)
    pub fn installed(binary: &str) -> Self {
        Self {
            program: binary.to_string(),
            prefix: vec![],
        }
    }

    /// Pinned package run through npx, fetched on first use
    pub fn npx(npx_binary: &str, version: &str) -> Self {
        Self {
            program: npx_binary.to_string(),
            prefix: vec!["--yes".to_string(), format!("katex@{}", version)],
        }
    }

    fn command(&self) -> Command {
        let mut cmd = Command::new(&self.program);
        cmd.args(&self.prefix);
        cmd
    }

    /// Full command line for display
    pub fn display(&self) -> String {
        std::iter::once(self.program.as_str())
            .chain(self.prefix.iter().map(String::as_str))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// Build the KaTeX CLI arguments for one formula
pub(crate) fn render_args(display_mode: bool, options: &RenderOptions) -> Vec<String> {
    let mut args = Vec::new();

    if !options.throw_on_error {
        args.push("--no-throw-on-error".to_string());
    }
    if display_mode {
        args.push("--display-mode".to_string());
    }

    args.push("--error-color".to_string());
    args.push(options.error_color.clone());
    args.push("--format".to_string());
    args.push(options.output.as_str().to_string());

    for (name, expansion) in &options.macros {
        args.push("--macro".to_string());
        args.push(format!("{}:{}", name, expansion));
    }

    args
}

/// Whether the reported version shares major.minor with the pinned one.
/// Unparseable versions are not compared.
pub(crate) fn version_matches_pin(reported: &str, pinned: &str) -> bool {
    match (
        semver::Version::parse(reported.trim().trim_start_matches('v')),
        semver::Version::parse(pinned.trim()),
    ) {
        (Ok(reported), Ok(pinned)) => {
            reported.major == pinned.major && reported.minor == pinned.minor
        }
        _ => true,
    }
}

/// Loader that probes the KaTeX CLI and hands out a process-backed engine
pub struct KatexCliLoader {
    command: KatexCommand,
    pinned_version: String,
    timeout: Duration,
    backend: &'static str,
}

impl KatexCliLoader {
    /// Loader for a `katex` binary already installed
    pub fn installed(config: &EngineConfig) -> Self {
        Self {
            command: KatexCommand::installed(&config.binary),
            pinned_version: config.version.clone(),
            timeout: Duration::from_secs(config.timeout_secs),
            backend: "installed",
        }
    }

    /// Loader for the pinned package run through npx
    pub fn npx(config: &EngineConfig) -> Self {
        Self {
            command: KatexCommand::npx(&config.npx_binary, &config.version),
            pinned_version: config.version.clone(),
            timeout: Duration::from_secs(config.timeout_secs),
            backend: "npx",
        }
    }

    pub fn command(&self) -> &KatexCommand {
        &self.command
    }

    /// Run `--version` and return the reported version
    async fn probe_version(&self) -> MathResult<String> {
        debug!("Probing: {} --version", self.command.display());

        let output = self
            .command
            .command()
            .arg("--version")
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .output()
            .await
            .map_err(|e| {
                if e.kind() == std::io::ErrorKind::NotFound {
                    MathError::EngineNotFound {
                        binary: self.command.program.clone(),
                    }
                } else {
                    MathError::command_failed(self.command.display(), e)
                }
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(MathError::command_exec(
                format!("{} --version", self.command.display()),
                stderr.trim(),
            ));
        }

        let version = String::from_utf8_lossy(&output.stdout).trim().to_string();
        if version.is_empty() {
            return Err(MathError::EngineLoad(format!(
                "{} reported no version",
                self.command.display()
            )));
        }
        Ok(version)
    }
}

#[async_trait]
impl EngineLoader for KatexCliLoader {
    async fn load(&self) -> MathResult<Arc<dyn FormulaEngine>> {
        // npx may download the package here, so the probe gets a longer leash
        let probe_timeout = self.timeout.saturating_mul(6);
        let version = tokio::time::timeout(probe_timeout, self.probe_version())
            .await
            .map_err(|_| MathError::EngineLoad(format!(
                "{} did not answer --version within {}s",
                self.command.display(),
                probe_timeout.as_secs()
            )))??;

        if !version_matches_pin(&version, &self.pinned_version) {
            warn!(
                "KaTeX {} does not match pinned version {}",
                version, self.pinned_version
            );
        }

        info!("Loaded KaTeX {} via {}", version, self.command.display());
        Ok(Arc::new(KatexCliEngine {
            command: self.command.clone(),
            version,
            timeout: self.timeout,
        }))
    }

    fn backend_name(&self) -> &'static str {
        self.backend
    }

    fn describe(&self) -> String {
        self.command.display()
    }
}

/// Engine that spawns the KaTeX CLI per formula
pub struct KatexCliEngine {
    command: KatexCommand,
    version: String,
    timeout: Duration,
}

impl KatexCliEngine {
    async fn run(
        &self,
        source: &str,
        display_mode: bool,
        options: &RenderOptions,
    ) -> MathResult<String> {
        let args = render_args(display_mode, options);
        debug!(
            "Executing: {} (display: {}, {} bytes)",
            self.command.display(),
            display_mode,
            source.len()
        );

        let mut child = self
            .command
            .command()
            .args(&args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| MathError::command_failed(self.command.display(), e))?;

        if let Some(mut stdin) = child.stdin.take() {
            stdin
                .write_all(source.as_bytes())
                .await
                .map_err(|e| MathError::io("writing formula to katex", e))?;
            // Dropping stdin closes the pipe so katex sees EOF
        }

        let output = child
            .wait_with_output()
            .await
            .map_err(|e| MathError::io("waiting for katex", e))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(MathError::RenderFailed(stderr.trim().to_string()));
        }

        let html = String::from_utf8_lossy(&output.stdout);
        Ok(html.trim_end().to_string())
    }
}

#[async_trait]
impl FormulaEngine for KatexCliEngine {
    async fn render(
        &self,
        source: &str,
        display_mode: bool,
        options: &RenderOptions,
    ) -> MathResult<String> {
        tokio::time::timeout(self.timeout, self.run(source, display_mode, options))
            .await
            .map_err(|_| MathError::RenderTimeout {
                secs: self.timeout.as_secs(),
            })?
    }

    fn engine_name(&self) -> &'static str {
        "KaTeX CLI"
    }

    fn version(&self) -> &str {
        &self.version
    }
}

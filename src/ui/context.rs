//! UI context for detecting interactive vs CI environments

use std::io::IsTerminal;

/// Environment variables set by common CI providers
const CI_VARS: [&str; 9] = [
    "CI",
    "GITHUB_ACTIONS",
    "GITLAB_CI",
    "CIRCLECI",
    "TRAVIS",
    "JENKINS_URL",
    "BUILDKITE",
    "TEAMCITY_VERSION",
    "TF_BUILD",
];

/// UI context that determines output behavior
#[derive(Debug, Clone)]
pub struct UiContext {
    interactive: bool,
}

impl UiContext {
    /// Detect the current environment
    pub fn detect() -> Self {
        Self {
            interactive: Self::detect_interactive(|var| std::env::var_os(var).is_some()),
        }
    }

    /// Plain output, for tests and machine-readable commands
    pub fn non_interactive() -> Self {
        Self { interactive: false }
    }

    /// Check if we should use fancy output (spinners, colors)
    pub fn use_fancy_output(&self) -> bool {
        self.interactive
    }

    /// Fancy output needs a terminal on stdout and no CI or
    /// `MATHRENDER_PLAIN` marker in the environment
    fn detect_interactive(is_set: impl Fn(&str) -> bool) -> bool {
        if !std::io::stdout().is_terminal() {
            return false;
        }

        if is_set("MATHRENDER_PLAIN") || is_set("NO_COLOR") {
            return false;
        }

        !CI_VARS.iter().any(|var| is_set(var))
    }
}

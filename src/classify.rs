//! Content classification
//!
//! Decides whether a piece of content is a bare LaTeX environment, prose
//! with `$`-delimited math, or plain text. Classification is recomputed on
//! every call and never fails: malformed or unbalanced input is classified
//! as best it can be and rendering deals with the rest.

use regex::Regex;
use std::sync::OnceLock;

/// Environment family a recognized `\begin{...}` belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnvironmentFamily {
    /// `align`, `gather`, `multline`, `eqnarray` and friends
    Alignment,
    /// `matrix`, `pmatrix`, `bmatrix`, ...
    Matrix,
    /// `cases`, `array`, `split`, `subequations`
    Structural,
    /// `theorem`, `lemma`, `proof`, ...
    Theorem,
}

pub const ALIGNMENT_ENVIRONMENTS: &[&str] = &[
    "align",
    "align*",
    "gather",
    "gather*",
    "multline",
    "multline*",
    "eqnarray",
    "eqnarray*",
    "flalign*",
    "alignat*",
];

pub const MATRIX_ENVIRONMENTS: &[&str] = &[
    "matrix",
    "pmatrix",
    "bmatrix",
    "vmatrix",
    "Bmatrix",
    "Vmatrix",
    "smallmatrix",
];

pub const STRUCTURAL_ENVIRONMENTS: &[&str] = &["cases", "array", "split", "subequations"];

pub const THEOREM_ENVIRONMENTS: &[&str] = &[
    "theorem",
    "proposition",
    "lemma",
    "corollary",
    "definition",
    "example",
    "exercise",
    "proof",
    "solution",
];

impl EnvironmentFamily {
    /// Environment names in this family
    pub fn names(&self) -> &'static [&'static str] {
        match self {
            Self::Alignment => ALIGNMENT_ENVIRONMENTS,
            Self::Matrix => MATRIX_ENVIRONMENTS,
            Self::Structural => STRUCTURAL_ENVIRONMENTS,
            Self::Theorem => THEOREM_ENVIRONMENTS,
        }
    }

    const ALL: [EnvironmentFamily; 4] = [
        Self::Alignment,
        Self::Matrix,
        Self::Structural,
        Self::Theorem,
    ];
}

/// A recognized environment found in content
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Environment {
    pub name: &'static str,
    pub family: EnvironmentFamily,
}

impl Environment {
    /// Look up a recognized environment by name, ignoring ASCII case.
    /// An exact match wins over a case-folded one (`Bmatrix` vs `bmatrix`).
    pub fn lookup(name: &str) -> Option<Self> {
        let all = || {
            EnvironmentFamily::ALL
                .iter()
                .flat_map(|family| family.names().iter().map(move |n| (*n, *family)))
        };
        all()
            .find(|(n, _)| *n == name)
            .or_else(|| all().find(|(n, _)| n.eq_ignore_ascii_case(name)))
            .map(|(name, family)| Self { name, family })
    }
}

/// What kind of content a string is, for picking a render strategy
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContentKind {
    /// Bare environment, rendered without `$` wrapping
    Environment,
    /// Prose containing `$...$` and/or `$$...$$`
    Delimited,
    /// Nothing to render as math
    Plain,
}

/// Result of classifying a string along both axes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Classification {
    pub environment: Option<Environment>,
    pub display_math: bool,
    pub inline_math: bool,
}

impl Classification {
    pub fn kind(&self) -> ContentKind {
        if self.environment.is_some() {
            ContentKind::Environment
        } else if self.display_math || self.inline_math {
            ContentKind::Delimited
        } else {
            ContentKind::Plain
        }
    }
}

fn environment_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        let names: Vec<String> = EnvironmentFamily::ALL
            .iter()
            .flat_map(|family| family.names().iter())
            .map(|name| regex::escape(name))
            .collect();
        Regex::new(&format!(r"(?i)\\begin\{{({})\}}", names.join("|")))
            .expect("environment pattern is valid")
    })
}

fn display_block_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(
            r"\\begin\{(?:matrix|pmatrix|bmatrix|vmatrix|Bmatrix|Vmatrix|smallmatrix|cases|aligned|gathered)\}",
        )
        .expect("display block pattern is valid")
    })
}

fn command_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\\[a-zA-Z]+|[\^_]\{").expect("command pattern is valid"))
}

/// `$$...$$` with a non-empty body, spanning lines
pub(crate) fn display_math_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?s)\$\$(.+?)\$\$").expect("display math pattern is valid"))
}

/// `$...$` with a non-empty body containing no `$`
pub(crate) fn inline_math_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\$([^$]+)\$").expect("inline math pattern is valid"))
}

/// First recognized `\begin{name}` in the text
pub fn find_environment(text: &str) -> Option<Environment> {
    environment_regex()
        .captures(text)
        .and_then(|caps| caps.get(1))
        .and_then(|name| Environment::lookup(name.as_str()))
}

/// Whether the text contains any recognized environment
pub fn is_math_environment(text: &str) -> bool {
    environment_regex().is_match(text)
}

/// Whether the text contains an alignment-family environment the
/// normalizer rewrites
pub fn has_alignment_environment(text: &str) -> bool {
    environment_regex()
        .captures_iter(text)
        .filter_map(|caps| caps.get(1))
        .filter_map(|name| Environment::lookup(name.as_str()))
        .any(|env| env.family == EnvironmentFamily::Alignment)
}

/// Whether the text contains a `$$...$$` pair
pub fn has_display_math(text: &str) -> bool {
    display_math_regex().is_match(text)
}

/// Whether the text contains a `$...$` pair outside any `$$...$$` pair
pub fn has_inline_math(text: &str) -> bool {
    if has_display_math(text) {
        let remainder = display_math_regex().replace_all(text, " ");
        inline_math_regex().is_match(&remainder)
    } else {
        inline_math_regex().is_match(text)
    }
}

/// Whether the text carries LaTeX command-like tokens (`\frac`, `x^{2}`)
pub fn looks_like_latex(text: &str) -> bool {
    command_regex().is_match(text)
}

/// Environments that render as a block even when inline was requested
pub fn forces_display(text: &str) -> bool {
    is_math_environment(text) || display_block_regex().is_match(text)
}

/// Classify text along both axes
pub fn classify(text: &str) -> Classification {
    if text.is_empty() {
        return Classification {
            environment: None,
            display_math: false,
            inline_math: false,
        };
    }

    Classification {
        environment: find_environment(text),
        display_math: has_display_math(text),
        inline_math: has_inline_math(text),
    }
}

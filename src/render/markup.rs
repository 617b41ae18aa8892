//! Rendered output types

use serde::Serialize;
use std::fmt;

/// CSS class wrapped around formulas that fell back to their source text
pub const FALLBACK_CLASS: &str = "math-fallback";

/// One rendered formula
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RenderedFormula {
    /// Engine markup, or the original source when `error` is set
    pub html: String,
    pub display_mode: bool,
    /// Served from the cache without touching the engine
    pub cached: bool,
    /// The engine could not render this formula
    pub error: bool,
}

impl RenderedFormula {
    /// Formula that could not be rendered: the source is shown as-is
    pub fn fallback(source: &str, display_mode: bool) -> Self {
        Self {
            html: source.to_string(),
            display_mode,
            cached: false,
            error: true,
        }
    }
}

/// A piece of rendered output
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Fragment {
    /// Verbatim text
    Text { text: String },
    /// Rendered formula
    Formula(RenderedFormula),
}

/// Rendered content, in source order
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Markup {
    pub fragments: Vec<Fragment>,
}

impl Markup {
    /// Verbatim text, nothing interpreted
    pub fn text(content: &str) -> Self {
        let mut markup = Self::default();
        markup.push_text(content);
        markup
    }

    /// Markup holding a single formula (empty for `None`)
    pub fn from_formula(formula: Option<RenderedFormula>) -> Self {
        Self {
            fragments: formula.map(Fragment::Formula).into_iter().collect(),
        }
    }

    pub(crate) fn push_text(&mut self, text: &str) {
        if !text.is_empty() {
            self.fragments.push(Fragment::Text {
                text: text.to_string(),
            });
        }
    }

    pub(crate) fn push_formula(&mut self, formula: RenderedFormula) {
        self.fragments.push(Fragment::Formula(formula));
    }

    pub fn is_empty(&self) -> bool {
        self.fragments.is_empty()
    }

    /// Formulas in this markup
    pub fn formulas(&self) -> impl Iterator<Item = &RenderedFormula> {
        self.fragments.iter().filter_map(|fragment| match fragment {
            Fragment::Formula(formula) => Some(formula),
            Fragment::Text { .. } => None,
        })
    }

    /// Whether any formula fell back to source text
    pub fn has_errors(&self) -> bool {
        self.formulas().any(|formula| formula.error)
    }

    /// Concatenate fragments into HTML. Text is emitted verbatim; fallback
    /// formulas are escaped and wrapped in a `math-fallback` span so the
    /// source shows as plain text.
    pub fn to_html(&self) -> String {
        let mut html = String::new();
        for fragment in &self.fragments {
            match fragment {
                Fragment::Text { text } => html.push_str(text),
                Fragment::Formula(formula) if formula.error => {
                    html.push_str(&format!(
                        "<span class=\"{}\">{}</span>",
                        FALLBACK_CLASS,
                        escape_html(&formula.html)
                    ));
                }
                Fragment::Formula(formula) => html.push_str(&formula.html),
            }
        }
        html
    }
}

impl fmt::Display for Markup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_html())
    }
}

/// Escape text for an HTML element body or attribute value
fn escape_html(input: &str) -> String {
    let mut escaped = String::with_capacity(input.len());
    for ch in input.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            _ => escaped.push(ch),
        }
    }
    escaped
}

/// Where a standalone page gets the KaTeX stylesheet from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Stylesheet {
    /// `<link>` to a URL
    Link(String),
    /// CSS embedded in a `<style>` element
    Inline(String),
}

/// Wrap rendered HTML in a minimal page carrying the KaTeX stylesheet
pub fn standalone_document(body: &str, stylesheet: &Stylesheet) -> String {
    let head = match stylesheet {
        Stylesheet::Link(url) => format!("<link rel=\"stylesheet\" href=\"{}\">", url),
        Stylesheet::Inline(css) => format!("<style>\n{}\n</style>", css),
    };
    format!(
        "<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"utf-8\">\n{}\n</head>\n<body>\n{}\n</body>\n</html>\n",
        head, body
    )
}

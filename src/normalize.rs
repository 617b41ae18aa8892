//! Environment normalization
//!
//! KaTeX only supports the `aligned`/`gathered` forms of the display-group
//! environments, so `align`, `gather`, `multline` and `eqnarray` are
//! rewritten before rendering. Rules run in order and each rule replaces
//! every non-overlapping match. Environment names match in any case, as
//! they do in classification. Matching is non-greedy and non-recursive:
//! a `\begin{X}` closes at the first `\end{X}` that follows it, so nested
//! environments with the same name are not told apart.

use regex::{Captures, Regex};
use std::borrow::Cow;
use std::sync::OnceLock;

struct Rule {
    pattern: Regex,
    target: &'static str,
    collapse_eqnarray_columns: bool,
}

impl Rule {
    fn new(env: &str, target: &'static str, collapse_eqnarray_columns: bool) -> Self {
        let pattern = Regex::new(&format!(
            r"(?is)\\begin\{{{env}\*?\}}(.*?)\\end\{{{env}\*?\}}"
        ))
        .expect("normalization pattern is valid");
        Self {
            pattern,
            target,
            collapse_eqnarray_columns,
        }
    }

    fn apply<'a>(&self, text: &'a str) -> Cow<'a, str> {
        self.pattern.replace_all(text, |caps: &Captures| {
            let body = &caps[1];
            let body = if self.collapse_eqnarray_columns {
                Cow::Owned(body.replace("&=&", "&="))
            } else {
                Cow::Borrowed(body)
            };
            format!(
                "\\begin{{{target}}}{body}\\end{{{target}}}",
                target = self.target
            )
        })
    }
}

fn rules() -> &'static [Rule] {
    static RULES: OnceLock<Vec<Rule>> = OnceLock::new();
    RULES.get_or_init(|| {
        vec![
            Rule::new("align", "aligned", false),
            Rule::new("gather", "gathered", false),
            Rule::new("multline", "aligned", false),
            Rule::new("eqnarray", "aligned", true),
        ]
    })
}

/// Rewrite display-group environments into their KaTeX equivalents.
///
/// Borrows the input when no rule matched.
pub fn normalize_environments(text: &str) -> Cow<'_, str> {
    let mut current = Cow::Borrowed(text);
    for rule in rules() {
        let rewritten = match rule.apply(&current) {
            Cow::Owned(rewritten) => Some(rewritten),
            Cow::Borrowed(_) => None,
        };
        if let Some(rewritten) = rewritten {
            current = Cow::Owned(rewritten);
        }
    }
    current
}

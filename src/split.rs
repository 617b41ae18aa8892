//! Mixed-content splitting
//!
//! Splits prose with `$...$` and `$$...$$` math into ordered segments.
//! Display pairs are found first; inline pairs are only looked for in the
//! text between them. A `$` without a partner stays literal text, and there
//! is no escape for a literal `$`.

use crate::classify::{display_math_regex, inline_math_regex};

/// One piece of mixed content, borrowing from the input
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Segment<'a> {
    Text(&'a str),
    InlineMath(&'a str),
    DisplayMath(&'a str),
}

impl<'a> Segment<'a> {
    /// Math source of the segment, `None` for text
    pub fn math(&self) -> Option<&'a str> {
        match self {
            Self::Text(_) => None,
            Self::InlineMath(src) | Self::DisplayMath(src) => Some(src),
        }
    }
}

/// Split text into text, inline-math and display-math segments in order.
/// Empty text segments are dropped.
pub fn split_mixed(text: &str) -> Vec<Segment<'_>> {
    let mut segments = Vec::new();
    let mut last = 0;

    for caps in display_math_regex().captures_iter(text) {
        let (Some(whole), Some(body)) = (caps.get(0), caps.get(1)) else {
            continue;
        };
        split_inline(&text[last..whole.start()], &mut segments);
        segments.push(Segment::DisplayMath(body.as_str()));
        last = whole.end();
    }
    split_inline(&text[last..], &mut segments);

    segments
}

fn split_inline<'a>(text: &'a str, segments: &mut Vec<Segment<'a>>) {
    let mut last = 0;
    for caps in inline_math_regex().captures_iter(text) {
        let (Some(whole), Some(body)) = (caps.get(0), caps.get(1)) else {
            continue;
        };
        push_text(&text[last..whole.start()], segments);
        segments.push(Segment::InlineMath(body.as_str()));
        last = whole.end();
    }
    push_text(&text[last..], segments);
}

fn push_text<'a>(text: &'a str, segments: &mut Vec<Segment<'a>>) {
    if !text.is_empty() {
        segments.push(Segment::Text(text));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_inline_and_display_in_order() {
        let segments = split_mixed("text $a$ more $$b$$ end");
        assert_eq!(
            segments,
            vec![
                Segment::Text("text "),
                Segment::InlineMath("a"),
                Segment::Text(" more "),
                Segment::DisplayMath("b"),
                Segment::Text(" end"),
            ]
        );
    }

    #[test]
    fn inline_only() {
        let segments = split_mixed("$\\frac{1}{2}$");
        assert_eq!(segments, vec![Segment::InlineMath("\\frac{1}{2}")]);
    }

    #[test]
    fn display_spans_lines() {
        let segments = split_mixed("before\n$$\na + b\n$$\nafter");
        assert_eq!(segments[1], Segment::DisplayMath("\na + b\n"));
        assert_eq!(segments.len(), 3);
    }

    #[test]
    fn adjacent_inline_pairs() {
        let segments = split_mixed("$a$$b$");
        assert_eq!(
            segments,
            vec![Segment::InlineMath("a"), Segment::InlineMath("b")]
        );
    }

    #[test]
    fn unmatched_dollar_is_literal() {
        assert_eq!(
            split_mixed("price: 5$ only"),
            vec![Segment::Text("price: 5$ only")]
        );
        let segments = split_mixed("$a$ costs $3");
        assert_eq!(
            segments,
            vec![Segment::InlineMath("a"), Segment::Text(" costs $3")]
        );
    }

    #[test]
    fn empty_delimiters_are_literal() {
        assert_eq!(split_mixed("$$"), vec![Segment::Text("$$")]);
        assert!(split_mixed("").is_empty());
    }

    #[test]
    fn math_accessor() {
        let math: Vec<&str> = split_mixed("x $a$ y $$b$$")
            .iter()
            .filter_map(Segment::math)
            .collect();
        assert_eq!(math, vec!["a", "b"]);
    }
}

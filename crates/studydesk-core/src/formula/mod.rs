//! Formula segmentation and rendering for document export
//!
//! Generated answers carry formulas as `$$...$$` spans. Export splits the
//! text on those spans, rasterizes each formula and hands an ordered list of
//! text and image blocks to the Word and PDF writers.

mod render;
mod symbols;

pub use render::{
    render_for_export, DisabledRenderer, ExportBlock, FormulaRenderer, LatexRenderer,
    RenderedFormula,
};
pub use symbols::{substitute_symbols, to_latin1, LATIN1_PLACEHOLDER};

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref FORMULA_RE: Regex = Regex::new(r"(?s)\$\$(.*?)\$\$").unwrap();
}

/// Formula delimiter
pub const DELIMITER: &str = "$$";

/// A piece of generated text
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    /// Literal text between formulas
    Text(String),
    /// Inner content of a `$$...$$` span, delimiters stripped
    Formula { latex: String },
}

impl Segment {
    /// Original text of the segment, delimiters included
    pub fn source(&self) -> String {
        match self {
            Self::Text(text) => text.clone(),
            Self::Formula { latex } => format!("{DELIMITER}{latex}{DELIMITER}"),
        }
    }

    pub fn is_formula(&self) -> bool {
        matches!(self, Self::Formula { .. })
    }
}

/// Split text into alternating literal and formula segments.
///
/// Matching is non-greedy and spans newlines. A stray unpaired `$$` stays
/// inside the surrounding text. Empty literal fragments are not emitted.
pub fn split_segments(text: &str) -> Vec<Segment> {
    let mut segments = Vec::new();
    let mut last = 0;

    for caps in FORMULA_RE.captures_iter(text) {
        let (Some(whole), Some(inner)) = (caps.get(0), caps.get(1)) else {
            continue;
        };
        if whole.start() > last {
            segments.push(Segment::Text(text[last..whole.start()].to_string()));
        }
        segments.push(Segment::Formula {
            latex: inner.as_str().to_string(),
        });
        last = whole.end();
    }

    if last < text.len() {
        segments.push(Segment::Text(text[last..].to_string()));
    }

    segments
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn rejoin(segments: &[Segment]) -> String {
        segments.iter().map(Segment::source).collect()
    }

    #[test]
    fn test_three_segments() {
        let segments = split_segments("a $$x$$ b");
        assert_eq!(
            segments,
            vec![
                Segment::Text("a ".into()),
                Segment::Formula { latex: "x".into() },
                Segment::Text(" b".into()),
            ]
        );
    }

    #[test]
    fn test_no_formula() {
        let segments = split_segments("plain text");
        assert_eq!(segments, vec![Segment::Text("plain text".into())]);
        assert!(split_segments("").is_empty());
    }

    #[test]
    fn test_formula_spanning_lines() {
        let segments = split_segments("$$\\begin{aligned} a &= b \\\\\n c &= d \\end{aligned}$$");
        assert_eq!(segments.len(), 1);
        assert!(segments[0].is_formula());
    }

    #[test]
    fn test_non_greedy_match() {
        let segments = split_segments("$$a$$ and $$b$$");
        let formulas: Vec<_> = segments.iter().filter(|s| s.is_formula()).collect();
        assert_eq!(formulas.len(), 2);
        assert_eq!(segments[1], Segment::Text(" and ".into()));
    }

    #[test]
    fn test_stray_delimiter_stays_in_text() {
        let segments = split_segments("cost $$x$$ then $$ unfinished");
        assert_eq!(segments.len(), 3);
        assert_eq!(segments[2], Segment::Text(" then $$ unfinished".into()));
    }

    #[test]
    fn test_rejoin_reconstructs_input() {
        let input = "Le ratio $$R = \\frac{A}{B}$$ vaut\n$$0.5$$.";
        assert_eq!(rejoin(&split_segments(input)), input);
    }

    proptest! {
        #[test]
        fn prop_rejoin_is_identity(input in "[a-z $\\\\\n{}^]{0,60}") {
            prop_assert_eq!(rejoin(&split_segments(&input)), input);
        }

        #[test]
        fn prop_segments_alternate(input in "[ab$ ]{0,40}") {
            let segments = split_segments(&input);
            for pair in segments.windows(2) {
                prop_assert!(pair[0].is_formula() || pair[1].is_formula());
            }
        }
    }
}

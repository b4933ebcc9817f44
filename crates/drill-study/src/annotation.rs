//! Comment and NAG normalization.
//!
//! Comments may embed diagram directives in the de-facto PGN study syntax:
//!
//! ```text
//! { Develop and castle [%cal Gg1f3,Rd8d1] [%csl Ye5] }
//! ```
//!
//! `%cal` entries are arrows, `%csl` entries are square fills, each prefixed
//! by a single color letter. The directives are stripped from the displayed
//! text and returned as structured [`Highlight`]s.

use std::sync::LazyLock;

use drill_core::enums::QualityMark;
use drill_core::highlight::{Highlight, HighlightColor};
use regex::Regex;
use shakmaty::Square;

static DIRECTIVE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\[%(cal|csl)(?:\s+([^\]]*))?\]").expect("directive regex must compile")
});

/// A comment split into display text and highlights.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Annotation {
    /// Remaining display text, trimmed. `None` if nothing but whitespace is
    /// left after stripping directives.
    pub text: Option<String>,
    pub highlights: Vec<Highlight>,
}

/// Strip highlight directives out of `comment`.
///
/// Malformed entries are ignored. A `%cal` entry naming a single square is
/// treated as a fill; a `%csl` entry naming two squares fills the first.
#[must_use]
pub fn extract_highlights(comment: &str) -> Annotation {
    let mut highlights = Vec::new();
    for caps in DIRECTIVE.captures_iter(comment) {
        let arrows = &caps[1] == "cal";
        let Some(entries) = caps.get(2) else {
            continue;
        };
        for entry in entries.as_str().split(',') {
            if let Some(highlight) = parse_entry(entry.trim(), arrows) {
                highlights.push(highlight);
            }
        }
    }

    let stripped = DIRECTIVE.replace_all(comment, "");
    let text = stripped.trim();
    Annotation {
        text: (!text.is_empty()).then(|| text.to_string()),
        highlights,
    }
}

fn parse_entry(entry: &str, arrows: bool) -> Option<Highlight> {
    let mut chars = entry.chars();
    let first = chars.next()?;
    let (color, squares) = match HighlightColor::from_letter(first) {
        Some(color) => (color, &entry[first.len_utf8()..]),
        None => (HighlightColor::default(), entry),
    };

    match squares.len() {
        2 => {
            let square = squares.parse::<Square>().ok()?;
            Some(Highlight::Fill { square, color })
        }
        4 => {
            let from = squares.get(..2)?.parse::<Square>().ok()?;
            let to = squares.get(2..)?.parse::<Square>().ok()?;
            if arrows {
                Some(Highlight::Arrow { from, to, color })
            } else {
                Some(Highlight::Fill {
                    square: from,
                    color,
                })
            }
        }
        _ => None,
    }
}

/// Resolve the marks collected for one node.
///
/// Agreement keeps the mark; any disagreement (or no mark at all) drops it.
#[must_use]
pub fn normalize_marks(marks: &[QualityMark]) -> Option<QualityMark> {
    let (first, rest) = marks.split_first()?;
    rest.iter().all(|m| m == first).then_some(*first)
}

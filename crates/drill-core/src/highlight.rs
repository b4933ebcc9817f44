//! Structured diagram highlights extracted from comment directives.

use shakmaty::Square;
use std::fmt;

/// Highlight color, as written in `[%cal ...]` / `[%csl ...]` directives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub enum HighlightColor {
    #[default]
    Green,
    Red,
    Yellow,
    Blue,
}

impl HighlightColor {
    /// Parse the single-letter color prefix of a directive entry.
    #[must_use]
    pub const fn from_letter(letter: char) -> Option<Self> {
        match letter {
            'G' => Some(Self::Green),
            'R' => Some(Self::Red),
            'Y' => Some(Self::Yellow),
            'B' => Some(Self::Blue),
            _ => None,
        }
    }

    #[must_use]
    pub const fn letter(self) -> char {
        match self {
            Self::Green => 'G',
            Self::Red => 'R',
            Self::Yellow => 'Y',
            Self::Blue => 'B',
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Green => "green",
            Self::Red => "red",
            Self::Yellow => "yellow",
            Self::Blue => "blue",
        }
    }
}

/// One arrow or square fill to draw on a diagram.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Highlight {
    Arrow {
        from: Square,
        to: Square,
        color: HighlightColor,
    },
    Fill {
        square: Square,
        color: HighlightColor,
    },
}

/// PGN directive form: `Ge2e4` for arrows, `Rd5` for fills.
impl fmt::Display for Highlight {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Arrow { from, to, color } => write!(f, "{}{from}{to}", color.letter()),
            Self::Fill { square, color } => write!(f, "{}{square}", color.letter()),
        }
    }
}

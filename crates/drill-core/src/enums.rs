//! Side, quality-mark, and policy enums for Opening Drill.
//!
//! All enums use `snake_case` serialization via `#[serde(rename_all = "snake_case")]`
//! and expose `as_str()` for storage and display.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// ---------------------------------------------------------------------------
// Side
// ---------------------------------------------------------------------------

/// The side whose repertoire is being drilled.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, JsonSchema,
)]
#[serde(rename_all = "snake_case")]
pub enum Side {
    White,
    Black,
}

impl Side {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::White => "white",
            Self::Black => "black",
        }
    }

    #[must_use]
    pub const fn opponent(self) -> Self {
        match self {
            Self::White => Self::Black,
            Self::Black => Self::White,
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Side {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "white" | "w" => Ok(Self::White),
            "black" | "b" => Ok(Self::Black),
            other => Err(format!("unknown side '{other}' (expected white or black)")),
        }
    }
}

impl From<shakmaty::Color> for Side {
    fn from(color: shakmaty::Color) -> Self {
        match color {
            shakmaty::Color::White => Self::White,
            shakmaty::Color::Black => Self::Black,
        }
    }
}

impl From<Side> for shakmaty::Color {
    fn from(side: Side) -> Self {
        match side {
            Side::White => Self::White,
            Side::Black => Self::Black,
        }
    }
}

// ---------------------------------------------------------------------------
// QualityMark
// ---------------------------------------------------------------------------

/// Normalized move-quality annotation.
///
/// Only the six classic move-assessment NAGs are quality marks; positional
/// evaluations (`+=`, `=`, ...) and the rest of the NAG table are ignored.
///
/// ```text
/// $1 !   good         $2 ?   mistake
/// $3 !!  brilliant    $4 ??  blunder
/// $5 !?  interesting  $6 ?!  dubious
/// ```
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, JsonSchema,
)]
#[serde(rename_all = "snake_case")]
pub enum QualityMark {
    Good,
    Mistake,
    Brilliant,
    Blunder,
    Interesting,
    Dubious,
}

impl QualityMark {
    /// Map a PGN NAG number to a quality mark.
    #[must_use]
    pub const fn from_nag(nag: u8) -> Option<Self> {
        match nag {
            1 => Some(Self::Good),
            2 => Some(Self::Mistake),
            3 => Some(Self::Brilliant),
            4 => Some(Self::Blunder),
            5 => Some(Self::Interesting),
            6 => Some(Self::Dubious),
            _ => None,
        }
    }

    #[must_use]
    pub const fn nag(self) -> u8 {
        match self {
            Self::Good => 1,
            Self::Mistake => 2,
            Self::Brilliant => 3,
            Self::Blunder => 4,
            Self::Interesting => 5,
            Self::Dubious => 6,
        }
    }

    /// The symbol appended to a move in rendered text.
    #[must_use]
    pub const fn symbol(self) -> &'static str {
        match self {
            Self::Good => "!",
            Self::Mistake => "?",
            Self::Brilliant => "!!",
            Self::Blunder => "??",
            Self::Interesting => "!?",
            Self::Dubious => "?!",
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Good => "good",
            Self::Mistake => "mistake",
            Self::Brilliant => "brilliant",
            Self::Blunder => "blunder",
            Self::Interesting => "interesting",
            Self::Dubious => "dubious",
        }
    }
}

impl fmt::Display for QualityMark {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

// ---------------------------------------------------------------------------
// PreamblePolicy
// ---------------------------------------------------------------------------

/// What happens to comments that precede the first move of a game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum PreamblePolicy {
    /// Show them on every card that shares the game's root position.
    #[default]
    Attach,
    /// Drop them.
    Discard,
}

impl PreamblePolicy {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Attach => "attach",
            Self::Discard => "discard",
        }
    }
}

impl fmt::Display for PreamblePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

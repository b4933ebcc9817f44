//! Content-addressed diagram descriptors.
//!
//! A descriptor captures everything that changes the picture. Its SHA-1 over
//! a canonical text form becomes part of the artifact name, so an unchanged
//! picture keeps its name across runs and is never rewritten.

use std::fmt::Write as _;

use drill_core::enums::Side;
use drill_core::highlight::Highlight;
use drill_study::key::fen_of;
use sha1::{Digest as _, Sha1};
use shakmaty::{CastlingSide, Chess, File, Move, Position, Square};

/// Everything needed to draw one board image.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagram {
    /// Full FEN of the pictured position.
    pub fen: String,
    /// The side drawn at the bottom.
    pub orientation: Side,
    /// Arrows and square fills, sorted.
    pub highlights: Vec<Highlight>,
    pub last_move: Option<(Square, Square)>,
    /// Square of the king in check, if any.
    pub check: Option<Square>,
}

impl Diagram {
    /// Describe `position`, reached by `last_move`, seen from `orientation`.
    #[must_use]
    pub fn of_position(
        position: &Chess,
        orientation: Side,
        last_move: Option<&Move>,
        mut highlights: Vec<Highlight>,
    ) -> Self {
        highlights.sort_unstable();
        highlights.dedup();
        let check = if position.is_check() {
            position.board().king_of(position.turn())
        } else {
            None
        };
        Self {
            fen: fen_of(position),
            orientation,
            highlights,
            last_move: last_move.and_then(move_squares),
            check,
        }
    }

    pub fn arrows(&self) -> impl Iterator<Item = &Highlight> {
        self.highlights
            .iter()
            .filter(|h| matches!(h, Highlight::Arrow { .. }))
    }

    pub fn fills(&self) -> impl Iterator<Item = &Highlight> {
        self.highlights
            .iter()
            .filter(|h| matches!(h, Highlight::Fill { .. }))
    }

    /// Canonical text form hashed by [`Self::content_hash`].
    #[must_use]
    pub fn canonical(&self) -> String {
        let mut out = format!("{}\n{}\n", self.fen, self.orientation);
        let highlights: Vec<String> = self.highlights.iter().map(ToString::to_string).collect();
        out.push_str(&highlights.join(","));
        out.push('\n');
        if let Some((from, to)) = self.last_move {
            let _ = write!(out, "{from}{to}");
        }
        out.push('\n');
        if let Some(check) = self.check {
            let _ = write!(out, "{check}");
        }
        out
    }

    /// Lowercase hex SHA-1 of the canonical form (40 characters).
    #[must_use]
    pub fn content_hash(&self) -> String {
        let mut hasher = Sha1::new();
        hasher.update(self.canonical().as_bytes());
        let digest = hasher.finalize();
        let mut out = String::with_capacity(40);
        for b in digest {
            let _ = write!(out, "{b:02x}");
        }
        out
    }
}

/// Origin and destination squares of a move as a player sees it. Castling
/// moves end on the king's destination, not on the rook.
fn move_squares(m: &Move) -> Option<(Square, Square)> {
    let from = m.from()?;
    let to = match m.castling_side() {
        Some(CastlingSide::KingSide) => Square::from_coords(File::G, from.rank()),
        Some(CastlingSide::QueenSide) => Square::from_coords(File::C, from.rank()),
        None => m.to(),
    };
    Some((from, to))
}

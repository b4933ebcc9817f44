//! Node identity.
//!
//! Two keys identify a node:
//! - [`PathKey`]: the root FEN plus the SAN tokens played from it. Every
//!   traversed path has one; prefix lookups during line extraction use it.
//! - [`PositionId`]: the position itself (board, side to move, castling
//!   rights, en-passant square). Paths that transpose share a `PositionId` and
//!   therefore a node.

use std::cmp::Ordering;
use std::fmt;

use shakmaty::fen::{Epd, Fen};
use shakmaty::{Chess, EnPassantMode};

/// FEN of `position` with legal en-passant squares only.
#[must_use]
pub fn fen_of(position: &Chess) -> String {
    Fen::from_position(position.clone(), EnPassantMode::Legal).to_string()
}

/// A root FEN and the SAN tokens (no check suffix) played from it.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PathKey {
    root: String,
    moves: Vec<String>,
}

impl PathKey {
    /// The empty path at `root`.
    #[must_use]
    pub fn root(root_fen: impl Into<String>) -> Self {
        Self {
            root: root_fen.into(),
            moves: Vec::new(),
        }
    }

    /// This path extended by one token.
    #[must_use]
    pub fn child(&self, token: &str) -> Self {
        let mut moves = self.moves.clone();
        moves.push(token.to_string());
        Self {
            root: self.root.clone(),
            moves,
        }
    }

    /// The first `len` tokens of this path.
    #[must_use]
    pub fn prefix(&self, len: usize) -> Self {
        Self {
            root: self.root.clone(),
            moves: self.moves[..len.min(self.moves.len())].to_vec(),
        }
    }

    #[must_use]
    pub fn root_fen(&self) -> &str {
        &self.root
    }

    #[must_use]
    pub fn moves(&self) -> &[String] {
        &self.moves
    }

    /// Number of half-moves on the path.
    #[must_use]
    pub fn ply(&self) -> usize {
        self.moves.len()
    }

    /// Order used to pick a merged node's canonical path: shorter paths
    /// first, then root FEN, then tokens.
    #[must_use]
    pub fn canonical_cmp(&self, other: &Self) -> Ordering {
        self.ply()
            .cmp(&other.ply())
            .then_with(|| self.root.cmp(&other.root))
            .then_with(|| self.moves.cmp(&other.moves))
    }
}

impl fmt::Display for PathKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} [{}]", self.root, self.moves.join(" "))
    }
}

/// Transposition identity: a FEN without move clocks.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PositionId(String);

impl PositionId {
    #[must_use]
    pub fn of(position: &Chess) -> Self {
        Self(Epd::from_position(position.clone(), EnPassantMode::Legal).to_string())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

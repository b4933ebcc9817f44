//! Move notation with configurable piece letters.
//!
//! SAN is always computed in English internally (identity, signatures, the
//! stored payload). Only the rendered card text uses the configured letters,
//! e.g. `KDTLS` for German.

use drill_core::enums::QualityMark;
use shakmaty::{Chess, Move, Position};

use crate::error::RenderError;

const ENGLISH: [char; 5] = ['K', 'Q', 'R', 'B', 'N'];

/// Piece letters for king, queen, rook, bishop, knight.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Notation {
    letters: [char; 5],
}

impl Default for Notation {
    fn default() -> Self {
        Self { letters: ENGLISH }
    }
}

impl Notation {
    /// Build a notation from five piece letters in `KQRBN` order.
    ///
    /// # Errors
    ///
    /// Returns `RenderError::InvalidPieces` unless `pieces` is exactly five
    /// non-whitespace characters.
    pub fn new(pieces: &str) -> Result<Self, RenderError> {
        let chars: Vec<char> = pieces.chars().collect();
        let letters: [char; 5] = chars
            .try_into()
            .map_err(|_| RenderError::InvalidPieces(pieces.to_string()))?;
        if letters.iter().any(|c| c.is_whitespace()) {
            return Err(RenderError::InvalidPieces(pieces.to_string()));
        }
        Ok(Self { letters })
    }

    /// Replace English piece letters in a SAN token.
    #[must_use]
    pub fn localize(&self, san: &str) -> String {
        san.chars()
            .map(|c| {
                ENGLISH
                    .iter()
                    .position(|&e| e == c)
                    .map_or(c, |i| self.letters[i])
            })
            .collect()
    }

    /// Render `san` as played from `before`: localized letters, check or mate
    /// suffix, then the quality-mark symbol.
    #[must_use]
    pub fn format(
        &self,
        before: &Chess,
        m: &Move,
        san: &str,
        mark: Option<QualityMark>,
    ) -> String {
        let mut after = before.clone();
        after.play_unchecked(m);

        let mut out = self.localize(san);
        if after.is_checkmate() {
            out.push('#');
        } else if after.is_check() {
            out.push('+');
        }
        if let Some(mark) = mark {
            out.push_str(mark.symbol());
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;
    use shakmaty::san::San;

    fn play(pos: &mut Chess, token: &str) -> Move {
        let m = token.parse::<San>().unwrap().to_move(pos).unwrap();
        pos.play_unchecked(&m);
        m
    }

    #[rstest]
    #[case("KQRBN", "Nf3", "Nf3")]
    #[case("KDTLS", "Nf3", "Sf3")]
    #[case("KDTLS", "exd8=Q", "exd8=D")]
    #[case("KDTLS", "O-O", "O-O")]
    #[case("RDTFC", "Bxe5", "Fxe5")]
    fn localizes_piece_letters(#[case] pieces: &str, #[case] san: &str, #[case] expected: &str) {
        let notation = Notation::new(pieces).unwrap();
        assert_eq!(notation.localize(san), expected);
    }

    #[rstest]
    #[case("KQR")]
    #[case("KQRBNP")]
    #[case("KQ BN")]
    fn rejects_bad_letter_sets(#[case] pieces: &str) {
        assert!(matches!(
            Notation::new(pieces),
            Err(RenderError::InvalidPieces(_))
        ));
    }

    #[test]
    fn appends_mate_and_mark() {
        let mut pos = Chess::default();
        for token in ["e4", "e5", "Qh5", "Nc6", "Bc4", "Nf6"] {
            play(&mut pos, token);
        }
        let m = "Qxf7".parse::<San>().unwrap().to_move(&pos).unwrap();
        let notation = Notation::default();
        assert_eq!(
            notation.format(&pos, &m, "Qxf7", Some(QualityMark::Brilliant)),
            "Qxf7#!!"
        );
    }

    #[test]
    fn appends_check() {
        let mut pos = Chess::default();
        for token in ["e4", "f5"] {
            play(&mut pos, token);
        }
        let m = "Qh5".parse::<San>().unwrap().to_move(&pos).unwrap();
        assert_eq!(Notation::default().format(&pos, &m, "Qh5", None), "Qh5+");
    }
}

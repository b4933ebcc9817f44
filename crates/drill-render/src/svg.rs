//! SVG board rasterizer.

use std::fmt::Write as _;

use drill_core::enums::Side;
use drill_core::highlight::{Highlight, HighlightColor};
use shakmaty::fen::Fen;
use shakmaty::{Board, Color, File, Piece, Rank, Role, Square};

use crate::diagram::Diagram;
use crate::error::RenderError;

/// Turns a diagram descriptor into image bytes.
pub trait Rasterizer: Send + Sync {
    /// # Errors
    ///
    /// Returns `RenderError` if the descriptor cannot be drawn.
    fn rasterize(&self, diagram: &Diagram) -> Result<Vec<u8>, RenderError>;
}

/// Draws a plain 8x8 board with Unicode pieces.
#[derive(Debug, Clone)]
pub struct SvgBoard {
    /// Edge length of one square in user units.
    pub square: u32,
    pub light: &'static str,
    pub dark: &'static str,
    pub coordinates: bool,
}

impl Default for SvgBoard {
    fn default() -> Self {
        Self {
            square: 45,
            light: "#ffce9e",
            dark: "#d18b47",
            coordinates: true,
        }
    }
}

const LAST_MOVE: &str = "#cdd16a";
const CHECK: &str = "#ff0000";

const fn color_code(color: HighlightColor) -> &'static str {
    match color {
        HighlightColor::Green => "#15781b",
        HighlightColor::Red => "#882020",
        HighlightColor::Yellow => "#e68f00",
        HighlightColor::Blue => "#003088",
    }
}

const fn glyph(piece: Piece) -> char {
    match (piece.color, piece.role) {
        (Color::White, Role::King) => '\u{2654}',
        (Color::White, Role::Queen) => '\u{2655}',
        (Color::White, Role::Rook) => '\u{2656}',
        (Color::White, Role::Bishop) => '\u{2657}',
        (Color::White, Role::Knight) => '\u{2658}',
        (Color::White, Role::Pawn) => '\u{2659}',
        (Color::Black, Role::King) => '\u{265a}',
        (Color::Black, Role::Queen) => '\u{265b}',
        (Color::Black, Role::Rook) => '\u{265c}',
        (Color::Black, Role::Bishop) => '\u{265d}',
        (Color::Black, Role::Knight) => '\u{265e}',
        (Color::Black, Role::Pawn) => '\u{265f}',
    }
}

impl SvgBoard {
    /// Top-left corner of `square` in board coordinates.
    fn origin(&self, square: Square, orientation: Side) -> (u32, u32) {
        let file = square.file() as u32;
        let rank = square.rank() as u32;
        let (col, row) = match orientation {
            Side::White => (file, 7 - rank),
            Side::Black => (7 - file, rank),
        };
        (col * self.square, row * self.square)
    }

    fn center(&self, square: Square, orientation: Side) -> (u32, u32) {
        let (x, y) = self.origin(square, orientation);
        (x + self.square / 2, y + self.square / 2)
    }

    fn draw(&self, board: &Board, diagram: &Diagram) -> String {
        let size = self.square * 8;
        let s = self.square;
        let o = diagram.orientation;
        let mut out = String::new();

        let _ = write!(
            out,
            r#"<svg xmlns="http://www.w3.org/2000/svg" version="1.1" viewBox="0 0 {size} {size}" width="{size}" height="{size}">"#
        );
        out.push_str("<defs>");
        for color in [
            HighlightColor::Green,
            HighlightColor::Red,
            HighlightColor::Yellow,
            HighlightColor::Blue,
        ] {
            let _ = write!(
                out,
                r#"<marker id="head-{name}" markerWidth="4" markerHeight="4" refX="2" refY="2" orient="auto"><path d="M0,0 L4,2 L0,4 z" fill="{code}"/></marker>"#,
                name = color.as_str(),
                code = color_code(color),
            );
        }
        out.push_str("</defs>");

        for rank in 0..8u32 {
            for file in 0..8u32 {
                let square = Square::from_coords(File::new(file), Rank::new(rank));
                let (x, y) = self.origin(square, o);
                let fill = if (file + rank) % 2 == 0 {
                    self.dark
                } else {
                    self.light
                };
                let _ = write!(
                    out,
                    r#"<rect x="{x}" y="{y}" width="{s}" height="{s}" fill="{fill}"/>"#
                );
            }
        }

        if let Some((from, to)) = diagram.last_move {
            for square in [from, to] {
                let (x, y) = self.origin(square, o);
                let _ = write!(
                    out,
                    r#"<rect x="{x}" y="{y}" width="{s}" height="{s}" fill="{LAST_MOVE}" fill-opacity="0.6"/>"#
                );
            }
        }

        for fill in diagram.fills() {
            if let Highlight::Fill { square, color } = fill {
                let (x, y) = self.origin(*square, o);
                let _ = write!(
                    out,
                    r#"<rect x="{x}" y="{y}" width="{s}" height="{s}" fill="{code}" fill-opacity="0.5"/>"#,
                    code = color_code(*color),
                );
            }
        }

        if let Some(check) = diagram.check {
            let (cx, cy) = self.center(check, o);
            let _ = write!(
                out,
                r#"<circle cx="{cx}" cy="{cy}" r="{r}" fill="{CHECK}" fill-opacity="0.5"/>"#,
                r = s / 2,
            );
        }

        for (square, piece) in board.clone() {
            let (cx, cy) = self.center(square, o);
            let _ = write!(
                out,
                r#"<text x="{cx}" y="{cy}" font-size="{fs}" text-anchor="middle" dominant-baseline="central">{g}</text>"#,
                fs = s * 4 / 5,
                g = glyph(piece),
            );
        }

        for arrow in diagram.arrows() {
            if let Highlight::Arrow { from, to, color } = arrow {
                let (x1, y1) = self.center(*from, o);
                let (x2, y2) = self.center(*to, o);
                let _ = write!(
                    out,
                    r#"<line x1="{x1}" y1="{y1}" x2="{x2}" y2="{y2}" stroke="{code}" stroke-width="{w}" stroke-opacity="0.8" stroke-linecap="round" marker-end="url(#head-{name})"/>"#,
                    code = color_code(*color),
                    w = s / 5,
                    name = color.as_str(),
                );
            }
        }

        if self.coordinates {
            for i in 0..8u32 {
                let file = File::new(i);
                let (x, _) = self.origin(Square::from_coords(file, Rank::First), o);
                let _ = write!(
                    out,
                    r#"<text x="{x}" y="{y}" font-size="{fs}" dx="2" dy="-2">{c}</text>"#,
                    x = x + s - s / 4,
                    y = size,
                    fs = s / 4,
                    c = file.char(),
                );
                let rank = Rank::new(i);
                let (_, y) = self.origin(Square::from_coords(File::A, rank), o);
                let _ = write!(
                    out,
                    r#"<text x="2" y="{y}" font-size="{fs}" dominant-baseline="hanging">{c}</text>"#,
                    y = y + 2,
                    fs = s / 4,
                    c = rank.char(),
                );
            }
        }

        out.push_str("</svg>");
        out
    }
}

impl Rasterizer for SvgBoard {
    fn rasterize(&self, diagram: &Diagram) -> Result<Vec<u8>, RenderError> {
        let invalid = |message: String| RenderError::InvalidFen {
            fen: diagram.fen.clone(),
            message,
        };
        let fen = Fen::from_ascii(diagram.fen.as_bytes()).map_err(|e| invalid(e.to_string()))?;
        let board = fen.into_setup().board;
        Ok(self.draw(&board, diagram).into_bytes())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shakmaty::Chess;

    fn start() -> Diagram {
        Diagram::of_position(&Chess::default(), Side::White, None, vec![])
    }

    fn render(diagram: &Diagram) -> String {
        String::from_utf8(SvgBoard::default().rasterize(diagram).unwrap()).unwrap()
    }

    #[test]
    fn draws_every_piece_of_the_start_position() {
        let svg = render(&start());
        assert!(svg.starts_with("<svg"));
        assert!(svg.ends_with("</svg>"));
        assert_eq!(svg.matches("<text").count(), 32 + 16);
        assert_eq!(svg.matches('\u{265f}').count(), 8);
    }

    #[test]
    fn orientation_flips_the_board() {
        let white = render(&start());
        let mut flipped = start();
        flipped.orientation = Side::Black;
        let black = render(&flipped);
        assert_ne!(white, black);
        // The white king stands near the bottom edge for White.
        assert!(white.contains("<text x=\"202\" y=\"337\""));
        assert!(black.contains("<text x=\"157\" y=\"22\""));
    }

    #[test]
    fn draws_arrows_and_fills() {
        let mut diagram = start();
        diagram.highlights = vec![
            Highlight::Arrow {
                from: Square::E2,
                to: Square::E4,
                color: HighlightColor::Red,
            },
            Highlight::Fill {
                square: Square::D5,
                color: HighlightColor::Blue,
            },
        ];
        let svg = render(&diagram);
        assert!(svg.contains("marker-end=\"url(#head-red)\""));
        assert!(svg.contains("fill=\"#003088\" fill-opacity=\"0.5\""));
    }

    #[test]
    fn rejects_garbage_fen() {
        let mut diagram = start();
        diagram.fen = "not a fen".into();
        assert!(matches!(
            SvgBoard::default().rasterize(&diagram),
            Err(RenderError::InvalidFen { .. })
        ));
    }
}

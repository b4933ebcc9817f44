//! Line extraction.
//!
//! Every node where the drilled side is to move and at least one continuation
//! is known becomes a [`StudyLine`]: the moves that lead there from the root
//! (the question) and the moves the repertoire plays from there (the answer).

use std::collections::BTreeSet;

use drill_core::enums::{PreamblePolicy, QualityMark, Side};
use drill_core::highlight::Highlight;
use drill_core::payload::line_signature;
use shakmaty::{CastlingMode, Chess, Move, Position};
use tracing::debug;

use crate::error::StudyError;
use crate::key::fen_of;
use crate::node::PositionNode;
use crate::table::PositionTable;

/// One move of a line, with what the study says about it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineMove {
    pub mv: Move,
    /// SAN without check suffix.
    pub san: String,
    pub comments: Vec<String>,
    pub mark: Option<QualityMark>,
    /// Highlights from the comments on this move.
    pub highlights: Vec<Highlight>,
}

impl LineMove {
    fn from_node(mv: Move, san: &str, node: &PositionNode) -> Self {
        Self {
            mv,
            san: san.to_string(),
            comments: node.comments().iter().cloned().collect(),
            mark: node.mark(),
            highlights: node.highlights().iter().copied().collect(),
        }
    }

    /// UCI notation (`e2e4`, `e1g1`, `e7e8q`).
    #[must_use]
    pub fn uci(&self) -> String {
        self.mv.to_uci(CastlingMode::Standard).to_string()
    }
}

/// A decision point of the drilled side.
#[derive(Debug, Clone)]
pub struct StudyLine {
    pub side: Side,
    pub root_fen: String,
    pub root: Chess,
    pub root_comments: Vec<String>,
    pub moves: Vec<LineMove>,
    /// Candidate answers ordered by SAN token.
    pub answers: Vec<LineMove>,
    pub highlights: Vec<Highlight>,
}

impl StudyLine {
    /// The position after `moves`, where the answer is expected.
    #[must_use]
    pub fn decision_position(&self) -> Chess {
        let mut position = self.root.clone();
        for m in &self.moves {
            position.play_unchecked(&m.mv);
        }
        position
    }

    #[must_use]
    pub fn decision_fen(&self) -> String {
        fen_of(&self.decision_position())
    }

    /// Stable identity: root FEN, move sequence, and answer set.
    #[must_use]
    pub fn signature(&self) -> String {
        let moves: Vec<String> = self.moves.iter().map(LineMove::uci).collect();
        let answers: Vec<String> = self.answers.iter().map(LineMove::uci).collect();
        line_signature(
            &self.root_fen,
            moves.iter().map(String::as_str),
            answers.iter().map(String::as_str),
        )
    }
}

/// Extract every decision point of `side` from a finished table.
///
/// The question of each line is rebuilt by looking up every prefix of the
/// node's canonical path in the table. Output is sorted by signature.
///
/// # Errors
///
/// Returns `StudyError::Invariant` if a prefix or answer position is missing
/// from the table.
pub fn extract_lines(
    table: &PositionTable,
    side: Side,
    preamble: PreamblePolicy,
) -> Result<Vec<StudyLine>, StudyError> {
    let mut lines = Vec::new();
    for node in table.nodes() {
        if node.side_to_move() != side || node.continuations().is_empty() {
            continue;
        }
        lines.push(build_line(table, node, side, preamble)?);
    }

    lines.sort_by_cached_key(StudyLine::signature);
    debug!(side = %side, lines = lines.len(), "extracted study lines");
    Ok(lines)
}

fn build_line(
    table: &PositionTable,
    node: &PositionNode,
    side: Side,
    preamble: PreamblePolicy,
) -> Result<StudyLine, StudyError> {
    let key = node.key();

    let mut moves = Vec::with_capacity(key.ply());
    for (i, (token, mv)) in key.moves().iter().zip(node.line()).enumerate() {
        let prefix = key.prefix(i + 1);
        let prefix_node = table
            .get(&prefix)
            .ok_or_else(|| StudyError::Invariant(format!("prefix {prefix} is not in the table")))?;
        moves.push(LineMove::from_node(mv.clone(), token, prefix_node));
    }

    let mut answers = Vec::with_capacity(node.continuations().len());
    for (token, mv) in node.continuations() {
        let child = table.child_of(node, mv).ok_or_else(|| {
            StudyError::Invariant(format!("continuation {token} of {key} is not in the table"))
        })?;
        answers.push(LineMove::from_node(mv.clone(), token, child));
    }

    let root_notes = table.root_notes(key.root_fen());
    let root_comments = match (preamble, root_notes) {
        (PreamblePolicy::Attach, Some(notes)) => notes.comments.iter().cloned().collect(),
        _ => Vec::new(),
    };

    let mut highlights: BTreeSet<Highlight> = node.highlights().clone();
    if key.ply() == 0 {
        if let Some(notes) = root_notes {
            highlights.extend(notes.highlights.iter().copied());
        }
    }

    Ok(StudyLine {
        side,
        root_fen: key.root_fen().to_string(),
        root: node.root().clone(),
        root_comments,
        moves,
        answers,
        highlights: highlights.into_iter().collect(),
    })
}

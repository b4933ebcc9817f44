//! Position nodes.

use std::cmp::Ordering;
use std::collections::{BTreeMap, BTreeSet};

use drill_core::enums::{QualityMark, Side};
use drill_core::highlight::Highlight;
use shakmaty::{Chess, Move, Position};

use crate::annotation::{Annotation, normalize_marks};
use crate::key::{PathKey, PositionId};

/// Index of a node inside its [`crate::PositionTable`].
pub type NodeId = usize;

/// One distinct position of a study, with everything known about the move
/// that reaches it.
#[derive(Debug, Clone)]
pub struct PositionNode {
    id: PositionId,
    key: PathKey,
    root: Chess,
    line: Vec<Move>,
    position: Chess,
    continuations: BTreeMap<String, Move>,
    comments: BTreeSet<String>,
    highlights: BTreeSet<Highlight>,
    marks: Vec<QualityMark>,
    mark: Option<QualityMark>,
}

impl PositionNode {
    pub(crate) fn new(key: PathKey, root: Chess, line: Vec<Move>, position: Chess) -> Self {
        Self {
            id: PositionId::of(&position),
            key,
            root,
            line,
            position,
            continuations: BTreeMap::new(),
            comments: BTreeSet::new(),
            highlights: BTreeSet::new(),
            marks: Vec::new(),
            mark: None,
        }
    }

    #[must_use]
    pub const fn position_id(&self) -> &PositionId {
        &self.id
    }

    /// Canonical path: the smallest path known to reach this position.
    #[must_use]
    pub const fn key(&self) -> &PathKey {
        &self.key
    }

    /// Root position of the canonical path.
    #[must_use]
    pub const fn root(&self) -> &Chess {
        &self.root
    }

    /// Moves of the canonical path.
    #[must_use]
    pub fn line(&self) -> &[Move] {
        &self.line
    }

    #[must_use]
    pub const fn position(&self) -> &Chess {
        &self.position
    }

    #[must_use]
    pub fn side_to_move(&self) -> Side {
        self.position.turn().into()
    }

    /// Known continuations keyed by SAN token.
    #[must_use]
    pub const fn continuations(&self) -> &BTreeMap<String, Move> {
        &self.continuations
    }

    #[must_use]
    pub const fn comments(&self) -> &BTreeSet<String> {
        &self.comments
    }

    #[must_use]
    pub const fn highlights(&self) -> &BTreeSet<Highlight> {
        &self.highlights
    }

    /// Marks collected so far, before normalization.
    #[must_use]
    pub fn marks(&self) -> &[QualityMark] {
        &self.marks
    }

    /// The normalized mark. Always `None` before the table is finished.
    #[must_use]
    pub const fn mark(&self) -> Option<QualityMark> {
        self.mark
    }

    pub(crate) fn add_continuation(&mut self, token: String, m: Move) {
        self.continuations.entry(token).or_insert(m);
    }

    pub(crate) fn annotate(&mut self, annotation: Annotation) {
        if let Some(text) = annotation.text {
            self.comments.insert(text);
        }
        self.highlights.extend(annotation.highlights);
    }

    pub(crate) fn add_mark(&mut self, mark: QualityMark) {
        self.marks.push(mark);
    }

    /// Adopt `key` as the canonical path if it orders before the current one.
    pub(crate) fn offer_key(&mut self, key: &PathKey, root: &Chess, line: &[Move]) {
        if key.canonical_cmp(&self.key) == Ordering::Less {
            self.key = key.clone();
            self.root = root.clone();
            self.line = line.to_vec();
        }
    }

    /// Fold a node for the same position into this one.
    pub(crate) fn merge(&mut self, other: Self) {
        debug_assert_eq!(self.id, other.id);
        self.offer_key(&other.key, &other.root, &other.line);
        for (token, m) in other.continuations {
            self.add_continuation(token, m);
        }
        self.comments.extend(other.comments);
        self.highlights.extend(other.highlights);
        self.marks.extend(other.marks);
    }

    /// Resolve the collected marks. Returns `true` if conflicting marks were
    /// dropped.
    pub(crate) fn normalize(&mut self) -> bool {
        self.mark = normalize_marks(&self.marks);
        self.mark.is_none() && !self.marks.is_empty()
    }
}

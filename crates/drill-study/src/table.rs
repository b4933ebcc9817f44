//! The merged position table shared by every document of a run.

use std::collections::{BTreeMap, BTreeSet, HashMap};

use drill_core::highlight::Highlight;
use shakmaty::{Chess, Move, Position};

use crate::annotation::Annotation;
use crate::key::{PathKey, PositionId};
use crate::node::{NodeId, PositionNode};

/// Comments and highlights written before the first move of a game, keyed by
/// the game's root FEN.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RootNotes {
    pub comments: BTreeSet<String>,
    pub highlights: BTreeSet<Highlight>,
}

/// Every distinct position seen so far.
///
/// `by_path` maps every traversed path to its node; `by_position` maps each
/// position to the single node that represents it.
#[derive(Debug, Default)]
pub struct PositionTable {
    nodes: Vec<PositionNode>,
    by_path: HashMap<PathKey, NodeId>,
    by_position: HashMap<PositionId, NodeId>,
    roots: BTreeMap<String, RootNotes>,
}

impl PositionTable {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of distinct positions.
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Number of distinct traversed paths.
    #[must_use]
    pub fn path_count(&self) -> usize {
        self.by_path.len()
    }

    pub fn nodes(&self) -> impl Iterator<Item = &PositionNode> {
        self.nodes.iter()
    }

    /// The node reached by `key`, if that path was traversed.
    #[must_use]
    pub fn get(&self, key: &PathKey) -> Option<&PositionNode> {
        self.by_path.get(key).map(|&id| &self.nodes[id])
    }

    #[must_use]
    pub fn get_position(&self, id: &PositionId) -> Option<&PositionNode> {
        self.by_position.get(id).map(|&idx| &self.nodes[idx])
    }

    /// The node reached by playing `m` from `node`.
    #[must_use]
    pub fn child_of(&self, node: &PositionNode, m: &Move) -> Option<&PositionNode> {
        let mut position = node.position().clone();
        position.play_unchecked(m);
        self.get_position(&PositionId::of(&position))
    }

    #[must_use]
    pub fn root_notes(&self, root_fen: &str) -> Option<&RootNotes> {
        self.roots.get(root_fen)
    }

    pub(crate) fn node_mut(&mut self, id: NodeId) -> &mut PositionNode {
        &mut self.nodes[id]
    }

    /// Look up or create the node for a traversed path.
    ///
    /// A new path to a known position is registered as an alias of that
    /// position's node.
    pub(crate) fn visit(
        &mut self,
        key: PathKey,
        root: &Chess,
        line: Vec<Move>,
        position: Chess,
    ) -> NodeId {
        if let Some(&id) = self.by_path.get(&key) {
            return id;
        }

        let position_id = PositionId::of(&position);
        let id = if let Some(&id) = self.by_position.get(&position_id) {
            self.nodes[id].offer_key(&key, root, &line);
            id
        } else {
            let id = self.nodes.len();
            self.nodes
                .push(PositionNode::new(key.clone(), root.clone(), line, position));
            self.by_position.insert(position_id, id);
            id
        };
        self.by_path.insert(key, id);
        id
    }

    pub(crate) fn annotate_root(&mut self, root_fen: &str, annotation: Annotation) {
        let notes = self.roots.entry(root_fen.to_string()).or_default();
        if let Some(text) = annotation.text {
            notes.comments.insert(text);
        }
        notes.highlights.extend(annotation.highlights);
    }

    /// Fold another table (one finished document) into this one.
    pub(crate) fn absorb(&mut self, other: Self) {
        let mut remap = Vec::with_capacity(other.nodes.len());
        for node in other.nodes {
            let position_id = node.position_id().clone();
            let id = if let Some(&id) = self.by_position.get(&position_id) {
                self.nodes[id].merge(node);
                id
            } else {
                let id = self.nodes.len();
                self.nodes.push(node);
                self.by_position.insert(position_id, id);
                id
            };
            remap.push(id);
        }

        for (key, old) in other.by_path {
            self.by_path.entry(key).or_insert(remap[old]);
        }

        for (root, notes) in other.roots {
            let target = self.roots.entry(root).or_default();
            target.comments.extend(notes.comments);
            target.highlights.extend(notes.highlights);
        }
    }

    /// Resolve every node's marks. Returns the number of nodes whose marks
    /// conflicted and were dropped.
    pub(crate) fn normalize_marks(&mut self) -> usize {
        self.nodes
            .iter_mut()
            .map(PositionNode::normalize)
            .filter(|&dropped| dropped)
            .count()
    }
}

//! Position tree builder.
//!
//! Replays the events of each document against real board positions. A
//! document is built into its own scratch [`PositionTable`] and absorbed into
//! the shared table only when every one of its games replayed cleanly, so a
//! bad document never leaves partial nodes behind.

use shakmaty::fen::Fen;
use shakmaty::san::San;
use shakmaty::{CastlingMode, Chess, Move, Position};
use tracing::debug;

use drill_core::enums::QualityMark;

use crate::annotation::extract_highlights;
use crate::error::StudyError;
use crate::events::StudyEvent;
use crate::key::{PathKey, fen_of};
use crate::node::NodeId;
use crate::table::PositionTable;

/// Accumulates documents into one merged [`PositionTable`].
#[derive(Debug, Default)]
pub struct TreeBuilder {
    table: PositionTable,
    documents: usize,
}

impl TreeBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of documents absorbed so far.
    #[must_use]
    pub const fn documents(&self) -> usize {
        self.documents
    }

    /// Replay one document's events and merge the result.
    ///
    /// # Errors
    ///
    /// Returns a document error (`InvalidSetup`, `IllegalMove`, `Malformed`)
    /// if any game of the document cannot be replayed. The shared table is
    /// left untouched in that case.
    pub fn ingest(&mut self, name: &str, events: &[StudyEvent]) -> Result<(), StudyError> {
        let scratch = DocumentBuilder::default().build(events)?;
        debug!(
            document = name,
            positions = scratch.len(),
            paths = scratch.path_count(),
            "document replayed"
        );
        self.table.absorb(scratch);
        self.documents += 1;
        Ok(())
    }

    /// Normalize marks and hand out the finished table.
    #[must_use]
    pub fn finish(mut self) -> PositionTable {
        let dropped = self.table.normalize_marks();
        if dropped > 0 {
            debug!(nodes = dropped, "dropped conflicting quality marks");
        }
        self.table
    }
}

/// Where the replay currently stands.
#[derive(Debug, Clone)]
struct Cursor {
    node: NodeId,
    key: PathKey,
    line: Vec<Move>,
    position: Chess,
}

/// Per-game replay state.
#[derive(Debug)]
struct Game {
    index: usize,
    root: Chess,
    root_fen: String,
    current: Cursor,
    /// The cursor before the last move, where a variation starts.
    previous: Option<Cursor>,
    stack: Vec<(Cursor, Option<Cursor>)>,
    /// No move has been played in the main line yet.
    preamble: bool,
    /// Inside a variation, before its first move.
    variation_start: bool,
    pending: Vec<String>,
}

#[derive(Debug, Default)]
struct DocumentBuilder {
    table: PositionTable,
    games: usize,
    game: Option<Game>,
}

impl DocumentBuilder {
    fn build(mut self, events: &[StudyEvent]) -> Result<PositionTable, StudyError> {
        for event in events {
            self.apply(event)?;
        }
        if let Some(game) = &self.game {
            return Err(StudyError::Malformed {
                game: game.index,
                message: "document ended inside a game".into(),
            });
        }
        Ok(self.table)
    }

    fn apply(&mut self, event: &StudyEvent) -> Result<(), StudyError> {
        match event {
            StudyEvent::BeginGame { setup } => self.begin_game(setup.as_deref()),
            StudyEvent::EndGame => {
                let game = self.game_mut()?;
                if !game.stack.is_empty() {
                    return Err(StudyError::Malformed {
                        game: game.index,
                        message: "unterminated variation".into(),
                    });
                }
                self.game = None;
                Ok(())
            }
            StudyEvent::Move(san_plus) => self.play(&san_plus.san),
            StudyEvent::Comment(text) => self.comment(text),
            StudyEvent::Nag(nag) => self.nag(*nag),
            StudyEvent::BeginVariation => {
                let game = self.game_mut()?;
                let Some(previous) = game.previous.take() else {
                    return Err(StudyError::Malformed {
                        game: game.index,
                        message: "variation without a preceding move".into(),
                    });
                };
                let current = std::mem::replace(&mut game.current, previous.clone());
                game.stack.push((current, Some(previous)));
                game.variation_start = true;
                game.pending.clear();
                Ok(())
            }
            StudyEvent::EndVariation => {
                let game = self.game_mut()?;
                let Some((current, previous)) = game.stack.pop() else {
                    return Err(StudyError::Malformed {
                        game: game.index,
                        message: "unbalanced variation end".into(),
                    });
                };
                game.stack_restore(current, previous);
                Ok(())
            }
        }
    }

    fn game_mut(&mut self) -> Result<&mut Game, StudyError> {
        let games = self.games;
        self.game.as_mut().ok_or_else(|| StudyError::Malformed {
            game: games,
            message: "movetext outside of a game".into(),
        })
    }

    fn begin_game(&mut self, setup: Option<&str>) -> Result<(), StudyError> {
        self.games += 1;
        let index = self.games;
        let root = match setup {
            None => Chess::default(),
            Some(fen) => parse_setup(index, fen)?,
        };
        let root_fen = fen_of(&root);
        let key = PathKey::root(root_fen.clone());
        let node = self
            .table
            .visit(key.clone(), &root, Vec::new(), root.clone());

        self.game = Some(Game {
            index,
            current: Cursor {
                node,
                key,
                line: Vec::new(),
                position: root.clone(),
            },
            root,
            root_fen,
            previous: None,
            stack: Vec::new(),
            preamble: true,
            variation_start: false,
            pending: Vec::new(),
        });
        Ok(())
    }

    fn play(&mut self, san: &San) -> Result<(), StudyError> {
        let Self { table, game, games } = self;
        let game = game.as_mut().ok_or_else(|| StudyError::Malformed {
            game: *games,
            message: "move outside of a game".into(),
        })?;

        let parent = &game.current;
        let m = san
            .to_move(&parent.position)
            .map_err(|_| StudyError::IllegalMove {
                game: game.index,
                san: san.to_string(),
                fen: fen_of(&parent.position),
            })?;
        let token = San::from_move(&parent.position, &m).to_string();

        let mut position = parent.position.clone();
        position.play_unchecked(&m);
        let key = parent.key.child(&token);
        let mut line = parent.line.clone();
        line.push(m.clone());

        table.node_mut(parent.node).add_continuation(token, m);
        let node = table.visit(key.clone(), &game.root, line.clone(), position.clone());

        for text in game.pending.drain(..) {
            table.node_mut(node).annotate(extract_highlights(&text));
        }

        let child = Cursor {
            node,
            key,
            line,
            position,
        };
        game.previous = Some(std::mem::replace(&mut game.current, child));
        game.preamble = false;
        game.variation_start = false;
        Ok(())
    }

    fn comment(&mut self, text: &str) -> Result<(), StudyError> {
        let Self { table, game, games } = self;
        let game = game.as_mut().ok_or_else(|| StudyError::Malformed {
            game: *games,
            message: "comment outside of a game".into(),
        })?;

        if game.variation_start {
            game.pending.push(text.to_string());
        } else if game.preamble {
            table.annotate_root(&game.root_fen, extract_highlights(text));
        } else {
            table
                .node_mut(game.current.node)
                .annotate(extract_highlights(text));
        }
        Ok(())
    }

    fn nag(&mut self, nag: u8) -> Result<(), StudyError> {
        let Self { table, game, .. } = self;
        let Some(game) = game.as_mut() else {
            return Ok(());
        };
        let Some(mark) = QualityMark::from_nag(nag) else {
            return Ok(());
        };
        if !game.preamble && !game.variation_start {
            table.node_mut(game.current.node).add_mark(mark);
        }
        Ok(())
    }
}

impl Game {
    fn stack_restore(&mut self, current: Cursor, previous: Option<Cursor>) {
        self.current = current;
        self.previous = previous;
        self.variation_start = false;
        self.pending.clear();
    }
}

fn parse_setup(game: usize, fen: &str) -> Result<Chess, StudyError> {
    let invalid = |message: String| StudyError::InvalidSetup {
        game,
        fen: fen.to_string(),
        message,
    };
    let parsed = Fen::from_ascii(fen.as_bytes()).map_err(|e| invalid(e.to_string()))?;
    parsed
        .into_position(CastlingMode::Standard)
        .map_err(|e| invalid(e.to_string()))
}

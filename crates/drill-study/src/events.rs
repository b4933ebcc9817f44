//! PGN document → traversal events.
//!
//! `pgn-reader` does the tokenizing; this module only flattens its visitor
//! callbacks into a plain event list so the tree builder can be driven (and
//! tested) without a reader.

use pgn_reader::{BufferedReader, Nag, RawComment, RawHeader, SanPlus, Skip, Visitor};

use crate::error::StudyError;

/// One traversal event of a study document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StudyEvent {
    /// Start of a game. `setup` is the `FEN` header, if any.
    BeginGame { setup: Option<String> },
    Move(SanPlus),
    Comment(String),
    Nag(u8),
    BeginVariation,
    EndVariation,
    EndGame,
}

/// Parse every game of a PGN document into events.
///
/// The reader is lenient: unknown tokens are skipped and unbalanced
/// parentheses are closed at the end of the game. Move legality is checked
/// later by the builder.
///
/// # Errors
///
/// Returns `StudyError::Io` if the underlying reader fails.
pub fn parse_study(bytes: &[u8]) -> Result<Vec<StudyEvent>, StudyError> {
    let mut reader = BufferedReader::new_cursor(bytes);
    let mut collector = EventCollector::default();
    while reader.read_game(&mut collector)?.is_some() {}
    Ok(collector.events)
}

#[derive(Default)]
struct EventCollector {
    events: Vec<StudyEvent>,
    setup: Option<String>,
}

impl Visitor for EventCollector {
    type Result = ();

    fn begin_game(&mut self) {
        self.setup = None;
    }

    fn header(&mut self, key: &[u8], value: RawHeader<'_>) {
        if key == b"FEN" {
            self.setup = Some(String::from_utf8_lossy(value.as_bytes()).trim().to_string());
        }
    }

    fn end_headers(&mut self) -> Skip {
        self.events.push(StudyEvent::BeginGame {
            setup: self.setup.take(),
        });
        Skip(false)
    }

    fn san(&mut self, san_plus: SanPlus) {
        self.events.push(StudyEvent::Move(san_plus));
    }

    fn nag(&mut self, nag: Nag) {
        self.events.push(StudyEvent::Nag(nag.0));
    }

    fn comment(&mut self, comment: RawComment<'_>) {
        self.events.push(StudyEvent::Comment(
            String::from_utf8_lossy(comment.as_bytes()).into_owned(),
        ));
    }

    fn begin_variation(&mut self) -> Skip {
        self.events.push(StudyEvent::BeginVariation);
        Skip(false)
    }

    fn end_variation(&mut self) {
        self.events.push(StudyEvent::EndVariation);
    }

    fn end_game(&mut self) -> Self::Result {
        self.events.push(StudyEvent::EndGame);
    }
}

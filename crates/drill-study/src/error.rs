//! Study error types for drill-study.

/// Errors that can occur while reading a study document or extracting lines.
///
/// Everything except `Invariant` is a document error: the offending document
/// is skipped and the run continues.
#[derive(Debug, thiserror::Error)]
pub enum StudyError {
    #[error("PGN read failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("Game {game}: invalid FEN setup '{fen}': {message}")]
    InvalidSetup {
        game: usize,
        fen: String,
        message: String,
    },

    #[error("Game {game}: illegal move '{san}' in position {fen}")]
    IllegalMove {
        game: usize,
        san: String,
        fen: String,
    },

    #[error("Game {game}: malformed movetext: {message}")]
    Malformed { game: usize, message: String },

    /// Internal consistency fault (e.g., a prefix key missing from the table).
    /// Indicates a bug, never bad input.
    #[error("Internal consistency fault: {0}")]
    Invariant(String),
}

impl StudyError {
    /// Whether the error is attributable to the input document.
    #[must_use]
    pub const fn is_document_error(&self) -> bool {
        !matches!(self, Self::Invariant(_))
    }
}

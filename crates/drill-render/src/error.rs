//! Render error types for drill-render.

use drill_core::errors::CoreError;

#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    #[error("Invalid piece letters '{0}': expected 5 letters for K, Q, R, B, N")]
    InvalidPieces(String),

    #[error("Invalid diagram FEN '{fen}': {message}")]
    InvalidFen { fen: String, message: String },

    #[error("Line payload error: {0}")]
    Payload(#[from] CoreError),
}

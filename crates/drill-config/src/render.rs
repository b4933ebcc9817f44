//! Card rendering options.

use drill_core::enums::PreamblePolicy;
use serde::{Deserialize, Serialize};

/// English piece letters, king first.
fn default_pieces() -> String {
    "KQRBN".to_string()
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RenderConfig {
    /// Letters for king, queen, rook, bishop, and knight in rendered moves
    /// (`KDTLS` for German notation).
    #[serde(default = "default_pieces")]
    pub pieces: String,

    /// Whether comments before a game's first move appear on its cards.
    #[serde(default)]
    pub preamble: PreamblePolicy,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            pieces: default_pieces(),
            preamble: PreamblePolicy::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_correct() {
        let config = RenderConfig::default();
        assert_eq!(config.pieces, "KQRBN");
        assert_eq!(config.preamble, PreamblePolicy::Attach);
    }
}

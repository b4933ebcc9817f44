//! Destination deck configuration.

use drill_core::enums::Side;
use serde::{Deserialize, Serialize};

fn default_notetype() -> String {
    "Basic".to_string()
}

const fn default_side() -> Side {
    Side::White
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DeckConfig {
    /// Deck receiving the cards. Required for `drill sync`.
    #[serde(default)]
    pub name: String,

    /// Note type used for new cards.
    #[serde(default = "default_notetype")]
    pub notetype: String,

    /// Side whose moves are drilled.
    #[serde(default = "default_side")]
    pub side: Side,
}

impl DeckConfig {
    /// Whether a destination deck has been chosen.
    #[must_use]
    pub const fn is_configured(&self) -> bool {
        !self.name.is_empty()
    }
}

impl Default for DeckConfig {
    fn default() -> Self {
        Self {
            name: String::new(),
            notetype: default_notetype(),
            side: default_side(),
        }
    }
}

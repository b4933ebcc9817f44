//! Versioned line payload stored in every card's `line` field.
//!
//! The payload is the machine-readable projection of a study line. On every
//! run the engine re-derives the persisted signature from it, so each
//! historical payload version must stay readable (see [`crate::migrate`]).

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::enums::QualityMark;
use crate::errors::CoreError;
use crate::migrate;

/// Current payload version written by the renderer.
pub const CURRENT_VERSION: u32 = 2;

/// Separator between the root, move-sequence, and answer-set segments of a
/// signature. Without it `[a b] + {c}` and `[a] + {b c}` would collide.
const SEGMENT_SEP: &str = " | ";

/// One move of a line or one candidate answer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct PayloadMove {
    /// Move in UCI notation (`e2e4`, `e7e8q`, `e1g1`).
    pub uci: String,
    /// English SAN without check suffix. Absent in payloads migrated from v1.
    #[serde(default)]
    pub san: Option<String>,
    #[serde(default)]
    pub comments: Vec<String>,
    #[serde(default)]
    pub mark: Option<QualityMark>,
}

/// Current (v2) line payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct LinePayload {
    /// Payload version; always [`CURRENT_VERSION`] after parsing.
    pub v: u32,
    /// FEN of the line's root position.
    pub fen: String,
    #[serde(default)]
    pub root_comments: Vec<String>,
    pub moves: Vec<PayloadMove>,
    pub answers: Vec<PayloadMove>,
}

impl LinePayload {
    /// Serialize to the compact JSON stored in the card.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::Validation` if serialization fails.
    pub fn to_json(&self) -> Result<String, CoreError> {
        serde_json::to_string(self).map_err(|e| CoreError::Validation(e.to_string()))
    }

    /// Parse a stored payload of any known version.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::Validation` for malformed JSON and
    /// `CoreError::UnsupportedVersion` for versions without a migration path.
    pub fn from_stored(raw: &str) -> Result<Self, CoreError> {
        let value: serde_json::Value =
            serde_json::from_str(raw).map_err(|e| CoreError::Validation(e.to_string()))?;
        let value = migrate::upgrade(value)?;
        serde_json::from_value(value).map_err(|e| CoreError::Validation(e.to_string()))
    }

    /// The diff key of the card carrying this payload.
    #[must_use]
    pub fn signature(&self) -> String {
        line_signature(
            &self.fen,
            self.moves.iter().map(|m| m.uci.as_str()),
            self.answers.iter().map(|m| m.uci.as_str()),
        )
    }
}

/// Build a card signature from the root FEN, the move sequence, and the
/// answer set.
///
/// Answers are sorted, so the signature does not depend on their order.
pub fn line_signature<'a>(
    root_fen: &str,
    moves: impl IntoIterator<Item = &'a str>,
    answers: impl IntoIterator<Item = &'a str>,
) -> String {
    let moves: Vec<&str> = moves.into_iter().collect();
    let mut answers: Vec<&str> = answers.into_iter().collect();
    answers.sort_unstable();
    answers.dedup();

    let mut signature = String::from(root_fen);
    signature.push_str(SEGMENT_SEP);
    signature.push_str(&moves.join(" "));
    signature.push_str(SEGMENT_SEP);
    signature.push_str(&answers.join(" "));
    signature
}

/// Signature of a stored payload, or `None` if it cannot be read.
#[must_use]
pub fn signature_from_stored(raw: &str) -> Option<String> {
    LinePayload::from_stored(raw).ok().map(|p| p.signature())
}

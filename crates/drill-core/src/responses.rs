//! CLI response types returned by `drill` commands.
//!
//! These structs define the shape of JSON output for `drill sync`,
//! `drill preview`, `drill deck add`, `drill deck list`, and `drill deck gc`.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// A study document that was skipped during a run.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct SkippedDocument {
    pub path: String,
    pub reason: String,
}

/// Externally observable result of one synchronization run.
///
/// The first five counters form the run's patch quintuple. A second run with
/// unchanged documents and an untouched store reports all of them as zero.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct SyncReport {
    pub inserted: u32,
    pub updated: u32,
    pub deleted: u32,
    pub diagrams_created: u32,
    pub diagrams_deleted: u32,
    #[serde(default)]
    pub skipped_documents: Vec<SkippedDocument>,
}

impl SyncReport {
    /// The `(inserted, updated, deleted, diagrams_created, diagrams_deleted)`
    /// quintuple.
    #[must_use]
    pub const fn quintuple(&self) -> (u32, u32, u32, u32, u32) {
        (
            self.inserted,
            self.updated,
            self.deleted,
            self.diagrams_created,
            self.diagrams_deleted,
        )
    }

    /// Whether the run changed nothing.
    #[must_use]
    pub const fn is_noop(&self) -> bool {
        matches!(self.quintuple(), (0, 0, 0, 0, 0))
    }
}

/// One rendered card, as printed by `drill preview`.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct CardPreview {
    pub signature: String,
    pub question: String,
    pub answer: String,
}

/// Response from `drill preview`.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct PreviewResponse {
    pub side: String,
    pub cards: Vec<CardPreview>,
    pub skipped_documents: Vec<SkippedDocument>,
}

/// One deck, as printed by `drill deck list`.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct DeckSummary {
    pub name: String,
    pub cards: u32,
}

/// Response from `drill deck add`.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct DeckCreated {
    pub name: String,
    /// `false` if the deck already existed.
    pub created: bool,
}

/// Response from `drill deck gc`.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct MediaCollected {
    pub namespace: String,
    /// Diagrams whose owning card no longer exists.
    pub orphans: Vec<String>,
    /// `false` when `--dry-run` only listed them.
    pub deleted: bool,
}

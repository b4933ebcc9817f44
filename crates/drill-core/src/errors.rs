//! Cross-cutting error types for Opening Drill.
//!
//! Domain-specific errors (`StudyError`, `SyncError`, `ConfigError`) are
//! defined in their respective crates. `StoreError` lives here because every
//! persistence adapter and the sync engine share it through the `DeckStore`
//! trait.

use thiserror::Error;

use crate::ids::RecordId;

/// Errors that can be raised by any drill crate.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Data failed validation (payload format, constraints).
    #[error("Validation error: {0}")]
    Validation(String),

    /// A persisted line payload could not be migrated to the current version.
    #[error("Unsupported line payload version {0}")]
    UnsupportedVersion(u32),
}

/// Store operations, used to label persistence failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreOp {
    CheckScope,
    ListCards,
    CreateCard,
    UpdateCard,
    DeleteCards,
    ListMedia,
    WriteMedia,
    DeleteMedia,
}

impl StoreOp {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::CheckScope => "check_scope",
            Self::ListCards => "list_cards",
            Self::CreateCard => "create_card",
            Self::UpdateCard => "update_card",
            Self::DeleteCards => "delete_cards",
            Self::ListMedia => "list_media",
            Self::WriteMedia => "write_media",
            Self::DeleteMedia => "delete_media",
        }
    }
}

impl std::fmt::Display for StoreOp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Errors reported by a persistence adapter.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The destination deck does not exist.
    #[error("Deck '{0}' does not exist")]
    UnknownDeck(String),

    /// The record type (note type) does not exist.
    #[error("Note type '{0}' does not exist")]
    UnknownNotetype(String),

    /// A record addressed by id is gone.
    #[error("Card {0} not found")]
    CardNotFound(RecordId),

    /// The backend rejected an operation.
    #[error("{op} rejected: {message}")]
    Rejected { op: StoreOp, message: String },

    /// Media I/O failed.
    #[error("Media I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl StoreError {
    /// Stable, machine-readable kind for user-visible failure reports.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::UnknownDeck(_) => "unknown_deck",
            Self::UnknownNotetype(_) => "unknown_notetype",
            Self::CardNotFound(_) => "card_not_found",
            Self::Rejected { .. } => "rejected",
            Self::Io(_) => "io",
        }
    }

    /// Whether this error is a configuration problem rather than a store fault.
    #[must_use]
    pub const fn is_configuration(&self) -> bool {
        matches!(self, Self::UnknownDeck(_) | Self::UnknownNotetype(_))
    }

    pub fn rejected(op: StoreOp, message: impl Into<String>) -> Self {
        Self::Rejected {
            op,
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_is_stable() {
        assert_eq!(StoreError::UnknownDeck("x".into()).kind(), "unknown_deck");
        assert_eq!(
            StoreError::rejected(StoreOp::UpdateCard, "locked").kind(),
            "rejected"
        );
    }

    #[test]
    fn rejected_message_names_operation() {
        let err = StoreError::rejected(StoreOp::DeleteMedia, "permission denied");
        assert_eq!(err.to_string(), "delete_media rejected: permission denied");
    }

    #[test]
    fn core_errors_describe_the_payload_problem() {
        assert_eq!(
            CoreError::UnsupportedVersion(9).to_string(),
            "Unsupported line payload version 9"
        );
        assert_eq!(
            CoreError::Validation("v1 payload is not an object".into()).to_string(),
            "Validation error: v1 payload is not an object"
        );
    }

    #[test]
    fn configuration_errors_are_flagged() {
        assert!(StoreError::UnknownNotetype("Basic".into()).is_configuration());
        assert!(!StoreError::CardNotFound(RecordId::new(3)).is_configuration());
    }
}

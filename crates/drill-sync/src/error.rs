//! Sync error types for drill-sync.

use drill_config::ConfigError;
use drill_core::errors::StoreError;
use drill_render::RenderError;
use drill_study::StudyError;
use thiserror::Error;

/// Errors that abort a synchronization run.
///
/// Document errors never show up here: the offending document is skipped
/// and listed in the report instead.
#[derive(Debug, Error)]
pub enum SyncError {
    /// Unknown deck or note type, or an invalid setting. Raised before any
    /// store mutation.
    #[error("Configuration error: {0}")]
    Config(String),

    /// The store rejected an operation. Mutations applied before the failure
    /// stay applied.
    #[error("Store error ({kind}): {message}")]
    Store { kind: &'static str, message: String },

    /// A diagram could not be drawn.
    #[error("Rendering failed: {0}")]
    Render(#[from] RenderError),

    /// Internal consistency fault. Indicates a bug, never bad input.
    #[error("Internal consistency fault: {0}")]
    Invariant(String),
}

impl SyncError {
    /// Stable kind string for user-visible failure reports.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Config(_) => "config",
            Self::Store { kind, .. } => *kind,
            Self::Render(_) => "render",
            Self::Invariant(_) => "invariant",
        }
    }
}

impl From<StoreError> for SyncError {
    fn from(error: StoreError) -> Self {
        if error.is_configuration() {
            Self::Config(error.to_string())
        } else {
            Self::Store {
                kind: error.kind(),
                message: error.to_string(),
            }
        }
    }
}

impl From<ConfigError> for SyncError {
    fn from(error: ConfigError) -> Self {
        Self::Config(error.to_string())
    }
}

impl From<StudyError> for SyncError {
    fn from(error: StudyError) -> Self {
        Self::Invariant(error.to_string())
    }
}

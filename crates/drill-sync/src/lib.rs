//! # drill-sync
//!
//! Keeps a deck in sync with a set of PGN studies.
//!
//! A run reads every study, merges them into one position table, renders one
//! card draft per decision point, diffs the drafts against a snapshot of the
//! store ([`plan::plan`]), and applies the resulting [`plan::PatchSet`]
//! ([`apply::apply`]). Running twice over unchanged studies changes nothing
//! the second time.

pub mod apply;
pub mod engine;
pub mod error;
pub mod plan;

pub use apply::apply;
pub use engine::{Planned, Rendered, SyncEngine, SyncOptions};
pub use error::SyncError;
pub use plan::{CardUpdate, PatchSet, Snapshot, plan};

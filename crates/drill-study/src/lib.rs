//! # drill-study
//!
//! PGN study ingestion and line extraction for Opening Drill.
//!
//! Pipeline:
//! - [`events::parse_study`] turns a PGN document into traversal events
//!   (moves, comments, NAGs, variation boundaries)
//! - [`builder::TreeBuilder`] replays the events of every document into one
//!   [`table::PositionTable`], merging transpositions so each reachable
//!   position is a single node
//! - [`annotation`] strips `[%cal]`/`[%csl]` highlight directives out of
//!   comments and resolves conflicting quality marks
//! - [`lines::extract_lines`] turns the merged table into one
//!   [`lines::StudyLine`] per decision point of the drilled side
//!
//! Nothing in this crate performs I/O; documents arrive as byte buffers.

pub mod annotation;
pub mod builder;
pub mod error;
pub mod events;
pub mod key;
pub mod lines;
pub mod node;
pub mod table;

pub use builder::TreeBuilder;
pub use error::StudyError;
pub use events::{StudyEvent, parse_study};
pub use lines::{LineMove, StudyLine, extract_lines};
pub use table::PositionTable;

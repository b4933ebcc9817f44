//! # drill-render
//!
//! Turns [`drill_study::StudyLine`]s into card drafts.
//!
//! - [`notation::Notation`] formats moves with configurable piece letters
//! - [`card::render_line`] builds the question/answer HTML, the line payload
//!   and the diagram descriptor of one line
//! - [`diagram::Diagram`] is the content-addressed description of a board
//!   image; [`svg::SvgBoard`] draws it
//!
//! A card's diagram name embeds the id of the record that owns it, which only
//! exists once the record has been created. [`card::CardDraft::fields_for`]
//! is therefore the last step, run by the sync engine after the id is known.

pub mod card;
pub mod diagram;
pub mod error;
mod html;
pub mod notation;
pub mod svg;

pub use card::{CardDraft, DiagramArtifact, RenderContext, render_line};
pub use diagram::Diagram;
pub use error::RenderError;
pub use notation::Notation;
pub use svg::{Rasterizer, SvgBoard};

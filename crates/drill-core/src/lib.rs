//! # drill-core
//!
//! Core types, persistence contract, and error types for Opening Drill.
//!
//! This crate provides the foundational types shared across all drill crates:
//! - Side, quality-mark, and highlight enums
//! - Record identifiers and content-addressed diagram artifact names
//! - The `DeckStore` persistence-adapter trait consumed by the sync engine
//! - The versioned line payload persisted with every card, plus its
//!   migration chain
//! - Cross-cutting error types
//! - CLI response types

pub mod enums;
pub mod errors;
pub mod highlight;
pub mod ids;
pub mod migrate;
pub mod payload;
pub mod responses;
pub mod store;

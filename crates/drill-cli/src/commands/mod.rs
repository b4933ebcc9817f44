pub mod config;
pub mod deck;
pub mod dispatch;
pub mod preview;
pub mod sync;

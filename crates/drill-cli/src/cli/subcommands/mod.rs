pub mod deck;

pub use deck::DeckCommands;

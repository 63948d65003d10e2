pub mod deck;
pub mod read;
pub mod repl;
pub mod spreads;

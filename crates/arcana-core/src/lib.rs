//! Domain layer for ARCANA.
//!
//! Card and spread catalogs, the draw engine, the interpretation prompt and
//! the collaborator traits the other layers plug into.

pub mod card;
pub mod config;
pub mod draw;
pub mod error;
pub mod generator;
pub mod presenter;
pub mod reading;
pub mod secret;
pub mod spread;

// Re-export common types
pub use card::{ArcanaType, CardIdentity, DECK_SIZE, Deck, GeneratedCard, card_catalog};
pub use draw::{DrawResult, PlacedCard, draw};
pub use error::{CardGenerationFailed, IncompleteDeck, TarotError};
pub use generator::{CardImageRequest, GenerationError, ImageGenerator, ImagePayload, TextGenerator};
pub use presenter::{Activity, Notice, Presenter, UserEvent};
pub use reading::ReadingRequest;
pub use spread::{SpreadDefinition, SpreadId, SpreadLayout, get_spread};

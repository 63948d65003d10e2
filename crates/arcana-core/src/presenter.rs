//! The front-end boundary: what gets rendered and what the user can trigger.

use crate::card::Deck;
use crate::draw::DrawResult;
use crate::error::{IncompleteDeck, TarotError};

/// Long-running operations the front-end shows a busy indicator for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Activity {
    GeneratingDeck,
    ConsultingReading,
}

impl Activity {
    pub fn label(self) -> &'static str {
        match self {
            Self::GeneratingDeck => "Summoning the deck...",
            Self::ConsultingReading => "Consulting the abyss for your reading...",
        }
    }
}

/// A message for the user.
#[derive(Debug, Clone, PartialEq)]
pub enum Notice {
    /// Non-fatal, the operation produced a usable result.
    Warning(String),
    /// The operation was abandoned.
    Error(String),
}

impl Notice {
    pub fn message(&self) -> &str {
        match self {
            Self::Warning(message) | Self::Error(message) => message,
        }
    }
}

impl From<&IncompleteDeck> for Notice {
    fn from(warning: &IncompleteDeck) -> Self {
        Self::Warning(warning.to_string())
    }
}

impl From<&TarotError> for Notice {
    fn from(err: &TarotError) -> Self {
        Self::Error(err.user_message())
    }
}

/// Renders the state of a reading session.
///
/// Implementations must not block; they are called from async code.
pub trait Presenter: Send + Sync {
    fn set_busy(&self, activity: Activity, busy: bool);

    fn show_deck(&self, deck: &Deck);

    /// Renders the drawn cards, arranged by the spread's layout.
    fn show_spread(&self, draw: &DrawResult);

    fn show_interpretation(&self, text: &str);

    fn show_notice(&self, notice: &Notice);
}

/// User intents emitted by the front-end.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserEvent {
    GenerateDeckRequested,
    ReadingRequested { spread_id: String, query: String },
}

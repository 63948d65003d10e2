//! Error types for the Arcana application.

use crate::generator::GenerationError;
use thiserror::Error;

/// A shared error type for the whole reading pipeline.
///
/// Every variant is terminal for the operation that produced it. Per-card
/// generation failures never show up here: they are absorbed by the deck
/// generator and only surface in aggregate as an [`IncompleteDeck`] warning.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum TarotError {
    /// The requested spread id is not part of the catalog.
    #[error("Unknown spread: '{id}'")]
    UnknownSpread { id: String },

    /// The active deck holds fewer cards than the spread needs.
    #[error("Insufficient deck: spread needs {required} cards but only {available} are available")]
    InsufficientDeck { required: usize, available: usize },

    /// The text generator could not produce a narrative.
    #[error("Interpretation failed: {0}")]
    InterpretationFailed(String),

    /// A deck generation run is already in flight.
    #[error("A deck generation run is already in progress")]
    GenerationInProgress,

    /// A reading is already being interpreted.
    #[error("A reading is already in progress")]
    ReadingInProgress,

    /// The interpretation prompt template failed to render.
    #[error("Template error: {0}")]
    Template(String),

    /// Internal error (should not happen in normal operation)
    #[error("Internal error: {0}")]
    Internal(String),
}

impl TarotError {
    // ============================================================================
    // Constructor helpers
    // ============================================================================

    /// Creates an UnknownSpread error
    pub fn unknown_spread(id: impl Into<String>) -> Self {
        Self::UnknownSpread { id: id.into() }
    }

    /// Creates an Internal error
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }

    // ============================================================================
    // Type checking methods
    // ============================================================================

    /// Check if this is an InsufficientDeck error
    pub fn is_insufficient_deck(&self) -> bool {
        matches!(self, Self::InsufficientDeck { .. })
    }

    /// Check if this is an UnknownSpread error
    pub fn is_unknown_spread(&self) -> bool {
        matches!(self, Self::UnknownSpread { .. })
    }

    /// Check if the operation was rejected because another one is running.
    pub fn is_busy(&self) -> bool {
        matches!(self, Self::GenerationInProgress | Self::ReadingInProgress)
    }

    /// Returns the message shown to the user for this failure.
    ///
    /// The technical detail stays in the `Display` output, which is what
    /// gets logged.
    pub fn user_message(&self) -> String {
        match self {
            Self::UnknownSpread { .. } => "Invalid spread selected.".to_string(),
            Self::InsufficientDeck {
                required,
                available,
            } => format!(
                "Not enough cards for this spread: it needs {required}, the deck holds {available}."
            ),
            Self::InterpretationFailed(_) => {
                "The spirits are silent. Failed to get an interpretation.".to_string()
            }
            Self::GenerationInProgress => "The deck is still being generated.".to_string(),
            Self::ReadingInProgress => "A reading is already being consulted.".to_string(),
            other => other.to_string(),
        }
    }
}

/// Aggregate warning raised when some cards of a deck failed to generate.
///
/// The partial deck is still valid; this is a notice, not a failure.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Some cards failed to generate. The deck is incomplete.")]
pub struct IncompleteDeck {
    /// Number of cards that were realized.
    pub generated: usize,
    /// Number of cards that were requested.
    pub expected: usize,
    /// Names of the cards that failed, in catalog order.
    pub missing: Vec<String>,
}

/// Failure to generate the image of a single card.
///
/// Recovered locally by omitting the card.
#[derive(Error, Debug, Clone, PartialEq)]
#[error("Failed to generate image for {card}: {source}")]
pub struct CardGenerationFailed {
    pub card: String,
    #[source]
    pub source: GenerationError,
}

// ============================================================================
// From implementations for automatic conversion
// ============================================================================

impl From<minijinja::Error> for TarotError {
    fn from(err: minijinja::Error) -> Self {
        Self::Template(err.to_string())
    }
}

/// A type alias for `Result<T, TarotError>`.
pub type Result<T> = std::result::Result<T, TarotError>;

//! Concurrent generation of the 78 card images.

use arcana_core::card::{DECK_SIZE, Deck, GeneratedCard, card_catalog};
use arcana_core::error::{CardGenerationFailed, IncompleteDeck};
use arcana_core::generator::{CardImageRequest, ImageGenerator, ImagePayload};
use futures::future::join_all;
use std::sync::Arc;

/// Issues one image request per catalog card and keeps the successes.
pub struct DeckGenerator {
    image_generator: Arc<dyn ImageGenerator>,
    reference: ImagePayload,
}

/// Result of one fan-out, before it is committed to a session.
#[derive(Debug, Clone)]
pub struct GenerationOutcome {
    pub deck: Deck,
    /// Failed cards, in catalog order.
    pub failures: Vec<CardGenerationFailed>,
}

/// Result of a deck generation run as seen by the caller.
#[derive(Debug, Clone)]
pub struct DeckReport {
    pub deck: Deck,
    pub failures: Vec<CardGenerationFailed>,
    /// Epoch the run was started under.
    pub epoch: u64,
    /// False when a newer epoch superseded the run and its deck was dropped.
    pub committed: bool,
}

impl DeckReport {
    /// The aggregate warning, if any card failed.
    pub fn warning(&self) -> Option<IncompleteDeck> {
        if self.failures.is_empty() {
            return None;
        }
        Some(IncompleteDeck {
            generated: self.deck.len(),
            expected: DECK_SIZE,
            missing: self.failures.iter().map(|f| f.card.clone()).collect(),
        })
    }
}

impl DeckGenerator {
    /// `reference` is the portrait blended into every major arcana card.
    pub fn new(image_generator: Arc<dyn ImageGenerator>, reference: ImagePayload) -> Self {
        Self {
            image_generator,
            reference,
        }
    }

    /// Generates every card concurrently and waits for all of them.
    ///
    /// A failing card is logged and left out; it never cancels the others.
    pub async fn generate(&self) -> GenerationOutcome {
        let catalog = card_catalog();
        tracing::info!(target: "deck", "Generating {} card images", catalog.len());

        let requests = catalog.iter().map(|identity| async move {
            let request = CardImageRequest::for_card(identity, &self.reference);
            self.image_generator
                .generate_image(&request)
                .await
                .map(|image| GeneratedCard::new(identity, &image))
                .map_err(|source| CardGenerationFailed {
                    card: identity.name().to_string(),
                    source,
                })
        });

        let mut cards = Vec::with_capacity(catalog.len());
        let mut failures = Vec::new();
        for result in join_all(requests).await {
            match result {
                Ok(card) => cards.push(card),
                Err(failure) => {
                    tracing::warn!(target: "deck", "{}", failure);
                    failures.push(failure);
                }
            }
        }

        let deck = Deck::from_cards(cards);
        tracing::info!(
            target: "deck",
            generated = deck.len(),
            failed = failures.len(),
            "Deck generation finished"
        );
        GenerationOutcome { deck, failures }
    }
}

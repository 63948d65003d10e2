//! Drawing cards from a deck into the positions of a spread.

use crate::card::{Deck, GeneratedCard};
use crate::error::{Result, TarotError};
use crate::spread::{SpreadDefinition, SpreadId};
use rand::Rng;
use rand::seq::SliceRandom;

/// A card laid in one position of a spread.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlacedCard {
    pub card: GeneratedCard,
    pub position: &'static str,
}

/// The cards drawn for a spread, in position order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DrawResult {
    spread: SpreadId,
    placements: Vec<PlacedCard>,
}

impl DrawResult {
    pub fn spread(&self) -> &'static SpreadDefinition {
        self.spread.definition()
    }

    pub fn placements(&self) -> &[PlacedCard] {
        &self.placements
    }

    pub fn len(&self) -> usize {
        self.placements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.placements.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &PlacedCard> {
        self.placements.iter()
    }
}

/// Draws `spread.card_count` distinct cards from `deck`.
///
/// The deck is shuffled with Fisher-Yates and the first cards are bound to
/// the spread's position labels in order. Fails with
/// [`TarotError::InsufficientDeck`] when the deck is smaller than the spread.
pub fn draw<R>(deck: &Deck, spread: &SpreadDefinition, rng: &mut R) -> Result<DrawResult>
where
    R: Rng + ?Sized,
{
    let available = deck.len();
    if available < spread.card_count {
        return Err(TarotError::InsufficientDeck {
            required: spread.card_count,
            available,
        });
    }

    let mut order: Vec<usize> = (0..available).collect();
    order.shuffle(rng);

    let placements = order
        .into_iter()
        .zip(spread.position_labels.iter().copied())
        .map(|(index, position)| PlacedCard {
            card: deck.cards()[index].clone(),
            position,
        })
        .collect();

    Ok(DrawResult {
        spread: spread.id,
        placements,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::card::ArcanaType;
    use crate::spread::{all_spreads, get_spread};
    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use std::collections::{HashMap, HashSet};

    fn deck_of(size: usize) -> Deck {
        Deck::from_cards((0..size).map(|i| GeneratedCard {
            name: format!("Card {i}"),
            image_url: format!("data:image/jpeg;base64,{i}"),
            arcana: ArcanaType::Minor,
        }))
    }

    #[test]
    fn test_single_card_draw() {
        let deck = deck_of(78);
        let spread = get_spread("single").unwrap();
        let result = draw(&deck, spread, &mut StdRng::seed_from_u64(1)).unwrap();

        assert_eq!(result.len(), 1);
        assert_eq!(result.placements()[0].position, "The core of the matter.");
        assert_eq!(result.spread().id, SpreadId::Single);
    }

    #[test]
    fn test_celtic_cross_on_small_deck_is_insufficient() {
        let deck = deck_of(5);
        let spread = get_spread("celtic-cross").unwrap();
        let err = draw(&deck, spread, &mut StdRng::seed_from_u64(1)).unwrap_err();

        assert_eq!(
            err,
            TarotError::InsufficientDeck {
                required: 10,
                available: 5
            }
        );
    }

    #[test]
    fn test_insufficient_iff_deck_smaller_than_spread() {
        let mut rng = StdRng::seed_from_u64(7);
        for spread in all_spreads() {
            for size in 0..=12 {
                let result = draw(&deck_of(size), spread, &mut rng);
                if size < spread.card_count {
                    assert!(result.unwrap_err().is_insufficient_deck());
                } else {
                    assert_eq!(result.unwrap().len(), spread.card_count);
                }
            }
        }
    }

    #[test]
    fn test_drawn_cards_are_distinct() {
        let deck = deck_of(12);
        let spread = get_spread("celtic-cross").unwrap();
        let mut rng = StdRng::seed_from_u64(42);

        for _ in 0..200 {
            let result = draw(&deck, spread, &mut rng).unwrap();
            let names: HashSet<&str> = result.iter().map(|p| p.card.name.as_str()).collect();
            assert_eq!(names.len(), spread.card_count);
        }
    }

    #[test]
    fn test_positions_follow_spread_order() {
        let deck = deck_of(30);
        let spread = get_spread("horseshoe").unwrap();
        let result = draw(&deck, spread, &mut StdRng::seed_from_u64(3)).unwrap();

        let positions: Vec<&str> = result.iter().map(|p| p.position).collect();
        assert_eq!(positions, spread.position_labels);
    }

    #[test]
    fn test_spread_as_large_as_deck_draws_everything() {
        let deck = deck_of(3);
        let spread = get_spread("three-card").unwrap();
        let result = draw(&deck, spread, &mut StdRng::seed_from_u64(9)).unwrap();

        let drawn: HashSet<&str> = result.iter().map(|p| p.card.name.as_str()).collect();
        let all: HashSet<&str> = deck.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(drawn, all);
    }

    #[test]
    fn test_first_position_is_roughly_uniform() {
        let deck = deck_of(4);
        let spread = get_spread("single").unwrap();
        let mut rng = StdRng::seed_from_u64(2024);
        let mut counts: HashMap<String, usize> = HashMap::new();

        let trials = 8000;
        for _ in 0..trials {
            let result = draw(&deck, spread, &mut rng).unwrap();
            *counts.entry(result.placements()[0].card.name.clone()).or_default() += 1;
        }

        assert_eq!(counts.len(), 4);
        for (name, count) in counts {
            // expected 2000 per card
            assert!(
                (1700..=2300).contains(&count),
                "{name} drawn {count} times out of {trials}"
            );
        }
    }
}

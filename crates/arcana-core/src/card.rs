//! Card identities, generated cards and the deck.

use crate::generator::ImagePayload;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, IntoEnumIterator};

/// The 22 major arcana, in traditional order.
pub const MAJOR_ARCANA: [&str; 22] = [
    "The Fool",
    "The Magician",
    "The High Priestess",
    "The Empress",
    "The Emperor",
    "The Hierophant",
    "The Lovers",
    "The Chariot",
    "Strength",
    "The Hermit",
    "Wheel of Fortune",
    "Justice",
    "The Hanged Man",
    "Death",
    "Temperance",
    "The Devil",
    "The Tower",
    "The Star",
    "The Moon",
    "The Sun",
    "Judgement",
    "The World",
];

/// Total number of identities in a full deck.
pub const DECK_SIZE: usize = 78;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ArcanaType {
    Major,
    Minor,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumIter, Serialize, Deserialize)]
pub enum Suit {
    Wands,
    Cups,
    Swords,
    Pentacles,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumIter, Serialize, Deserialize)]
pub enum Rank {
    Ace,
    Two,
    Three,
    Four,
    Five,
    Six,
    Seven,
    Eight,
    Nine,
    Ten,
    Page,
    Knight,
    Queen,
    King,
}

/// One of the 78 cards a deck can be generated from.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CardIdentity {
    name: String,
    arcana: ArcanaType,
    suit: Option<(Suit, Rank)>,
}

impl CardIdentity {
    fn major(name: &str) -> Self {
        Self {
            name: name.to_string(),
            arcana: ArcanaType::Major,
            suit: None,
        }
    }

    fn minor(suit: Suit, rank: Rank) -> Self {
        Self {
            name: format!("{rank} of {suit}"),
            arcana: ArcanaType::Minor,
            suit: Some((suit, rank)),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn arcana(&self) -> ArcanaType {
        self.arcana
    }

    /// Suit of a minor arcana card, `None` for the major arcana.
    pub fn suit(&self) -> Option<Suit> {
        self.suit.map(|(suit, _)| suit)
    }

    /// Rank of a minor arcana card, `None` for the major arcana.
    pub fn rank(&self) -> Option<Rank> {
        self.suit.map(|(_, rank)| rank)
    }
}

/// Builds the full identity catalog: major arcana first, then each suit
/// from Ace to King.
pub fn card_catalog() -> Vec<CardIdentity> {
    let majors = MAJOR_ARCANA.iter().map(|name| CardIdentity::major(name));
    let minors = Suit::iter()
        .flat_map(|suit| Rank::iter().map(move |rank| CardIdentity::minor(suit, rank)));
    majors.chain(minors).collect()
}

/// A card whose artwork was successfully generated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeneratedCard {
    pub name: String,
    /// `data:<mime>;base64,<bytes>` URI of the artwork.
    pub image_url: String,
    pub arcana: ArcanaType,
}

impl GeneratedCard {
    pub fn new(identity: &CardIdentity, image: &ImagePayload) -> Self {
        Self {
            name: identity.name().to_string(),
            image_url: image.to_data_url(),
            arcana: identity.arcana(),
        }
    }

    /// Recovers the image payload from the data URI.
    pub fn image(&self) -> Option<ImagePayload> {
        ImagePayload::from_data_url(&self.image_url)
    }
}

/// The realized deck of one generation run.
///
/// Holds at most [`DECK_SIZE`] cards with unique names. A deck with missing
/// cards is still a valid deck.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Deck {
    cards: Vec<GeneratedCard>,
}

impl Deck {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a deck, dropping any card whose name already appeared.
    pub fn from_cards(cards: impl IntoIterator<Item = GeneratedCard>) -> Self {
        let mut deck = Self::new();
        for card in cards {
            if !deck.contains(&card.name) {
                deck.cards.push(card);
            }
        }
        deck
    }

    pub fn cards(&self) -> &[GeneratedCard] {
        &self.cards
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    pub fn is_complete(&self) -> bool {
        self.cards.len() == DECK_SIZE
    }

    pub fn contains(&self, name: &str) -> bool {
        self.cards.iter().any(|card| card.name == name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &GeneratedCard> {
        self.cards.iter()
    }

    /// Cards of one arcana, in deck order.
    pub fn by_arcana(&self, arcana: ArcanaType) -> impl Iterator<Item = &GeneratedCard> {
        self.cards.iter().filter(move |card| card.arcana == arcana)
    }
}

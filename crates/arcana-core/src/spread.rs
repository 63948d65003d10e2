//! The fixed catalog of spreads.
//!
//! A spread is a closed set of ids, each mapping to a static
//! [`SpreadDefinition`]. The catalog is not user-extensible.

use crate::error::{Result, TarotError};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use strum::{AsRefStr, Display, EnumIter, EnumString, IntoEnumIterator};

/// Identifier of a spread, as used by the front-end's spread selector.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Display,
    AsRefStr,
    EnumIter,
    EnumString,
    Serialize,
    Deserialize,
)]
#[strum(serialize_all = "kebab-case")]
#[serde(rename_all = "kebab-case")]
pub enum SpreadId {
    Single,
    ThreeCard,
    Situation,
    Mbs,
    Relationship,
    ChainsOfSaturn,
    Horseshoe,
    CelticCross,
}

/// Presentation hint for arranging the drawn cards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, AsRefStr, Serialize, Deserialize)]
pub enum SpreadLayout {
    #[strum(serialize = "default")]
    #[serde(rename = "default")]
    Default,
    #[strum(serialize = "celtic-cross-spread")]
    #[serde(rename = "celtic-cross-spread")]
    CelticCross,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpreadDefinition {
    pub id: SpreadId,
    pub display_name: &'static str,
    pub card_count: usize,
    pub position_labels: &'static [&'static str],
    pub layout: SpreadLayout,
}

static SINGLE: SpreadDefinition = SpreadDefinition {
    id: SpreadId::Single,
    display_name: "Single Card Draw",
    card_count: 1,
    position_labels: &["The core of the matter."],
    layout: SpreadLayout::Default,
};

static THREE_CARD: SpreadDefinition = SpreadDefinition {
    id: SpreadId::ThreeCard,
    display_name: "Past, Present, Future",
    card_count: 3,
    position_labels: &["Past", "Present", "Future"],
    layout: SpreadLayout::Default,
};

static SITUATION: SpreadDefinition = SpreadDefinition {
    id: SpreadId::Situation,
    display_name: "Situation, Obstacle, Advice",
    card_count: 3,
    position_labels: &["Situation", "Obstacle", "Advice"],
    layout: SpreadLayout::Default,
};

static MIND_BODY_SPIRIT: SpreadDefinition = SpreadDefinition {
    id: SpreadId::Mbs,
    display_name: "Mind, Body, Spirit",
    card_count: 3,
    position_labels: &["Mind", "Body", "Spirit"],
    layout: SpreadLayout::Default,
};

static RELATIONSHIP: SpreadDefinition = SpreadDefinition {
    id: SpreadId::Relationship,
    display_name: "Relationship Spread",
    card_count: 5,
    position_labels: &["You", "Your Partner", "Foundation", "Challenge", "Potential"],
    layout: SpreadLayout::Default,
};

static CHAINS_OF_SATURN: SpreadDefinition = SpreadDefinition {
    id: SpreadId::ChainsOfSaturn,
    display_name: "Chains of Saturn",
    card_count: 6,
    position_labels: &[
        "Core Limitation",
        "Internal Aspect",
        "External Aspect",
        "What must be accepted",
        "Path to liberation",
        "The lesson learned",
    ],
    layout: SpreadLayout::Default,
};

static HORSESHOE: SpreadDefinition = SpreadDefinition {
    id: SpreadId::Horseshoe,
    display_name: "The Horseshoe",
    card_count: 7,
    position_labels: &[
        "The Past",
        "The Present",
        "The Future",
        "The Querent",
        "External Influences",
        "Hopes and Fears",
        "The Outcome",
    ],
    layout: SpreadLayout::Default,
};

static CELTIC_CROSS: SpreadDefinition = SpreadDefinition {
    id: SpreadId::CelticCross,
    display_name: "Celtic Cross",
    card_count: 10,
    position_labels: &[
        "The Present",
        "The Challenge",
        "The Past",
        "The Future",
        "Conscious Mind",
        "Unconscious Mind",
        "Your Influence",
        "External Influences",
        "Hopes and Fears",
        "The Outcome",
    ],
    layout: SpreadLayout::CelticCross,
};

impl SpreadId {
    pub fn definition(self) -> &'static SpreadDefinition {
        match self {
            Self::Single => &SINGLE,
            Self::ThreeCard => &THREE_CARD,
            Self::Situation => &SITUATION,
            Self::Mbs => &MIND_BODY_SPIRIT,
            Self::Relationship => &RELATIONSHIP,
            Self::ChainsOfSaturn => &CHAINS_OF_SATURN,
            Self::Horseshoe => &HORSESHOE,
            Self::CelticCross => &CELTIC_CROSS,
        }
    }
}

/// Looks up a spread by its id string.
pub fn get_spread(id: &str) -> Result<&'static SpreadDefinition> {
    SpreadId::from_str(id.trim())
        .map(SpreadId::definition)
        .map_err(|_| TarotError::unknown_spread(id))
}

/// All spreads, in selector order.
pub fn all_spreads() -> impl Iterator<Item = &'static SpreadDefinition> {
    SpreadId::iter().map(SpreadId::definition)
}

/// Checks that every spread has exactly one position label per card and a
/// card count between 1 and 10.
pub fn validate_catalog() -> Result<()> {
    for spread in all_spreads() {
        if spread.position_labels.len() != spread.card_count {
            return Err(TarotError::internal(format!(
                "spread '{}' declares {} cards but {} position labels",
                spread.id,
                spread.card_count,
                spread.position_labels.len()
            )));
        }
        if !(1..=10).contains(&spread.card_count) {
            return Err(TarotError::internal(format!(
                "spread '{}' has an out-of-range card count {}",
                spread.id, spread.card_count
            )));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalog_is_valid() {
        assert!(validate_catalog().is_ok());
        for spread in all_spreads() {
            assert_eq!(
                spread.position_labels.len(),
                spread.card_count,
                "spread {} has mismatched labels",
                spread.id
            );
        }
    }

    #[test]
    fn test_catalog_card_counts() {
        let counts: Vec<usize> = all_spreads().map(|s| s.card_count).collect();
        assert_eq!(counts, vec![1, 3, 3, 3, 5, 6, 7, 10]);
    }

    #[test]
    fn test_lookup_by_id() {
        let single = get_spread("single").unwrap();
        assert_eq!(single.display_name, "Single Card Draw");
        assert_eq!(single.position_labels, &["The core of the matter."]);

        let saturn = get_spread("chains-of-saturn").unwrap();
        assert_eq!(saturn.card_count, 6);
        assert_eq!(saturn.position_labels[3], "What must be accepted");

        assert_eq!(get_spread("mbs").unwrap().display_name, "Mind, Body, Spirit");
    }

    #[test]
    fn test_ids_round_trip_through_strings() {
        for spread in all_spreads() {
            let found = get_spread(spread.id.as_ref()).unwrap();
            assert_eq!(found.id, spread.id);
        }
        assert_eq!(SpreadId::ThreeCard.to_string(), "three-card");
    }

    #[test]
    fn test_unknown_spread() {
        let err = get_spread("pentagram").unwrap_err();
        assert_eq!(err, TarotError::unknown_spread("pentagram"));
        assert!(get_spread("").unwrap_err().is_unknown_spread());
    }

    #[test]
    fn test_only_celtic_cross_has_its_own_layout() {
        for spread in all_spreads() {
            let expected = if spread.id == SpreadId::CelticCross {
                "celtic-cross-spread"
            } else {
                "default"
            };
            assert_eq!(spread.layout.as_ref(), expected);
        }
    }
}

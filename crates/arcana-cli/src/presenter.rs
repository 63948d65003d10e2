//! Terminal rendering of decks, spreads and readings.

use arcana_core::card::{ArcanaType, Deck};
use arcana_core::draw::DrawResult;
use arcana_core::presenter::{Activity, Notice, Presenter};
use arcana_core::spread::SpreadLayout;
use colored::Colorize;

/// Cards laid in the cross of a Celtic Cross; the rest form the staff.
const CELTIC_CROSS_CENTER: usize = 6;

/// Prints to stdout, notices of errors to stderr.
#[derive(Debug, Default)]
pub struct TerminalPresenter;

impl TerminalPresenter {
    pub fn new() -> Self {
        Self
    }
}

/// A titled group of lines in a rendered spread.
#[derive(Debug, PartialEq)]
struct Section {
    title: Option<&'static str>,
    lines: Vec<String>,
}

fn spread_sections(draw: &DrawResult) -> Vec<Section> {
    let lines: Vec<String> = draw
        .iter()
        .enumerate()
        .map(|(i, placed)| format!("{:>2}. {}: {}", i + 1, placed.position, placed.card.name))
        .collect();

    match draw.spread().layout {
        SpreadLayout::CelticCross => {
            let split = CELTIC_CROSS_CENTER.min(lines.len());
            let (cross, staff) = lines.split_at(split);
            vec![
                Section {
                    title: Some("The Cross"),
                    lines: cross.to_vec(),
                },
                Section {
                    title: Some("The Staff"),
                    lines: staff.to_vec(),
                },
            ]
        }
        SpreadLayout::Default => vec![Section { title: None, lines }],
    }
}

fn gallery_rows(deck: &Deck) -> Vec<(&'static str, Vec<&str>)> {
    [(ArcanaType::Major, "Major Arcana"), (ArcanaType::Minor, "Minor Arcana")]
        .into_iter()
        .map(|(arcana, title)| {
            let names = deck.by_arcana(arcana).map(|card| card.name.as_str()).collect();
            (title, names)
        })
        .collect()
}

impl Presenter for TerminalPresenter {
    fn set_busy(&self, activity: Activity, busy: bool) {
        if busy {
            println!("{}", activity.label().bright_black().italic());
        }
    }

    fn show_deck(&self, deck: &Deck) {
        if deck.is_empty() {
            println!("{}", "No deck. Generate one first.".bright_black());
            return;
        }

        println!(
            "{}",
            format!("=== Your deck: {} cards ===", deck.len())
                .bright_magenta()
                .bold()
        );
        for (title, names) in gallery_rows(deck) {
            if names.is_empty() {
                continue;
            }
            println!("{}", title.bright_magenta());
            for name in names {
                println!("  {}", name.bright_white());
            }
        }
    }

    fn show_spread(&self, draw: &DrawResult) {
        println!();
        println!(
            "{}",
            format!("=== {} ===", draw.spread().display_name)
                .bright_magenta()
                .bold()
        );
        for section in spread_sections(draw) {
            if let Some(title) = section.title {
                println!("{}", title.magenta());
            }
            for line in section.lines {
                println!("  {}", line.bright_white());
            }
        }
        println!();
    }

    fn show_interpretation(&self, text: &str) {
        for line in text.lines() {
            println!("{}", line.bright_blue());
        }
        println!();
    }

    fn show_notice(&self, notice: &Notice) {
        match notice {
            Notice::Warning(message) => println!("{}", message.yellow()),
            Notice::Error(message) => eprintln!("{}", message.red()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use arcana_core::card::GeneratedCard;
    use arcana_core::draw::draw;
    use arcana_core::spread::get_spread;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn deck(count: usize) -> Deck {
        Deck::from_cards((0..count).map(|i| GeneratedCard {
            name: format!("Card {i}"),
            image_url: "data:image/jpeg;base64,AAAA".to_string(),
            arcana: if i % 2 == 0 {
                ArcanaType::Major
            } else {
                ArcanaType::Minor
            },
        }))
    }

    fn draw_spread(id: &str) -> DrawResult {
        // a deck of exactly the spread size draws every card
        let spread = get_spread(id).unwrap();
        let mut rng = StdRng::seed_from_u64(3);
        draw(&deck(spread.card_count), spread, &mut rng).unwrap()
    }

    #[test]
    fn test_celtic_cross_has_cross_and_staff() {
        let sections = spread_sections(&draw_spread("celtic-cross"));
        assert_eq!(sections.len(), 2);
        assert_eq!(sections[0].title, Some("The Cross"));
        assert_eq!(sections[0].lines.len(), 6);
        assert!(sections[0].lines[0].contains("1. The Present: "));
        assert_eq!(sections[1].title, Some("The Staff"));
        assert_eq!(sections[1].lines.len(), 4);
        assert!(sections[1].lines[3].contains("10. The Outcome: "));
    }

    #[test]
    fn test_default_layout_is_one_list() {
        let sections = spread_sections(&draw_spread("three-card"));
        assert_eq!(sections.len(), 1);
        assert_eq!(sections[0].title, None);
        assert!(sections[0].lines[2].contains("Future"));
    }

    #[test]
    fn test_gallery_groups_by_arcana() {
        let cards = deck(5);
        let rows = gallery_rows(&cards);
        assert_eq!(rows[0], ("Major Arcana", vec!["Card 0", "Card 2", "Card 4"]));
        assert_eq!(rows[1], ("Minor Arcana", vec!["Card 1", "Card 3"]));
    }
}

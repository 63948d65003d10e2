//! Reading requests and the interpretation prompt.

use crate::draw::DrawResult;
use crate::error::Result;
use crate::spread::SpreadId;
use minijinja::{Environment, context};
use serde::Serialize;

/// Reader persona used when none is configured.
pub const DEFAULT_READER_NAME: &str = "Homeless Mike";

/// Substituted for an empty or whitespace-only question.
pub const NO_QUESTION_FALLBACK: &str =
    "No specific question was asked, focus on a general life reading.";

const INTERPRETATION_TEMPLATE: &str = r#"You are a tarot reader named {{ reader }}. Your interpretations are bleak, cynical, and tinged with despair, but ultimately insightful.
A user has asked the following question: "{{ question }}"
The tarot spread is "{{ spread }}".
The cards drawn for each position are:
{% for card in cards -%}
Card {{ card.number }} ({{ card.position }}): {{ card.name }}
{% endfor %}
Provide a grim but coherent interpretation of the cards in relation to the user's query and the spread positions. Synthesize the meanings together into a narrative. Address the user directly."#;

/// A single reading to be interpreted. Consumed once.
#[derive(Debug, Clone)]
pub struct ReadingRequest {
    pub spread_id: SpreadId,
    pub user_query: String,
    pub draw_result: DrawResult,
}

impl ReadingRequest {
    pub fn new(draw_result: DrawResult, user_query: impl Into<String>) -> Self {
        Self {
            spread_id: draw_result.spread().id,
            user_query: user_query.into(),
            draw_result,
        }
    }

    /// The trimmed question, or the fallback phrase when there is none.
    pub fn question(&self) -> &str {
        let trimmed = self.user_query.trim();
        if trimmed.is_empty() {
            NO_QUESTION_FALLBACK
        } else {
            trimmed
        }
    }

    /// Renders the prompt sent to the text generator.
    pub fn to_prompt(&self, reader_name: &str) -> Result<String> {
        render_interpretation_prompt(
            reader_name,
            self.question(),
            self.draw_result.spread().display_name,
            &self.draw_result,
        )
    }
}

#[derive(Serialize)]
struct CardLine<'a> {
    number: usize,
    position: &'a str,
    name: &'a str,
}

/// Builds the interpretation prompt for a draw.
///
/// Cards are listed as `Card i (position): name`, 1-based, in draw order.
pub fn render_interpretation_prompt(
    reader_name: &str,
    question: &str,
    spread_name: &str,
    draw: &DrawResult,
) -> Result<String> {
    let cards: Vec<CardLine<'_>> = draw
        .iter()
        .enumerate()
        .map(|(index, placed)| CardLine {
            number: index + 1,
            position: placed.position,
            name: &placed.card.name,
        })
        .collect();

    let mut env = Environment::new();
    env.add_template("interpretation", INTERPRETATION_TEMPLATE)?;
    let prompt = env.get_template("interpretation")?.render(context! {
        reader => reader_name,
        question => question,
        spread => spread_name,
        cards => cards,
    })?;
    Ok(prompt)
}

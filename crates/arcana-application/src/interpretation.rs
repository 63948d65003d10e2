//! Narrative interpretation of a draw.

use arcana_core::draw::DrawResult;
use arcana_core::error::{Result, TarotError};
use arcana_core::generator::TextGenerator;
use arcana_core::reading::{DEFAULT_READER_NAME, ReadingRequest};
use std::sync::Arc;

/// Builds the interpretation prompt and sends it to the text generator.
pub struct InterpretationComposer {
    text_generator: Arc<dyn TextGenerator>,
    reader_name: String,
}

impl InterpretationComposer {
    pub fn new(text_generator: Arc<dyn TextGenerator>) -> Self {
        Self {
            text_generator,
            reader_name: DEFAULT_READER_NAME.to_string(),
        }
    }

    pub fn with_reader_name(mut self, reader_name: impl Into<String>) -> Self {
        self.reader_name = reader_name.into();
        self
    }

    pub fn reader_name(&self) -> &str {
        &self.reader_name
    }

    /// Sends exactly one text request and returns its text unchanged.
    ///
    /// The spread name in the prompt is taken from `draw_result.spread()`.
    pub async fn compose(&self, draw_result: &DrawResult, user_query: &str) -> Result<String> {
        let request = ReadingRequest::new(draw_result.clone(), user_query);
        let prompt = request.to_prompt(&self.reader_name)?;

        tracing::debug!(
            target: "reading",
            spread = %request.spread_id,
            cards = draw_result.len(),
            "Requesting interpretation"
        );

        self.text_generator
            .generate_text(&prompt)
            .await
            .map_err(|err| {
                tracing::error!(target: "reading", "Interpretation request failed: {}", err);
                TarotError::InterpretationFailed(err.to_string())
            })
    }
}

//! GeminiTextAgent - narrative readings from a Gemini text model.

use crate::gemini::GeminiClient;
use arcana_core::generator::{GenerationError, TextGenerator};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

pub const DEFAULT_TEXT_MODEL: &str = "gemini-2.5-flash";

/// Text generator that sends a single-turn prompt to Gemini.
#[derive(Debug, Clone)]
pub struct GeminiTextAgent {
    client: GeminiClient,
    model: String,
}

impl GeminiTextAgent {
    pub fn new(client: GeminiClient) -> Self {
        Self {
            client,
            model: DEFAULT_TEXT_MODEL.to_string(),
        }
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn model(&self) -> &str {
        &self.model
    }
}

#[async_trait]
impl TextGenerator for GeminiTextAgent {
    async fn generate_text(&self, prompt: &str) -> Result<String, GenerationError> {
        let request = GenerateContentRequest {
            contents: vec![Content {
                role: "user".to_string(),
                parts: vec![TextPart {
                    text: prompt.to_string(),
                }],
            }],
        };

        tracing::debug!(target: "gemini", model = %self.model, prompt_len = prompt.len(), "Requesting interpretation");
        let url = self.client.endpoint(&self.model, "generateContent");
        let response: GenerateContentResponse = self.client.post_json(&url, &request).await?;
        extract_text(response)
    }
}

#[derive(Serialize)]
struct GenerateContentRequest {
    contents: Vec<Content>,
}

#[derive(Serialize)]
struct Content {
    role: String,
    parts: Vec<TextPart>,
}

#[derive(Serialize)]
struct TextPart {
    text: String,
}

#[derive(Deserialize)]
struct GenerateContentResponse {
    candidates: Option<Vec<Candidate>>,
}

#[derive(Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Deserialize)]
struct CandidatePart {
    text: Option<String>,
}

/// Joins the text parts of the first candidate in order, untouched.
fn extract_text(response: GenerateContentResponse) -> Result<String, GenerationError> {
    let texts: Vec<String> = response
        .candidates
        .and_then(|candidates| candidates.into_iter().next())
        .and_then(|candidate| candidate.content)
        .map(|content| content.parts.into_iter().filter_map(|part| part.text).collect())
        .unwrap_or_default();

    if texts.is_empty() {
        return Err(GenerationError::MalformedResponse(
            "Gemini API returned no text candidates".into(),
        ));
    }
    Ok(texts.concat())
}

#[cfg(test)]
mod tests {
    use super::*;
    use arcana_core::config::{GeminiConfig, SecretConfig};
    use arcana_core::secret::SecretService;
    use serde_json::json;

    struct StaticSecrets(SecretConfig);

    #[async_trait]
    impl SecretService for StaticSecrets {
        async fn load_secrets(&self) -> Result<SecretConfig, String> {
            Ok(self.0.clone())
        }

        async fn secret_file_exists(&self) -> bool {
            true
        }
    }

    #[test]
    fn test_text_is_returned_verbatim() {
        let narrative = "  Listen, kid.\n\nThe Tower don't lie.  ";
        let response: GenerateContentResponse = serde_json::from_value(json!({
            "candidates": [{"content": {"parts": [{"text": narrative}], "role": "model"}}]
        }))
        .unwrap();

        assert_eq!(extract_text(response).unwrap(), narrative);
    }

    #[test]
    fn test_text_parts_are_joined_in_order() {
        let response: GenerateContentResponse = serde_json::from_value(json!({
            "candidates": [{"content": {"parts": [
                {"text": "The Tower falls. "},
                {"inlineData": {"mimeType": "image/png", "data": "AAAA"}},
                {"text": "And you with it."}
            ]}}]
        }))
        .unwrap();

        assert_eq!(
            extract_text(response).unwrap(),
            "The Tower falls. And you with it."
        );
    }

    #[test]
    fn test_candidate_without_text_is_malformed() {
        let response: GenerateContentResponse = serde_json::from_value(json!({
            "candidates": [{"content": {"parts": [{"inlineData": {"mimeType": "image/png", "data": "AAAA"}}]}}]
        }))
        .unwrap();
        assert!(matches!(
            extract_text(response),
            Err(GenerationError::MalformedResponse(_))
        ));
    }

    #[test]
    fn test_missing_candidates_is_malformed() {
        let response: GenerateContentResponse =
            serde_json::from_value(json!({"promptFeedback": {"blockReason": "SAFETY"}})).unwrap();
        assert!(matches!(
            extract_text(response),
            Err(GenerationError::MalformedResponse(_))
        ));
    }

    #[test]
    fn test_request_shape() {
        let request = GenerateContentRequest {
            contents: vec![Content {
                role: "user".to_string(),
                parts: vec![TextPart {
                    text: "Interpret this".to_string(),
                }],
            }],
        };
        assert_eq!(
            serde_json::to_value(&request).unwrap(),
            json!({"contents": [{"role": "user", "parts": [{"text": "Interpret this"}]}]})
        );
    }

    #[tokio::test]
    async fn test_agent_from_secret_service() {
        let secrets = StaticSecrets(SecretConfig {
            gemini: Some(GeminiConfig {
                api_key: "test-key".to_string(),
            }),
        });
        let client = GeminiClient::from_secrets(&secrets).await.unwrap();
        let agent = GeminiTextAgent::new(client).with_model("gemini-2.5-pro");
        assert_eq!(agent.model(), "gemini-2.5-pro");

        let missing = StaticSecrets(SecretConfig::default());
        assert!(matches!(
            GeminiClient::from_secrets(&missing).await,
            Err(GenerationError::Unavailable(_))
        ));
    }
}

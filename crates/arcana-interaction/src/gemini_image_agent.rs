//! GeminiImageAgent - card artwork through the Gemini REST API.
//!
//! Reference-blended requests go to a multimodal `generateContent` model
//! with the portrait as inline data; prompt-only requests go to an Imagen
//! `predict` model.

use crate::gemini::GeminiClient;
use arcana_core::generator::{CardImageRequest, GenerationError, ImageGenerator, ImagePayload};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

pub const DEFAULT_BLEND_MODEL: &str = "gemini-2.5-flash-image-preview";
pub const DEFAULT_IMAGE_MODEL: &str = "imagen-4.0-generate-001";

const OUTPUT_MIME_TYPE: &str = "image/jpeg";
const ASPECT_RATIO: &str = "3:4";

/// Image generator backed by Gemini and Imagen.
#[derive(Debug, Clone)]
pub struct GeminiImageAgent {
    client: GeminiClient,
    blend_model: String,
    image_model: String,
}

impl GeminiImageAgent {
    pub fn new(client: GeminiClient) -> Self {
        Self {
            client,
            blend_model: DEFAULT_BLEND_MODEL.to_string(),
            image_model: DEFAULT_IMAGE_MODEL.to_string(),
        }
    }

    /// Overrides the model used for reference-blended cards.
    pub fn with_blend_model(mut self, model: impl Into<String>) -> Self {
        self.blend_model = model.into();
        self
    }

    /// Overrides the model used for prompt-only cards.
    pub fn with_image_model(mut self, model: impl Into<String>) -> Self {
        self.image_model = model.into();
        self
    }

    async fn generate_blended(
        &self,
        prompt: &str,
        reference: &ImagePayload,
    ) -> Result<ImagePayload, GenerationError> {
        let request = GenerateContentRequest {
            contents: vec![Content {
                role: "user".to_string(),
                parts: vec![
                    Part::InlineData {
                        inline_data: InlineData {
                            mime_type: reference.mime_type.clone(),
                            data: reference.data.clone(),
                        },
                    },
                    Part::Text {
                        text: prompt.to_string(),
                    },
                ],
            }],
        };

        tracing::debug!(target: "gemini", model = %self.blend_model, "Requesting blended card image");
        let url = self.client.endpoint(&self.blend_model, "generateContent");
        let response: GenerateContentResponse = self.client.post_json(&url, &request).await?;
        extract_inline_image(response)
    }

    async fn generate_from_prompt(&self, prompt: &str) -> Result<ImagePayload, GenerationError> {
        let request = PredictRequest {
            instances: vec![PredictInstance {
                prompt: prompt.to_string(),
            }],
            parameters: PredictParameters {
                sample_count: 1,
                aspect_ratio: ASPECT_RATIO.to_string(),
                output_options: OutputOptions {
                    mime_type: OUTPUT_MIME_TYPE.to_string(),
                },
            },
        };

        tracing::debug!(target: "gemini", model = %self.image_model, "Requesting card image");
        let url = self.client.endpoint(&self.image_model, "predict");
        let response: PredictResponse = self.client.post_json(&url, &request).await?;
        extract_prediction(response)
    }
}

#[async_trait]
impl ImageGenerator for GeminiImageAgent {
    async fn generate_image(
        &self,
        request: &CardImageRequest,
    ) -> Result<ImagePayload, GenerationError> {
        match request {
            CardImageRequest::ReferenceBlended { prompt, reference } => {
                self.generate_blended(prompt, reference).await
            }
            CardImageRequest::PromptOnly { prompt } => self.generate_from_prompt(prompt).await,
        }
    }
}

// ============================================================================
// generateContent wire types
// ============================================================================

#[derive(Serialize)]
struct GenerateContentRequest {
    contents: Vec<Content>,
}

#[derive(Serialize)]
struct Content {
    role: String,
    parts: Vec<Part>,
}

#[derive(Serialize)]
#[serde(untagged)]
enum Part {
    Text {
        text: String,
    },
    InlineData {
        #[serde(rename = "inlineData")]
        inline_data: InlineData,
    },
}

#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct InlineData {
    mime_type: String,
    data: String,
}

#[derive(Deserialize)]
struct GenerateContentResponse {
    candidates: Option<Vec<Candidate>>,
}

#[derive(Deserialize)]
struct Candidate {
    content: Option<ContentResponse>,
}

#[derive(Deserialize)]
struct ContentResponse {
    #[serde(default)]
    parts: Vec<PartResponse>,
}

#[derive(Deserialize)]
struct PartResponse {
    #[serde(rename = "inlineData")]
    inline_data: Option<InlineData>,
}

fn extract_inline_image(response: GenerateContentResponse) -> Result<ImagePayload, GenerationError> {
    response
        .candidates
        .and_then(|candidates| candidates.into_iter().next())
        .and_then(|candidate| candidate.content)
        .and_then(|content| content.parts.into_iter().find_map(|part| part.inline_data))
        .map(|inline| ImagePayload::new(inline.mime_type, inline.data))
        .ok_or_else(|| {
            GenerationError::MalformedResponse(
                "Gemini API returned no inline image in the first candidate".into(),
            )
        })
}

// ============================================================================
// Imagen predict wire types
// ============================================================================

#[derive(Serialize)]
struct PredictRequest {
    instances: Vec<PredictInstance>,
    parameters: PredictParameters,
}

#[derive(Serialize)]
struct PredictInstance {
    prompt: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct PredictParameters {
    sample_count: u32,
    aspect_ratio: String,
    output_options: OutputOptions,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct OutputOptions {
    mime_type: String,
}

#[derive(Deserialize)]
struct PredictResponse {
    #[serde(default)]
    predictions: Vec<Prediction>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct Prediction {
    bytes_base64_encoded: Option<String>,
    mime_type: Option<String>,
}

fn extract_prediction(response: PredictResponse) -> Result<ImagePayload, GenerationError> {
    let prediction = response.predictions.into_iter().next().ok_or_else(|| {
        GenerationError::MalformedResponse("Imagen API returned no predictions".into())
    })?;

    let data = prediction.bytes_base64_encoded.ok_or_else(|| {
        GenerationError::MalformedResponse("Imagen prediction carried no image bytes".into())
    })?;

    let mime_type = prediction
        .mime_type
        .unwrap_or_else(|| OUTPUT_MIME_TYPE.to_string());
    Ok(ImagePayload::new(mime_type, data))
}

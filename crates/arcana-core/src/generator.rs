//! Collaborator interfaces for the generative image and text services.
//!
//! The core never talks to a network itself. Deck generation and
//! interpretation go through these traits, which the interaction layer
//! implements against a concrete API.

use crate::card::{ArcanaType, CardIdentity};
use async_trait::async_trait;
use std::time::Duration;
use thiserror::Error;

/// Base64-encoded image data together with its MIME type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImagePayload {
    pub mime_type: String,
    /// Standard base64 without the data URI prefix.
    pub data: String,
}

impl ImagePayload {
    pub fn new(mime_type: impl Into<String>, data: impl Into<String>) -> Self {
        Self {
            mime_type: mime_type.into(),
            data: data.into(),
        }
    }

    /// Encodes raw image bytes.
    pub fn from_bytes(mime_type: impl Into<String>, bytes: &[u8]) -> Self {
        use base64::Engine;
        use base64::engine::general_purpose::STANDARD as BASE64_STANDARD;

        Self::new(mime_type, BASE64_STANDARD.encode(bytes))
    }

    /// Decodes the base64 data into raw image bytes.
    pub fn decode(&self) -> Result<Vec<u8>, base64::DecodeError> {
        use base64::Engine;
        use base64::engine::general_purpose::STANDARD as BASE64_STANDARD;

        BASE64_STANDARD.decode(self.data.as_bytes())
    }

    pub fn to_data_url(&self) -> String {
        format!("data:{};base64,{}", self.mime_type, self.data)
    }

    /// Parses a `data:<mime>;base64,<data>` URI.
    pub fn from_data_url(url: &str) -> Option<Self> {
        let rest = url.strip_prefix("data:")?;
        let (mime_type, data) = rest.split_once(";base64,")?;
        Some(Self::new(mime_type, data))
    }

    /// File extension matching the MIME type.
    pub fn extension(&self) -> &'static str {
        match self.mime_type.as_str() {
            "image/png" => "png",
            "image/webp" => "webp",
            _ => "jpg",
        }
    }
}

/// A single image generation request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CardImageRequest {
    /// Compose the card around a reference portrait.
    ReferenceBlended {
        prompt: String,
        reference: ImagePayload,
    },
    /// Render the card from the prompt alone.
    PromptOnly { prompt: String },
}

impl CardImageRequest {
    /// Builds the request for one card identity.
    ///
    /// Major arcana blend the reference portrait into the main figure; minor
    /// arcana use a plain stylistic prompt.
    pub fn for_card(identity: &CardIdentity, reference: &ImagePayload) -> Self {
        let name = identity.name();
        match identity.arcana() {
            ArcanaType::Major => Self::ReferenceBlended {
                prompt: format!(
                    "A tarot card depicting \"{name}\". A face, created from the provided image, \
                     should be subtly integrated into the main figure of the card. The overall \
                     theme is one of implied despair, with a dark, gritty, and atmospheric art style."
                ),
                reference: reference.clone(),
            },
            ArcanaType::Minor if name == "Ten of Swords" => Self::PromptOnly {
                prompt: "A tarot card depicting the \"Ten of Swords\". Bleak, graffiti-style \
                         occult aesthetic. The swords should have intricate, glowing gold inlays. \
                         Despair and finality are the themes."
                    .to_string(),
            },
            ArcanaType::Minor => Self::PromptOnly {
                prompt: format!(
                    "A tarot card depicting \"{name}\". Bleak, graffiti-style occult aesthetic. \
                     Dark, atmospheric, and tinged with a sense of dread or struggle."
                ),
            },
        }
    }

    pub fn prompt(&self) -> &str {
        match self {
            Self::ReferenceBlended { prompt, .. } | Self::PromptOnly { prompt } => prompt,
        }
    }
}

/// Failure reported by a generation collaborator.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GenerationError {
    /// The request could not be sent or the connection failed.
    #[error("request failed: {message}")]
    Transport { message: String, is_retryable: bool },

    /// The API answered with a non-success status.
    #[error("API error (status {status_code}): {message}")]
    Api {
        status_code: u16,
        message: String,
        is_retryable: bool,
        retry_after: Option<Duration>,
    },

    /// The API answered but the body did not contain what was asked for.
    #[error("malformed response: {0}")]
    MalformedResponse(String),

    /// The collaborator is not usable (missing key, bad setup).
    #[error("generator unavailable: {0}")]
    Unavailable(String),
}

impl GenerationError {
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Transport { is_retryable, .. } | Self::Api { is_retryable, .. } => *is_retryable,
            _ => false,
        }
    }
}

/// Produces card artwork.
#[async_trait]
pub trait ImageGenerator: Send + Sync {
    async fn generate_image(
        &self,
        request: &CardImageRequest,
    ) -> Result<ImagePayload, GenerationError>;
}

/// Produces narrative text from a prompt.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    async fn generate_text(&self, prompt: &str) -> Result<String, GenerationError>;
}

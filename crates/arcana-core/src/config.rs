//! Configuration types shared by the infrastructure and interaction layers.

use crate::reading::DEFAULT_READER_NAME;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Root structure of `secret.json`.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct SecretConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gemini: Option<GeminiConfig>,
}

/// Gemini API credentials
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct GeminiConfig {
    pub api_key: String,
}

/// Root structure of `config.toml`. Every section is optional.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct ArcanaConfig {
    pub models: ModelSettings,
    pub reading: ReadingSettings,
    pub generation: GenerationSettings,
}

/// Model names used for each kind of request.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct ModelSettings {
    /// Interpretation text.
    pub text: String,
    /// Major arcana, blended with the reference portrait.
    pub blend: String,
    /// Minor arcana, prompt only.
    pub image: String,
}

impl Default for ModelSettings {
    fn default() -> Self {
        Self {
            text: "gemini-2.5-flash".to_string(),
            blend: "gemini-2.5-flash-image-preview".to_string(),
            image: "imagen-4.0-generate-001".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct ReadingSettings {
    pub reader_name: String,
}

impl Default for ReadingSettings {
    fn default() -> Self {
        Self {
            reader_name: DEFAULT_READER_NAME.to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct GenerationSettings {
    /// JPEG portrait blended into the major arcana. The built-in
    /// placeholder is used when unset.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reference_portrait: Option<PathBuf>,
    /// Per-request HTTP timeout. No timeout when unset.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub request_timeout_secs: Option<u64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_config_uses_defaults() {
        let config: ArcanaConfig = toml::from_str("").unwrap();
        assert_eq!(config, ArcanaConfig::default());
        assert_eq!(config.models.text, "gemini-2.5-flash");
        assert_eq!(config.reading.reader_name, "Homeless Mike");
        assert!(config.generation.reference_portrait.is_none());
    }

    #[test]
    fn test_partial_sections() {
        let config: ArcanaConfig = toml::from_str(
            r#"
            [models]
            text = "gemini-2.5-pro"

            [generation]
            request_timeout_secs = 90
            "#,
        )
        .unwrap();

        assert_eq!(config.models.text, "gemini-2.5-pro");
        assert_eq!(config.models.image, "imagen-4.0-generate-001");
        assert_eq!(config.generation.request_timeout_secs, Some(90));
    }

    #[test]
    fn test_secret_config_without_gemini() {
        let secrets: SecretConfig = serde_json::from_str("{}").unwrap();
        assert!(secrets.gemini.is_none());

        let secrets: SecretConfig =
            serde_json::from_str(r#"{"gemini": {"api_key": "abc"}}"#).unwrap();
        assert_eq!(secrets.gemini.unwrap().api_key, "abc");
    }
}

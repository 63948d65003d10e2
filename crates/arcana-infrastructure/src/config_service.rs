//! Loading of `config.toml` and the reference portrait.

use crate::paths::ArcanaPaths;
use anyhow::{Context, Result};
use arcana_core::config::{ArcanaConfig, GenerationSettings};
use arcana_core::generator::ImagePayload;
use std::path::{Path, PathBuf};

/// 1x1 JPEG used when no reference portrait is configured.
pub const PLACEHOLDER_PORTRAIT_BASE64: &str = "/9j/4AAQSkZJRgABAQEAYABgAAD/2wBDAAgGBgcGBQgHBwcJCQgKDBQNDAsLDBkSEw8UHRofHh0aHBwgJC4nICIsIxwcKDcpLDAxNDQ0Hyc5PTgyPC4zNDL/2wBDAQkJCQwLDBgNDRgyIRwhMjIyMjIyMjIyMjIyMjIyMjIyMjIyMjIyMjIyMjIyMjIyMjIyMjIyMjIyMjIyMjIyMjL/wAARCAABAAEDASIAAhEBAxEB/8QAFQABAQAAAAAAAAAAAAAAAAAAAAn/xAAUEAEAAAAAAAAAAAAAAAAAAAAA/8QAFAEBAAAAAAAAAAAAAAAAAAAAAP/EABQRAQAAAAAAAAAAAAAAAAAAAAD/2gAMAwEAAhEDEQA/ALQAB//Z";

/// Reads the application configuration.
pub struct ConfigService {
    path: PathBuf,
}

impl ConfigService {
    /// Uses `config.toml` in the arcana config directory.
    pub fn new(paths: &ArcanaPaths) -> Result<Self> {
        let path = paths
            .config_file()
            .map_err(|e| anyhow::anyhow!("Failed to get config path: {}", e))?;
        Ok(Self { path })
    }

    /// Uses an explicit config file.
    pub fn with_path(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Loads the config, returning defaults when the file is missing or empty.
    pub fn load(&self) -> Result<ArcanaConfig> {
        if !self.path.exists() {
            tracing::debug!(path = %self.path.display(), "No config file, using defaults");
            return Ok(ArcanaConfig::default());
        }

        let content = std::fs::read_to_string(&self.path)
            .with_context(|| format!("Failed to read {}", self.path.display()))?;

        if content.trim().is_empty() {
            return Ok(ArcanaConfig::default());
        }

        toml::from_str(&content).with_context(|| format!("Failed to parse {}", self.path.display()))
    }
}

/// Loads the portrait blended into the major arcana.
///
/// Relative paths are resolved against `base_dir`, the directory holding
/// the config file.
pub async fn load_reference_portrait(
    settings: &GenerationSettings,
    base_dir: &Path,
) -> Result<ImagePayload> {
    let Some(configured) = &settings.reference_portrait else {
        return Ok(ImagePayload::new("image/jpeg", PLACEHOLDER_PORTRAIT_BASE64));
    };

    let path = if configured.is_absolute() {
        configured.clone()
    } else {
        base_dir.join(configured)
    };

    let bytes = tokio::fs::read(&path)
        .await
        .with_context(|| format!("Failed to read reference portrait {}", path.display()))?;

    tracing::info!(path = %path.display(), bytes = bytes.len(), "Loaded reference portrait");
    Ok(ImagePayload::from_bytes(mime_for(&path), &bytes))
}

fn mime_for(path: &Path) -> &'static str {
    match path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_ascii_lowercase)
        .as_deref()
    {
        Some("png") => "image/png",
        Some("webp") => "image/webp",
        _ => "image/jpeg",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_config_uses_defaults() {
        let temp = tempfile::tempdir().unwrap();
        let service = ConfigService::new(&ArcanaPaths::new(Some(temp.path()))).unwrap();
        assert_eq!(service.load().unwrap(), ArcanaConfig::default());
    }

    #[test]
    fn test_loads_reader_name() {
        let temp = tempfile::tempdir().unwrap();
        let path = temp.path().join("config.toml");
        std::fs::write(&path, "[reading]\nreader_name = \"Old Rosa\"\n").unwrap();

        let config = ConfigService::with_path(&path).load().unwrap();
        assert_eq!(config.reading.reader_name, "Old Rosa");
        assert_eq!(config.models.blend, "gemini-2.5-flash-image-preview");
    }

    #[test]
    fn test_invalid_toml_reports_path() {
        let temp = tempfile::tempdir().unwrap();
        let path = temp.path().join("config.toml");
        std::fs::write(&path, "[models\ntext = 1").unwrap();

        let err = ConfigService::with_path(&path).load().unwrap_err();
        assert!(err.to_string().contains("config.toml"));
    }

    #[tokio::test]
    async fn test_placeholder_portrait_by_default() {
        let portrait = load_reference_portrait(&GenerationSettings::default(), Path::new("."))
            .await
            .unwrap();
        assert_eq!(portrait.mime_type, "image/jpeg");
        assert_eq!(portrait.data, PLACEHOLDER_PORTRAIT_BASE64);
    }

    #[tokio::test]
    async fn test_relative_portrait_path() {
        let temp = tempfile::tempdir().unwrap();
        std::fs::write(temp.path().join("face.png"), b"\x89PNG").unwrap();

        let settings = GenerationSettings {
            reference_portrait: Some(PathBuf::from("face.png")),
            request_timeout_secs: None,
        };
        let portrait = load_reference_portrait(&settings, temp.path()).await.unwrap();
        assert_eq!(portrait.mime_type, "image/png");
        assert_eq!(portrait.decode().unwrap(), b"\x89PNG");
    }

    #[tokio::test]
    async fn test_missing_portrait_is_an_error() {
        let settings = GenerationSettings {
            reference_portrait: Some(PathBuf::from("/definitely/not/here.jpg")),
            request_timeout_secs: None,
        };
        assert!(load_reference_portrait(&settings, Path::new("/")).await.is_err());
    }
}

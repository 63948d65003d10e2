//! Secret service implementation.
//!
//! Reads the Gemini API key from `secret.json`, falling back to the
//! `GEMINI_API_KEY` and `API_KEY` environment variables.

use crate::paths::ArcanaPaths;
use anyhow::Result;
use arcana_core::config::{GeminiConfig, SecretConfig};
use arcana_core::secret::SecretService;
use std::path::{Path, PathBuf};
use std::sync::{Arc, RwLock};

/// Environment variables checked, in order, when the file has no key.
pub const API_KEY_ENV_VARS: [&str; 2] = ["GEMINI_API_KEY", "API_KEY"];

/// Service for loading secret configuration.
///
/// The loaded config is cached so the file is read at most once.
#[derive(Clone)]
pub struct SecretServiceImpl {
    secrets: Arc<RwLock<Option<SecretConfig>>>,
    file_path: PathBuf,
    use_env: bool,
}

impl SecretServiceImpl {
    /// Creates a service reading `secret.json` under `base_path`, or under
    /// the platform config directory when `None`.
    pub fn new(base_path: Option<&Path>) -> Result<Self> {
        let file_path = ArcanaPaths::new(base_path)
            .secret_file()
            .map_err(|e| anyhow::anyhow!("Failed to get secret path: {}", e))?;

        Ok(Self {
            secrets: Arc::new(RwLock::new(None)),
            file_path,
            use_env: true,
        })
    }

    /// Disables the environment variable fallback.
    pub fn without_env_fallback(mut self) -> Self {
        self.use_env = false;
        self
    }

    pub fn file_path(&self) -> &Path {
        &self.file_path
    }

    fn read_file(&self) -> Result<SecretConfig, String> {
        if !self.file_path.exists() {
            return Ok(SecretConfig::default());
        }

        let content = std::fs::read_to_string(&self.file_path).map_err(|e| {
            format!(
                "Failed to read secret file at {}: {}",
                self.file_path.display(),
                e
            )
        })?;

        if content.trim().is_empty() {
            return Ok(SecretConfig::default());
        }

        // serde_json errors can quote the offending input, keep only the position
        serde_json::from_str(&content).map_err(|e| {
            format!(
                "Failed to parse secret file at {} (line {}, column {})",
                self.file_path.display(),
                e.line(),
                e.column()
            )
        })
    }

    fn env_api_key() -> Option<String> {
        API_KEY_ENV_VARS
            .iter()
            .filter_map(|name| std::env::var(name).ok())
            .find(|value| !value.trim().is_empty())
    }

    fn load_secrets_internal(&self) -> Result<SecretConfig, String> {
        {
            let read_lock = self
                .secrets
                .read()
                .map_err(|_| "Secret cache lock poisoned".to_string())?;
            if let Some(ref cached) = *read_lock {
                return Ok(cached.clone());
            }
        }

        let mut loaded = self.read_file()?;

        let has_file_key = loaded
            .gemini
            .as_ref()
            .is_some_and(|gemini| !gemini.api_key.trim().is_empty());
        if !has_file_key && self.use_env {
            if let Some(api_key) = Self::env_api_key() {
                tracing::debug!("Using Gemini API key from environment");
                loaded.gemini = Some(GeminiConfig { api_key });
            }
        }

        {
            let mut write_lock = self
                .secrets
                .write()
                .map_err(|_| "Secret cache lock poisoned".to_string())?;
            *write_lock = Some(loaded.clone());
        }

        Ok(loaded)
    }
}

#[async_trait::async_trait]
impl SecretService for SecretServiceImpl {
    async fn load_secrets(&self) -> Result<SecretConfig, String> {
        self.load_secrets_internal()
    }

    async fn secret_file_exists(&self) -> bool {
        self.file_path.exists()
    }
}

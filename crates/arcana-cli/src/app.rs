//! Wiring of configuration, Gemini agents and the use case.

use crate::presenter::TerminalPresenter;
use anyhow::{Context, Result};
use arcana_application::{DeckGenerator, InterpretationComposer, TarotUseCase};
use arcana_core::config::ArcanaConfig;
use arcana_core::presenter::Presenter;
use arcana_core::secret::SecretService;
use arcana_infrastructure::{ArcanaPaths, ConfigService, SecretServiceImpl, load_reference_portrait};
use arcana_interaction::{GeminiClient, GeminiImageAgent, GeminiTextAgent};
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

/// Loads `config.toml` from the configuration directory.
pub fn load_config(config_dir: Option<&Path>) -> Result<(ArcanaPaths, ArcanaConfig)> {
    let paths = ArcanaPaths::new(config_dir);
    let config = ConfigService::new(&paths)?.load()?;
    Ok((paths, config))
}

/// Creates the Gemini client from the configured key.
///
/// Without a key and without `secret.json`, an empty template is written so
/// the user has a file to fill in.
async fn gemini_client(paths: &ArcanaPaths, secrets: &SecretServiceImpl) -> Result<GeminiClient> {
    let err = match GeminiClient::from_secrets(secrets).await {
        Ok(client) => return Ok(client),
        Err(err) => err,
    };

    if !secrets.secret_file_exists().await {
        let path = paths
            .ensure_secret_file()
            .context("Failed to write secret.json template")?;
        tracing::info!(path = %path.display(), "Wrote empty secret.json template");
    }

    Err(anyhow::Error::new(err).context(format!(
        "Put your key into {} or set GEMINI_API_KEY",
        secrets.file_path().display()
    )))
}

/// Builds a use case backed by Gemini that renders to the terminal.
pub async fn build_usecase(config_dir: Option<&Path>) -> Result<TarotUseCase> {
    let (paths, config) = load_config(config_dir)?;

    let secrets = SecretServiceImpl::new(config_dir)?;
    let mut client = gemini_client(&paths, &secrets).await?;
    if let Some(secs) = config.generation.request_timeout_secs {
        client = client.with_timeout(Duration::from_secs(secs))?;
    }

    let base_dir = paths
        .config_dir()
        .map_err(|e| anyhow::anyhow!("Failed to get config directory: {}", e))?;
    let reference = load_reference_portrait(&config.generation, &base_dir).await?;

    let image_agent = GeminiImageAgent::new(client.clone())
        .with_blend_model(&config.models.blend)
        .with_image_model(&config.models.image);
    let text_agent = GeminiTextAgent::new(client).with_model(&config.models.text);

    tracing::debug!(
        text = %config.models.text,
        blend = %config.models.blend,
        image = %config.models.image,
        "Gemini agents configured"
    );

    let presenter: Arc<dyn Presenter> = Arc::new(TerminalPresenter::new());
    let usecase = TarotUseCase::new(
        DeckGenerator::new(Arc::new(image_agent), reference),
        InterpretationComposer::new(Arc::new(text_agent))
            .with_reader_name(config.reading.reader_name),
        presenter,
    )?;
    Ok(usecase)
}

use crate::app;
use anyhow::{Context, Result};
use arcana_core::card::Deck;
use colored::Colorize;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

/// Generates a deck and optionally writes its images to `export`.
pub async fn run(config_dir: Option<&Path>, export: Option<&Path>) -> Result<ExitCode> {
    let usecase = app::build_usecase(config_dir).await?;
    let report = usecase.generate_deck().await?;

    if report.deck.is_empty() {
        return Ok(ExitCode::FAILURE);
    }

    if let Some(dir) = export {
        let written = export_deck(&report.deck, dir)?;
        println!(
            "{}",
            format!("Wrote {} card images to {}", written.len(), dir.display()).green()
        );
    }
    Ok(ExitCode::SUCCESS)
}

/// File name for a card: `The Wheel of Fortune` becomes `the-wheel-of-fortune`.
fn slug(name: &str) -> String {
    name.split_whitespace()
        .map(str::to_lowercase)
        .collect::<Vec<_>>()
        .join("-")
}

/// Writes every card image as `<slug>.<ext>` and returns the written paths.
pub fn export_deck(deck: &Deck, dir: &Path) -> Result<Vec<PathBuf>> {
    fs::create_dir_all(dir).with_context(|| format!("Failed to create {}", dir.display()))?;

    let mut written = Vec::with_capacity(deck.len());
    for card in deck.iter() {
        let image = card
            .image()
            .with_context(|| format!("{} has no embedded image", card.name))?;
        let bytes = image
            .decode()
            .with_context(|| format!("Failed to decode the image of {}", card.name))?;

        let path = dir.join(format!("{}.{}", slug(&card.name), image.extension()));
        fs::write(&path, bytes).with_context(|| format!("Failed to write {}", path.display()))?;
        tracing::debug!(path = %path.display(), "Exported card");
        written.push(path);
    }
    Ok(written)
}

use crate::app;
use anyhow::Result;
use arcana_core::spread::get_spread;
use rand::SeedableRng;
use rand::rngs::StdRng;
use std::path::Path;
use std::process::ExitCode;

/// Generates a deck and performs one reading on it.
///
/// Failures of the reading itself are already shown by the presenter and
/// only turn into a failing exit code here.
pub async fn run(
    config_dir: Option<&Path>,
    spread_id: &str,
    query: &str,
    seed: Option<u64>,
) -> Result<ExitCode> {
    // checked before paying for 78 image requests
    if let Err(err) = get_spread(spread_id) {
        anyhow::bail!("{} Run `arcana spreads` to list them.", err.user_message());
    }

    let mut usecase = app::build_usecase(config_dir).await?;
    if let Some(seed) = seed {
        usecase = usecase.with_rng(StdRng::seed_from_u64(seed));
    }

    usecase.generate_deck().await?;
    match usecase.request_reading(spread_id, query).await {
        Ok(_) => Ok(ExitCode::SUCCESS),
        Err(_) => Ok(ExitCode::FAILURE),
    }
}

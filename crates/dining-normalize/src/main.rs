mod config;
mod error;

use tracing::info;
use tracing_subscriber::EnvFilter;

use config::Config;
use error::AppError;

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::from_default_env().add_directive(tracing::Level::INFO.into()),
        )
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .init();

    info!("starting restaurant normalizer");

    let config = Config::from_env()?;
    info!(
        raw = %config.raw_path.display(),
        normalized = %config.normalized_path.display(),
        "configuration loaded"
    );

    let report = dining_core::pipeline::run(&config.raw_path, &config.normalized_path)
        .map_err(AppError::from)
        .inspect_err(|e| tracing::error!(error = %e, "normalization failed"))?;

    info!(
        raw = report.raw,
        dropped = report.dropped,
        skipped = report.unmatched,
        restaurants = report.restaurants,
        id_collisions = report.id_collisions,
        "normalization complete"
    );
    Ok(())
}
